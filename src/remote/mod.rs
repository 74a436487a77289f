//! Remote access: blocking HTTP fetch and HTML directory listings
//!
//! All network I/O is synchronous and sequential; request count is bounded
//! by the discovery hierarchy depth unless everything is being expanded.

mod fetch;
mod listing;

pub use fetch::{Fetch, HttpFetcher, RemoteBody};
pub use listing::DirectoryLister;

/// Join a URL with a path segment, normalizing the separating slash.
pub fn join_url(base: &str, segment: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), segment)
}
