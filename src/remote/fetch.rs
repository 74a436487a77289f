//! Blocking HTTP client behind a trait seam
//!
//! `Fetch` is the boundary the discovery pipeline talks to, so tests can
//! substitute canned pages and count requests.

use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::{QtdlError, QtdlResult};

/// Text fetch seam used by the directory lister and metadata loader
pub trait Fetch {
    /// Issue a GET and return the response body as text.
    ///
    /// Transport failures and non-2xx statuses are both `Fetch` errors.
    fn get(&self, url: &str) -> QtdlResult<String>;
}

/// An open streaming response body
pub struct RemoteBody {
    /// Value of the Content-Length header, when the server sent one
    pub content_length: Option<u64>,
    reader: Box<dyn Read + Send + Sync>,
}

impl Read for RemoteBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// `ureq`-backed blocking fetcher
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher with connect and response-header timeouts.
    ///
    /// Body reads are deliberately unbounded so large archive downloads
    /// are not cut off mid-stream.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(timeout))
            .timeout_recv_response(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }

    /// Open a response body for streaming, without buffering it.
    ///
    /// Used for archive downloads; listings go through [`Fetch::get`].
    pub fn open(&self, url: &str) -> QtdlResult<RemoteBody> {
        debug!(url, "GET (stream)");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| QtdlError::fetch(url, e.to_string()))?;

        let content_length = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        Ok(RemoteBody {
            content_length,
            reader: Box::new(response.into_body().into_reader()),
        })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> QtdlResult<String> {
        debug!(url, "GET");
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| QtdlError::fetch(url, e.to_string()))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| QtdlError::fetch(url, e.to_string()))
    }
}
