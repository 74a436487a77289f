//! Terminal output: context detection, styled lines, progress, rendering

mod context;
mod output;
mod progress;
mod render;

pub use context::UiContext;
pub use output::{key_value, step_info, step_ok, step_warn};
pub use progress::DownloadProgress;
pub use render::{render_level, render_tree};
