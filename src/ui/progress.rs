//! Download progress reporting
//!
//! Byte-level progress bars in interactive terminals, plain line output
//! everywhere else.

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;

/// Progress display for a single archive download
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Start tracking a download. `total` is the Content-Length when known.
    pub fn start(ctx: &UiContext, label: &str, total: Option<u64>) -> Self {
        if !ctx.use_fancy_output() {
            println!("  Downloading {label}...");
            return Self { bar: None };
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "  {prefix:.cyan} {bar:25.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})",
                        )
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("  {spinner:.cyan} {prefix} {bytes}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_prefix(label.to_string());
        Self { bar: Some(bar) }
    }

    /// Record `n` more bytes written.
    pub fn advance(&self, n: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(n);
        }
    }

    /// Finish and clear the bar.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
