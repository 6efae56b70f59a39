use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown on stderr while a pipeline step runs.
pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    tick_interval: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} [{elapsed_precise}] {msg}",
            message: message.into(),
            tick_interval: None,
        }
    }

    pub(crate) fn with_tick(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if let Some(interval) = self.tick_interval {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}
