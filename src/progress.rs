//! Progress reporting for the clustering pass
//!
//! The deduplicator calls a `ProgressSink` once per outer-loop position.
//! Reports are fire-and-forget and have no effect on the result.

use crate::types::QuestionId;
use indicatif::{ProgressBar, ProgressStyle};

/// Receiver of `(percent, current reference id)` updates
pub trait ProgressSink {
    fn report(&mut self, percent: u8, reference_id: QuestionId);
}

/// Terminal progress bar drawn on stderr
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a bar `width` cells wide labelled with `action`
    pub fn new(action: &str, width: u16) -> Self {
        let bar = ProgressBar::new(100);
        let template = format!(
            "{{prefix}} : [{{bar:{}.green/red}}] {{pos:>3}} % {{msg}}",
            width
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_prefix(action.to_string());
        Self { bar }
    }
}

impl ProgressSink for CliProgress {
    fn report(&mut self, percent: u8, reference_id: QuestionId) {
        let percent = percent.min(100);
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(format!("(ref {})", reference_id));
        if percent == 100 {
            self.bar.finish();
        }
    }
}

/// Collects every report in call order
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub reports: Vec<(u8, QuestionId)>,
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, percent: u8, reference_id: QuestionId) {
        self.reports.push((percent, reference_id));
    }
}
