//! Announcer adapters.
//!
//! The dashboard speaks announcements through the browser's speech engine;
//! here they go to the log, or into a buffer for inspection.

use log::info;

use crate::app::ports::Announcer;

/// Logs each announcement at `info` level.
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, text: &str) {
        info!("SPEAK | {}", text);
    }
}

/// Keeps every announcement, in order.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    spoken: Vec<String>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    /// Take everything recorded so far.
    pub fn drain(&mut self) -> Vec<String> {
        core::mem::take(&mut self.spoken)
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }
}
