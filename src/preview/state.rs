//! Shared state of the preview handlers

use std::time::Instant;

use crate::pages::PageContext;

#[derive(Clone)]
pub struct PreviewState {
    /// Client, store, telemetry and flags handed to every page
    pub context: PageContext,
    pub start_time: Instant,
}

impl PreviewState {
    pub fn new(context: PageContext) -> Self {
        Self {
            context,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
