//! Dashboard view lifecycle
//!
//! The view owns exactly one poller and one console animator while mounted.
//! Mounting again tears the previous pair down first, so repeated
//! mount/unmount cycles never leave extra timers running.

use crate::console::LogAnimator;
use crate::poller::{PollerStatus, PollingClient};
use crate::source::HealthSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub poll_interval: Duration,
    pub log_interval: Duration,
    pub console_height: usize,
    pub script: Vec<String>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub poller: PollerStatus,
    pub console: Vec<String>,
}

pub struct DashboardView {
    source: Arc<dyn HealthSource>,
    settings: ViewSettings,
    poller: Option<PollingClient>,
    console: Option<LogAnimator>,
}

impl DashboardView {
    pub fn new(source: Arc<dyn HealthSource>, settings: ViewSettings) -> Self {
        Self { source, settings, poller: None, console: None }
    }

    pub fn mount(&mut self) {
        if self.is_mounted() {
            debug!("view already mounted, remounting");
            self.unmount();
        }
        self.poller = Some(PollingClient::start(self.source.clone(), self.settings.poll_interval));
        self.console = Some(self.start_console());
    }

    /// Stops both timers. Safe to call on an unmounted view.
    pub fn unmount(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        if let Some(mut console) = self.console.take() {
            console.stop();
        }
    }

    /// Restart only the console replay; metric state is untouched
    pub fn restart_console(&mut self) {
        if !self.is_mounted() {
            return;
        }
        if let Some(mut console) = self.console.take() {
            console.stop();
        }
        self.console = Some(self.start_console());
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.as_ref().is_some_and(PollingClient::is_running)
    }

    pub fn frame(&self) -> Frame {
        let poller = self.poller.as_ref().map(PollingClient::status).unwrap_or_default();
        let console = self
            .console
            .as_ref()
            .map(|animator| animator.snapshot().visible().to_vec())
            .unwrap_or_default();
        Frame { poller, console }
    }

    /// Full console state, not just the visible window
    #[cfg(test)]
    pub fn console_state(&self) -> Option<crate::console::ConsoleState> {
        self.console.as_ref().map(LogAnimator::snapshot)
    }

    fn start_console(&self) -> LogAnimator {
        LogAnimator::start(
            self.settings.script.clone(),
            self.settings.log_interval,
            self.settings.console_height,
        )
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.unmount();
    }
}
