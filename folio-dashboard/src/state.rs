//! Client-owned view state shared between timer tasks and the renderer

use crate::source::HealthPayload;
use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Last-received snapshot fields as shown on the metric cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub cpu: u32,
    pub mem: u64,
    pub uptime: u64,
    pub region: String,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            cpu: 0,
            mem: 0,
            uptime: 0,
            region: "...".to_string(),
        }
    }
}

impl From<HealthPayload> for DisplayMetrics {
    fn from(payload: HealthPayload) -> Self {
        Self {
            cpu: payload.cpu,
            mem: payload.memory,
            uptime: payload.uptime,
            region: payload.region,
        }
    }
}

/// Poller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    /// No successful poll yet
    Idle,
    /// At least one snapshot received
    Live,
    /// Torn down; late results are discarded
    Stopped,
}
