use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Marqueur constant : "active" tant que l'endpoint répond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
}

/// Snapshot santé transmis au dashboard (clés JSON figées côté client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub status: ServiceStatus,
    pub region: String,
    pub uptime: u64,        // secondes depuis le démarrage du process
    pub cpu: u32,           // jitter synthétique dans [5,15)
    pub memory: u64,        // MiB arrondis
    pub memory_percent: u32, // [20,100], offset cosmétique +20
}

/// Signaux bruts collectés à chaque requête (None = signal indisponible)
#[derive(Debug, Clone, Default)]
pub struct RuntimeSignals {
    pub heap_used_bytes: Option<u64>,
    pub uptime: Duration,
    pub region: Option<String>,
}
