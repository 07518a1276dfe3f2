/*!
Helpers de tests pour le dashboard Folio

- Builder de snapshots JSON conformes au contrat /api/health
- Attente active bornée sur une condition
*/

use serde_json::{json, Value};
use std::time::Duration;

/// Builder de snapshot santé (mêmes clés que l'endpoint du kernel)
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    region: String,
    uptime: u64,
    cpu: u32,
    memory: u64,
    memory_percent: u32,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            region: "dev-local".into(),
            uptime: 0,
            cpu: 5,
            memory: 0,
            memory_percent: 20,
        }
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = region.into();
        self
    }

    pub fn uptime(mut self, uptime: u64) -> Self {
        self.uptime = uptime;
        self
    }

    pub fn cpu(mut self, cpu: u32) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn memory(mut self, memory: u64, memory_percent: u32) -> Self {
        self.memory = memory;
        self.memory_percent = memory_percent;
        self
    }

    pub fn build(&self) -> Value {
        json!({
            "status": "active",
            "region": self.region,
            "uptime": self.uptime,
            "cpu": self.cpu,
            "memory": self.memory,
            "memoryPercent": self.memory_percent,
        })
    }

    /// Snapshot auquel il manque un champ (réponse malformée côté client)
    pub fn build_without(&self, field: &str) -> Value {
        let mut value = self.build();
        if let Some(obj) = value.as_object_mut() {
            obj.remove(field);
        }
        value
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Attend que `condition` devienne vraie, en vérifiant toutes les 20ms
pub async fn wait_until<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let reached = condition();
    if !reached {
        log::warn!("⏰ Timeout after {}ms waiting for condition", timeout_ms);
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_has_contract_keys() {
        let snap = SnapshotBuilder::new().region("iad1").cpu(9).memory(100, 30).build();
        let obj = snap.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(snap["memoryPercent"], 30);
        assert_eq!(snap["region"], "iad1");
    }

    #[test]
    fn test_build_without_drops_field() {
        let snap = SnapshotBuilder::new().build_without("cpu");
        assert!(snap.get("cpu").is_none());
        assert_eq!(snap.as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_wait_until_times_out() {
        assert!(!wait_until(50, || false).await);
        assert!(wait_until(50, || true).await);
    }
}
