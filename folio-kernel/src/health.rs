/**
 * HEALTH - Calcul du snapshot santé affiché sur le portfolio
 *
 * RÔLE : Transformer des signaux runtime bruts (mémoire, uptime, région)
 * en un enregistrement borné prêt à afficher.
 *
 * ATTENTION : le CPU est un jitter aléatoire et le pourcentage mémoire
 * reçoit un offset +20 plafonné à 100. C'est voulu (rendu "occupé"),
 * ce ne sont pas des mesures.
 */

use crate::models::{HealthSnapshot, RuntimeSignals, ServiceStatus};
use rand::Rng;
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::debug;

const MIB: f64 = 1024.0 * 1024.0;
/// Plafond supposé du conteneur (1 GiB), indépendant de la taille réelle
pub const ASSUMED_TOTAL_BYTES: u64 = 1024 * 1024 * 1024;
pub const MEMORY_PERCENT_OFFSET: u64 = 20;
pub const FALLBACK_REGION: &str = "dev-local";

/// Instant de démarrage du process, fixé une seule fois dans `main`
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    started_at: Instant,
}

impl ProcessClock {
    pub fn start() -> Self {
        Self { started_at: Instant::now() }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Calcule un snapshot ; ne peut pas échouer, les signaux absents prennent leur valeur par défaut
pub fn compute_snapshot<R: Rng>(signals: &RuntimeSignals, rng: &mut R) -> HealthSnapshot {
    let heap = signals.heap_used_bytes.unwrap_or(0) as f64;

    let raw_percent = (heap / ASSUMED_TOTAL_BYTES as f64 * 100.0).round() as u64;
    let memory_percent = (raw_percent + MEMORY_PERCENT_OFFSET).min(100) as u32;

    // blanc = absent, sinon la valeur passe telle quelle
    let region = signals
        .region
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(FALLBACK_REGION)
        .to_string();

    HealthSnapshot {
        status: ServiceStatus::Active,
        region,
        uptime: signals.uptime.as_secs(),
        cpu: rng.gen_range(5..15),
        memory: (heap / MIB).round() as u64,
        memory_percent,
    }
}

/// Source des signaux runtime, injectable pour les tests
pub trait SignalSource: Send + Sync {
    fn collect(&self) -> RuntimeSignals;
}

/// Signaux du process courant : mémoire résidente (sysinfo), uptime, région via env
pub struct ProcessSignals {
    clock: ProcessClock,
    region_var: String,
}

impl ProcessSignals {
    pub fn new(clock: ProcessClock, region_var: impl Into<String>) -> Self {
        Self { clock, region_var: region_var.into() }
    }
}

impl SignalSource for ProcessSignals {
    fn collect(&self) -> RuntimeSignals {
        RuntimeSignals {
            heap_used_bytes: process_memory_bytes(),
            uptime: self.clock.uptime(),
            // relu à chaque appel, l'endpoint ne garde rien entre deux requêtes
            region: std::env::var(&self.region_var).ok(),
        }
    }
}

fn process_memory_bytes() -> Option<u64> {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            debug!("current pid unavailable: {e}");
            return None;
        }
    };

    let mut sys = System::new();
    if !sys.refresh_process(pid) {
        debug!("process {pid} not found by sysinfo");
        return None;
    }
    sys.process(pid).map(|p| p.memory())
}
