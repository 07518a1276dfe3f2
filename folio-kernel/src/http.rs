/**
 * API HTTP FOLIO - Endpoint santé du portfolio
 *
 * FONCTIONNEMENT :
 * - GET /health      : liveness, renvoie "ok"
 * - GET /api/health  : snapshot santé JSON (status, region, uptime, cpu, memory, memoryPercent)
 *
 * Aucun état entre deux requêtes, aucun paramètre lu, pas d'auth ni de cache :
 * deux appels successifs peuvent renvoyer un cpu différent.
 */

use axum::{extract::State, routing::get, Json, Router};
use crate::health::{compute_snapshot, SignalSource};
use crate::models::HealthSnapshot;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub signals: Arc<dyn SignalSource>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/health", get(get_health))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

// GET /api/health (snapshot synthétique)
async fn get_health(State(app): State<AppState>) -> Json<HealthSnapshot> {
    let signals = app.signals.collect();
    let snapshot = compute_snapshot(&signals, &mut rand::thread_rng());
    debug!(
        uptime = snapshot.uptime,
        cpu = snapshot.cpu,
        memory = snapshot.memory,
        "served health snapshot"
    );
    Json(snapshot)
}
