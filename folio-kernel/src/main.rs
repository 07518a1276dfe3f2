/**
 * FOLIO KERNEL - Point d'entrée du serveur santé du portfolio
 *
 * RÔLE : Bootstrap config + logging + horloge process, puis sert l'API HTTP.
 *
 * ARCHITECTURE : endpoint sans état ; seule l'horloge de démarrage est globale,
 * initialisée ici une fois et en lecture seule ensuite.
 */

mod config;
mod health;
mod http;
mod logging;
mod models;

use crate::config::load_config;
use crate::health::{ProcessClock, ProcessSignals};
use crate::http::AppState;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // horloge capturée avant tout le reste : uptime = âge du process
    let clock = ProcessClock::start();

    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    let cfg = load_config().await;
    logging::init_logging(&cfg.log).context("Failed to initialize logging")?;

    if std::env::var(&cfg.region_var).map(|r| r.trim().is_empty()).unwrap_or(true) {
        warn!(region_var = %cfg.region_var, "region not set, snapshots will report dev-local");
    }

    let app_state = AppState {
        signals: Arc::new(ProcessSignals::new(clock, cfg.region_var.clone())),
    };
    let app = http::build_router(app_state);

    let listener = TcpListener::bind(&cfg.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.listen))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("kernel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
