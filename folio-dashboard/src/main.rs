//! Folio Dashboard - live terminal view of the portfolio health endpoint
//!
//! Two independent timers drive the view:
//! - a health poller (immediate poll, then every few seconds) feeding the metric cards
//! - a deployment console that replays a scripted log in a loop
//!
//! Poll failures only reach the log; the cards keep their last values.
//! On Unix, SIGHUP restarts the console replay without touching the cards.

mod config;
mod console;
mod poller;
mod render;
mod source;
mod state;
mod view;

use anyhow::{Context, Result};
use config::DashboardConfig;
use source::HttpHealthSource;
use std::io::Write;
use std::sync::Arc;
use tokio::time::interval;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use view::{DashboardView, ViewSettings};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DashboardConfig::load().await.context("Failed to load configuration")?;

    // stdout is the render surface, logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = HttpHealthSource::new(config.endpoint.clone(), config.request_timeout())
        .context("Failed to build HTTP client")?;
    info!("Folio dashboard polling {}", source.url());

    let mut view = DashboardView::new(
        Arc::new(source),
        ViewSettings {
            poll_interval: config.poll_interval(),
            log_interval: config.log_interval(),
            console_height: config.console_height,
            script: console::default_script(),
        },
    );
    view.mount();

    let mut refresh = interval(config.refresh());
    let mut restart = RestartSignal::new().context("Failed to install restart signal handler")?;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let screen = render::render_screen(&view.frame());
                if let Err(e) = stdout.write_all(screen.as_bytes()).and_then(|_| stdout.flush()) {
                    warn!("Failed to draw frame: {}", e);
                }
            }
            _ = restart.recv() => {
                info!("Restarting deployment console");
                view.restart_console();
            }
            res = &mut shutdown => {
                if let Err(e) = res {
                    warn!("Failed to listen for ctrl-c: {}", e);
                }
                break;
            }
        }
    }

    view.unmount();
    info!("Folio dashboard stopped");
    Ok(())
}

/// SIGHUP listener; never fires on platforms without Unix signals
struct RestartSignal {
    #[cfg(unix)]
    hangup: tokio::signal::unix::Signal,
}

impl RestartSignal {
    fn new() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self { hangup: signal(SignalKind::hangup())? })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    async fn recv(&mut self) {
        #[cfg(unix)]
        if self.hangup.recv().await.is_some() {
            return;
        }
        // stream closed (or no signals here): park this branch for good
        std::future::pending::<()>().await
    }
}
