use crate::config::{LogConf, LogFormat};
use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installe le subscriber global ; RUST_LOG prime sur le niveau de la config
pub fn init_logging(conf: &LogConf) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&conf.level))
        .map_err(|e| anyhow!("filtre de log invalide '{}': {e}", conf.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match conf.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };
    installed.map_err(|e| anyhow!("subscriber déjà installé: {e}"))
}
