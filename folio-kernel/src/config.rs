use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KernelConfig {
    pub listen: String,      // ex: "0.0.0.0:8080"
    pub region_var: String,  // variable d'env lue pour la région (ex: VERCEL_REGION)
    pub log: LogConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LogConf {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lecture de {path} impossible: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("config invalide dans {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
            region_var: "VERCEL_REGION".into(),
            log: LogConf::default(),
        }
    }
}

impl Default for LogConf {
    fn default() -> Self {
        Self { level: "info".into(), format: LogFormat::Pretty }
    }
}

/// Lit un fichier YAML ; un fichier vide donne la config par défaut
pub async fn read_config(path: &Path) -> Result<KernelConfig, ConfigError> {
    let display = path.display().to_string();
    let txt = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
    if txt.trim().is_empty() {
        return Ok(KernelConfig::default());
    }
    serde_yaml::from_str(&txt).map_err(|source| ConfigError::Parse { path: display, source })
}

/// Charge la config depuis $FOLIO_KERNEL_CONFIG ou kernel.yaml, défauts sinon
pub async fn load_config() -> KernelConfig {
    let path = std::env::var("FOLIO_KERNEL_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    if !Path::new(&path).exists() {
        // le subscriber n'est pas encore installé ici
        eprintln!("[kernel] pas de {path}, usage config par défaut");
        return KernelConfig::default();
    }
    read_config(Path::new(&path)).await.unwrap_or_else(|e| {
        eprintln!("[kernel] {e}");
        KernelConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.listen, "0.0.0.0:8080");
        assert_eq!(cfg.region_var, "VERCEL_REGION");
        assert_eq!(cfg.log.format, LogFormat::Pretty);
    }

    #[tokio::test]
    async fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: \"127.0.0.1:9000\"\nlog:\n  format: json").unwrap();

        let cfg = read_config(file.path()).await.unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:9000");
        assert_eq!(cfg.region_var, "VERCEL_REGION");
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert_eq!(cfg.log.level, "info");
    }

    #[tokio::test]
    async fn test_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = read_config(file.path()).await.unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: [unterminated").unwrap();
        let err = read_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
