use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::RelictError;

/// Detector tuning. All fields have working defaults, calibrated against the
/// bundled model.
#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// Sigmoid outputs strictly above this report an issue.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Tokens read per comment during feature extraction; the rest of a very
    /// long comment is ignored.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Directory holding `merges.txt`, `vocab.json` and `model.json`.
    /// Unset means the standard candidate locations are scanned.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_tokens: default_max_tokens(),
            model_dir: None,
        }
    }
}

fn default_threshold() -> f64 {
    0.83
}

fn default_max_tokens() -> usize {
    500
}

/// Load config from RELICT_CONFIG env var, ~/.relict/config.toml, or defaults.
pub fn load_config() -> Result<DetectorConfig, RelictError> {
    let path = config_path();
    match path {
        Some(p) if p.exists() => {
            let content = std::fs::read_to_string(&p)?;
            let config: DetectorConfig = toml::from_str(&content)
                .map_err(|e| RelictError::Config(format!("{}: {e}", p.display())))?;
            validate_config(&config)?;
            Ok(config)
        }
        _ => Ok(DetectorConfig::default()),
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("RELICT_CONFIG") {
        return Some(PathBuf::from(p));
    }
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(".relict").join("config.toml"))
}

fn validate_config(config: &DetectorConfig) -> Result<(), RelictError> {
    if !(0.0..=1.0).contains(&config.threshold) {
        return Err(RelictError::Config(format!(
            "threshold must be within [0, 1], got {}",
            config.threshold
        )));
    }
    if config.max_tokens == 0 {
        return Err(RelictError::Config("max_tokens must be at least 1".into()));
    }
    Ok(())
}
