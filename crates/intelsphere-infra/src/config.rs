//! Configuration loader for the IntelSphere gateway.
//!
//! Reads `sphere.toml` and deserializes it into [`GlobalConfig`]. Falls back
//! to defaults when the file is missing or malformed, so the server always
//! starts with the built-in eight-slot roster.

use std::path::{Path, PathBuf};

use intelsphere_types::config::GlobalConfig;
use intelsphere_types::error::ConfigError;

const CONFIG_FILE: &str = "sphere.toml";

/// Pick the config file path.
///
/// An explicit path (from `--config` or `SPHERE_CONFIG`) wins; otherwise
/// `{config_dir}/intelsphere/sphere.toml`, or `./sphere.toml` on platforms
/// without a config directory.
pub fn resolve_config_path(cli_override: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_override {
        return path.to_path_buf();
    }
    dirs::config_dir()
        .map(|dir| dir.join("intelsphere").join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Read and parse `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn try_load_global_config(path: &Path) -> Result<Option<GlobalConfig>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<GlobalConfig>(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })
}

/// Load configuration from `path`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
/// - Otherwise the parsed config.
pub async fn load_global_config(path: &Path) -> GlobalConfig {
    match try_load_global_config(path).await {
        Ok(Some(config)) => {
            tracing::debug!(
                path = %path.display(),
                providers = config.providers.len(),
                "Loaded configuration"
            );
            config
        }
        Ok(None) => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            GlobalConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            GlobalConfig::default()
        }
    }
}
