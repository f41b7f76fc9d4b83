use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

/// Locations searched, in order, when no config path is given.
pub const CONFIG_SEARCH_PATHS: &[&str] =
    &["/config/furntrace.yaml", "config.yaml", "server/config.yaml"];

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    // An empty file is a valid "all defaults" config.
    let config: Config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(content)?
    };

    validate_config(&config)?;

    Ok(config)
}

/// First existing file among [`CONFIG_SEARCH_PATHS`], relative paths
/// resolved against the current directory.
pub fn discover_config_path() -> Option<PathBuf> {
    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Loads `explicit` if given, else the first discovered file, else defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit.map(Path::to_path_buf).or_else(discover_config_path) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_config(path)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Validation {
            message: "server.port must be non-zero".to_string(),
        });
    }

    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.scan.max_attempts == 0 {
        return Err(ConfigError::Validation {
            message: "scan.max_attempts must be at least 1".to_string(),
        });
    }

    if config.database.busy_timeout_ms == 0 {
        return Err(ConfigError::Validation {
            message: "database.busy_timeout_ms must be non-zero".to_string(),
        });
    }

    if let Some(path) = &config.database.path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "database.path must not be empty when set".to_string(),
            });
        }
    }

    Ok(())
}
