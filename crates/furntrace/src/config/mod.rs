pub mod loader;
pub mod schema;

pub use loader::{
    discover_config_path, load_config, load_config_from_str, load_or_default, validate_config,
};
pub use schema::{Config, DatabaseConfig, LogFormat, LoggingConfig, ScanConfig, ServerConfig};
