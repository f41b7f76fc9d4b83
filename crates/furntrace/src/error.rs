use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FurntraceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Scan error: {0}")]
    Scan(#[from] crate::scan::ScanError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A write would break a referential rule, e.g. deleting a product that
    /// live orders still use.
    #[error("{0}")]
    Conflict(String),
}

impl FurntraceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        FurntraceError::NotFound { entity, id }
    }

    /// True when retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FurntraceError::Database(e) => e.is_transient(),
            FurntraceError::Scan(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Rejected user input. `field` names the offending request field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, FurntraceError>;
