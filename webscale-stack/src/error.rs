use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading stack configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read stack config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stack config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config value '{key}' must be an integer of type {expected}, got '{value}'")]
    InvalidInteger {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("config value '{key}' is encrypted and can only be read by the provisioning engine")]
    EncryptedValue { key: String },

    #[error("config value '{key}' must be a scalar or a secure value")]
    UnsupportedValue { key: String },

    #[error("invalid config override '{0}', expected key=value")]
    InvalidOverride(String),
}

/// Errors raised while rendering a program or scaffold
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render template: {0}")]
    Template(#[from] tera::Error),
}
