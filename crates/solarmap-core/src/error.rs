use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading application configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Validation and I/O errors from the estimation domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid coordinates \"{0}\": expected \"<lat>, <lng>\"")]
    InvalidCoordinates(String),

    #[error("unknown parameter \"{0}\": expected efficiency, loss, or rate")]
    UnknownParameter(String),

    #[error("failed to write report to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
