use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("cannot read config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl SandboxError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SandboxError::InvalidConfig { field, reason: reason.into() }
    }
}
