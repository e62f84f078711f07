use thiserror::Error;

/// Why an inbound gateway callback was not trusted.
///
/// Rejections are plain values: the caller has to branch on them before any
/// order state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("invalid request method: {method}")]
    InvalidMethod { method: String },
    #[error("unresolved gateway status: {raw:?}")]
    UnresolvedStatus { raw: String },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<toml::de::Error> for NotifyError {
    fn from(err: toml::de::Error) -> Self {
        NotifyError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
