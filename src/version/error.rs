use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid image reference: {0}")]
    InvalidReference(String),

    #[error("Invalid registry endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Registry error: {0}")]
    Oci(#[from] oci_client::errors::OciDistributionError),
}

/// Reasons a tag cannot be read as a semantic version
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("empty version")]
    Empty,

    #[error("'{0}' does not have exactly three numeric components")]
    NotStrict(String),

    #[error("'{0}' has a non-numeric or missing version component")]
    NonNumeric(String),

    #[error("'{tag}' is not a valid semantic version: {reason}")]
    Invalid { tag: String, reason: String },
}
