use thiserror::Error;

/// Unified error type for package-updater operations
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    /// Zero or several tags match the release a repository is compared against
    #[error("Tag resolution failed for {repository}: {matches} tags named '{tag}'")]
    TagResolution {
        repository: String,
        tag: String,
        matches: usize,
    },

    /// A dependent repository needs a minor bump but was never released
    #[error("Cannot bump {repository}: no valid release tag to bump from")]
    DependentWithoutBaseline { repository: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in package-updater
pub type Result<T> = std::result::Result<T, UpdaterError>;

impl UpdaterError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        UpdaterError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        UpdaterError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        UpdaterError::Manifest(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        UpdaterError::Remote(msg.into())
    }
}
