//! Error types for webotron-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for webotron-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Provider error code returned when the caller already owns the bucket
pub const BUCKET_ALREADY_OWNED_BY_YOU: &str = "BucketAlreadyOwnedByYou";

/// Error types for webotron-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local path exists but cannot be used
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Local sync root does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Invalid or missing credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket could not be created
    #[error("Failed to create bucket ({code}): {message}")]
    BucketCreation { code: String, message: String },

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider rejected the bucket policy write
    #[error("Failed to apply bucket policy: {0}")]
    Policy(String),

    /// Provider rejected the website configuration write
    #[error("Failed to configure website hosting: {0}")]
    WebsiteConfig(String),

    /// A single file failed to upload during sync
    #[error("Failed to upload {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// A local file or directory under the sync root could not be read
    #[error("Failed to read {}: {source}", path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network or unclassified provider error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    ///
    /// An upload failure reports the code of the provider error it wraps.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Upload { source, .. } => source.exit_code(),
            Error::InvalidPath(_) => 2,                         // UsageError
            Error::Config(_) => 2,                              // UsageError
            Error::Network(_) => 3,                             // NetworkError
            Error::Auth(_) => 4,                                // AuthError
            Error::Policy(_) | Error::WebsiteConfig(_) => 4,    // AuthError
            Error::NotFound(_) | Error::PathNotFound(_) => 5,   // NotFound
            Error::BucketCreation { .. } => 6,                  // Conflict
            _ => 1,                                             // GeneralError
        }
    }

    /// Whether this is the "bucket already owned by you" creation failure
    pub fn is_bucket_already_owned(&self) -> bool {
        matches!(self, Error::BucketCreation { code, .. } if code == BUCKET_ALREADY_OWNED_BY_YOU)
    }
}
