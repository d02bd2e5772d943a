//! Provider error classification
//!
//! Maps AWS SDK errors onto the webotron-core error taxonomy using the
//! S3 error code carried in the response.

use std::fmt::Debug;

use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::error::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use webotron_core::Error;

/// Error codes meaning the credentials were missing, invalid or expired
const AUTH_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
    "TokenRefreshRequired",
    "InvalidClientTokenId",
];

/// Error codes meaning the bucket or key does not exist
const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket", "NoSuchKey", "NotFound"];

/// Code and message of a failed provider request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<String>,
    pub message: String,
    /// Credentials could not be resolved, so no request was sent
    pub credentials_failure: bool,
}

impl ProviderError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
            credentials_failure: false,
        }
    }

    /// Extract code and message from an SDK error
    pub fn from_sdk<E, R>(err: &SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: Debug,
    {
        let message = match err.message() {
            Some(message) => message.to_string(),
            None => DisplayErrorContext(err).to_string(),
        };
        Self {
            credentials_failure: is_credentials_failure(err),
            ..Self::new(err.code(), message)
        }
    }

    pub fn is_auth(&self) -> bool {
        self.credentials_failure
            || self
                .code
                .as_deref()
                .is_some_and(|code| AUTH_CODES.contains(&code))
    }

    pub fn is_not_found(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| NOT_FOUND_CODES.contains(&code))
    }

    /// Classify as Auth / NotFound, or hand off to `other`
    pub fn classify(self, other: impl FnOnce(Self) -> Error) -> Error {
        if self.is_auth() {
            Error::Auth(self.to_string())
        } else if self.is_not_found() {
            Error::NotFound(self.to_string())
        } else {
            other(self)
        }
    }

    /// Default mapping for read and upload requests
    pub fn into_error(self) -> Error {
        self.classify(|e| Error::Network(e.to_string()))
    }

    /// Mapping for bucket creation, keeping the provider code
    pub fn into_creation_error(self) -> Error {
        if self.is_auth() {
            return Error::Auth(self.to_string());
        }
        match self.code {
            Some(code) => Error::BucketCreation {
                code,
                message: self.message,
            },
            None => Error::Network(self.message),
        }
    }
}

/// Whether the request failed locally because identity resolution failed
fn is_credentials_failure<E, R>(err: &SdkError<E, R>) -> bool
where
    E: std::error::Error + 'static,
    R: Debug,
{
    if !matches!(
        err,
        SdkError::ConstructionFailure(_) | SdkError::DispatchFailure(_)
    ) {
        return false;
    }

    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if e.is::<CredentialsError>() {
            return true;
        }
        source = e.source();
    }
    false
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
