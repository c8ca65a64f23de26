//! Token error types

use crate::types::Algorithm;
use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Token minting errors
///
/// The set is closed: every failure of [`generate_token`](crate::generate_token)
/// maps onto exactly one of these kinds, and none of them is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Header is missing or not a JSON object
    #[error("Invalid header: expected a JSON object, got {0}")]
    InvalidHeaderType(String),

    /// Payload is missing or not a JSON object
    #[error("Invalid payload: expected a JSON object, got {0}")]
    InvalidPayloadType(String),

    /// `alg` absent or not one of the supported identifiers
    #[error("Invalid algorithm {}: supported algorithms are {supported}", .found.as_deref().unwrap_or("<missing>"))]
    InvalidAlgorithm {
        /// The `alg` value found in the header, if any
        found: Option<String>,
        /// Comma-separated list of supported identifiers
        supported: String,
    },

    /// `kid` absent, empty or not a string
    #[error("Missing key id: header field `kid` must be a non-empty string")]
    MissingKeyId,

    /// Algorithm requires RSA private key material but none usable was supplied
    #[error("Missing private key: {0} requires RSA private key material")]
    MissingPrivateKey(Algorithm),

    /// The cryptographic primitive rejected the key or input
    #[error("Signing error: {0}")]
    SigningFailure(String),

    /// A byte/text encoding step could not represent its input
    #[error("Encoding error: {0}")]
    EncodingFailure(String),
}

impl TokenError {
    /// Create an invalid algorithm error listing the supported set
    #[must_use]
    pub fn invalid_algorithm(found: Option<&str>) -> Self {
        TokenError::InvalidAlgorithm {
            found: found.map(str::to_string),
            supported: Algorithm::supported_list(),
        }
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        TokenError::SigningFailure(msg.into())
    }

    /// Create an encoding error
    #[inline]
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        TokenError::EncodingFailure(msg.into())
    }

    /// Whether the error was raised by input validation, before any encoding or signing
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidHeaderType(_)
                | TokenError::InvalidPayloadType(_)
                | TokenError::InvalidAlgorithm { .. }
                | TokenError::MissingKeyId
                | TokenError::MissingPrivateKey(_)
        )
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config or key file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed to load
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
