//! Error types for tokenledger

use std::fmt;
use thiserror::Error;

/// Classification of tracker errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Model is not recognized by the provider
    InvalidModel,
    /// Request parameters are missing or malformed
    InvalidParams,
    /// No registered provider matches the request
    ProviderNotFound,
    /// Tokenizer failed to encode the input
    TokenizationFailed,
    /// No pricing entry for the (provider, model) pair
    PricingNotFound,
    /// A pricing refresh did not complete
    PricingUpdateFailed,
}

impl ErrorKind {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidModel => "invalid_model",
            Self::InvalidParams => "invalid_params",
            Self::ProviderNotFound => "provider_not_found",
            Self::TokenizationFailed => "tokenization_failed",
            Self::PricingNotFound => "pricing_not_found",
            Self::PricingUpdateFailed => "pricing_update_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boxed error cause
type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised by the tracker core
///
/// Carries a kind for programmatic matching, a human-readable message,
/// and an optional underlying cause reachable through `source()`.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Cause>,
}

impl Error {
    /// Create a new error
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error wrapping an underlying cause
    #[must_use]
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<Cause>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message (without the kind prefix)
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for an `InvalidModel` error
    #[must_use]
    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidModel, message)
    }

    /// Shorthand for an `InvalidParams` error
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, message)
    }

    /// Shorthand for a `ProviderNotFound` error
    #[must_use]
    pub fn provider_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderNotFound, message)
    }

    /// Shorthand for a `TokenizationFailed` error
    #[must_use]
    pub fn tokenization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenizationFailed, message)
    }

    /// Shorthand for a `PricingNotFound` error
    #[must_use]
    pub fn pricing_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PricingNotFound, message)
    }

    /// Shorthand for a `PricingUpdateFailed` error
    #[must_use]
    pub fn pricing_update_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PricingUpdateFailed, message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
