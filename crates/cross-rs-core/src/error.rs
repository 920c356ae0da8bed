//! Core error types for the cross-rs framework.
//!
//! [`CrossError`] covers link-building errors (malformed controller
//! references, unsupported URL styles), configuration errors, template and
//! serialization errors, and bad requests.

use thiserror::Error;

/// The primary error type for the cross-rs framework.
///
/// Each variant maps to an HTTP status code via [`CrossError::status_code`].
#[derive(Error, Debug)]
pub enum CrossError {
    // ── Link building ────────────────────────────────────────────────

    /// A caller-supplied argument is malformed (e.g. an empty controller reference).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured `url.type` is outside the supported range.
    #[error("Unsupported url type: {0}")]
    UnsupportedUrlType(i64),

    // ── HTTP errors ──────────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or cannot be loaded.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The framework is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Templates ────────────────────────────────────────────────────

    /// The requested template or layer file was not found.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// A template failed to parse or render.
    #[error("Template error: {0}")]
    TemplateError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CrossError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidArgument`, `BadRequest` -> 400
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) | Self::BadRequest(_) => 400,
            Self::UnsupportedUrlType(_)
            | Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::TemplateDoesNotExist(_)
            | Self::TemplateError(_)
            | Self::SerializationError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, CrossError>`.
pub type CrossResult<T> = Result<T, CrossError>;
