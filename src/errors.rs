/*!
 * Error types for the docs-translate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or exhausted quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised by a translator while turning one chunk into another language
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered but carried no text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Endpoint or key is not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// Malformed input or integrity failures while protecting code blocks
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// A fence was opened but the document ended before it closed
    #[error("Unterminated code fence opened at line {line} ({captured} line(s) captured)")]
    UnterminatedFence {
        /// 1-based line of the opening fence
        line: usize,
        /// Number of lines swallowed by the open block
        captured: usize,
    },

    /// The source text already contains something shaped like a placeholder
    #[error("Line {line} already contains placeholder-like text '{token}'")]
    PlaceholderCollision {
        /// 1-based line number
        line: usize,
        /// The offending token
        token: String,
    },

    /// The translated text does not carry every placeholder exactly once
    #[error("Placeholder mismatch after translation (missing: {missing:?}, duplicated: {duplicated:?}, unknown: {unknown:?}, altered: {altered:?})")]
    PlaceholderMismatch {
        /// Indices that never came back
        missing: Vec<usize>,
        /// Indices that came back more than once
        duplicated: Vec<usize>,
        /// Indices the document never had
        unknown: Vec<usize>,
        /// Placeholder-shaped tokens whose index cannot be read back
        altered: Vec<String>,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from document processing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // alternate formatting keeps the whole context chain
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
