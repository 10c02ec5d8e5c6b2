//! Error types for the network interface converter.

use thiserror::Error;

/// Errors that can occur while converting VMI networking into domain configuration.
///
/// Every error aborts the whole conversion; no partial interface list is returned.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// Malformed or contradictory spec field.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Dangling name reference between interfaces and networks.
    #[error("Reference not found: {0}")]
    Reference(String),

    /// The host lacks a feature the requested device needs.
    #[error("Missing host capability: {0}")]
    Capability(String),

    /// Runtime discovery data (e.g. vhost-user device info) is missing.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Reading host configuration failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Whether retrying the whole conversion later may succeed.
    ///
    /// Lookup failures can clear once pod network discovery finishes, and I/O
    /// errors may be transient. Everything else needs a spec or host change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConverterError::Lookup(_) | ConverterError::Io(_))
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
