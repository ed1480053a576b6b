//! Error types for ledgerpage.
//!
//! A single error enum with explicit variants for transport, authentication,
//! protocol, page-shape, metadata and input validation failures.

use std::fmt;
use thiserror::Error;

use crate::types::TokenId;

/// The unified error type for ledgerpage operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The remote call failed (network, timeout, service rejection).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No active account; the operation was not attempted.
    #[error("login required")]
    AuthRequired,

    /// The service answered with a non-success status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A page response could not be interpreted.
    #[error("malformed page: {reason}")]
    MalformedPage { reason: String },

    /// Metadata for a single token could not be resolved.
    #[error("metadata resolution failed for token {token_id}: {reason}")]
    MetadataResolution { token_id: TokenId, reason: String },

    /// Input validation errors (identifiers, URLs, amounts).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the caller should prompt for a login.
    pub fn is_auth_required(&self) -> bool {
        match self {
            Error::AuthRequired => true,
            Error::Protocol(e) => e.is_auth_error(),
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Protocol-level errors from service responses.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Service error code (if present).
    pub error: Option<String>,
    /// Error message from the service.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.error.as_deref() == Some("AuthenticationRequired")
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid account identifier.
    #[error("invalid account '{value}': {reason}")]
    Account { value: String, reason: String },

    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Invalid token amount.
    #[error("invalid amount '{value}': {reason}")]
    Amount { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
