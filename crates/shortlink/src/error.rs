//! Error types for the shortlink client.
//!
//! Every rejected call surfaces as a single [`Error`] value. The variants keep
//! the underlying cause explicit, while [`Error::message`], [`Error::status`]
//! and [`Error::is_api_error`] give callers one uniform shape to render.

use std::fmt;
use thiserror::Error;

/// Message used when the backend did not supply one.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Message used when the session could not be renewed.
pub const SESSION_EXPIRED_MESSAGE: &str = "Authentication failed. Please log in again.";

/// The unified error type for shortlink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No HTTP response was received (DNS, TLS, connection, body read).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Authentication could not be recovered.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The backend answered with a non-2xx status.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The backend answered 2xx but the body did not match the endpoint schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Client-side validation failed before anything was sent.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Human-readable message suitable for showing inline to a user.
    pub fn message(&self) -> String {
        match self {
            Error::Network(_) => GENERIC_ERROR_MESSAGE.to_string(),
            Error::Auth(err) => err.to_string(),
            Error::Api(err) => err
                .message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            Error::Schema(err) => err
                .message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            Error::InvalidInput(err) => err.to_string(),
        }
    }

    /// HTTP status associated with the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth(AuthError::SessionExpired) => Some(401),
            Error::Api(err) => Some(err.status),
            Error::Schema(err) => Some(err.status),
            Error::Auth(AuthError::NotLoggedIn) | Error::Network(_) | Error::InvalidInput(_) => None,
        }
    }

    /// Whether the failure originated from the backend API rather than
    /// the network or local validation.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::SessionExpired) | Error::Api(_) | Error::Schema(_)
        )
    }

    /// Whether stored credentials were discarded and the user must log in again.
    pub fn is_auth_terminal(&self) -> bool {
        matches!(self, Error::Auth(AuthError::SessionExpired))
    }
}

/// Transport-level errors: no HTTP response was obtained.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be read.
    #[error("failed to read response body: {message}")]
    Body { message: String },

    /// Any other request failure.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::Connection {
                message: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            NetworkError::Body {
                message: err.to_string(),
            }
        } else {
            NetworkError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(NetworkError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential expired and the refresh attempt failed.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// The operation needs a stored credential and there is none.
    #[error("not logged in")]
    NotLoggedIn,
}

/// A non-2xx response from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the backend's error body, if any.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Whether the backend rejected the bearer credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// A 2xx response whose body did not match the expected schema.
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// HTTP status of the response.
    pub status: u16,
    /// Endpoint that produced the body.
    pub endpoint: String,
    /// Backend-supplied message, when the envelope carried one.
    pub message: Option<String>,
    /// What did not match.
    pub detail: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected response from {} (HTTP {}): {}",
            self.endpoint, self.status, self.detail
        )
    }
}

impl std::error::Error for SchemaError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid backend base URL.
    #[error("invalid backend URL '{value}': {reason}")]
    BackendUrl { value: String, reason: String },

    /// Invalid destination URL.
    #[error("invalid URL '{value}': {reason}")]
    LongUrl { value: String, reason: String },

    /// Invalid custom alias.
    #[error("invalid alias '{value}': {reason}")]
    Alias { value: String, reason: String },

    /// Registration form rejected.
    #[error("{0}")]
    Registration(String),

    /// Access token rejected before use.
    #[error("{0}")]
    Token(String),

    /// Request payload could not be encoded.
    #[error("invalid payload for '{endpoint}': {reason}")]
    Payload { endpoint: String, reason: String },

    /// Header name or value could not be encoded.
    #[error("invalid header '{name}'")]
    Header { name: String },
}
