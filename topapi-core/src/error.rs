//! Error types for the TOP API request engine.
//!
//! The taxonomy mirrors the protocol's failure surface:
//!
//! ```text
//! Error
//! ├── Transport - transport layer failed (non-200 status, network error)
//! ├── Decode    - response body is not the expected structured JSON
//! ├── Biz       - HTTP succeeded but the response carries an error envelope
//! └── NotFound  - a list operation resolved to zero pages
//! ```
//!
//! Large variants are boxed to keep the enum small; messages use
//! `Cow<'static, str>` so static strings allocate nothing.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Result type alias for all engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum length for error messages to prevent memory bloat from large
/// HTTP response bodies.
const MAX_ERROR_MESSAGE_LEN: usize = 1024;

/// Truncates a message to [`MAX_ERROR_MESSAGE_LEN`], marking the cut.
pub(crate) fn truncate_message(mut msg: String) -> String {
    if msg.len() > MAX_ERROR_MESSAGE_LEN {
        let mut cut = MAX_ERROR_MESSAGE_LEN;
        while !msg.is_char_boundary(cut) {
            cut -= 1;
        }
        msg.truncate(cut);
        msg.push_str("... (truncated)");
    }
    msg
}

/// Details of a business error reported inside a successful HTTP response.
///
/// Boxed inside [`Error::Biz`] to keep the error enum small.
#[derive(Debug)]
#[non_exhaustive]
pub struct BizErrorDetails {
    /// Numeric error code from the provider's error envelope. Nonzero.
    pub code: i64,
    /// Descriptive message from the provider.
    pub message: String,
    /// Raw error envelope for debugging.
    pub data: Option<serde_json::Value>,
}

impl BizErrorDetails {
    /// Creates details from a code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Creates details carrying the raw envelope payload.
    pub fn with_data(code: i64, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl fmt::Display for BizErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}

/// Transport layer failures: the call never produced a usable 200 response.
///
/// Wraps all transport-related errors without exposing `reqwest` types in the
/// public API, so the underlying HTTP library can change without breaking
/// callers.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// The provider answered with a non-200 status.
    #[error("request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// The request timed out.
    #[error("request timeout")]
    Timeout,

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Opaque transport failure preserving the source error.
    #[error("transport error")]
    Other(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Failures decoding a response body into a structured document or
/// projecting a document into a caller-supplied shape.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The body (or document) did not deserialize.
    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent from the document.
    #[error("missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// A field is present but carries an unusable value.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: Cow<'static, str>,
        /// What was wrong with it.
        message: Cow<'static, str>,
    },
}

impl DecodeError {
    /// Creates a `MissingField` error with a static string (no allocation).
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(Cow::Borrowed(field))
    }

    /// Creates an `InvalidValue` error.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The primary error type for the engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport layer failure. Boxed to reduce enum size.
    #[error("transport error: {0}")]
    Transport(Box<TransportError>),

    /// Response decoding failure. Boxed to reduce enum size.
    #[error("decode error: {0}")]
    Decode(Box<DecodeError>),

    /// Business error reported inside a 200 response. Boxed to reduce enum
    /// size.
    #[error("business error: {0}")]
    Biz(Box<BizErrorDetails>),

    /// A list operation resolved to zero pages.
    #[error("not found: {0}")]
    NotFound(Cow<'static, str>),
}

impl Error {
    /// Creates a business error from the envelope's code and message.
    pub fn biz(code: i64, message: impl Into<String>) -> Self {
        Self::Biz(Box::new(BizErrorDetails::new(code, message)))
    }

    /// Creates a business error carrying the raw envelope payload.
    pub fn biz_with_data(
        code: i64,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::Biz(Box::new(BizErrorDetails::with_data(code, message, data)))
    }

    /// Creates a transport error from a message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(Box::new(TransportError::ConnectionFailed(msg.into())))
    }

    /// Creates a not-found error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wraps a task join failure (or any other infrastructure error) as an
    /// opaque transport error.
    pub(crate) fn task<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Transport(Box::new(TransportError::Other(Box::new(err))))
    }

    /// Whether a retry of the same call could plausibly succeed.
    ///
    /// Timeouts and connection failures are transient; decode and business
    /// errors are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(te) => !matches!(te.as_ref(), TransportError::Other(_)),
            _ => false,
        }
    }

    /// Returns the business error code, if this is a business error.
    #[must_use]
    pub fn biz_code(&self) -> Option<i64> {
        match self {
            Error::Biz(details) => Some(details.code),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(Box::new(e))
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(Box::new(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(Box::new(DecodeError::Json(e)))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::ConnectionFailed(truncate_message(e.to_string()))
        } else if let Some(status) = e.status() {
            TransportError::RequestFailed {
                status: status.as_u16(),
                message: truncate_message(e.to_string()),
            }
        } else {
            TransportError::Other(Box::new(e))
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(TransportError::from(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biz_error_display() {
        let err = Error::biz(15, "Remote service error");
        assert_eq!(
            err.to_string(),
            "business error: Remote service error (code: 15)"
        );
        assert_eq!(err.biz_code(), Some(15));
    }

    #[test]
    fn test_transport_error_display() {
        let err: Error = TransportError::RequestFailed {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("no pages");
        assert_eq!(err.to_string(), "not found: no pages");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::from(TransportError::Timeout).is_retryable());
        assert!(Error::transport("connection reset").is_retryable());
        assert!(!Error::biz(15, "err").is_retryable());
        assert!(!Error::not_found("none").is_retryable());
        assert!(!Error::from(DecodeError::missing_field("total")).is_retryable());
    }

    #[test]
    fn test_truncate_message() {
        let long = "x".repeat(MAX_ERROR_MESSAGE_LEN + 100);
        let truncated = truncate_message(long);
        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() < MAX_ERROR_MESSAGE_LEN + 20);

        let short = truncate_message("short".to_string());
        assert_eq!(short, "short");
    }

    #[test]
    fn test_error_size() {
        // Boxed variants keep the enum pointer-sized plus the Cow.
        assert!(std::mem::size_of::<Error>() <= 32);
    }
}
