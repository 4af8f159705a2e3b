//! Main error type for datagate.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::{ErrorKind, Reason};

/// The primary error type for datagate operations.
///
/// `Error` provides enough context for the transport layer to build a
/// client-facing response:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`reason()`](Error::reason): Symbolic reason for bad parameters
/// - [`is_retriable()`](Error::is_retriable): Quick retry decision
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── reason: Option<Reason>   (why a parameter was rejected)
/// ├── message: String          (human-readable description)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use datagate::{Error, ErrorKind, Reason};
///
/// fn status_for(err: &Error) -> u16 {
///     match err.kind() {
///         ErrorKind::BadParameter if err.reason() == Some(Reason::MalformedToken) => 400,
///         kind => kind.http_status_code(),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// The symbolic reason, set for bad parameters.
    reason: Option<Reason>,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datagate::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Internal, "unexpected state");
    /// assert_eq!(err.kind(), ErrorKind::Internal);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            reason: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::BadParameter => "bad parameter",
            ErrorKind::AuthenticationRejected => "authentication rejected",
            ErrorKind::CriticalConstraint => "stored data violates a constraint",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Storage => "storage failure",
            ErrorKind::Internal => "internal error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason code, if this is a bad-parameter error.
    #[inline]
    pub fn reason(&self) -> Option<Reason> {
        self.reason
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this error is generally safe to retry.
    ///
    /// This is a convenience method equivalent to `self.kind().is_retriable()`.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a bad-parameter error with a reason code.
    pub fn bad_parameter(reason: Reason, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: Some(reason),
            ..Self::new(ErrorKind::BadParameter, message)
        }
    }

    /// Creates an authentication-rejected error.
    pub fn authentication_rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::AuthenticationRejected, message)
    }

    /// Creates a critical-constraint error.
    pub fn critical_constraint(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CriticalConstraint, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(reason) = self.reason {
            write!(f, " [{}]", reason.code())?;
        }

        write!(f, ": {}", self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::internal(format!("JSON error: {}", err)).with_source(err)
    }
}
