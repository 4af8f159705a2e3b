//! Error kind enumeration for categorizing datagate errors.

/// Categorization of datagate errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Propagation
///
/// | ErrorKind                | HTTP | Action                                |
/// |--------------------------|------|---------------------------------------|
/// | `BadParameter`           | 400  | Fix the predicate or token            |
/// | `AuthenticationRejected` | 401  | Log in again                          |
/// | `CriticalConstraint`     | 409  | Repair the stored data                |
/// | `Configuration`          | 500  | Fix the configuration                 |
/// | `Storage`                | 503  | Collaborator failure, surfaced as-is  |
/// | `Internal`               | 500  | Bug in datagate                       |
///
/// No kind is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Caller-supplied predicate or token is structurally or semantically invalid.
    ///
    /// Carries a [`Reason`](crate::error::Reason) describing what was wrong.
    ///
    /// HTTP: 400 Bad Request
    #[error("bad parameter")]
    BadParameter,

    /// A well-formed refresh token that is unknown to the cache or expired.
    ///
    /// HTTP: 401 Unauthorized
    ///
    /// The client must authenticate again; the same token never succeeds later.
    #[error("authentication rejected")]
    AuthenticationRejected,

    /// Stored data violates an invariant (e.g. incoherent group membership).
    ///
    /// HTTP: 409 Conflict
    ///
    /// Indicates the persisted state needs repair, not something the caller
    /// can fix by retrying.
    #[error("critical constraint violation")]
    CriticalConstraint,

    /// Configuration error (TTL below minimum, unreadable key).
    #[error("configuration error")]
    Configuration,

    /// A collaborator (user or group repository) failed.
    ///
    /// HTTP: 503 Service Unavailable
    #[error("storage error")]
    Storage,

    /// Internal error.
    ///
    /// HTTP: 500 Internal Server Error
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// Only collaborator failures are; every other kind describes input or
    /// stored data that a retry cannot change.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datagate::ErrorKind;
    ///
    /// assert!(!ErrorKind::BadParameter.is_retriable());
    /// assert!(ErrorKind::Storage.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Storage)
    }

    /// Returns `true` if the fault lies with the caller (4xx family).
    #[inline]
    pub fn is_client_fault(&self) -> bool {
        matches!(self, ErrorKind::BadParameter | ErrorKind::AuthenticationRejected)
    }

    /// Returns the default HTTP status code for this error kind.
    ///
    /// This is useful for mapping errors to HTTP responses in the transport
    /// layer that owns the actual endpoints.
    #[inline]
    pub fn http_status_code(&self) -> u16 {
        match self {
            ErrorKind::BadParameter => 400,
            ErrorKind::AuthenticationRejected => 401,
            ErrorKind::CriticalConstraint => 409,
            ErrorKind::Storage => 503,
            ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }
}
