//! Error types for datagate.
//!
//! Every fallible operation returns [`Error`], categorized by [`ErrorKind`]:
//!
//! - `BadParameter`: the caller sent an invalid predicate or token; the
//!   [`Reason`] says why
//! - `AuthenticationRejected`: the refresh token is unknown or expired
//! - `CriticalConstraint`: stored data is incoherent and needs repair
//!
//! ## Key Invariant
//!
//! None of these are retried automatically. A rejected predicate stays
//! rejected, a rejected refresh token never becomes valid again.
//!
//! ```rust
//! use datagate::{Error, ErrorKind, Reason};
//!
//! let err = Error::bad_parameter(Reason::UnknownColumn, "column 'x' is not defined");
//! assert_eq!(err.kind().http_status_code(), 400);
//! ```

mod core;
mod kind;
mod reason;

pub use self::core::Error;
pub use kind::ErrorKind;
pub use reason::Reason;

/// A specialized `Result` type for datagate operations.
pub type Result<T> = std::result::Result<T, Error>;
