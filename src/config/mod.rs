//! Configuration types.
//!
//! - [`SessionConfig`]: Token lifetimes and the refresh grace delay
//!
//! Loading configuration from files or the environment is left to the
//! embedding service; these types only carry and validate values.

mod session;

pub use session::{MAX_TTL, MIN_TTL, SessionConfig};
