//! Sessions backing stateless authentication.
//!
//! - [`SessionCache`]: Issues, rotates and revokes refresh tokens
//! - [`SessionTokens`]: The access/refresh pair handed to clients
//! - [`SessionEventHandler`]: Applies user updates and deletions to live sessions

mod cache;
mod events;

pub use cache::{JanitorHandle, SessionCache, SessionTokens};
pub use events::{SessionEventHandler, UserEvent};
