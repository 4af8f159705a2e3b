//! Permission resolution.
//!
//! - [`UserPermission`]: The snapshot embedded in every access token
//! - [`PermissionResolver`]: Derives it from group membership
//! - [`GroupRepository`]: The storage collaborator the resolver reads from

mod resolver;
mod types;

pub use resolver::{GroupRepository, PermissionResolver};
pub use types::{Group, GroupId, User, UserId, UserPermission};
