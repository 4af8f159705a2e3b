//! Derives a user's permission snapshot from group membership.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error};

use super::types::{Group, GroupId, User, UserPermission};
use crate::{Error, Result};

/// Read access to persisted groups.
///
/// Implemented by the storage layer. Failures propagate unchanged out of
/// [`PermissionResolver::build_permission`].
pub trait GroupRepository: Send + Sync {
    /// Loads the groups with the given ids. Unknown ids are skipped.
    fn find_by_ids(&self, ids: &BTreeSet<GroupId>) -> Result<Vec<Group>>;
}

/// Builds [`UserPermission`] snapshots.
///
/// ## Algorithm
///
/// 1. Load every group the user claims to belong to.
/// 2. Groups listing the user as administrator go to `admin_group_ids`.
/// 3. Of the rest, groups listing the user as member go to `user_group_ids`.
/// 4. Anything left over means the user claims a membership the group does
///    not corroborate. That is corrupted data, reported as
///    [`ErrorKind::CriticalConstraint`](crate::ErrorKind::CriticalConstraint).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use datagate::permission::{Group, GroupId, PermissionResolver, User, UserId};
/// use datagate::testing::InMemoryGroupRepository;
///
/// let repository = InMemoryGroupRepository::new();
/// repository.insert(Group::new(GroupId(1), "sales").with_admins([UserId(7)]));
///
/// let resolver = PermissionResolver::new(Arc::new(repository));
/// let user = User::new(UserId(7), "alice").with_groups([GroupId(1)]);
///
/// let permission = resolver.build_permission(&user)?;
/// assert_eq!(permission.admin_group_ids, vec![GroupId(1)]);
/// assert!(permission.user_group_ids.is_empty());
/// # Ok::<(), datagate::Error>(())
/// ```
#[derive(Clone)]
pub struct PermissionResolver {
    groups: Arc<dyn GroupRepository>,
}

impl PermissionResolver {
    /// Creates a resolver reading groups from `groups`.
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    /// Builds the permission snapshot of `user`.
    ///
    /// # Errors
    ///
    /// Returns a critical-constraint error if a claimed group does not list
    /// the user, and propagates repository failures.
    pub fn build_permission(&self, user: &User) -> Result<UserPermission> {
        let claimed = &user.group_ids;
        let groups = if claimed.is_empty() {
            Vec::new()
        } else {
            self.groups.find_by_ids(claimed)?
        };

        let (admin_of, rest): (Vec<&Group>, Vec<&Group>) = groups
            .iter()
            .filter(|g| claimed.contains(&g.id))
            .partition(|g| g.admin_ids.contains(&user.id));
        let (member_of, uncorroborated): (Vec<&Group>, Vec<&Group>) =
            rest.into_iter().partition(|g| g.member_ids.contains(&user.id));

        let found: BTreeSet<GroupId> = groups.iter().map(|g| g.id).collect();
        let missing: Vec<GroupId> = claimed.difference(&found).copied().collect();

        if !uncorroborated.is_empty() || !missing.is_empty() {
            let uncorroborated: Vec<GroupId> = uncorroborated.iter().map(|g| g.id).collect();
            error!(
                user_id = %user.id,
                ?uncorroborated,
                ?missing,
                "user claims group memberships the groups do not corroborate"
            );
            return Err(Error::critical_constraint(format!(
                "user {} claims membership of groups {:?} that do not list them",
                user.id,
                uncorroborated.iter().chain(missing.iter()).collect::<Vec<_>>()
            )));
        }

        let permission = UserPermission::new(
            user.id,
            admin_of.iter().map(|g| g.id),
            member_of.iter().map(|g| g.id),
        );
        debug!(
            user_id = %user.id,
            admin_groups = permission.admin_group_ids.len(),
            member_groups = permission.user_group_ids.len(),
            "built user permission"
        );
        Ok(permission)
    }
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish_non_exhaustive()
    }
}
