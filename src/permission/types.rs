//! Users, groups and the permission snapshot derived from them.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted identity of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted identity of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as loaded by the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Persisted identity.
    pub id: UserId,

    /// Login name, used as the token subject.
    pub login: String,

    /// Roles granted to the user.
    pub roles: Vec<String>,

    /// Groups the user claims to belong to.
    pub group_ids: BTreeSet<GroupId>,
}

impl User {
    /// Creates a user without roles or groups.
    pub fn new(id: UserId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            roles: Vec::new(),
            group_ids: BTreeSet::new(),
        }
    }

    /// Adds roles.
    #[must_use]
    pub fn with_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Adds claimed group memberships.
    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.group_ids.extend(groups);
        self
    }
}

/// A group as loaded by the group repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Persisted identity.
    pub id: GroupId,

    /// Display name.
    pub name: String,

    /// Users administering the group.
    pub admin_ids: HashSet<UserId>,

    /// Users belonging to the group.
    pub member_ids: HashSet<UserId>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            admin_ids: HashSet::new(),
            member_ids: HashSet::new(),
        }
    }

    /// Adds administrators.
    #[must_use]
    pub fn with_admins(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.admin_ids.extend(users);
        self
    }

    /// Adds members.
    #[must_use]
    pub fn with_members(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.member_ids.extend(users);
        self
    }
}

/// What a user may administer and read, embedded in every access token.
///
/// Derived by [`PermissionResolver`](super::PermissionResolver), never
/// persisted. Group ids are sorted and unique, including after
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawUserPermission")]
pub struct UserPermission {
    /// The user this snapshot belongs to.
    pub user_id: UserId,

    /// Groups the user administers.
    pub admin_group_ids: Vec<GroupId>,

    /// Groups the user is a plain member of.
    pub user_group_ids: Vec<GroupId>,
}

impl UserPermission {
    /// Creates a snapshot, sorting and deduplicating both id lists.
    pub fn new(
        user_id: UserId,
        admin_group_ids: impl IntoIterator<Item = GroupId>,
        user_group_ids: impl IntoIterator<Item = GroupId>,
    ) -> Self {
        Self {
            user_id,
            admin_group_ids: admin_group_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect(),
            user_group_ids: user_group_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect(),
        }
    }

    /// Returns `true` if the user administers `group`.
    pub fn is_admin_of(&self, group: GroupId) -> bool {
        self.admin_group_ids.contains(&group)
    }

    /// Returns `true` if the user may read `group`'s data.
    ///
    /// Administrators are readers too.
    pub fn is_member_of(&self, group: GroupId) -> bool {
        self.is_admin_of(group) || self.user_group_ids.contains(&group)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserPermission {
    user_id: UserId,
    #[serde(default)]
    admin_group_ids: Vec<GroupId>,
    #[serde(default)]
    user_group_ids: Vec<GroupId>,
}

impl From<RawUserPermission> for UserPermission {
    fn from(raw: RawUserPermission) -> Self {
        Self::new(raw.user_id, raw.admin_group_ids, raw.user_group_ids)
    }
}
