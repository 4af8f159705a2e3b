//! In-memory group repository.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::permission::{Group, GroupId, GroupRepository};
use crate::{Error, Result};

/// A [`GroupRepository`] backed by a map.
///
/// Clones share the same storage.
///
/// ## Example
///
/// ```rust
/// use datagate::permission::{Group, GroupId, UserId};
/// use datagate::testing::InMemoryGroupRepository;
///
/// let repository = InMemoryGroupRepository::new();
/// repository.insert(Group::new(GroupId(1), "sales").with_members([UserId(7)]));
/// assert_eq!(repository.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupRepository {
    groups: Arc<RwLock<BTreeMap<GroupId, Group>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryGroupRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a group.
    pub fn insert(&self, group: Group) {
        self.groups.write().insert(group.id, group);
    }

    /// Removes a group, returning it if it existed.
    pub fn remove(&self, id: GroupId) -> Option<Group> {
        self.groups.write().remove(&id)
    }

    /// Makes every subsequent lookup fail with a storage error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Stops injecting failures.
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Returns the number of stored groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns `true` if no group is stored.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

impl GroupRepository for InMemoryGroupRepository {
    fn find_by_ids(&self, ids: &BTreeSet<GroupId>) -> Result<Vec<Group>> {
        if let Some(message) = self.failure.read().clone() {
            return Err(Error::storage(message));
        }
        let groups = self.groups.read();
        Ok(ids.iter().filter_map(|id| groups.get(id).cloned()).collect())
    }
}
