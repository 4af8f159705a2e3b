//! Keeps live sessions in step with user changes.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::SessionCache;
use crate::permission::{PermissionResolver, User, UserId};
use crate::Result;

/// A change to a user published by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// The user's roles or group memberships changed.
    Updated(User),
    /// The user was deleted.
    Deleted(UserId),
}

/// Applies [`UserEvent`]s to a [`SessionCache`].
///
/// Updates recompute the permission snapshot and rewrite every stored
/// session of the user, so the next refresh carries the new claims. If the
/// snapshot cannot be built the user's sessions are dropped instead.
#[derive(Debug, Clone)]
pub struct SessionEventHandler {
    resolver: PermissionResolver,
    cache: SessionCache,
}

impl SessionEventHandler {
    /// Creates a handler.
    pub fn new(resolver: PermissionResolver, cache: SessionCache) -> Self {
        Self { resolver, cache }
    }

    /// Rewrites the sessions of `user`, returning how many were updated.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures after invalidating the user's sessions.
    pub fn on_user_updated(&self, user: &User) -> Result<usize> {
        match self.resolver.build_permission(user) {
            Ok(permission) => Ok(self.cache.update_user(user.id, user.roles.clone(), permission)),
            Err(err) => {
                let removed = self.cache.invalidate_user(user.id);
                error!(user_id = %user.id, removed, error = %err, "dropping sessions of user with unresolvable permission");
                Err(err)
            },
        }
    }

    /// Drops the sessions of a deleted user, returning how many were removed.
    pub fn on_user_deleted(&self, user_id: UserId) -> usize {
        self.cache.invalidate_user(user_id)
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// See [`on_user_updated`](Self::on_user_updated).
    pub fn handle(&self, event: &UserEvent) -> Result<usize> {
        match event {
            UserEvent::Updated(user) => self.on_user_updated(user),
            UserEvent::Deleted(user_id) => Ok(self.on_user_deleted(*user_id)),
        }
    }

    /// Consumes events from `events` on the current tokio runtime until
    /// every sender is dropped.
    ///
    /// Failures are logged and do not stop the loop.
    pub fn spawn(self, mut events: mpsc::Receiver<UserEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match self.handle(&event) {
                    Ok(affected) => debug!(?event, affected, "user event applied"),
                    Err(err) => error!(?event, error = %err, "user event failed"),
                }
            }
            debug!("user event stream closed");
        })
    }
}
