//! In-memory refresh-token table and access-token minting.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AccessClaims, TokenSigner};
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::permission::{UserId, UserPermission};
use crate::{Error, Reason, Result};

/// The token pair handed to a client after login or refresh.
///
/// Expiry instants are Unix timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// Signed, self-contained access token.
    pub access_token: String,

    /// When the access token stops verifying.
    pub access_expires_at: i64,

    /// Opaque handle for [`SessionCache::refresh`] and [`SessionCache::logout`].
    pub refresh_token: String,

    /// When the refresh token stops being accepted.
    pub refresh_expires_at: i64,
}

#[derive(Debug, Clone)]
struct RefreshEntry {
    expires_at: DateTime<Utc>,
    subject: String,
    roles: Vec<String>,
    permission: UserPermission,
    /// Entry that replaced this one on its first refresh.
    successor: Option<Uuid>,
    /// Set once a grace eviction has been scheduled.
    evicting: bool,
}

impl RefreshEntry {
    fn new(
        expires_at: DateTime<Utc>,
        subject: String,
        roles: Vec<String>,
        permission: UserPermission,
    ) -> Self {
        Self {
            expires_at,
            subject,
            roles,
            permission,
            successor: None,
            evicting: false,
        }
    }
}

struct Inner {
    entries: RwLock<HashMap<Uuid, RefreshEntry>>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    grace_delay: Duration,
    issuer: Option<String>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
}

impl Inner {
    fn evict(&self, id: &Uuid) -> bool {
        self.entries.write().remove(id).is_some()
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }
}

/// Stores refresh tokens and mints access tokens.
///
/// Access tokens are never stored: they verify on their own until they
/// expire. Refresh tokens are random UUIDs mapped to the subject, roles and
/// permission snapshot they were issued for.
///
/// ## Rotation
///
/// [`refresh`](Self::refresh) issues a fresh pair and schedules removal of
/// the presented refresh token after the configured grace delay. The
/// superseded token is rotated only once: duplicate requests racing it
/// during the grace window receive a new access token for the same
/// successor session instead of opening another one. Eviction runs as a
/// tokio task. Outside a tokio runtime it happens immediately.
///
/// Cloning a `SessionCache` shares the table.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use datagate::auth::{Ed25519PrivateKey, Ed25519Signer};
/// use datagate::config::SessionConfig;
/// use datagate::permission::{UserId, UserPermission};
/// use datagate::session::SessionCache;
///
/// let signer = Ed25519Signer::new(Ed25519PrivateKey::generate()?)?;
/// let cache = SessionCache::new(SessionConfig::default(), Arc::new(signer))?;
///
/// let permission = UserPermission::new(UserId(7), [], []);
/// let tokens = cache.issue("alice", vec!["ROLE_USER".into()], permission)?;
/// assert!(cache.contains(&tokens.refresh_token));
///
/// cache.logout(&tokens.refresh_token)?;
/// assert!(cache.is_empty());
/// # Ok::<(), datagate::Error>(())
/// ```
#[derive(Clone)]
pub struct SessionCache {
    inner: Arc<Inner>,
}

impl SessionCache {
    /// Creates a cache reading time from the system clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: SessionConfig, signer: Arc<dyn TokenSigner>) -> Result<Self> {
        Self::with_clock(config, signer, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn with_clock(
        config: SessionConfig,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let to_delta = |value: Duration| {
            chrono::Duration::from_std(value)
                .map_err(|e| Error::configuration("session ttl is out of range").with_source(e))
        };

        Ok(Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                access_ttl: to_delta(config.access_ttl)?,
                refresh_ttl: to_delta(config.refresh_ttl)?,
                grace_delay: config.grace_delay,
                issuer: config.issuer,
                signer,
                clock,
            }),
        })
    }

    /// Starts a session for `subject`.
    ///
    /// # Errors
    ///
    /// Propagates signing failures and returns a configuration error if an
    /// expiry falls outside the calendar. Nothing is stored in either case.
    pub fn issue(
        &self,
        subject: impl Into<String>,
        roles: Vec<String>,
        permission: UserPermission,
    ) -> Result<SessionTokens> {
        let now = self.inner.clock.now();
        let expires_at = expiry(now, self.inner.refresh_ttl)?;
        let entry = RefreshEntry::new(expires_at, subject.into(), roles, permission);
        let id = Uuid::new_v4();
        let tokens = self.mint(id, &entry, now)?;

        info!(subject = %entry.subject, user_id = %entry.permission.user_id, "session issued");
        self.inner.entries.write().insert(id, entry);
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The first exchange rotates the session. Later exchanges of the same
    /// token, until its grace eviction, return the successor's refresh token
    /// with a freshly minted access token.
    ///
    /// # Errors
    ///
    /// - Bad parameter ([`Reason::MalformedToken`]) if `refresh_token` is not a UUID
    /// - Authentication rejected if it is unknown or expired, or if its
    ///   successor session has already ended
    /// - Configuration if the renewed expiry falls outside the calendar
    pub fn refresh(&self, refresh_token: &str) -> Result<SessionTokens> {
        let old_id = parse_refresh_token(refresh_token)?;
        let now = self.inner.clock.now();

        let (id, session, rotated, schedule) = {
            let mut entries = self.inner.entries.write();
            let Some(entry) = entries.get_mut(&old_id) else {
                warn!(refresh_id = %old_id, "refresh rejected: unknown token");
                return Err(Error::authentication_rejected("unknown refresh token"));
            };
            let schedule = !entry.evicting;

            if now > entry.expires_at {
                entry.evicting = true;
                drop(entries);
                warn!(refresh_id = %old_id, "refresh rejected: token expired");
                if schedule {
                    self.schedule_eviction(old_id);
                }
                return Err(Error::authentication_rejected("refresh token expired"));
            }

            if let Some(successor) = entry.successor {
                let Some(current) = entries.get(&successor) else {
                    warn!(refresh_id = %old_id, %successor, "refresh rejected: successor session ended");
                    return Err(Error::authentication_rejected("refresh token was superseded"));
                };
                (successor, current.clone(), false, false)
            } else {
                let renewed = RefreshEntry::new(
                    expiry(now, self.inner.refresh_ttl)?,
                    entry.subject.clone(),
                    entry.roles.clone(),
                    entry.permission.clone(),
                );
                let new_id = Uuid::new_v4();
                entry.successor = Some(new_id);
                entry.evicting = true;
                entries.insert(new_id, renewed.clone());
                (new_id, renewed, true, schedule)
            }
        };
        if schedule {
            self.schedule_eviction(old_id);
        }

        match self.mint(id, &session, now) {
            Ok(tokens) if rotated => {
                debug!(subject = %session.subject, refresh_id = %id, "session refreshed");
                Ok(tokens)
            },
            Ok(tokens) => {
                debug!(refresh_id = %old_id, successor = %id, "duplicate refresh answered with successor");
                Ok(tokens)
            },
            Err(err) => {
                if rotated {
                    let mut entries = self.inner.entries.write();
                    entries.remove(&id);
                    if let Some(entry) = entries.get_mut(&old_id) {
                        entry.successor = None;
                    }
                }
                Err(err)
            },
        }
    }

    /// Ends the session identified by `refresh_token`.
    ///
    /// Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns a bad-parameter error ([`Reason::MalformedToken`]) if
    /// `refresh_token` is not a UUID.
    pub fn logout(&self, refresh_token: &str) -> Result<()> {
        let id = parse_refresh_token(refresh_token)?;
        if self.inner.evict(&id) {
            debug!(refresh_id = %id, "session ended");
        }
        Ok(())
    }

    /// Removes every session of `user_id`, returning how many were removed.
    pub fn invalidate_user(&self, user_id: UserId) -> usize {
        let removed = {
            let mut entries = self.inner.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| entry.permission.user_id != user_id);
            before - entries.len()
        };
        info!(%user_id, removed, "user sessions invalidated");
        removed
    }

    /// Rewrites the roles and permission of every session of `user_id`.
    ///
    /// Expiry is untouched. Access tokens already handed out keep their old
    /// claims until they expire. Returns how many sessions were updated.
    pub fn update_user(
        &self,
        user_id: UserId,
        roles: Vec<String>,
        permission: UserPermission,
    ) -> usize {
        let mut updated = 0;
        for entry in self.inner.entries.write().values_mut() {
            if entry.permission.user_id == user_id {
                entry.roles.clone_from(&roles);
                entry.permission = permission.clone();
                updated += 1;
            }
        }
        info!(%user_id, updated, "user sessions updated");
        updated
    }

    /// Removes every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.inner.purge_expired();
        if removed > 0 {
            debug!(removed, "expired sessions purged");
        }
        removed
    }

    /// Runs [`purge_expired`](Self::purge_expired) every `period` on the
    /// current tokio runtime.
    ///
    /// The task stops when the returned handle is dropped or when every
    /// clone of the cache is gone.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `period` is zero or no tokio runtime
    /// is running.
    pub fn spawn_janitor(&self, period: Duration) -> Result<JanitorHandle> {
        if period.is_zero() {
            return Err(Error::configuration("janitor period must be non-zero"));
        }
        let runtime = Handle::try_current().map_err(|e| {
            Error::configuration("spawn_janitor requires a tokio runtime").with_source(e)
        })?;

        let inner = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let removed = inner.purge_expired();
                if removed > 0 {
                    debug!(removed, "janitor purged expired sessions");
                }
            }
        });
        Ok(JanitorHandle { task })
    }

    /// Returns `true` if `refresh_token` is currently in the table.
    ///
    /// Expired tokens awaiting eviction count as present.
    pub fn contains(&self, refresh_token: &str) -> bool {
        Uuid::parse_str(refresh_token)
            .map(|id| self.inner.entries.read().contains_key(&id))
            .unwrap_or(false)
    }

    /// Returns the number of stored sessions.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Returns `true` if no session is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    fn mint(&self, refresh_id: Uuid, entry: &RefreshEntry, now: DateTime<Utc>) -> Result<SessionTokens> {
        let access_expires_at = expiry(now, self.inner.access_ttl)?;
        let claims = AccessClaims {
            sub: entry.subject.clone(),
            iss: self.inner.issuer.clone(),
            iat: now.timestamp(),
            exp: access_expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            roles: entry.roles.clone(),
            permission: entry.permission.clone(),
        };

        Ok(SessionTokens {
            access_token: self.inner.signer.sign(&claims)?,
            access_expires_at: access_expires_at.timestamp(),
            refresh_token: refresh_id.to_string(),
            refresh_expires_at: entry.expires_at.timestamp(),
        })
    }

    fn schedule_eviction(&self, id: Uuid) {
        let delay = self.inner.grace_delay;
        if delay.is_zero() {
            self.inner.evict(&id);
            return;
        }

        match Handle::try_current() {
            Ok(runtime) => {
                let inner: Weak<Inner> = Arc::downgrade(&self.inner);
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let Some(inner) = inner.upgrade() else {
                        return;
                    };
                    if inner.evict(&id) {
                        debug!(refresh_id = %id, "refresh token evicted after grace delay");
                    }
                });
            },
            Err(_) => {
                warn!(refresh_id = %id, "no tokio runtime, evicting refresh token without grace delay");
                self.inner.evict(&id);
            },
        }
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("sessions", &self.len())
            .field("grace_delay", &self.inner.grace_delay)
            .finish_non_exhaustive()
    }
}

fn expiry(now: DateTime<Utc>, ttl: chrono::Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| Error::configuration("session expiry falls outside the calendar"))
}

fn parse_refresh_token(refresh_token: &str) -> Result<Uuid> {
    Uuid::parse_str(refresh_token).map_err(|e| {
        Error::bad_parameter(Reason::MalformedToken, "refresh token is not a valid identifier")
            .with_source(e)
    })
}

/// Keeps the janitor task started by [`SessionCache::spawn_janitor`] alive.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct JanitorHandle {
    task: JoinHandle<()>,
}

impl JanitorHandle {
    /// Returns `true` once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for JanitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
