//! Session lifetime configuration.

use std::time::Duration;

use crate::{Error, Result};

/// Shortest accepted lifetime for access and refresh tokens.
pub const MIN_TTL: Duration = Duration::from_secs(10);

/// Longest accepted lifetime, and longest accepted grace delay (100 years).
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Configuration of the [`SessionCache`](crate::session::SessionCache).
///
/// ## Default Values
///
/// - `access_ttl`: 15 minutes
/// - `refresh_ttl`: 24 hours
/// - `grace_delay`: 10 seconds
/// - `issuer`: none
///
/// ## Example
///
/// ```rust
/// use datagate::config::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::builder()
///     .access_ttl(Duration::from_secs(300))
///     .refresh_ttl(Duration::from_secs(7 * 24 * 3600))
///     .issuer("https://auth.example.com")
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct SessionConfig {
    /// Lifetime of access tokens.
    #[builder(default = Duration::from_secs(15 * 60))]
    pub access_ttl: Duration,

    /// Lifetime of refresh tokens.
    #[builder(default = Duration::from_secs(24 * 3600))]
    pub refresh_ttl: Duration,

    /// How long a rotated or expired refresh token stays in the table.
    ///
    /// Concurrent requests still carrying the previous refresh token get a
    /// deterministic answer during this window.
    #[builder(default = Duration::from_secs(10))]
    pub grace_delay: Duration,

    /// Value of the `iss` claim, omitted when unset.
    #[builder(into)]
    pub issuer: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SessionConfig {
    /// Checks the configured lifetimes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a TTL is shorter than [`MIN_TTL`], or
    /// if a TTL or the grace delay is longer than [`MAX_TTL`].
    pub fn validate(&self) -> Result<()> {
        for (name, ttl) in [("access_ttl", self.access_ttl), ("refresh_ttl", self.refresh_ttl)] {
            if ttl < MIN_TTL {
                return Err(Error::configuration(format!(
                    "{} must be at least {}s, got {:?}",
                    name,
                    MIN_TTL.as_secs(),
                    ttl
                )));
            }
        }
        for (name, value) in [
            ("access_ttl", self.access_ttl),
            ("refresh_ttl", self.refresh_ttl),
            ("grace_delay", self.grace_delay),
        ] {
            if value > MAX_TTL {
                return Err(Error::configuration(format!(
                    "{} must be at most {}s, got {:?}",
                    name,
                    MAX_TTL.as_secs(),
                    value
                )));
            }
        }
        Ok(())
    }
}
