//! Test doubles for the crate's collaborators.
//!
//! - [`InMemoryGroupRepository`]: A [`GroupRepository`](crate::permission::GroupRepository)
//!   with failure injection
//! - [`ManualClock`]: A [`Clock`](crate::clock::Clock) that moves only when told to
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use datagate::clock::Clock;
//! use datagate::testing::ManualClock;
//!
//! let clock = Arc::new(ManualClock::new(Utc::now()));
//! let before = clock.now();
//! clock.advance(Duration::minutes(5));
//! assert_eq!(clock.now() - before, Duration::minutes(5));
//! ```

mod clock;
mod groups;

pub use clock::ManualClock;
pub use groups::InMemoryGroupRepository;
