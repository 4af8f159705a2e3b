//! # datagate
//!
//! Typed client predicates and revocable sessions for data-access services.
//!
//! ## Quick Start
//!
//! ```rust
//! use datagate::prelude::*;
//! use datagate::RequestElement as E;
//!
//! let columns = [
//!     Column::new("age", DataType::Long),
//!     Column::new("city", DataType::String),
//! ];
//! let predicate = E::and([
//!     E::greater_than(E::column("age"), E::value(18)),
//!     E::starts_with("city", "Ber", false),
//! ]);
//!
//! let context = build_context(&columns, &predicate)?;
//! assert_eq!(context.get(&E::value(18)), Some(DataType::Long));
//! # Ok::<(), datagate::Error>(())
//! ```
//!
//! ## Key Concepts
//!
//! - **Predicates**: [`RequestElement`] trees arrive as JSON from clients
//! - **Context**: [`build_context`] assigns a [`DataType`] to every node it
//!   can, rejecting ill-typed predicates with a [`Reason`] code
//! - **Sessions**: [`SessionCache`](session::SessionCache) issues signed access
//!   tokens and opaque refresh tokens, rotating the latter with a grace delay
//! - **Permissions**: [`PermissionResolver`](permission::PermissionResolver)
//!   derives the group ids embedded in every access token
//!
//! ## Features
//!
//! - `derive`: Enable `#[derive(Columns)]` to build a schema from a struct

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod error;
pub mod types;

// Query engine
pub mod query;

// Authentication and sessions
pub mod auth;
pub mod clock;
pub mod config;
pub mod permission;
pub mod session;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use error::{Error, ErrorKind, Reason, Result};
pub use query::{build_context, Context, ContextBuilder};
pub use types::{Column, ColumnName, Columns, DataType, Literal, RequestElement, Value};

#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use datagate_derive::Columns;
