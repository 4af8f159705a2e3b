//! Prelude module for convenient imports.
//!
//! ```rust
//! use datagate::prelude::*;
//! ```
//!
//! This provides access to:
//! - Predicate and schema types
//! - Error types
//! - Session and permission types
//! - Token signing types

pub use crate::{
    auth::{Ed25519PrivateKey, Ed25519Signer, Ed25519Verifier, TokenSigner, TokenVerifier},
    config::SessionConfig,
    error::{Error, ErrorKind, Reason, Result},
    permission::{GroupId, GroupRepository, PermissionResolver, User, UserId, UserPermission},
    query::{build_context, Context, ContextBuilder},
    session::{SessionCache, SessionEventHandler, SessionTokens, UserEvent},
    types::{Column, Columns, DataType, RequestElement},
};
