//! Integration tests for datagate.
//!
//! These tests exercise the public API end to end: predicates arrive as
//! JSON, sessions are verified with an independent JWT implementation.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With the derive macro
//! cargo test --features derive --test integration
//!
//! # With logs
//! RUST_LOG=datagate=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod context_tests;
#[cfg(feature = "derive")]
mod derive_tests;
mod permission_tests;
mod session_tests;
