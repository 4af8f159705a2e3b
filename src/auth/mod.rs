//! Key material and access-token signing.
//!
//! - [`Ed25519PrivateKey`] / [`Ed25519PublicKey`]: Signing keys
//! - [`TokenSigner`] / [`TokenVerifier`]: The capabilities the session layer needs
//! - [`Ed25519Signer`] / [`Ed25519Verifier`]: EdDSA implementations of both
//!
//! ```rust
//! use datagate::auth::{Ed25519PrivateKey, Ed25519Signer, Ed25519Verifier};
//!
//! let key = Ed25519PrivateKey::generate()?;
//! let verifier = Ed25519Verifier::new(key.public_key());
//! let signer = Ed25519Signer::new(key)?.with_key_id("primary");
//! # let _ = (signer, verifier);
//! # Ok::<(), datagate::Error>(())
//! ```

mod ed25519;
mod token;

pub use ed25519::{Ed25519PrivateKey, Ed25519PublicKey};
pub use token::{
    ALGORITHM, AccessClaims, Ed25519Signer, Ed25519Verifier, TokenSigner, TokenVerifier,
};
