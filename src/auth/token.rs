//! Signed, self-contained access tokens.
//!
//! Access tokens are compact JWTs signed with EdDSA through `jsonwebtoken`.
//! They are never stored server-side: any holder of the public key verifies
//! them with [`TokenVerifier`].

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{Ed25519PrivateKey, Ed25519PublicKey};
use crate::clock::{Clock, SystemClock};
use crate::permission::UserPermission;
use crate::{Error, Reason, Result};

/// JWS algorithm used for every access token.
pub const ALGORITHM: Algorithm = Algorithm::EdDSA;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (login name).
    pub sub: String,

    /// Issuer, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,

    /// Unique token id.
    pub jti: String,

    /// Roles granted to the subject.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Permission snapshot at issuance.
    pub permission: UserPermission,
}

/// Turns claims into a signed token.
///
/// The session cache only depends on this capability; key material stays
/// with the implementation.
pub trait TokenSigner: Send + Sync {
    /// Signs `claims` and returns the encoded token.
    fn sign(&self, claims: &AccessClaims) -> Result<String>;
}

/// Checks a token and returns its claims.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token`'s signature, issuer and expiry.
    fn verify(&self, token: &str) -> Result<AccessClaims>;
}

/// Signs access tokens with an Ed25519 key.
pub struct Ed25519Signer {
    encoding_key: EncodingKey,
    public_key: Ed25519PublicKey,
    key_id: Option<String>,
}

impl Ed25519Signer {
    /// Creates a signer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key cannot be encoded as PKCS#8.
    pub fn new(key: Ed25519PrivateKey) -> Result<Self> {
        let der = key.to_pkcs8_der()?;
        Ok(Self {
            encoding_key: EncodingKey::from_ed_der(&der),
            public_key: key.public_key(),
            key_id: None,
        })
    }

    /// Sets the `kid` header so verifiers can select the key.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Returns the public key matching this signer.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public_key
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &self.public_key)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl TokenSigner for Ed25519Signer {
    fn sign(&self, claims: &AccessClaims) -> Result<String> {
        let mut header = Header::new(ALGORITHM);
        header.kid = self.key_id.clone();

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("failed to sign access token: {}", e)).with_source(e))
    }
}

/// Verifies access tokens with an Ed25519 public key.
#[derive(Clone)]
pub struct Ed25519Verifier {
    key: Ed25519PublicKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Ed25519Verifier {
    /// Creates a verifier reading time from the system clock.
    pub fn new(key: Ed25519PublicKey) -> Self {
        Self::with_clock(key, Arc::new(SystemClock))
    }

    /// Creates a verifier reading time from `clock`.
    pub fn with_clock(key: Ed25519PublicKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against `clock`; `exp` stays a required claim.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            key,
            // For EdDSA keys `from_ed_der` takes the raw 32-byte point.
            decoding_key: DecodingKey::from_ed_der(&key.to_bytes()),
            validation,
            clock,
        }
    }

    /// Only accepts tokens whose `iss` claim equals `issuer`.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl AsRef<str>) -> Self {
        self.validation.set_issuer(&[issuer.as_ref()]);
        self
    }
}

impl fmt::Debug for Ed25519Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Verifier")
            .field("key", &self.key)
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

fn rejected(error: jsonwebtoken::errors::Error) -> Error {
    match error.kind() {
        JwtErrorKind::ExpiredSignature => Error::authentication_rejected("access token expired"),
        JwtErrorKind::InvalidIssuer => {
            Error::bad_parameter(Reason::InvalidToken, "access token issuer is not trusted")
        }
        _ => Error::bad_parameter(Reason::InvalidToken, format!("invalid access token: {}", error)),
    }
    .with_source(error)
}

impl TokenVerifier for Ed25519Verifier {
    fn verify(&self, token: &str) -> Result<AccessClaims> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(rejected)?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(Error::authentication_rejected("access token expired"));
        }
        Ok(claims)
    }
}
