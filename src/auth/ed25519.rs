//! Ed25519 key material for signing and verifying access tokens.

use std::fmt;
use std::path::Path;

use ed25519_dalek::{Signature, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH};
use zeroize::Zeroizing;

use crate::Error;

/// An Ed25519 private key for signing access tokens.
///
/// This type wraps an Ed25519 signing key with secure memory handling:
/// - Key material is zeroized on drop
/// - Debug output hides key contents
/// - Clone is disabled to prevent accidental key duplication
///
/// ## Loading Keys
///
/// Key files are loaded by the deployment's configuration layer and handed
/// over through one of these constructors:
///
/// ```rust,ignore
/// use datagate::auth::Ed25519PrivateKey;
///
/// // From PEM file (recommended for production)
/// let key = Ed25519PrivateKey::from_pem_file("session-key.pem")?;
///
/// // From raw bytes (32 bytes)
/// let key = Ed25519PrivateKey::from_bytes(&key_bytes)?;
///
/// // From hex string
/// let key = Ed25519PrivateKey::from_hex("deadbeef...")?;
/// ```
///
/// ## Generating Keys
///
/// For development, you can generate a new random key:
///
/// ```rust
/// use datagate::auth::Ed25519PrivateKey;
///
/// let key = Ed25519PrivateKey::generate()?;
/// # Ok::<(), datagate::Error>(())
/// ```
pub struct Ed25519PrivateKey {
    /// The Ed25519 signing key.
    key: SigningKey,
}

impl Ed25519PrivateKey {
    /// Generates a new random Ed25519 private key from the OS random source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the OS random source is unavailable.
    pub fn generate() -> Result<Self, Error> {
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        getrandom::getrandom(&mut *bytes).map_err(|e| {
            Error::configuration(format!("failed to generate Ed25519 key: {}", e))
        })?;
        Self::from_bytes(&*bytes)
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(Error::configuration(format!(
                "Ed25519 private key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            )));
        }

        let mut key_bytes = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        key_bytes.copy_from_slice(bytes);

        Ok(Self {
            key: SigningKey::from_bytes(&key_bytes),
        })
    }

    /// Creates a key from a hex-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or wrong length.
    pub fn from_hex(hex_str: &str) -> Result<Self, Error> {
        let bytes = Zeroizing::new(hex::decode(hex_str).map_err(|e| {
            Error::configuration(format!("invalid hex string for Ed25519 key: {}", e))
        })?);

        Self::from_bytes(&bytes)
    }

    /// Loads a key from a PKCS#8 PEM-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM format is invalid.
    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        use ed25519_dalek::pkcs8::DecodePrivateKey;

        let key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| Error::configuration(format!("failed to parse Ed25519 PEM: {}", e)))?;

        Ok(Self { key })
    }

    /// Loads a key from a PEM file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid PEM.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "failed to read Ed25519 key file '{}': {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;

        // Wrap in Zeroizing for secure cleanup of the PEM string
        let pem = Zeroizing::new(pem);

        Self::from_pem(&pem)
    }

    /// Returns the matching public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            key: self.key.verifying_key(),
        }
    }

    /// Signs a message and returns the signature bytes (64 bytes).
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        use ed25519_dalek::Signer;
        self.key.sign(message).to_bytes()
    }

    /// Encodes the key as PKCS#8 DER, as consumed by JWT signing libraries.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if encoding fails.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>, Error> {
        use ed25519_dalek::pkcs8::EncodePrivateKey;

        let document = self
            .key
            .to_pkcs8_der()
            .map_err(|e| Error::configuration(format!("failed to encode Ed25519 key: {}", e)))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519PrivateKey")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

// Clone is intentionally NOT implemented to prevent accidental key duplication

/// An Ed25519 public key verifying access tokens.
///
/// Any service holding this key can verify tokens without calling back into
/// the session cache.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    key: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Creates a public key from its 32 raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            Error::configuration(format!(
                "Ed25519 public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| Error::configuration(format!("invalid Ed25519 public key: {}", e)))?;
        Ok(Self { key })
    }

    /// Returns the raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// Returns the key as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Returns `true` if `signature` is a valid signature of `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        Signature::from_slice(signature)
            .map(|sig| self.key.verify(message, &sig).is_ok())
            .unwrap_or(false)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ed25519PublicKey").field(&self.to_hex()).finish()
    }
}
