//! Paste keys: the random URL-fragment key and the password-strengthened
//! effective key handed to the cipher

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use zkpaste_core::{PasteError, PasteResult};

use crate::KEY_SIZE;

/// 256 bits of OS randomness, kept as the base64 text that ends up in the
/// view URL fragment. Never sent to the server.
///
/// Zeroized on drop to prevent secrets lingering in memory.
pub struct RandomKey {
    encoded: String,
}

impl RandomKey {
    /// Draw a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        let encoded = STANDARD.encode(bytes);
        bytes.zeroize();
        Self { encoded }
    }

    /// Accept a key taken from a view URL fragment.
    pub fn from_encoded(encoded: &str) -> PasteResult<Self> {
        let mut bytes = STANDARD
            .decode(encoded)
            .map_err(|e| PasteError::InvalidKeyMaterial(format!("key is not base64: {e}")))?;
        let len = bytes.len();
        bytes.zeroize();

        if len != KEY_SIZE {
            return Err(PasteError::InvalidKeyMaterial(format!(
                "key decodes to {len} bytes (expected {KEY_SIZE})"
            )));
        }
        Ok(Self {
            encoded: encoded.to_string(),
        })
    }

    /// The base64 text, exactly as it appears after `#` in the view URL.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl Drop for RandomKey {
    fn drop(&mut self) {
        self.encoded.zeroize();
    }
}

impl std::fmt::Debug for RandomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomKey")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}

/// Key text actually fed to PBKDF2. Zeroized on drop.
pub struct EffectiveKey {
    material: String,
}

impl EffectiveKey {
    /// Wrap arbitrary key text, e.g. when substituting a different scheme
    /// in front of the cipher. No validation happens here; the cipher
    /// rejects unusable material.
    pub fn from_text(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.material
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl Drop for EffectiveKey {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}

impl std::fmt::Debug for EffectiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectiveKey")
            .field("material", &"[REDACTED]")
            .finish()
    }
}

/// True when a password should count as "no password": absent, empty, or
/// whitespace only.
pub fn is_blank(password: Option<&SecretString>) -> bool {
    password.map_or(true, |p| p.expose_secret().trim().is_empty())
}

/// Combine the random key with an optional password.
///
/// - blank password: the random key text verbatim
/// - otherwise: random key text followed by lowercase hex SHA-256 of the
///   UTF-8 password (concatenation, so both halves are needed to decrypt)
pub fn derive_key(random_key: &RandomKey, password: Option<&SecretString>) -> EffectiveKey {
    match password {
        Some(p) if !is_blank(Some(p)) => {
            let digest = Sha256::digest(p.expose_secret().as_bytes());
            let mut material = String::with_capacity(random_key.as_str().len() + 64);
            material.push_str(random_key.as_str());
            material.push_str(&hex::encode(digest));
            EffectiveKey { material }
        }
        _ => EffectiveKey {
            material: random_key.as_str().to_string(),
        },
    }
}
