//! Self-describing ciphertext envelope
//!
//! Serialized as compact JSON in SJCL field order:
//! ```text
//! {"iv":B64,"v":1,"iter":N,"ks":256,"ts":128,"mode":"gcm","adata":"","cipher":"aes","salt":B64,"ct":B64}
//! ```
//! `ct` is the GCM ciphertext with the 16-byte tag appended. Everything a
//! reader needs except the key travels in this one string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use zkpaste_core::{PasteError, PasteResult};

use crate::TAG_SIZE;

/// Envelope format version
pub const ENVELOPE_VERSION: u32 = 1;

/// Upper bound on `iter` accepted from an untrusted envelope
pub const MAX_ITERATIONS: u32 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEnvelope {
    /// Initialization vector (base64)
    pub iv: String,
    /// Envelope format version
    pub v: u32,
    /// PBKDF2 iteration count
    pub iter: u32,
    /// Key size in bits
    pub ks: u32,
    /// Authentication tag size in bits
    pub ts: u32,
    pub mode: String,
    /// Associated data (base64), authenticated but not encrypted
    #[serde(default)]
    pub adata: String,
    pub cipher: String,
    /// PBKDF2 salt (base64)
    pub salt: String,
    /// Ciphertext || tag (base64)
    pub ct: String,
}

/// Decoded binary fields of a validated envelope.
#[derive(Debug)]
pub(crate) struct EnvelopeParts {
    pub iv: Vec<u8>,
    pub salt: Vec<u8>,
    pub adata: Vec<u8>,
    pub ct: Vec<u8>,
}

impl CipherEnvelope {
    /// Build an AES-256-GCM envelope from raw parts.
    pub fn new(iterations: u32, iv: &[u8], salt: &[u8], ct_with_tag: &[u8]) -> Self {
        Self {
            iv: STANDARD.encode(iv),
            v: ENVELOPE_VERSION,
            iter: iterations,
            ks: 256,
            ts: (TAG_SIZE * 8) as u32,
            mode: "gcm".into(),
            adata: String::new(),
            cipher: "aes".into(),
            salt: STANDARD.encode(salt),
            ct: STANDARD.encode(ct_with_tag),
        }
    }

    /// Serialize to the single-string transport form
    pub fn to_json(&self) -> PasteResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PasteError::Envelope(format!("envelope serialization: {e}")))
    }

    /// Parse the transport form
    pub fn from_json(data: &str) -> PasteResult<Self> {
        serde_json::from_str(data)
            .map_err(|e| PasteError::Envelope(format!("envelope deserialization: {e}")))
    }

    /// Check the algorithm parameters and decode the binary fields.
    pub(crate) fn decode_parts(&self) -> PasteResult<EnvelopeParts> {
        if self.v != ENVELOPE_VERSION {
            return Err(PasteError::Envelope(format!("unsupported version {}", self.v)));
        }
        if self.cipher != "aes" || self.mode != "gcm" {
            return Err(PasteError::Envelope(format!(
                "unsupported cipher {}-{}",
                self.cipher, self.mode
            )));
        }
        if self.ks != 256 {
            return Err(PasteError::Envelope(format!("unsupported key size {}", self.ks)));
        }
        if self.ts as usize != TAG_SIZE * 8 {
            return Err(PasteError::Envelope(format!("unsupported tag size {}", self.ts)));
        }
        if self.iter == 0 || self.iter > MAX_ITERATIONS {
            return Err(PasteError::Envelope(format!(
                "iteration count {} out of range",
                self.iter
            )));
        }

        let iv = decode_field("iv", &self.iv)?;
        let salt = decode_field("salt", &self.salt)?;
        let adata = decode_field("adata", &self.adata)?;
        let ct = decode_field("ct", &self.ct)?;

        if iv.len() != 12 && iv.len() != 16 {
            return Err(PasteError::Envelope(format!(
                "iv must be 12 or 16 bytes, got {}",
                iv.len()
            )));
        }
        if salt.is_empty() {
            return Err(PasteError::Envelope("salt is empty".into()));
        }
        if ct.len() < TAG_SIZE {
            return Err(PasteError::Envelope(format!(
                "ciphertext too short: {} bytes (minimum {TAG_SIZE})",
                ct.len()
            )));
        }

        Ok(EnvelopeParts {
            iv,
            salt,
            adata,
            ct,
        })
    }
}

fn decode_field(name: &str, value: &str) -> PasteResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| PasteError::Envelope(format!("{name} is not base64: {e}")))
}
