//! AES-256-GCM paste encryption
//!
//! ```text
//! salt = random 8 bytes, iv = random 16 bytes   (fresh per call)
//! aes_key = PBKDF2-HMAC-SHA256(effective_key, salt, iter) → 32 bytes
//! ct = AES-256-GCM(aes_key, iv, aad=b64decode(adata), plaintext) || tag(16)
//! ```
//!
//! A 16-byte IV goes through GHASH to form the initial counter block, which
//! is what SJCL does; 12-byte IVs found in other envelopes are accepted on
//! decrypt.

use aes_gcm::aead::generic_array::typenum::{U12, U16};
use aes_gcm::aead::generic_array::{ArrayLength, GenericArray};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use zkpaste_core::{PasteError, PasteResult};

use crate::envelope::CipherEnvelope;
use crate::kdf::EffectiveKey;
use crate::{DEFAULT_ITERATIONS, IV_SIZE, KEY_SIZE, SALT_SIZE};

/// Authenticated symmetric encryption of the encoded payload.
pub trait Cipher {
    /// Encrypt `plaintext` under `key`, producing a self-contained envelope.
    fn encrypt(&self, key: &EffectiveKey, plaintext: &str) -> PasteResult<CipherEnvelope>;

    /// Authenticate and decrypt. Fails rather than return wrong plaintext.
    fn decrypt(&self, key: &EffectiveKey, envelope: &CipherEnvelope) -> PasteResult<String>;
}

/// PBKDF2 + AES-256-GCM, SJCL-compatible.
#[derive(Debug, Clone, Copy)]
pub struct AesGcmCipher {
    iterations: u32,
}

impl AesGcmCipher {
    /// Use a non-default PBKDF2 iteration count for new envelopes.
    /// Decryption always honours the count stored in the envelope.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for AesGcmCipher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&self, key: &EffectiveKey, plaintext: &str) -> PasteResult<CipherEnvelope> {
        if key.is_empty() {
            return Err(PasteError::InvalidKeyMaterial("key is empty".into()));
        }

        let mut salt = [0u8; SALT_SIZE];
        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let mut aes_key = stretch_key(key, &salt, self.iterations)?;
        let sealed = seal_with::<U16>(&aes_key, &iv, b"", plaintext.as_bytes());
        aes_key.zeroize();
        let ct = sealed?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            ct_len = ct.len(),
            iter = self.iterations,
            "paste encrypted"
        );

        Ok(CipherEnvelope::new(self.iterations, &iv, &salt, &ct))
    }

    fn decrypt(&self, key: &EffectiveKey, envelope: &CipherEnvelope) -> PasteResult<String> {
        if key.is_empty() {
            return Err(PasteError::InvalidKeyMaterial("key is empty".into()));
        }

        let parts = envelope.decode_parts()?;
        let aad = parts.adata.as_slice();

        let mut aes_key = stretch_key(key, &parts.salt, envelope.iter)?;
        let opened = match parts.iv.len() {
            12 => open_with::<U12>(&aes_key, &parts.iv, aad, &parts.ct),
            _ => open_with::<U16>(&aes_key, &parts.iv, aad, &parts.ct),
        };
        aes_key.zeroize();

        let plaintext = opened?;
        String::from_utf8(plaintext)
            .map_err(|_| PasteError::Envelope("decrypted payload is not valid UTF-8".into()))
    }
}

/// PBKDF2-HMAC-SHA256 over the UTF-8 key text.
fn stretch_key(key: &EffectiveKey, salt: &[u8], iterations: u32) -> PasteResult<[u8; KEY_SIZE]> {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(key.as_str().as_bytes(), salt, iterations, &mut out)
        .map_err(|e| PasteError::InvalidKeyMaterial(format!("PBKDF2 failed: {e}")))?;
    Ok(out)
}

fn seal_with<N>(
    aes_key: &[u8; KEY_SIZE],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> PasteResult<Vec<u8>>
where
    N: ArrayLength<u8>,
{
    let cipher = AesGcm::<Aes256, N>::new(GenericArray::from_slice(aes_key));
    cipher
        .encrypt(
            GenericArray::from_slice(iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| PasteError::InvalidKeyMaterial(format!("AES-GCM encryption failed: {e}")))
}

fn open_with<N>(
    aes_key: &[u8; KEY_SIZE],
    iv: &[u8],
    aad: &[u8],
    ct_with_tag: &[u8],
) -> PasteResult<Vec<u8>>
where
    N: ArrayLength<u8>,
{
    let cipher = AesGcm::<Aes256, N>::new(GenericArray::from_slice(aes_key));
    cipher
        .decrypt(
            GenericArray::from_slice(iv),
            Payload {
                msg: ct_with_tag,
                aad,
            },
        )
        .map_err(|_| {
            PasteError::Decryption("authentication failed: wrong key or corrupted data".into())
        })
}
