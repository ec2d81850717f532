//! Plaintext ⇄ envelope: the composition a paste writer and reader share

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;

use zkpaste_core::{PasteError, PasteResult};

use crate::cipher::{AesGcmCipher, Cipher};
use crate::compress::{Compressor, RawDeflate};
use crate::envelope::CipherEnvelope;
use crate::kdf::{derive_key, is_blank, RandomKey};

/// Output of sealing one paste.
///
/// `random_key` must end up only in the URL fragment.
#[derive(Debug)]
pub struct SealedPaste {
    pub envelope: CipherEnvelope,
    pub random_key: RandomKey,
}

/// Compress → base64 → encrypt, over pluggable cipher and compressor.
#[derive(Debug, Clone, Default)]
pub struct PasteSealer<C = AesGcmCipher, Z = RawDeflate> {
    cipher: C,
    compressor: Z,
}

impl<C: Cipher, Z: Compressor> PasteSealer<C, Z> {
    pub fn new(cipher: C, compressor: Z) -> Self {
        Self { cipher, compressor }
    }

    /// Encrypt `plaintext` under a freshly generated random key.
    pub fn seal(
        &self,
        plaintext: &[u8],
        password: Option<&SecretString>,
    ) -> PasteResult<SealedPaste> {
        let random_key = RandomKey::generate();
        let envelope = self.seal_with_key(plaintext, &random_key, password)?;
        Ok(SealedPaste {
            envelope,
            random_key,
        })
    }

    /// Encrypt under a caller-supplied random key.
    pub fn seal_with_key(
        &self,
        plaintext: &[u8],
        random_key: &RandomKey,
        password: Option<&SecretString>,
    ) -> PasteResult<CipherEnvelope> {
        if password.is_some() && is_blank(password) {
            tracing::warn!("password is blank; encrypting with the random key only");
        }

        let key = derive_key(random_key, password);
        let compressed = self.compressor.compress(plaintext)?;
        let encoded = STANDARD.encode(&compressed);

        tracing::debug!(
            plaintext_len = plaintext.len(),
            compressed_len = compressed.len(),
            "paste compressed"
        );

        self.cipher.encrypt(&key, &encoded)
    }

    /// Reverse of `seal`: decrypt → base64 decode → inflate.
    pub fn open(
        &self,
        envelope: &CipherEnvelope,
        random_key: &RandomKey,
        password: Option<&SecretString>,
    ) -> PasteResult<Vec<u8>> {
        let key = derive_key(random_key, password);
        let encoded = self.cipher.decrypt(&key, envelope)?;
        let compressed = STANDARD
            .decode(encoded.trim())
            .map_err(|e| PasteError::Envelope(format!("payload is not base64: {e}")))?;
        self.compressor.decompress(&compressed)
    }
}
