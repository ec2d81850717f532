//! zkpaste-crypto: the zero-knowledge paste protocol core
//!
//! Pipeline: plaintext → raw DEFLATE → base64 → AES-256-GCM → JSON envelope
//!
//! Key handling:
//! ```text
//! RandomKey (256-bit OS random, base64 text; travels only in the URL fragment)
//!   └── EffectiveKey = RandomKey [|| hex(SHA-256(password))]
//!         └── AES key = PBKDF2-HMAC-SHA256(EffectiveKey, salt=random_64bit, iter)
//!               └── AES-256-GCM (iv=random_128bit, tag=128bit, AAD=adata)
//! ```
//!
//! The envelope layout is the one SJCL emits, so existing PrivateBin-style
//! readers can decrypt what this crate produces.

pub mod cipher;
pub mod compress;
pub mod envelope;
pub mod kdf;
pub mod seal;

pub use cipher::{AesGcmCipher, Cipher};
pub use compress::{Compressor, RawDeflate};
pub use envelope::CipherEnvelope;
pub use kdf::{derive_key, is_blank, EffectiveKey, RandomKey};
pub use seal::{PasteSealer, SealedPaste};

/// Size of the random paste key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the GCM initialization vector we generate (128-bit)
pub const IV_SIZE: usize = 16;

/// Size of the PBKDF2 salt (64-bit)
pub const SALT_SIZE: usize = 8;

/// Size of the GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// PBKDF2 iteration count written into new envelopes
pub const DEFAULT_ITERATIONS: u32 = 10_000;
