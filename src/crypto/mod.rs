// src/crypto/mod.rs
//! Pure cryptographic operations: no I/O
//!
//! Three envelope kinds share one PKCS7 codec and one AES-CBC core:
//!
//! | kind | output |
//! |---|---|
//! | [`CbcPkcs7`] | `ciphertext` (fixed IV, held by the caller) |
//! | [`BlockCipherEnvelope`] | `iv \|\| ciphertext` |
//! | [`VersionedEnvelopeCodec`] | `version \|\| iv \|\| ciphertext` |
//!
//! All of them implement [`Encrypter`] and [`Decrypter`]. The traits are sealed;
//! that set is not meant to grow outside this crate.

pub mod aes_cbc;
pub mod envelope;
pub mod padding;
pub mod versioned;

pub use aes_cbc::{AesKey, CbcPkcs7};
pub use envelope::BlockCipherEnvelope;
pub use versioned::{split_version, KeyVersionRegistry, SharedRegistry, VersionedEnvelopeCodec};

use crate::error::CryptoError;

pub(crate) mod sealed {
    pub trait Sealed {}
}

pub trait Encrypter: sealed::Sealed {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

pub trait Decrypter: sealed::Sealed {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
