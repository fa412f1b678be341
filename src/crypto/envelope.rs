// src/crypto/envelope.rs
//! AES-CBC-PKCS7 with a random IV carried inline: `iv || ciphertext`

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::aliases::AesKeyBytes;
use crate::consts::BLOCK_SIZE;
use crate::error::{CryptoError, PaddingError};

use super::aes_cbc::AesKey;
use super::padding;
use super::sealed::Sealed;
use super::{Decrypter, Encrypter};

/// One AES key, encrypting to self-describing `iv || ciphertext` buffers.
///
/// Holds no per-call state; share it freely across threads.
#[derive(Clone, Debug)]
pub struct BlockCipherEnvelope {
    key: AesKey,
}

impl BlockCipherEnvelope {
    /// Build from raw key bytes (16, 24 or 32)
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: AesKey::new(key)?,
        })
    }

    pub fn from_secret(key: &AesKeyBytes) -> Result<Self, CryptoError> {
        Self::new(key.expose_secret())
    }

    /// AES key size in bits
    pub fn key_bits(&self) -> usize {
        self.key.bits()
    }

    /// Encrypt under a fresh IV from the OS RNG.
    ///
    /// # Panics
    ///
    /// If the operating system cannot produce random bytes. Without a secure
    /// IV there is nothing safe to return.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut iv = [0u8; BLOCK_SIZE];
        if let Err(err) = OsRng.try_fill_bytes(&mut iv) {
            panic!("failed to generate IV: {err}");
        }
        self.encrypt_with_iv(&iv, plaintext)
    }

    /// Encrypt under the given IV. Never reuse an IV with the same key;
    /// this exists for known-answer tests.
    pub fn encrypt_with_iv(&self, iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
        let padded_len = padding::padded_len(BLOCK_SIZE, plaintext.len());
        let mut out = Vec::with_capacity(BLOCK_SIZE + padded_len);
        out.extend_from_slice(iv);
        out.extend_from_slice(&padding::pad_block(plaintext));

        let (iv, body) = out.split_at_mut(BLOCK_SIZE);
        // body is padded to whole blocks and iv is one block, so this can't fail
        if let Err(err) = self.key.cbc_encrypt(iv, body) {
            unreachable!("CBC over padded input failed: {err}");
        }
        out
    }

    /// Split off the IV, CBC-decrypt and strip the padding
    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if src.len() < BLOCK_SIZE {
            return Err(CryptoError::TooShort {
                len: src.len(),
                min: BLOCK_SIZE,
            });
        }
        let (iv, body) = src.split_at(BLOCK_SIZE);
        if body.is_empty() || body.len() % BLOCK_SIZE != 0 {
            return Err(padding_len_error(body.len()));
        }

        let mut buf = body.to_vec();
        self.key.cbc_decrypt(iv, &mut buf)?;
        let len = padding::unpadded_len(BLOCK_SIZE, &buf)?;
        buf.truncate(len);
        Ok(buf)
    }
}

fn padding_len_error(len: usize) -> CryptoError {
    CryptoError::Padding(PaddingError::InvalidLength {
        len,
        block_size: BLOCK_SIZE,
    })
}

impl Sealed for BlockCipherEnvelope {}

impl Encrypter for BlockCipherEnvelope {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(BlockCipherEnvelope::encrypt(self, plaintext))
    }
}

impl Decrypter for BlockCipherEnvelope {
    fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>, CryptoError> {
        BlockCipherEnvelope::decrypt(self, src)
    }
}
