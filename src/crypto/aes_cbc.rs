// src/crypto/aes_cbc.rs
//! AES key schedules and raw CBC chaining
//!
//! Padding is never delegated to the `cbc` crate: buffers are padded and
//! checked by [`super::padding`] so every variant shares one PKCS7 codec.
//! Each call builds its own `cbc::Encryptor`/`Decryptor` from a cloned key
//! schedule, so no chaining state is ever shared between calls.

use std::fmt;

use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};

use crate::consts::BLOCK_SIZE;
use crate::error::{CryptoError, PaddingError};

use super::padding;
use super::sealed::Sealed;
use super::{Decrypter, Encrypter};

/// Expanded AES key; the variant is picked from the raw key length.
///
/// Key schedules are zeroized on drop (`aes` crate `zeroize` feature).
#[derive(Clone)]
pub enum AesKey {
    Aes128(aes::Aes128),
    Aes192(aes::Aes192),
    Aes256(aes::Aes256),
}

impl AesKey {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => aes::Aes128::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => aes::Aes192::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => aes::Aes256::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    }

    /// Key size in bits
    pub fn bits(&self) -> usize {
        match self {
            AesKey::Aes128(_) => 128,
            AesKey::Aes192(_) => 192,
            AesKey::Aes256(_) => 256,
        }
    }

    /// CBC-encrypt `buf` in place. `buf` must already be padded.
    pub(crate) fn cbc_encrypt(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match self {
            AesKey::Aes128(c) => encrypt_blocks(c, iv, buf),
            AesKey::Aes192(c) => encrypt_blocks(c, iv, buf),
            AesKey::Aes256(c) => encrypt_blocks(c, iv, buf),
        }
    }

    /// CBC-decrypt `buf` in place, leaving the padding for the caller to check.
    pub(crate) fn cbc_decrypt(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match self {
            AesKey::Aes128(c) => decrypt_blocks(c, iv, buf),
            AesKey::Aes192(c) => decrypt_blocks(c, iv, buf),
            AesKey::Aes256(c) => decrypt_blocks(c, iv, buf),
        }
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey(AES-{}, ..)", self.bits())
    }
}

/// CBC-encrypt whole blocks in place with any block cipher
pub(crate) fn encrypt_blocks<C>(cipher: &C, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockEncryptMut + BlockCipher + Clone,
{
    let len = buf.len();
    cbc::Encryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| CryptoError::InvalidIvLength(iv.len()))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| unaligned(len, C::block_size()))?;
    Ok(())
}

/// CBC-decrypt whole blocks in place with any block cipher
pub(crate) fn decrypt_blocks<C>(cipher: &C, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockDecryptMut + BlockCipher + Clone,
{
    let len = buf.len();
    cbc::Decryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| CryptoError::InvalidIvLength(iv.len()))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| unaligned(len, C::block_size()))?;
    Ok(())
}

fn unaligned(len: usize, block_size: usize) -> CryptoError {
    CryptoError::Padding(PaddingError::InvalidLength { len, block_size })
}

/// Plain AES-CBC-PKCS7 with a fixed, caller-supplied IV.
///
/// Output is the bare ciphertext with no IV prefix. Every call starts chaining
/// from the configured IV, so encrypting the same plaintext twice yields the
/// same ciphertext; prefer [`super::BlockCipherEnvelope`] unless the IV is
/// managed elsewhere.
#[derive(Clone, Debug)]
pub struct CbcPkcs7 {
    key: AesKey,
    iv: [u8; BLOCK_SIZE],
}

impl CbcPkcs7 {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        let iv: [u8; BLOCK_SIZE] = iv
            .try_into()
            .map_err(|_| CryptoError::InvalidIvLength(iv.len()))?;
        Ok(Self {
            key: AesKey::new(key)?,
            iv,
        })
    }

    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }
}

impl Sealed for CbcPkcs7 {}

impl Encrypter for CbcPkcs7 {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut buf = padding::pad_block(plaintext);
        self.key.cbc_encrypt(&self.iv, &mut buf)?;
        Ok(buf)
    }
}

impl Decrypter for CbcPkcs7 {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(unaligned(ciphertext.len(), BLOCK_SIZE));
        }
        let mut buf = ciphertext.to_vec();
        self.key.cbc_decrypt(&self.iv, &mut buf)?;
        let len = padding::unpadded_len(BLOCK_SIZE, &buf)?;
        buf.truncate(len);
        Ok(buf)
    }
}
