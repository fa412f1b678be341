// src/keys/private_key.rs
//! RSA private key files
//!
//! Accepts PKCS#1 `RSA PRIVATE KEY` blocks, optionally encrypted the old
//! OpenSSL way (`Proc-Type: 4,ENCRYPTED` + `DEK-Info`), and plain PKCS#8
//! `PRIVATE KEY` blocks.

use std::path::Path;

use cbc::cipher::KeyInit;
use md5::{Digest, Md5};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

use crate::aliases::KeyPassword;
use crate::crypto::aes_cbc::{decrypt_blocks, AesKey};
use crate::crypto::padding;
use crate::error::{CryptoError, KeyLoadCause, KeyLoadError, LoadStage, PaddingError};

const PKCS1_TAG: &str = "RSA PRIVATE KEY";
const PKCS8_TAG: &str = "PRIVATE KEY";

/// Read, decrypt and parse one private key file
pub fn read_private_key(
    version: u32,
    path: &Path,
    password: &KeyPassword,
) -> Result<RsaPrivateKey, KeyLoadError> {
    let data = std::fs::read(path).map_err(KeyLoadError::at(version, LoadStage::ReadPrivateKey))?;

    let block = decode_block(&data).map_err(KeyLoadError::at(version, LoadStage::DecodePem))?;

    let der = if is_encrypted(&block) {
        debug!(version, "private key is password protected");
        decrypt_block(&block, password.expose_secret().as_bytes())
            .map_err(KeyLoadError::at(version, LoadStage::DecryptPem))?
    } else {
        Zeroizing::new(block.contents().to_vec())
    };

    parse_der(block.tag(), &der).map_err(KeyLoadError::at(version, LoadStage::ParsePrivateKey))
}

fn decode_block(data: &[u8]) -> Result<pem::Pem, KeyLoadCause> {
    let block = pem::parse(data)?;
    match block.tag() {
        PKCS1_TAG | PKCS8_TAG => Ok(block),
        other => Err(KeyLoadCause::UnexpectedPemTag(other.to_owned())),
    }
}

fn is_encrypted(block: &pem::Pem) -> bool {
    block
        .headers()
        .get("Proc-Type")
        .is_some_and(|proc_type| proc_type.trim() == "4,ENCRYPTED")
}

fn parse_der(tag: &str, der: &[u8]) -> Result<RsaPrivateKey, KeyLoadCause> {
    if tag == PKCS8_TAG {
        RsaPrivateKey::from_pkcs8_der(der).map_err(KeyLoadCause::Pkcs8)
    } else {
        RsaPrivateKey::from_pkcs1_der(der).map_err(KeyLoadCause::Pkcs1)
    }
}

/// Ciphers OpenSSL writes into `DEK-Info`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PemCipher {
    Des,
    TdesEde3,
    Aes128,
    Aes192,
    Aes256,
}

impl PemCipher {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "DES-CBC" => Some(Self::Des),
            "DES-EDE3-CBC" => Some(Self::TdesEde3),
            "AES-128-CBC" => Some(Self::Aes128),
            "AES-192-CBC" => Some(Self::Aes192),
            "AES-256-CBC" => Some(Self::Aes256),
            _ => None,
        }
    }

    fn key_len(self) -> usize {
        match self {
            Self::Des => 8,
            Self::TdesEde3 | Self::Aes192 => 24,
            Self::Aes128 => 16,
            Self::Aes256 => 32,
        }
    }

    fn block_size(self) -> usize {
        match self {
            Self::Des | Self::TdesEde3 => 8,
            Self::Aes128 | Self::Aes192 | Self::Aes256 => 16,
        }
    }

    fn decrypt(self, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        let bad_key = |_| CryptoError::InvalidKeyLength(key.len());
        match self {
            Self::Des => decrypt_blocks(&des::Des::new_from_slice(key).map_err(bad_key)?, iv, buf),
            Self::TdesEde3 => {
                decrypt_blocks(&des::TdesEde3::new_from_slice(key).map_err(bad_key)?, iv, buf)
            }
            Self::Aes128 | Self::Aes192 | Self::Aes256 => AesKey::new(key)?.cbc_decrypt(iv, buf),
        }
    }
}

fn decrypt_block(block: &pem::Pem, password: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeyLoadCause> {
    let dek_info = block
        .headers()
        .get("DEK-Info")
        .ok_or_else(|| KeyLoadCause::MalformedDekInfo(String::new()))?;
    let (name, iv_hex) = dek_info
        .split_once(',')
        .ok_or_else(|| KeyLoadCause::MalformedDekInfo(dek_info.to_owned()))?;

    let cipher = PemCipher::from_name(name.trim())
        .ok_or_else(|| KeyLoadCause::UnsupportedPemCipher(name.trim().to_owned()))?;
    let iv = hex::decode(iv_hex.trim())
        .ok()
        .filter(|iv| iv.len() == cipher.block_size())
        .ok_or_else(|| KeyLoadCause::MalformedDekInfo(dek_info.to_owned()))?;

    let block_size = cipher.block_size();
    let mut buf = Zeroizing::new(block.contents().to_vec());
    if buf.is_empty() || buf.len() % block_size != 0 {
        return Err(CryptoError::Padding(PaddingError::InvalidLength {
            len: buf.len(),
            block_size,
        })
        .into());
    }

    let key = evp_bytes_to_key(password, &iv[..8], cipher.key_len());
    cipher.decrypt(&key, &iv, &mut buf)?;

    // A wrong password almost always leaves garbage where the padding should be
    let len = padding::unpadded_len(block_size, &buf)
        .ok()
        .filter(|len| buf.len() - len <= block_size)
        .ok_or(KeyLoadCause::IncorrectPassword)?;
    buf.truncate(len);
    Ok(buf)
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration
fn evp_bytes_to_key(password: &[u8], salt: &[u8], key_len: usize) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(Vec::with_capacity(key_len + 16));
    let mut prev = Zeroizing::new(Vec::new());
    while key.len() < key_len {
        let mut hasher = Md5::new();
        hasher.update(&*prev);
        hasher.update(password);
        hasher.update(salt);
        let digest = hasher.finalize();

        prev.clear();
        prev.extend_from_slice(&digest);
        key.extend_from_slice(&digest);
    }
    key.truncate(key_len);
    key
}
