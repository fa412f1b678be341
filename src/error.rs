// src/error.rs
//! Public error types for the entire crate
//!
//! One enum per layer: padding, cipher/envelope, key loading, password map and
//! config. `CoreError` wraps them all for callers that don't care which layer failed.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// PKCS7 failures; validation errors are listed in the order they are checked
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingError {
    #[error("invalid block size {0} (expected 1..=255)")]
    InvalidBlockSize(usize),

    #[error("invalid padded length {len} for block size {block_size}")]
    InvalidLength { len: usize, block_size: usize },

    #[error("invalid padding value")]
    InvalidPaddingValue,

    #[error("invalid padding bytes")]
    InvalidPaddingBytes,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid AES key length {0} (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("invalid IV length {0} (expected 16)")]
    InvalidIvLength(usize),

    #[error("input too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("padding check failed: {0}")]
    Padding(#[from] PaddingError),

    #[error("unknown key version {0}")]
    UnknownKeyVersion(u32),

    #[error("current key version {0} is not in the registry")]
    UnknownCurrentVersion(u32),
}

impl CryptoError {
    /// Message that is safe to hand to an untrusted peer.
    ///
    /// Every decrypt-path failure collapses to the same string so a remote
    /// caller can't tell a bad length from a bad pad byte.
    pub fn public_message(&self) -> &'static str {
        match self {
            CryptoError::TooShort { .. }
            | CryptoError::Padding(_)
            | CryptoError::UnknownKeyVersion(_) => "decryption failed",
            CryptoError::InvalidKeyLength(_)
            | CryptoError::InvalidIvLength(_)
            | CryptoError::UnknownCurrentVersion(_) => "cipher misconfigured",
        }
    }
}

/// Step of the per-version key unwrap pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    ReadPrivateKey,
    DecodePem,
    DecryptPem,
    ParsePrivateKey,
    ReadWrappedKey,
    UnwrapKey,
    BuildCipher,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadStage::ReadPrivateKey => "reading private key",
            LoadStage::DecodePem => "decoding PEM",
            LoadStage::DecryptPem => "decrypting PEM",
            LoadStage::ParsePrivateKey => "parsing RSA private key",
            LoadStage::ReadWrappedKey => "reading wrapped AES key",
            LoadStage::UnwrapKey => "unwrapping AES key",
            LoadStage::BuildCipher => "building cipher",
        })
    }
}

/// Underlying reason a key load stage failed
#[derive(Error, Debug)]
pub enum KeyLoadCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pem(#[from] pem::PemError),

    #[error("unexpected PEM block `{0}`")]
    UnexpectedPemTag(String),

    #[error("unsupported PEM encryption `{0}`")]
    UnsupportedPemCipher(String),

    #[error("malformed DEK-Info header `{0}`")]
    MalformedDekInfo(String),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("PKCS#1: {0}")]
    Pkcs1(rsa::pkcs1::Error),

    #[error("PKCS#8: {0}")]
    Pkcs8(rsa::pkcs8::Error),

    #[error("RSA: {0}")]
    Rsa(rsa::Error),

    #[error(transparent)]
    Cipher(#[from] CryptoError),
}

#[derive(Error, Debug)]
#[error("key version {version}: {stage} failed: {cause}")]
pub struct KeyLoadError {
    pub version: u32,
    pub stage: LoadStage,
    #[source]
    pub cause: KeyLoadCause,
}

impl KeyLoadError {
    pub fn new(version: u32, stage: LoadStage, cause: impl Into<KeyLoadCause>) -> Self {
        Self {
            version,
            stage,
            cause: cause.into(),
        }
    }

    /// `map_err` adapter tagging a failure with its version and stage
    pub(crate) fn at<E: Into<KeyLoadCause>>(
        version: u32,
        stage: LoadStage,
    ) -> impl FnOnce(E) -> Self {
        move |err| Self::new(version, stage, err)
    }
}

#[derive(Error, Debug)]
pub enum PasswordMapError {
    #[error("cannot read password file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in password file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in password file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value `{value}` for {var}")]
    InvalidOverride { var: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto operation failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Key loading failed: {0}")]
    KeyLoad(#[from] KeyLoadError),

    #[error("Password map error: {0}")]
    PasswordMap(#[from] PasswordMapError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
