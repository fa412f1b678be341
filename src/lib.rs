// src/lib.rs
//! versioned-aescbc: AES-CBC envelopes that survive key rotation
//!
//! Features:
//! - PKCS7 padding with constant-time validation
//! - AES-128/192/256-CBC with a fresh random IV per message
//! - 4-byte key version tag for dispatch across rotated keys
//! - AES keys unwrapped from RSA-encrypted files, RSA keys unlocked by password

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod util;

// Re-export everything users need at the crate root
pub use aliases::{AesKeyBytes, KeyPassword};
pub use config::load as load_config;
pub use crypto::{
    BlockCipherEnvelope, CbcPkcs7, Decrypter, Encrypter, KeyVersionRegistry, SharedRegistry,
    VersionedEnvelopeCodec,
};
pub use error::{CoreError, CoreResult, CryptoError, KeyLoadError, LoadStage, PaddingError};
pub use keys::{open_from_config, open_versioned, KeyMaterialLoader, PasswordMap};
