// src/keys/loader.rs
//! Per-version key unwrap: password → RSA private key → AES key → envelope
//!
//! Layout under the key directory:
//!
//! ```text
//! <key_dir>/<version>/privkey.pem   RSA private key, usually password protected
//! <key_dir>/<version>/key.bin       AES key, RSA-PKCS#1 v1.5 encrypted
//! ```
//!
//! Any failure aborts the whole build; a registry missing a version is never returned.

use std::path::{Path, PathBuf};

use rsa::rand_core::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
use tracing::{debug, info};

use crate::aliases::{AesKeyBytes, KeyPassword};
use crate::config::Config;
use crate::consts::{DEFAULT_AESKEY_FILENAME, DEFAULT_PRIVKEY_FILENAME};
use crate::crypto::{BlockCipherEnvelope, KeyVersionRegistry};
use crate::error::{KeyLoadCause, KeyLoadError, LoadStage};
use crate::util::key_fingerprint;

use super::passwords::PasswordMap;
use super::private_key::read_private_key;

#[derive(Debug, Clone)]
pub struct KeyMaterialLoader {
    key_dir: PathBuf,
    private_key_file: String,
    wrapped_key_file: String,
}

impl KeyMaterialLoader {
    pub fn new(key_dir: impl Into<PathBuf>) -> Self {
        Self {
            key_dir: key_dir.into(),
            private_key_file: DEFAULT_PRIVKEY_FILENAME.to_owned(),
            wrapped_key_file: DEFAULT_AESKEY_FILENAME.to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.paths.key_dir)
            .with_file_names(&config.files.private_key, &config.files.wrapped_key)
    }

    pub fn with_file_names(
        mut self,
        private_key_file: impl Into<String>,
        wrapped_key_file: impl Into<String>,
    ) -> Self {
        self.private_key_file = private_key_file.into();
        self.wrapped_key_file = wrapped_key_file.into();
        self
    }

    pub fn key_dir(&self) -> &Path {
        &self.key_dir
    }

    /// `<key_dir>/<version>`
    pub fn version_dir(&self, version: u32) -> PathBuf {
        self.key_dir.join(version.to_string())
    }

    /// Recover the raw AES key for one version
    pub fn load_key(&self, version: u32, password: &KeyPassword) -> Result<AesKeyBytes, KeyLoadError> {
        let dir = self.version_dir(version);
        debug!(version, dir = %dir.display(), "loading key material");

        read_private_key(version, &dir.join(&self.private_key_file), password)
            .and_then(|private_key| {
                unwrap_aes_key(version, &dir.join(&self.wrapped_key_file), &private_key)
            })
    }

    /// Recover the AES key for one version and build its envelope
    pub fn load_envelope(
        &self,
        version: u32,
        password: &KeyPassword,
    ) -> Result<BlockCipherEnvelope, KeyLoadError> {
        let key = self.load_key(version, password)?;
        let envelope = BlockCipherEnvelope::from_secret(&key)
            .map_err(KeyLoadError::at(version, LoadStage::BuildCipher))?;

        info!(
            version,
            bits = envelope.key_bits(),
            fingerprint = %key_fingerprint(key.expose_secret()),
            "key version loaded"
        );
        Ok(envelope)
    }

    /// Load every version in `passwords`, ascending. The map is consumed so
    /// passwords don't outlive the load.
    pub fn build_registry(&self, passwords: PasswordMap) -> Result<KeyVersionRegistry, KeyLoadError> {
        let registry = passwords
            .into_iter()
            .map(|(version, password)| Ok((version, self.load_envelope(version, &password)?)))
            .collect::<Result<KeyVersionRegistry, KeyLoadError>>()?;

        info!(
            versions = ?registry.versions(),
            key_dir = %self.key_dir.display(),
            "key registry built"
        );
        Ok(registry)
    }
}

fn unwrap_aes_key(
    version: u32,
    path: &Path,
    private_key: &RsaPrivateKey,
) -> Result<AesKeyBytes, KeyLoadError> {
    let wrapped = std::fs::read(path).map_err(KeyLoadError::at(version, LoadStage::ReadWrappedKey))?;

    // rsa 0.9 wants a rand_core 0.6 RNG, hence its re-exported OsRng
    private_key
        .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, &wrapped)
        .map(AesKeyBytes::new)
        .map_err(|err| KeyLoadError::new(version, LoadStage::UnwrapKey, KeyLoadCause::Rsa(err)))
}
