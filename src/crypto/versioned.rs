// src/crypto/versioned.rs
//! Key-version dispatch: `version (u32 BE) || iv || ciphertext`
//!
//! A [`KeyVersionRegistry`] is built once and never mutated. Rotation swaps the
//! whole registry through [`SharedRegistry`]; the version used for new
//! encryptions is a plain field on each [`VersionedEnvelopeCodec`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::consts::VERSION_TAG_LEN;
use crate::error::{CoreError, CryptoError};
use crate::keys::{KeyMaterialLoader, PasswordMap};

use super::envelope::BlockCipherEnvelope;
use super::sealed::Sealed;
use super::{Decrypter, Encrypter};

/// Immutable version → envelope table
#[derive(Clone, Debug, Default)]
pub struct KeyVersionRegistry {
    entries: HashMap<u32, BlockCipherEnvelope>,
}

impl KeyVersionRegistry {
    pub fn new(entries: impl IntoIterator<Item = (u32, BlockCipherEnvelope)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Build envelopes straight from raw key bytes; any bad key fails the whole build.
    pub fn from_keys<I, K>(keys: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = (u32, K)>,
        K: AsRef<[u8]>,
    {
        keys.into_iter()
            .map(|(version, key)| Ok((version, BlockCipherEnvelope::new(key.as_ref())?)))
            .collect::<Result<HashMap<_, _>, CryptoError>>()
            .map(|entries| Self { entries })
    }

    pub fn get(&self, version: u32) -> Result<&BlockCipherEnvelope, CryptoError> {
        self.entries
            .get(&version)
            .ok_or(CryptoError::UnknownKeyVersion(version))
    }

    pub fn contains(&self, version: u32) -> bool {
        self.entries.contains_key(&version)
    }

    /// Registered versions, ascending
    pub fn versions(&self) -> Vec<u32> {
        let mut versions: Vec<u32> = self.entries.keys().copied().collect();
        versions.sort_unstable();
        versions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u32, BlockCipherEnvelope)> for KeyVersionRegistry {
    fn from_iter<T: IntoIterator<Item = (u32, BlockCipherEnvelope)>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Encrypts under `current_version`, decrypts whatever version the input names
#[derive(Clone, Debug)]
pub struct VersionedEnvelopeCodec {
    registry: Arc<KeyVersionRegistry>,
    current_version: u32,
}

impl VersionedEnvelopeCodec {
    pub fn new(registry: Arc<KeyVersionRegistry>, current_version: u32) -> Self {
        Self {
            registry,
            current_version,
        }
    }

    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    /// Same registry, different version for new encryptions
    pub fn with_current_version(&self, current_version: u32) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            current_version,
        }
    }

    pub fn registry(&self) -> &Arc<KeyVersionRegistry> {
        &self.registry
    }

    /// Fail early if the configured current version has no key
    pub fn check(&self) -> Result<(), CryptoError> {
        if self.registry.contains(self.current_version) {
            Ok(())
        } else {
            Err(CryptoError::UnknownCurrentVersion(self.current_version))
        }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let envelope = self
            .registry
            .get(self.current_version)
            .map_err(|_| CryptoError::UnknownCurrentVersion(self.current_version))?;

        let body = envelope.encrypt(plaintext);
        let mut out = Vec::with_capacity(VERSION_TAG_LEN + body.len());
        out.extend_from_slice(&self.current_version.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (version, body) = split_version(src)?;
        self.registry.get(version)?.decrypt(body)
    }
}

/// Read the version tag off the front of a versioned envelope
pub fn split_version(src: &[u8]) -> Result<(u32, &[u8]), CryptoError> {
    match src.split_first_chunk::<VERSION_TAG_LEN>() {
        Some((tag, rest)) => Ok((u32::from_be_bytes(*tag), rest)),
        None => Err(CryptoError::TooShort {
            len: src.len(),
            min: VERSION_TAG_LEN,
        }),
    }
}

impl Sealed for VersionedEnvelopeCodec {}

impl Encrypter for VersionedEnvelopeCodec {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        VersionedEnvelopeCodec::encrypt(self, plaintext)
    }
}

impl Decrypter for VersionedEnvelopeCodec {
    fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>, CryptoError> {
        VersionedEnvelopeCodec::decrypt(self, src)
    }
}

/// The live registry, swappable as a whole.
///
/// Readers take an `Arc` snapshot and work lock-free from there, so a decrypt
/// in flight keeps the registry it started with even if a reload lands.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<KeyVersionRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: KeyVersionRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<KeyVersionRegistry> {
        Arc::clone(&self.current.read())
    }

    /// Install `registry`, returning the one it replaced
    pub fn replace(&self, registry: KeyVersionRegistry) -> Arc<KeyVersionRegistry> {
        let versions = registry.versions();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(registry));
        info!(?versions, "key registry replaced");
        previous
    }

    /// Codec over the registry as it is right now
    pub fn codec(&self, current_version: u32) -> VersionedEnvelopeCodec {
        VersionedEnvelopeCodec::new(self.snapshot(), current_version)
    }

    /// Build a complete new registry and swap it in. On failure the old
    /// registry stays in service.
    pub fn reload(
        &self,
        loader: &KeyMaterialLoader,
        passwords: PasswordMap,
    ) -> Result<Arc<KeyVersionRegistry>, CoreError> {
        match loader.build_registry(passwords) {
            Ok(registry) => Ok(self.replace(registry)),
            Err(err) => {
                warn!(error = %err, "key reload failed, keeping current registry");
                Err(err.into())
            }
        }
    }
}
