// src/keys/mod.rs
//! Key material on disk → in-memory key registry
//!
//! Password file and key directory are read once; the result is an immutable
//! [`KeyVersionRegistry`] ready to share between threads.

mod loader;
mod passwords;
mod private_key;

use std::path::Path;
use std::sync::Arc;

pub use loader::KeyMaterialLoader;
pub use passwords::PasswordMap;
pub use private_key::read_private_key;

use crate::config::Config;
use crate::crypto::{KeyVersionRegistry, VersionedEnvelopeCodec};
use crate::error::CoreResult;

/// Load passwords and keys, then hand back a codec encrypting under `current_version`.
///
/// Fails if `current_version` is not among the loaded versions.
pub fn open_versioned(
    key_dir: impl AsRef<Path>,
    password_file: impl AsRef<Path>,
    current_version: u32,
) -> CoreResult<VersionedEnvelopeCodec> {
    let passwords = PasswordMap::load(password_file)?;
    let registry = KeyMaterialLoader::new(key_dir.as_ref()).build_registry(passwords)?;
    codec_for(registry, current_version)
}

/// [`open_versioned`] driven by a [`Config`]
pub fn open_from_config(config: &Config) -> CoreResult<VersionedEnvelopeCodec> {
    let passwords = PasswordMap::load(&config.paths.password_file)?;
    let registry = KeyMaterialLoader::from_config(config).build_registry(passwords)?;
    codec_for(registry, config.keys.current_version)
}

fn codec_for(registry: KeyVersionRegistry, current_version: u32) -> CoreResult<VersionedEnvelopeCodec> {
    let codec = VersionedEnvelopeCodec::new(Arc::new(registry), current_version);
    codec.check()?;
    Ok(codec)
}
