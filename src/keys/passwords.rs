// src/keys/passwords.rs
//! Version → password map, read from JSON or YAML

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::path::Path;

use zeroize::Zeroizing;

use crate::aliases::KeyPassword;
use crate::error::PasswordMapError;

/// Passwords for each key version's private key.
///
/// Consumed by [`super::KeyMaterialLoader::build_registry`]; passwords are
/// zeroized when it is dropped.
#[derive(Default)]
pub struct PasswordMap {
    entries: BTreeMap<u32, KeyPassword>,
}

impl PasswordMap {
    /// `*.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PasswordMapError> {
        let path = path.as_ref();
        let data = Zeroizing::new(std::fs::read(path).map_err(|source| PasswordMapError::Io {
            path: path.to_path_buf(),
            source,
        })?);

        let raw: BTreeMap<u32, String> = if is_json(path) {
            serde_json::from_slice(&data).map_err(|source| PasswordMapError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_yaml::from_slice(&data).map_err(|source| PasswordMapError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };

        Ok(Self::from_entries(raw))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(version, password)| (version, KeyPassword::new(password.into())))
                .collect(),
        }
    }

    pub fn get(&self, version: u32) -> Option<&KeyPassword> {
        self.entries.get(&version)
    }

    /// Versions present, ascending
    pub fn versions(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PasswordMap {
    type Item = (u32, KeyPassword);
    type IntoIter = btree_map::IntoIter<u32, KeyPassword>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Debug for PasswordMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordMap")
            .field("versions", &self.versions())
            .finish()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
