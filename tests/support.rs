// tests/support.rs
//! Fixture paths and helpers
//!
//! `tests/data/keys` was generated with OpenSSL:
//! - version 1: AES-128 data key, private key encrypted with AES-128-CBC
//! - version 2: AES-256 data key, private key encrypted with DES-EDE3-CBC
//! - version 3: AES-192 data key, private key unencrypted
//!
//! `tests/data/pem` holds the version 3 private key re-encoded other ways:
//! AES-192-CBC, AES-256-CBC and DES-CBC encrypted PKCS#1, plus plain PKCS#8.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;

pub const V1_KEY_HEX: &str = "46801a2be6013e4fd1aae442ca58b880";
pub const V2_KEY_HEX: &str = "a278d7c722f2273c24bb483035cc5d0ee380d3ef8cf9fc4e22281e63939b6404";
pub const V3_KEY_HEX: &str = "b757443cb38df667e00625e192e878e8bcac9d5edf4e4b23";

pub const V1_PASSWORD: &str = "pw-version-1";
pub const V2_PASSWORD: &str = "pw-version-2";

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn key_dir() -> PathBuf {
    data_dir().join("keys")
}

pub fn key_file(name: &str) -> PathBuf {
    key_dir().join(name)
}

pub fn bad_key_dir() -> PathBuf {
    data_dir().join("bad-keys")
}

/// Re-encoded copies of the version 3 private key
pub fn pem_variant(name: &str) -> PathBuf {
    data_dir().join("pem").join(name)
}

pub fn key_bytes(hex_key: &str) -> Vec<u8> {
    hex::decode(hex_key).expect("fixture hex")
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

pub fn random_key(len: usize) -> Vec<u8> {
    random_bytes(len)
}

/// Copy one version directory from the fixture tree into `dest/<version>`
pub fn copy_version(version: u32, dest: &Path) -> PathBuf {
    let src = key_dir().join(version.to_string());
    let dst = dest.join(version.to_string());
    fs::create_dir_all(&dst).expect("create version dir");
    for entry in fs::read_dir(&src).expect("read fixture dir") {
        let entry = entry.expect("fixture entry");
        fs::copy(entry.path(), dst.join(entry.file_name())).expect("copy fixture");
    }
    dst
}
