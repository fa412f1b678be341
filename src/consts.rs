// src/consts.rs
//! Shared constants: wire format and key storage defaults

/// AES block size in bytes; also the IV length
pub const BLOCK_SIZE: usize = 16;

/// Length of the big-endian key version tag that prefixes a versioned envelope
pub const VERSION_TAG_LEN: usize = 4;

/// Version used for new encryptions when nothing else is configured
pub const DEFAULT_KEY_VERSION: u32 = 0;

/// Password-protected RSA private key inside each version directory
pub const DEFAULT_PRIVKEY_FILENAME: &str = "privkey.pem";

/// RSA-wrapped AES key inside each version directory
pub const DEFAULT_AESKEY_FILENAME: &str = "key.bin";

/// Accepted AES key lengths (AES-128, AES-192, AES-256)
pub const AES_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Env var naming the TOML config file
pub const CONFIG_ENV: &str = "AESCBC_CONFIG";

/// Env var overriding `keys.current_version`
pub const KEY_VERSION_ENV: &str = "AESCBC_KEY_VERSION";

/// Config file used when `AESCBC_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "aescbc.toml";
