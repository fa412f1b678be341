// src/config/defaults.rs
use crate::config::app::{Files, Keys, Paths};
use crate::consts::{DEFAULT_AESKEY_FILENAME, DEFAULT_KEY_VERSION, DEFAULT_PRIVKEY_FILENAME};

pub const DEFAULT_KEY_DIR: &str = "keys";
pub const DEFAULT_PASSWORD_FILE: &str = "keys/pwd.yaml";

pub fn default_keys() -> Keys {
    Keys {
        current_version: DEFAULT_KEY_VERSION,
    }
}

pub fn default_paths() -> Paths {
    Paths {
        key_dir: DEFAULT_KEY_DIR.into(),
        password_file: DEFAULT_PASSWORD_FILE.into(),
    }
}

pub fn default_files() -> Files {
    Files {
        private_key: DEFAULT_PRIVKEY_FILENAME.into(),
        wrapped_key: DEFAULT_AESKEY_FILENAME.into(),
    }
}
