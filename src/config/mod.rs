// src/config/mod.rs
//! Configuration for key locations and the current key version
//!
//! TOML file + env override, with built-in defaults when no file exists.
//! Nothing here is global: callers pass the loaded [`Config`] where it's needed.

pub use app::{load, Config, Files, Keys, Paths};
pub use defaults::{DEFAULT_KEY_DIR, DEFAULT_PASSWORD_FILE};

mod app;
mod defaults;
