// src/aliases.rs
//! Secret-holding types built on secure-gate
//!
//! Anything that is key material or unlocks key material lives in one of these,
//! so it is zeroized on drop and only readable through `expose_secret()`.

pub use secure_gate::dynamic_alias;

// Raw AES key bytes recovered from a wrapped key file (16, 24 or 32 bytes)
dynamic_alias!(AesKeyBytes, Vec<u8>);

// Password protecting a per-version RSA private key
dynamic_alias!(KeyPassword, String);
