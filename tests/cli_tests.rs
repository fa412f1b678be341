// tests/cli_tests.rs
#![cfg(feature = "cli")]

mod support;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use support::*;
use tempfile::tempdir;
use versioned_aescbc::{open_versioned, BlockCipherEnvelope};

const BIN: &str = env!("CARGO_BIN_EXE_aescbc-decrypt");

fn run(args: &[&str], stdin: &[u8], cwd: &Path) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .current_dir(cwd)
        .env_remove("AESCBC_CONFIG")
        .env_remove("AESCBC_KEY_VERSION")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn aescbc-decrypt");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

#[test]
fn decrypts_with_raw_key_file() {
    let dir = tempdir().unwrap();
    let key = random_key(32);
    let key_path = dir.path().join("data.key");
    fs::write(&key_path, &key).unwrap();

    let ciphertext = BlockCipherEnvelope::new(&key).unwrap().encrypt(b"hello from stdin");
    let out = run(&[key_path.to_str().unwrap()], &ciphertext, dir.path());

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, b"hello from stdin");
}

#[test]
fn decrypts_versioned_envelope_from_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("aescbc.toml");
    fs::write(
        &config_path,
        format!(
            "[keys]\ncurrent_version = 1\n\n[paths]\nkey_dir = {:?}\npassword_file = {:?}\n",
            key_dir().display().to_string(),
            key_file("pwd.yaml").display().to_string(),
        ),
    )
    .unwrap();

    let codec = open_versioned(key_dir(), key_file("pwd.yaml"), 2).unwrap();
    let envelope = codec.encrypt(b"rotated secret").unwrap();

    let out = run(
        &["--versioned", config_path.to_str().unwrap()],
        &envelope,
        dir.path(),
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, b"rotated secret");
}

#[test]
fn tampered_input_fails_with_nonzero_exit() {
    let dir = tempdir().unwrap();
    let key = random_key(16);
    let key_path = dir.path().join("data.key");
    fs::write(&key_path, &key).unwrap();

    let mut ciphertext = BlockCipherEnvelope::new(&key).unwrap().encrypt(b"payload");
    ciphertext.truncate(ciphertext.len() - 3);

    let out = run(&[key_path.to_str().unwrap()], &ciphertext, dir.path());
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn bad_arguments_print_usage() {
    let dir = tempdir().unwrap();
    let out = run(&[], b"", dir.path());

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("usage:"));
}

#[test]
fn invalid_key_file_is_reported() {
    let dir = tempdir().unwrap();
    let key_path = dir.path().join("short.key");
    fs::write(&key_path, [0u8; 10]).unwrap();

    let out = run(&[key_path.to_str().unwrap()], b"", dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid AES key length 10"));
}
