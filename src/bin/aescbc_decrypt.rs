//! aescbc-decrypt: decrypt stdin to stdout
//!
//! ```text
//! aescbc-decrypt <keyfile>               raw AES key file; input is `iv || ciphertext`
//! aescbc-decrypt --versioned [config]    keys from config; input is a versioned envelope
//! ```

use std::io::{Read, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use versioned_aescbc::config::{self, Config};
use versioned_aescbc::consts::KEY_VERSION_ENV;
use versioned_aescbc::{open_from_config, AesKeyBytes, BlockCipherEnvelope, Decrypter};

const USAGE: &str = "usage: aescbc-decrypt <keyfile> | aescbc-decrypt --versioned [config.toml]";

fn main() -> ExitCode {
    // stdout carries plaintext, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let decrypter: Box<dyn Decrypter> = match args.as_slice() {
        [flag, rest @ ..] if flag == "--versioned" => {
            let config = match rest {
                [] => config::load()?,
                [path] => {
                    let mut config = Config::from_file(path)?;
                    config.override_current_version(std::env::var(KEY_VERSION_ENV).ok().as_deref())?;
                    config
                }
                _ => bail!(USAGE),
            };
            info!(current_version = config.keys.current_version, "loading versioned keys");
            Box::new(open_from_config(&config).context("failed to load key registry")?)
        }
        [keyfile] => {
            let key = AesKeyBytes::new(
                std::fs::read(keyfile).with_context(|| format!("failed to read key file {keyfile}"))?,
            );
            Box::new(BlockCipherEnvelope::from_secret(&key)?)
        }
        _ => bail!(USAGE),
    };

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;
    debug!(bytes = input.len(), "read ciphertext");

    let plaintext = decrypter.decrypt(&input)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&plaintext)?;
    stdout.flush()?;
    Ok(())
}
