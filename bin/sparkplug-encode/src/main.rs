//! Encodes a Sparkplug B payload described in a configuration file.
//!
//! The encoded bytes are written to the configured output file, or to standard output.

#![deny(warnings)]
#![deny(missing_docs)]

use std::io::Write as _;

use anyhow::Context as _;
use sparkplug_config::GenericError;
use sparkplug_payload::PayloadEncoder;
use tracing::{debug, error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

mod config;
use self::config::Config;

fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GenericError> {
    // We only accept a single command line argument: the path to the configuration file.
    let config_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            error!("Path to the configuration file must be passed as the first (and only) argument to `sparkplug-encode`.");
            std::process::exit(1);
        }
    };

    let config = Config::try_from_file(&config_path)?;
    let topic = config.topic()?;
    let payload = config.build_payload()?;
    debug!(%topic, metrics_len = payload.metrics().len(), "Built payload.");

    let encoded = PayloadEncoder::new().encode(&payload);

    match &config.output {
        Some(path) => std::fs::write(path, &encoded)
            .with_context(|| format!("Failed to write encoded payload to '{}'.", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&encoded)
                .and_then(|()| stdout.flush())
                .context("Failed to write encoded payload to standard output.")?;
        }
    }

    info!(%topic, encoded_len = encoded.len(), seq = payload.seq(), "Encoded payload.");

    Ok(())
}
