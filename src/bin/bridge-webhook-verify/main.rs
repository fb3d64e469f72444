//! bridge-webhook-verify entry point.
//!
//! Exit status: 0 valid, 1 rejected (forged, tampered or replayed),
//! 2 rejected because the key, the signature encoding or the configuration
//! is broken.

mod cli;

use bridge_webhook::{Error, Verifier, WebhookEvent};
use clap::Parser;
use cli::Cli;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> color_eyre::Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to stderr, the verdict to stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(BROKEN_SETUP));
        }
    };
    let verifier = match Verifier::from_config(&config.webhook) {
        Ok(verifier) => verifier,
        Err(e) => return Ok(setup_failure(&e)),
    };
    let raw_body = match read_body(&cli.body) {
        Ok(raw_body) => raw_body,
        Err(e) => return Ok(setup_failure(&Error::Io(e))),
    };

    info!(
        "Verifying {} byte delivery against {}-bit key",
        raw_body.len(),
        verifier.public_key().bits()
    );

    match verifier.verify(&raw_body, &cli.signature) {
        Ok(delivery) => {
            println!(
                "valid: signed at t={} ({} ms ago)",
                delivery.timestamp_ms, delivery.age_ms
            );
            match WebhookEvent::from_slice(&raw_body) {
                Ok(event) => println!(
                    "event: {} {} object={} status={}",
                    event.event_id,
                    event.event_type,
                    event.event_object_id,
                    event.event_object_status.as_deref().unwrap_or("-")
                ),
                Err(e) => debug!("Body is not an event envelope: {e}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(rejection) => {
            println!("invalid: {rejection}");
            if rejection.is_configuration_error() {
                Ok(ExitCode::from(BROKEN_SETUP))
            } else {
                Ok(ExitCode::from(REJECTED))
            }
        }
    }
}

const REJECTED: u8 = 1;
const BROKEN_SETUP: u8 = 2;

/// Report a problem with the key, configuration or input files.
fn setup_failure(err: &Error) -> ExitCode {
    match err.rejection() {
        Some(rejection) => println!("invalid: {rejection}"),
        None => eprintln!("error: {err}"),
    }
    ExitCode::from(BROKEN_SETUP)
}

fn read_body(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}
