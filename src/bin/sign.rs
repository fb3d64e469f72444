//! Webhook signer for fixtures and local receiver testing.
//!
//! Signs a body with the provider's two-pass scheme and prints the
//! signature header value. Pair it with `--print-public-key` to configure a
//! receiver that trusts the throwaway key.
//!
//! Usage:
//!   cargo run --bin bridge-webhook-sign -- --private-key key.pem --body payload.json

use bridge_webhook::webhook::{SystemClock, WebhookSigner};
use clap::Parser;
use std::path::PathBuf;

/// Sign a webhook body the way the provider does.
#[derive(Parser, Debug)]
#[command(name = "bridge-webhook-sign")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PEM private key (PKCS#8 or PKCS#1).
    #[arg(long, short = 'k')]
    private_key: PathBuf,

    /// File holding the exact body to sign.
    #[arg(long, short)]
    body: PathBuf,

    /// Signing time in Unix milliseconds (defaults to now).
    #[arg(long, short)]
    timestamp_ms: Option<u64>,

    /// Also print the matching public key to stderr.
    #[arg(long)]
    print_public_key: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let signer = WebhookSigner::from_file(&args.private_key)?;
    let raw_body = std::fs::read(&args.body)?;

    let header = match args.timestamp_ms {
        Some(timestamp_ms) => signer.sign(&raw_body, timestamp_ms)?,
        None => signer.sign_now(&raw_body, &SystemClock)?,
    };

    if args.print_public_key {
        eprint!("{}", signer.public_key_pem()?);
    }
    println!("{header}");
    Ok(())
}
