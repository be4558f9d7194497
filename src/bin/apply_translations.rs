//! Merge translated strings back into the `Localizable.strings` files.
//!
//! Usage:
//!   cargo run --bin apply-translations                      # translate_<code>.json per language
//!   cargo run --bin apply-translations -- translated.json   # one combined result document
//!
//! A combined result document maps each language code to its translations:
//! `{"translations": {"es": {"Hello": "Hola"}, "fr": {"Hello": "Bonjour"}}}`

use anyhow::Result;
use std::path::PathBuf;
use strings_sync::{apply, config::Config};
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strings_sync=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let results = match std::env::args().nth(1) {
        Some(document) => apply::run_combined(&config, &PathBuf::from(document))?,
        None => apply::run(&config)?,
    };

    let updated: usize = results.iter().map(|r| r.outcome.updated()).sum();
    info!("✓ Applied {} translations", updated);

    Ok(())
}
