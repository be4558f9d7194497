//! Write every pending string, per language, into one JSON request document
//! for an external translator.
//!
//! Usage:
//!   cargo run --bin prepare-batch
//!
//! Optional environment variables:
//! - LOCALIZATION_ROOT (defaults to the current directory)
//! - BATCH_OUTPUT_FILE (defaults to all_translations.json)
//! - TARGET_LANGUAGES (defaults to every target language)

use anyhow::Result;
use strings_sync::{batch, config::Config};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strings_sync=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    batch::prepare(&config)?;

    Ok(())
}
