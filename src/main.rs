//! Automated translator: fills every pending `Localizable.strings` entry
//! through the translation service.
//!
//! Usage:
//!   cargo run                                   # All target languages
//!   TARGET_LANGUAGES=es,fr cargo run            # A subset
//!
//! Optional environment variables:
//! - LOCALIZATION_ROOT (defaults to the current directory)
//! - TRANSLATE_API_URL (defaults to the MyMemory endpoint)
//! - REQUEST_DELAY_MS (defaults to 2000)
//! - CHECKPOINT_INTERVAL (defaults to 50)

use anyhow::Result;
use strings_sync::{auto_translate, config::Config, translation::Translator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strings_sync=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Translating {} languages via {}",
        config.languages.len(),
        config.translate_api_url
    );

    let translator = Translator::from_config(&config)?;
    let summary = auto_translate::run(&config, &translator).await?;

    for language in &summary.languages {
        if language.pending > language.translated {
            info!(
                "{} ({}): {} strings kept their English text",
                language.language.code(),
                language.language.native_name(),
                language.pending - language.translated
            );
        }
    }

    Ok(())
}
