//! Batch request builder.
//!
//! Collects, for every configured language, the strings whose resource entry
//! is still an identity placeholder, and writes them into one JSON document an
//! external translator (a person or an AI assistant) can fill in.

use crate::config::Config;
use crate::extract::extract_from_file;
use crate::pending::{missing_strings, pending_strings};
use crate::strings_file::StringsFile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{info, warn};

pub const BATCH_INSTRUCTIONS: &str = "Translate all English strings to the target languages. \
Preserve format strings like %@, %d, %.1f exactly as they appear. \
Return translations in the same structure.";

/// Strings still waiting for translation in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBatch {
    /// English name of the target language
    pub language: String,
    pub strings: Vec<String>,
}

/// The aggregated request document, keyed by language code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub instructions: String,
    pub translations: BTreeMap<String, LanguageBatch>,
}

impl BatchRequest {
    /// Total number of strings across all languages
    pub fn total_strings(&self) -> usize {
        self.translations
            .values()
            .map(|batch| batch.strings.len())
            .sum()
    }
}

/// Result of a batch preparation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing pending in any language; no document was written
    Complete,
    Written {
        path: PathBuf,
        languages: usize,
        strings: usize,
    },
}

/// Build the request for `source`, or `None` when no language has pending work
pub fn build_request(config: &Config, source: &BTreeSet<String>) -> Result<Option<BatchRequest>> {
    let total = config.languages.len();
    let mut translations = BTreeMap::new();

    for (index, &language) in config.languages.iter().enumerate() {
        let progress = index + 1;
        let path = config.resource_path(language);
        let file = StringsFile::load(&path)?;

        let missing = missing_strings(source, file.entries());
        if !missing.is_empty() {
            warn!(
                "[{}/{}] {}: {} source strings have no entry in {}",
                progress,
                total,
                language.code(),
                missing.len(),
                path.display()
            );
        }

        let pending = pending_strings(source, file.entries());
        if pending.is_empty() {
            info!("[{}/{}] {}: ✓ Already complete", progress, total, language.code());
            continue;
        }

        info!(
            "[{}/{}] {}: {} strings need translation",
            progress,
            total,
            language.code(),
            pending.len()
        );
        translations.insert(
            language.code().to_string(),
            LanguageBatch {
                language: language.name().to_string(),
                strings: pending,
            },
        );
    }

    if translations.is_empty() {
        return Ok(None);
    }

    Ok(Some(BatchRequest {
        instructions: BATCH_INSTRUCTIONS.to_string(),
        translations,
    }))
}

/// Extract the source strings, build the request and write it to disk
pub fn prepare(config: &Config) -> Result<BatchOutcome> {
    let source = extract_from_file(&config.source_path())?;

    let Some(request) = build_request(config, &source)? else {
        info!("✓ All translations complete!");
        return Ok(BatchOutcome::Complete);
    };

    let path = config.batch_output_path();
    let json = serde_json::to_string_pretty(&request)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write batch request to {}", path.display()))?;

    let languages = request.translations.len();
    let strings = request.total_strings();
    info!("✓ Created {} with {} languages", path.display(), languages);
    info!("Total strings to translate: {}", strings);

    Ok(BatchOutcome::Written {
        path,
        languages,
        strings,
    })
}
