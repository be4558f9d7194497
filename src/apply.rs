//! Translation applier.
//!
//! Merges translation result documents back into the per-language
//! `Localizable.strings` files. Only entry lines whose key appears in the
//! document are rewritten; everything else in the file stays as it was.

use crate::config::Config;
use crate::i18n::{Language, TranslationValidator};
use crate::strings_file::StringsFile;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{error, info, warn};

/// `translate_<code>.json`: original string -> translated string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationDocument {
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

/// One document for every language: code -> (original -> translated).
///
/// Each language is kept as raw JSON so a malformed entry only fails its own language.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinedDocument {
    #[serde(default)]
    pub translations: BTreeMap<String, serde_json::Value>,
}

/// What happened to one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No result document for this language
    NoDocument,
    /// The document holds no translations
    Empty,
    /// The document could not be read or parsed, or the merge failed
    Failed(String),
    /// There is no resource file to merge into
    NoResourceFile,
    Applied {
        /// Lines rewritten in the resource file
        updated: usize,
        /// Translations whose format specifiers do not match the original
        flagged: usize,
    },
}

impl ApplyOutcome {
    /// Lines rewritten, zero for anything but `Applied`
    pub fn updated(&self) -> usize {
        match self {
            ApplyOutcome::Applied { updated, .. } => *updated,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageResult {
    pub language: Language,
    pub outcome: ApplyOutcome,
}

/// Read a JSON document, `Ok(None)` when the file does not exist
fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(document))
}

/// Merge `translations` into the resource file of `language`
pub fn apply_to_language(
    config: &Config,
    language: Language,
    translations: &HashMap<String, String>,
) -> Result<ApplyOutcome> {
    if translations.is_empty() {
        return Ok(ApplyOutcome::Empty);
    }

    let path = config.resource_path(language);
    if !path.exists() {
        return Ok(ApplyOutcome::NoResourceFile);
    }

    let mut file = StringsFile::load(&path)?;
    if file.is_undecodable() {
        return Ok(ApplyOutcome::Failed(format!(
            "{} is not valid UTF-8, leaving it untouched",
            path.display()
        )));
    }

    let mut flagged = 0;
    for (original, translated) in translations {
        if file.get(original).is_none() {
            continue;
        }
        let report = TranslationValidator::validate(original, translated);
        if report.has_errors() {
            flagged += 1;
            warn!(
                "{}: {:?} -> {:?}: {:?}",
                language.code(),
                original,
                translated,
                report.errors
            );
        } else if report.has_warnings() {
            warn!(
                "{}: {:?} -> {:?}: {:?}",
                language.code(),
                original,
                translated,
                report.warnings
            );
        }
    }

    let updated = file.apply(translations);
    file.save(&path)?;

    Ok(ApplyOutcome::Applied { updated, flagged })
}

fn log_outcome(progress: usize, total: usize, language: Language, outcome: &ApplyOutcome) {
    let code = language.code();
    match outcome {
        ApplyOutcome::NoDocument => info!("[{}/{}] {}: ⏭️  No JSON file found", progress, total, code),
        ApplyOutcome::Empty => warn!("[{}/{}] {}: ⚠️  No translations in JSON", progress, total, code),
        ApplyOutcome::Failed(e) => error!("[{}/{}] {}: ❌ {}", progress, total, code, e),
        ApplyOutcome::NoResourceFile => warn!(
            "[{}/{}] {}: ⚠️  No resource file to apply translations to",
            progress, total, code
        ),
        ApplyOutcome::Applied { updated, flagged } => {
            info!("[{}/{}] {}: ✓ Applied {} translations", progress, total, code, updated);
            if *flagged > 0 {
                warn!(
                    "[{}/{}] {}: {} translations have mismatched format specifiers",
                    progress, total, code, flagged
                );
            }
        }
    }
}

/// Apply every `translate_<code>.json` found in the project root.
///
/// A broken document or an unwritable resource file only skips its own language.
pub fn run(config: &Config) -> Result<Vec<LanguageResult>> {
    info!("Applying translations from JSON files...");
    let total = config.languages.len();
    let mut results = Vec::with_capacity(total);

    for (index, &language) in config.languages.iter().enumerate() {
        let path = config.translation_document_path(language);
        let outcome = match read_document::<TranslationDocument>(&path) {
            Ok(None) => ApplyOutcome::NoDocument,
            Ok(Some(document)) => apply_to_language(config, language, &document.translations)
                .unwrap_or_else(|e| ApplyOutcome::Failed(format!("{:#}", e))),
            Err(e) => ApplyOutcome::Failed(format!("{:#}", e)),
        };

        log_outcome(index + 1, total, language, &outcome);
        results.push(LanguageResult { language, outcome });
    }

    info!("✓ All translations applied!");
    Ok(results)
}

/// Apply one combined document holding every language.
///
/// Languages in the document that are not configured targets are skipped.
pub fn run_combined(config: &Config, document_path: &Path) -> Result<Vec<LanguageResult>> {
    info!("Applying translations from {}...", document_path.display());
    let document: CombinedDocument = read_document(document_path)?
        .with_context(|| format!("{} does not exist", document_path.display()))?;

    for code in document.translations.keys() {
        let configured = Language::from_code(code)
            .map(|language| config.languages.contains(&language))
            .unwrap_or(false);
        if !configured {
            warn!("Skipping translations for unsupported language '{}'", code);
        }
    }

    let total = config.languages.len();
    let mut results = Vec::with_capacity(total);

    for (index, &language) in config.languages.iter().enumerate() {
        let outcome = match document.translations.get(language.code()) {
            None => ApplyOutcome::NoDocument,
            Some(value) => match HashMap::<String, String>::deserialize(value) {
                Ok(translations) => apply_to_language(config, language, &translations)
                    .unwrap_or_else(|e| ApplyOutcome::Failed(format!("{:#}", e))),
                Err(e) => ApplyOutcome::Failed(format!(
                    "Translations for '{}' in {} are not a string map: {}",
                    language.code(),
                    document_path.display(),
                    e
                )),
            },
        };

        log_outcome(index + 1, total, language, &outcome);
        results.push(LanguageResult { language, outcome });
    }

    info!("✓ All translations applied!");
    Ok(results)
}
