//! Automated translation run.
//!
//! Walks every configured language, sends each pending string to the
//! translation service one at a time, and writes the results back into the
//! resource file. Progress is checkpointed to disk periodically so an
//! interrupted run keeps the work it already finished.

use crate::config::Config;
use crate::extract::extract_from_file;
use crate::i18n::Language;
use crate::pending::{missing_strings, pending_strings};
use crate::retry::Sleeper;
use crate::strings_file::StringsFile;
use crate::translation::{should_skip, Translator};
use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Result for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSummary {
    pub language: Language,
    /// Strings that were still identity placeholders
    pub pending: usize,
    /// Pending strings that came back different from the source
    pub translated: usize,
    /// Source strings with no entry in the resource file
    pub missing: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub languages: Vec<LanguageSummary>,
}

impl RunSummary {
    pub fn total_pending(&self) -> usize {
        self.languages.iter().map(|l| l.pending).sum()
    }

    pub fn total_translated(&self) -> usize {
        self.languages.iter().map(|l| l.translated).sum()
    }
}

/// Extract the source strings and translate every configured language
pub async fn run<S: Sleeper>(config: &Config, translator: &Translator<S>) -> Result<RunSummary> {
    let source = extract_from_file(&config.source_path())?;
    let summary = translate_languages(config, translator, &source).await?;

    info!(
        "✓ Translation complete for all languages ({}/{} strings translated)",
        summary.total_translated(),
        summary.total_pending()
    );
    Ok(summary)
}

/// Translate the pending strings of every configured language, in order
pub async fn translate_languages<S: Sleeper>(
    config: &Config,
    translator: &Translator<S>,
    source: &BTreeSet<String>,
) -> Result<RunSummary> {
    let total = config.languages.len();
    let mut summary = RunSummary::default();

    for (index, &language) in config.languages.iter().enumerate() {
        let progress = format!("[{}/{}] {}", index + 1, total, language.code());
        summary
            .languages
            .push(translate_language(config, translator, source, language, &progress).await?);
    }

    Ok(summary)
}

async fn translate_language<S: Sleeper>(
    config: &Config,
    translator: &Translator<S>,
    source: &BTreeSet<String>,
    language: Language,
    progress: &str,
) -> Result<LanguageSummary> {
    let path = config.resource_path(language);
    let file = StringsFile::load(&path)?;

    let missing = missing_strings(source, file.entries()).len();
    if missing > 0 {
        warn!(
            "{}: {} source strings have no entry in {} and will be skipped",
            progress,
            missing,
            path.display()
        );
    }

    let pending = pending_strings(source, file.entries());
    if pending.is_empty() {
        info!("{}: ✓ Already complete", progress);
        return Ok(LanguageSummary {
            language,
            pending: 0,
            translated: 0,
            missing,
        });
    }

    info!("{}: Translating {} strings...", progress, pending.len());
    let progress_interval = config.progress_interval.max(1);
    let checkpoint_interval = config.checkpoint_interval.max(1);
    let mut translations: HashMap<String, String> = HashMap::with_capacity(pending.len());

    for (index, text) in pending.iter().enumerate() {
        let done = index + 1;
        let translated = translator.translate(text, language).await;
        translations.insert(text.clone(), translated);

        if done % progress_interval == 0 {
            info!("{}: {}/{}...", progress, done, pending.len());
        }

        // Pace requests to stay under the service's rate limit
        if !should_skip(text) {
            translator.sleeper().sleep(config.request_delay).await;
        }

        if done % checkpoint_interval == 0 && done < pending.len() {
            file.save_with(&path, &translations)?;
            info!("{}: [saved] {}/{}", progress, done, pending.len());
        }
    }

    file.save_with(&path, &translations)?;

    let translated = translations
        .iter()
        .filter(|(original, translated)| original != translated)
        .count();
    info!("{}: ✓ {}/{} translated", progress, translated, pending.len());

    Ok(LanguageSummary {
        language,
        pending: pending.len(),
        translated,
        missing,
    })
}
