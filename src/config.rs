use crate::i18n::Language;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TRANSLATE_API_URL: &str = "https://api.mymemory.translated.net/get";

#[derive(Debug, Clone)]
pub struct Config {
    // Layout
    pub project_root: PathBuf,
    pub source_file: PathBuf,
    pub strings_table: String,
    pub batch_output_file: PathBuf,

    // Translation service
    pub translate_api_url: String,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub request_delay: Duration,

    // Progress
    pub checkpoint_interval: usize,
    pub progress_interval: usize,

    pub languages: Vec<Language>,
}

impl Config {
    /// Defaults for a project rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            source_file: PathBuf::from("Models/AppStrings.swift"),
            strings_table: "Localizable.strings".to_string(),
            batch_output_file: PathBuf::from("all_translations.json"),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            max_attempts: 5,
            request_timeout: Duration::from_secs(10),
            request_delay: Duration::from_secs(2),
            checkpoint_interval: 50,
            progress_interval: 10,
            languages: Language::targets(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::with_root(
            std::env::var("LOCALIZATION_ROOT").unwrap_or_else(|_| ".".to_string()),
        );

        let languages = match std::env::var("TARGET_LANGUAGES") {
            Ok(codes) if !codes.trim().is_empty() => parse_languages(&codes)
                .context("TARGET_LANGUAGES contains an unsupported language")?,
            _ => defaults.languages.clone(),
        };

        Ok(Self {
            source_file: std::env::var("SOURCE_STRINGS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_file),
            strings_table: std::env::var("STRINGS_TABLE").unwrap_or(defaults.strings_table),
            batch_output_file: std::env::var("BATCH_OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.batch_output_file),

            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or(defaults.translate_api_url),
            max_attempts: std::env::var("TRANSLATE_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|&n| n >= 1)
                .unwrap_or(defaults.max_attempts),
            request_timeout: std::env::var("TRANSLATE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            request_delay: std::env::var("REQUEST_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),

            checkpoint_interval: std::env::var("CHECKPOINT_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n >= 1)
                .unwrap_or(defaults.checkpoint_interval),
            progress_interval: std::env::var("PROGRESS_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n >= 1)
                .unwrap_or(defaults.progress_interval),

            languages,
            project_root: defaults.project_root,
        })
    }

    /// Swift file holding the `static let` string declarations
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_file)
    }

    /// `<root>/<code>.lproj/Localizable.strings`
    pub fn resource_path(&self, language: Language) -> PathBuf {
        self.project_root
            .join(format!("{}.lproj", language.code()))
            .join(&self.strings_table)
    }

    /// Where the batch preparer writes its request document
    pub fn batch_output_path(&self) -> PathBuf {
        self.resolve(&self.batch_output_file)
    }

    /// `<root>/translate_<code>.json`, read by the applier
    pub fn translation_document_path(&self, language: Language) -> PathBuf {
        self.project_root
            .join(format!("translate_{}.json", language.code()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Parse a comma separated list of language codes, e.g. `"es, fr,de"`
pub fn parse_languages(codes: &str) -> Result<Vec<Language>> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            let language = Language::from_code(code)?;
            if language.is_canonical() {
                anyhow::bail!("'{}' is the source language, not a translation target", code);
            }
            Ok(language)
        })
        .collect()
}
