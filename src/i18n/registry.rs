//! Table of the languages the app ships resource files for.
//!
//! English is the source language; every other entry is a translation target
//! with a `<code>.lproj` directory. Built once on first use.

use std::sync::OnceLock;

/// One row of the language table
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code used for the `.lproj` directory (e.g., "es", "zh")
    pub code: &'static str,

    /// English name of the language, used in batch request documents
    pub name: &'static str,

    /// Native name of the language (e.g., "Español", "日本語")
    pub native_name: &'static str,

    /// Code understood by the translation service (e.g., "zh-CN" for "zh")
    pub service_code: &'static str,

    /// The language the source strings are written in
    pub is_canonical: bool,

    /// Disabled languages are rejected by `Language::from_code`
    pub enabled: bool,
}

pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// The shared table
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by its `.lproj` code
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Enabled non-source languages, in processing order
    pub fn list_targets(&self) -> Vec<&LanguageConfig> {
        self.languages
            .iter()
            .filter(|lang| lang.enabled && !lang.is_canonical)
            .collect()
    }

    /// The source language.
    ///
    /// # Panics
    /// If the table does not hold exactly one source language.
    pub fn canonical(&self) -> &LanguageConfig {
        let sources: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match sources.as_slice() {
            [only] => only,
            [] => panic!("No canonical language found in registry"),
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

const fn target(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    service_code: &'static str,
) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
        service_code,
        is_canonical: false,
        enabled: true,
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            service_code: "en",
            is_canonical: true,
            enabled: true,
        },
        target("es", "Spanish", "Español", "es"),
        target("fr", "French", "Français", "fr"),
        target("de", "German", "Deutsch", "de"),
        target("it", "Italian", "Italiano", "it"),
        target("pt", "Portuguese", "Português", "pt"),
        target("zh", "Chinese (Simplified)", "简体中文", "zh-CN"),
        target("ja", "Japanese", "日本語", "ja"),
        target("ko", "Korean", "한국어", "ko"),
        target("ru", "Russian", "Русский", "ru"),
        target("ar", "Arabic", "العربية", "ar"),
        target("hi", "Hindi", "हिन्दी", "hi"),
    ]
}
