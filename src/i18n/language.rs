//! `Language`: a code known to be in the language table.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// The source language every string is written in.
    pub const ENGLISH: Language = Language { code: "en" };

    pub const SPANISH: Language = Language { code: "es" };

    pub const CHINESE: Language = Language { code: "zh" };

    /// Parse a `.lproj` code such as `"es"`; unknown and disabled codes are errors
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The source language
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// All enabled translation targets in processing order.
    pub fn targets() -> Vec<Language> {
        LanguageRegistry::get()
            .list_targets()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Table row for this language.
    ///
    /// # Panics
    /// Never for a `Language` built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// English name, e.g. "Spanish"
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Name in the language itself, e.g. "Español"
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Code the translation service expects in its language pair.
    pub fn service_code(&self) -> &'static str {
        self.config().service_code
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
