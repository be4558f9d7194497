//! Source string extraction.
//!
//! The app declares every user-facing string once, as
//! `static let someName = "Literal text"`. The literals are the keys of every
//! `Localizable.strings` file.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

static DECLARATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Collect the unique literal values declared in `content`, sorted
pub fn extract_strings(content: &str) -> BTreeSet<String> {
    let regex = DECLARATION_REGEX.get_or_init(|| {
        Regex::new(r#"static\s+let\s+\w+\s*(?::\s*String\s*)?=\s*"([^"]+)""#).unwrap()
    });

    regex
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Read the source file and extract its strings
pub fn extract_from_file(path: &Path) -> Result<BTreeSet<String>> {
    info!("Reading strings from {}...", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source strings from {}", path.display()))?;

    let strings = extract_strings(&content);
    info!("Found {} unique strings", strings.len());
    Ok(strings)
}
