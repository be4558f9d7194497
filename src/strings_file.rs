//! Reader/writer for `Localizable.strings` resource files.
//!
//! The file is kept as its original sequence of lines. Only lines that look
//! like `"key" = "value";` are ever rewritten; comments, blank lines and
//! anything else the parser does not understand are written back untouched.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

static ENTRY_REGEX: OnceLock<Regex> = OnceLock::new();

fn entry_regex() -> &'static Regex {
    ENTRY_REGEX.get_or_init(|| {
        Regex::new(r#"^"([^"]+)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#).unwrap()
    })
}

/// Parse a single line into its key and raw (still escaped) value
pub fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let caps = entry_regex().captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Format a `"key" = "value";` line.
///
/// Bare double quotes and raw line breaks in the value are escaped so the
/// line always parses back; sequences that are already escaped are kept.
pub fn format_entry(key: &str, value: &str) -> String {
    format!("\"{}\" = \"{}\";", key, escape_value(value))
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.push('\\');
                match chars.next() {
                    Some(next) => escaped.push(next),
                    // A lone trailing backslash would swallow the closing quote
                    None => escaped.push('\\'),
                }
            }
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Split a line into its content and its terminator (`"\n"`, `"\r\n"` or `""`)
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// An in-memory `.strings` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringsFile {
    /// Original lines, each with its own line terminator
    lines: Vec<String>,
    /// Key -> current value for every entry line (later duplicates win)
    entries: HashMap<String, String>,
    /// Loaded from a file that exists but could not be decoded; never written back
    undecodable: bool,
}

impl StringsFile {
    /// Parse file content
    pub fn parse(content: &str) -> Self {
        let lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
        let entries = lines
            .iter()
            .filter_map(|line| parse_entry(line))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self {
            lines,
            entries,
            undecodable: false,
        }
    }

    /// Load a file from disk.
    ///
    /// A missing file, or one that is not valid UTF-8, reads as empty. The
    /// latter is marked undecodable and refuses to be saved.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        match String::from_utf8(bytes) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(_) => {
                warn!(
                    "{} is not valid UTF-8, treating it as empty",
                    path.display()
                );
                Ok(Self {
                    undecodable: true,
                    ..Self::default()
                })
            }
        }
    }

    /// Original line sequence
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Key -> value map of all entries
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// Current value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when the file on disk exists but is not UTF-8
    pub fn is_undecodable(&self) -> bool {
        self.undecodable
    }

    /// True when the file has no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the file with `updates` applied, without modifying `self`.
    ///
    /// Every entry line whose key is in `updates` is replaced by a freshly
    /// formatted line; every other line is copied unchanged.
    pub fn render(&self, updates: &HashMap<String, String>) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match Self::updated_line(line, updates) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(line),
            }
        }
        out
    }

    /// Apply `updates` in place.
    ///
    /// # Returns
    /// The number of lines that were rewritten
    pub fn apply(&mut self, updates: &HashMap<String, String>) -> usize {
        let mut rewritten = 0;
        for line in &mut self.lines {
            if let Some(replacement) = Self::updated_line(line, updates) {
                *line = replacement;
                rewritten += 1;
            }
        }

        if rewritten > 0 {
            self.entries = self
                .lines
                .iter()
                .filter_map(|line| parse_entry(line))
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
        }

        rewritten
    }

    /// Write the current lines to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.ensure_writable(path)?;
        fs::write(path, self.lines.concat())
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Write the file with `updates` applied to `path`, leaving `self` as loaded
    pub fn save_with(&self, path: &Path, updates: &HashMap<String, String>) -> Result<()> {
        self.ensure_writable(path)?;
        fs::write(path, self.render(updates))
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn ensure_writable(&self, path: &Path) -> Result<()> {
        if self.undecodable {
            bail!(
                "Refusing to overwrite {}: it is not valid UTF-8",
                path.display()
            );
        }
        Ok(())
    }

    fn updated_line(line: &str, updates: &HashMap<String, String>) -> Option<String> {
        let (key, _) = parse_entry(line)?;
        let value = updates.get(key)?;
        let (_, terminator) = split_terminator(line);
        Some(format!("{}{}", format_entry(key, value), terminator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "/* Greetings */\n\"Hello\" = \"Hello\";\n\n\"Save %@\" = \"Guardar %@\";\n// trailing comment";

    fn updates(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_entries() {
        let file = StringsFile::parse(SAMPLE);

        assert_eq!(file.lines().len(), 5);
        assert_eq!(file.entries().len(), 2);
        assert_eq!(file.get("Hello"), Some("Hello"));
        assert_eq!(file.get("Save %@"), Some("Guardar %@"));
    }

    #[test]
    fn test_parse_entry_allows_flexible_spacing() {
        assert_eq!(parse_entry(r#""A"="B";"#), Some(("A", "B")));
        assert_eq!(parse_entry("\"A\"   =   \"B\"  ;  // note"), Some(("A", "B")));
    }

    #[test]
    fn test_parse_entry_rejects_non_entries() {
        assert_eq!(parse_entry("/* \"A\" = \"B\"; */"), None);
        assert_eq!(parse_entry(" \"A\" = \"B\";"), None); // must start the line
        assert_eq!(parse_entry("\"A\" = \"B\""), None); // no semicolon
        assert_eq!(parse_entry("\"\" = \"B\";"), None); // empty key
    }

    #[test]
    fn test_parse_entry_empty_value() {
        assert_eq!(parse_entry(r#""A" = "";"#), Some(("A", "")));
    }

    #[test]
    fn test_parse_entry_escaped_quote_in_value() {
        assert_eq!(
            parse_entry(r#""Quote" = "Say \"hi\"";"#),
            Some(("Quote", r#"Say \"hi\""#))
        );
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let file = StringsFile::parse("\"A\" = \"first\";\n\"A\" = \"second\";\n");
        assert_eq!(file.get("A"), Some("second"));
    }

    #[test]
    fn test_parse_crlf() {
        let file = StringsFile::parse("\"A\" = \"B\";\r\n\"C\" = \"D\";\r\n");
        assert_eq!(file.lines().len(), 2);
        assert_eq!(file.get("C"), Some("D"));
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn test_format_entry() {
        assert_eq!(format_entry("Hello", "Hola"), r#""Hello" = "Hola";"#);
    }

    #[test]
    fn test_format_entry_escapes_quotes_and_newlines() {
        assert_eq!(
            format_entry("K", "Di \"hola\"\nadiós"),
            r#""K" = "Di \"hola\"\nadiós";"#
        );
    }

    #[test]
    fn test_format_entry_keeps_existing_escapes() {
        assert_eq!(format_entry("K", r#"Di \"hola\""#), r#""K" = "Di \"hola\"";"#);
    }

    #[test]
    fn test_format_entry_trailing_backslash() {
        let line = format_entry("K", "C:\\");
        assert_eq!(parse_entry(&line), Some(("K", r"C:\\")));
    }

    // ==================== Render Tests ====================

    #[test]
    fn test_render_empty_updates_is_identity() {
        let file = StringsFile::parse(SAMPLE);
        assert_eq!(file.render(&HashMap::new()), SAMPLE);
    }

    #[test]
    fn test_render_replaces_only_matching_lines() {
        let file = StringsFile::parse(SAMPLE);
        let rendered = file.render(&updates(&[("Hello", "Hola"), ("Unknown", "X")]));

        let expected = SAMPLE.replace("\"Hello\" = \"Hello\";", "\"Hello\" = \"Hola\";");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_normalizes_spacing_of_updated_line() {
        let file = StringsFile::parse("\"Hello\"=\"Hello\" ; // keep?\n");
        assert_eq!(
            file.render(&updates(&[("Hello", "Hola")])),
            "\"Hello\" = \"Hola\";\n"
        );
    }

    #[test]
    fn test_render_keeps_line_terminators() {
        let file = StringsFile::parse("\"A\" = \"A\";\r\n\"B\" = \"B\";");
        assert_eq!(
            file.render(&updates(&[("A", "1"), ("B", "2")])),
            "\"A\" = \"1\";\r\n\"B\" = \"2\";"
        );
    }

    #[test]
    fn test_render_does_not_modify_file() {
        let file = StringsFile::parse(SAMPLE);
        let _ = file.render(&updates(&[("Hello", "Hola")]));
        assert_eq!(file.get("Hello"), Some("Hello"));
    }

    // ==================== Apply Tests ====================

    #[test]
    fn test_apply_counts_rewritten_lines() {
        let mut file = StringsFile::parse("\"A\" = \"A\";\n\"A\" = \"A\";\n\"B\" = \"B\";\n");
        let rewritten = file.apply(&updates(&[("A", "Ä")]));

        assert_eq!(rewritten, 2);
        assert_eq!(file.get("A"), Some("Ä"));
        assert_eq!(file.get("B"), Some("B"));
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut file = StringsFile::parse(SAMPLE);
        let map = updates(&[("Hello", "Hola")]);
        file.apply(&map);
        let once = file.lines().concat();
        file.apply(&map);

        assert_eq!(file.lines().concat(), once);
    }

    // ==================== Disk Tests ====================

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = StringsFile::load(&dir.path().join("missing.strings")).unwrap();

        assert!(file.is_empty());
        assert!(file.entries().is_empty());
    }

    #[test]
    fn test_load_invalid_utf8_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.strings");
        fs::write(&path, [0xff, 0xfe, 0x22, 0x41]).unwrap();

        let file = StringsFile::load(&path).unwrap();
        assert!(file.entries().is_empty());
        assert!(file.is_undecodable());
    }

    #[test]
    fn test_undecodable_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Localizable.strings");
        // UTF-16LE with BOM: "A" = "A";
        let utf16: Vec<u8> = std::iter::once(0xfeff_u16)
            .chain("\"A\" = \"A\";\n".encode_utf16())
            .flat_map(u16::to_le_bytes)
            .collect();
        fs::write(&path, &utf16).unwrap();

        let file = StringsFile::load(&path).unwrap();
        assert!(file.save(&path).is_err());
        assert!(file
            .save_with(&path, &updates(&[("A", "B")]))
            .is_err());

        assert_eq!(fs::read(&path).unwrap(), utf16);
    }

    #[test]
    fn test_load_directory_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(StringsFile::load(dir.path()).is_err());
    }

    #[test]
    fn test_save_round_trips_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Localizable.strings");
        fs::write(&path, SAMPLE).unwrap();

        let file = StringsFile::load(&path).unwrap();
        file.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_save_with_leaves_loaded_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Localizable.strings");
        let file = StringsFile::parse(SAMPLE);

        file.save_with(&path, &updates(&[("Hello", "Hola")])).unwrap();

        let saved = StringsFile::load(&path).unwrap();
        assert_eq!(saved.get("Hello"), Some("Hola"));
        assert_eq!(file.get("Hello"), Some("Hello"));
    }

    // ==================== Properties ====================

    proptest! {
        #[test]
        fn prop_empty_updates_are_byte_identical(content in "(\"[a-zA-Z %@]{1,8}\" = \"[a-zA-Z %@]{0,8}\";\n|[^\n]{0,20}\n){0,12}[^\n]{0,10}") {
            let file = StringsFile::parse(&content);
            prop_assert_eq!(file.render(&HashMap::new()), content);
        }

        #[test]
        fn prop_updates_touch_only_matching_lines(
            keys in proptest::collection::vec("[a-zA-Z ]{1,8}", 1..8),
            value in "[a-zA-Z ]{0,8}",
        ) {
            let content: String = keys
                .iter()
                .map(|k| format!("\"{}\" = \"{}\";\n// {}\n", k, k, k))
                .collect();
            let file = StringsFile::parse(&content);
            let target = keys[0].clone();
            let map = HashMap::from([(target.clone(), value.clone())]);

            let rendered = file.render(&map);
            let before: Vec<&str> = content.split_inclusive('\n').collect();
            let after: Vec<&str> = rendered.split_inclusive('\n').collect();

            prop_assert_eq!(before.len(), after.len());
            for (old, new) in before.iter().zip(after.iter()) {
                match parse_entry(old) {
                    Some((key, _)) if key == target => {
                        prop_assert_eq!(parse_entry(new), Some((key, value.as_str())));
                    }
                    _ => prop_assert_eq!(old, new),
                }
            }
        }
    }
}
