//! Translation quality validation module.
//!
//! Checks that a translated resource value can still be used where the
//! original was: the format specifiers (`%@`, `%d`, `%.1f`, ...) must survive
//! translation, otherwise `String(format:)` at the call site breaks.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that make the translation unsafe to ship
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translated resource values.
pub struct TranslationValidator;

static FORMAT_SPECIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
static ESCAPE_SEQUENCE_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate that a translation preserves what the original relies on.
    ///
    /// - format specifiers must match (order-insensitive, so positional
    ///   arguments like `%2$@ %1$@` may be reordered): error otherwise
    /// - an empty translation is an error
    /// - escape sequences (`\n`, `\"`) and surrounding whitespace should match:
    ///   warning otherwise
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if translated.trim().is_empty() && !original.trim().is_empty() {
            report.errors.push("Translation is empty".to_string());
            return report;
        }

        let mut orig_specifiers = Self::extract_format_specifiers(original);
        let mut trans_specifiers = Self::extract_format_specifiers(translated);
        orig_specifiers.sort();
        trans_specifiers.sort();
        if orig_specifiers != trans_specifiers {
            report.errors.push(format!(
                "Format specifier mismatch: original has {:?}, translation has {:?}",
                orig_specifiers, trans_specifiers
            ));
        }

        let orig_escapes = Self::extract_escape_sequences(original);
        let trans_escapes = Self::extract_escape_sequences(translated);
        if orig_escapes.len() != trans_escapes.len() {
            report.warnings.push(format!(
                "Escape sequence count mismatch: original has {}, translation has {}",
                orig_escapes.len(),
                trans_escapes.len()
            ));
        }

        let orig_padded = original.starts_with(' ') || original.ends_with(' ');
        let trans_padded = translated.starts_with(' ') || translated.ends_with(' ');
        if orig_padded != trans_padded {
            report
                .warnings
                .push("Leading/trailing whitespace differs from original".to_string());
        }

        report
    }

    /// Extract all printf-style format specifiers, including `%@` and positional forms
    fn extract_format_specifiers(text: &str) -> Vec<String> {
        let regex = FORMAT_SPECIFIER_REGEX.get_or_init(|| {
            Regex::new(
                r"%(?:\d+\$)?[-+ 0#']*\d*(?:\.\d+)?(?:hh|h|ll|l|q|z|t|j|L)?[@dDiuUxXoOfFeEgGcCsSpaA%]",
            )
            .unwrap()
        });

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract backslash escape sequences as they appear in the resource file
    fn extract_escape_sequences(text: &str) -> Vec<String> {
        let regex = ESCAPE_SEQUENCE_REGEX.get_or_init(|| Regex::new(r#"\\[nrt"\\]"#).unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Format Specifier Extraction Tests ====================

    #[test]
    fn test_extract_object_specifier() {
        let specifiers = TranslationValidator::extract_format_specifiers("Save %@");
        assert_eq!(specifiers, vec!["%@"]);
    }

    #[test]
    fn test_extract_numeric_specifiers() {
        let specifiers =
            TranslationValidator::extract_format_specifiers("%d meals, %.1f kcal, %lld days");
        assert_eq!(specifiers, vec!["%d", "%.1f", "%lld"]);
    }

    #[test]
    fn test_extract_positional_specifiers() {
        let specifiers = TranslationValidator::extract_format_specifiers("%2$@ of %1$@");
        assert_eq!(specifiers, vec!["%2$@", "%1$@"]);
    }

    #[test]
    fn test_extract_literal_percent() {
        let specifiers = TranslationValidator::extract_format_specifiers("100%% done");
        assert_eq!(specifiers, vec!["%%"]);
    }

    #[test]
    fn test_extract_none() {
        assert!(TranslationValidator::extract_format_specifiers("Hello").is_empty());
    }

    #[test]
    fn test_extract_escape_sequences() {
        let escapes = TranslationValidator::extract_escape_sequences(r#"Line\nSay \"hi\""#);
        assert_eq!(escapes, vec![r"\n", r#"\""#, r#"\""#]);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_perfect_translation() {
        let report = TranslationValidator::validate("Save %@", "Guardar %@");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_plain_text() {
        let report = TranslationValidator::validate("Hello", "Hola");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_missing_specifier() {
        let report = TranslationValidator::validate("%d calories", "calorías");
        assert!(report.has_errors());
        assert!(report.errors[0].contains("Format specifier mismatch"));
    }

    #[test]
    fn test_validate_changed_specifier() {
        let report = TranslationValidator::validate("%.1f kg", "%d kg");
        assert!(report.has_errors());
    }

    #[test]
    fn test_validate_reordered_positional_specifiers() {
        let report = TranslationValidator::validate("%1$@ of %2$@", "%2$@ の %1$@");
        assert!(!report.has_errors());
    }

    #[test]
    fn test_validate_empty_translation() {
        let report = TranslationValidator::validate("Hello", "  ");
        assert!(report.has_errors());
        assert_eq!(report.errors[0], "Translation is empty");
    }

    #[test]
    fn test_validate_lost_line_break() {
        let report = TranslationValidator::validate(r"First\nSecond", "Primero Segundo");
        assert!(!report.has_errors());
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Escape sequence"));
    }

    #[test]
    fn test_validate_whitespace_padding() {
        let report = TranslationValidator::validate("Total: ", "Total:");
        assert!(report.has_warnings());
    }

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_warning() {
        let mut report = ValidationReport::new();
        report.warnings.push("Test warning".to_string());

        assert!(!report.is_clean());
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }
}
