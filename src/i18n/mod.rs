//! Internationalization (i18n) module.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the source language and every
//!   target language the resource files exist for
//! - `language`: Type-safe Language type validated against the registry
//! - `validator`: Checks translated values keep their format specifiers
//!
//! # Example
//!
//! ```rust,ignore
//! use strings_sync::i18n::Language;
//!
//! let spanish = Language::from_code("es")?;
//! for language in Language::targets() {
//!     println!("{} -> {}", language.code(), language.name());
//! }
//! ```

mod language;
mod registry;
mod validator;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{TranslationValidator, ValidationReport};
