//! Keep an app's `Localizable.strings` files in sync with its Swift source strings.

pub mod apply;
pub mod auto_translate;
pub mod batch;
pub mod config;
pub mod extract;
pub mod i18n;
pub mod pending;
pub mod retry;
pub mod strings_file;
pub mod translation;
