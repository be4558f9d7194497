//! Print every user-facing string declared in the Swift source file.
//!
//! Usage:
//!   cargo run --bin extract-strings
//!   cargo run --bin extract-strings -- path/to/AppStrings.swift

use anyhow::Result;
use std::path::PathBuf;
use strings_sync::{config::Config, extract::extract_from_file};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strings_sync=info".parse()?),
        )
        .init();

    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => Config::from_env()?.source_path(),
    };

    let strings = extract_from_file(&path)?;
    for text in &strings {
        println!("{}", text);
    }

    Ok(())
}
