use crate::config::Config;
use crate::i18n::Language;
use crate::retry::{with_retry_policy, Backoff, RetryAction, Sleeper, TokioSleeper};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// The service rejects longer queries
const MAX_QUERY_CHARS: usize = 400;

/// Why a single translation request did not produce a usable result
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by the translation service")]
    RateLimited,

    #[error("translation service returned HTTP {0}")]
    Status(u16),

    #[error("request to translation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse translation response: {0}")]
    Parse(String),

    #[error("translation service returned no usable translation: {0:?}")]
    Unusable(String),
}

impl FetchError {
    /// Decide how the retry loop reacts to this error before attempt `next`
    fn retry_action(&self, next: u32, rate_limited: &Backoff, transient: &Backoff) -> RetryAction {
        match self {
            FetchError::RateLimited => RetryAction::Wait(rate_limited.delay_for_attempt(next)),
            FetchError::Transport(_) | FetchError::Parse(_) => {
                RetryAction::Wait(transient.delay_for_attempt(next))
            }
            FetchError::Status(_) => RetryAction::GiveUp,
            FetchError::Unusable(_) => RetryAction::Immediately,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "responseData", default)]
    response_data: Option<ResponseData>,
    #[serde(rename = "responseStatus", default)]
    response_status: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

impl ApiResponse {
    fn translated_text(&self) -> Option<&str> {
        self.response_data
            .as_ref()
            .and_then(|data| data.translated_text.as_deref())
    }

    /// `responseStatus` may be a number or a string depending on the error path
    fn status_is_429(&self) -> bool {
        match &self.response_status {
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(429),
            Some(serde_json::Value::String(s)) => s.trim() == "429",
            _ => false,
        }
    }
}

/// Strings that must never be sent to the service.
///
/// Anything with a `%` carries format specifiers the service would mangle,
/// and one-character strings are not worth a request.
pub fn should_skip(text: &str) -> bool {
    text.contains('%') || text.trim().chars().count() < 2
}

/// Undo the HTML escaping the service applies to its output
fn unescape_html(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn looks_rate_limited(translated: &str) -> bool {
    translated.to_uppercase().contains("QUOTA") || translated.contains("429")
}

fn is_usable(translated: &str, original: &str) -> bool {
    translated != original && !translated.starts_with("MYMEMORY") && !looks_rate_limited(translated)
}

/// Client for the remote translation endpoint
pub struct Translator<S = TokioSleeper> {
    client: reqwest::Client,
    api_url: String,
    max_attempts: u32,
    rate_limited: Backoff,
    transient: Backoff,
    sleeper: S,
}

impl Translator<TokioSleeper> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> Translator<S> {
    pub fn with_sleeper(config: &Config, sleeper: S) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.translate_api_url.clone(),
            max_attempts: config.max_attempts.max(1),
            rate_limited: Backoff::rate_limited(),
            transient: Backoff::transient(),
            sleeper,
        })
    }

    /// The sleeper used for backoff; callers reuse it for their own pacing
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Translate `text` from the source language to `target`.
    ///
    /// Never fails: when the text is skipped, or every attempt fails, the
    /// original text comes back unchanged. Callers cannot tell that apart from
    /// a translation that is identical to the source.
    pub async fn translate(&self, text: &str, target: Language) -> String {
        match self.try_translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                debug!("Keeping original for {:?} ({}): {}", text, target.code(), e);
                text.to_string()
            }
        }
    }

    /// Translate `text`, returning the last error when no attempt succeeded.
    ///
    /// Skipped texts and the canonical target return the input without any
    /// network call.
    pub async fn try_translate(&self, text: &str, target: Language) -> Result<String, FetchError> {
        if should_skip(text) || target.is_canonical() {
            return Ok(text.to_string());
        }

        with_retry_policy(
            self.max_attempts,
            &format!("Translation to {}", target.code()),
            &self.sleeper,
            || self.request_once(text, target),
            |e: &FetchError, next| e.retry_action(next, &self.rate_limited, &self.transient),
        )
        .await
    }

    async fn request_once(&self, text: &str, target: Language) -> Result<String, FetchError> {
        let query: String = text.chars().take(MAX_QUERY_CHARS).collect();
        let langpair = format!(
            "{}|{}",
            Language::canonical().service_code(),
            target.service_code()
        );

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("q", query.as_str()), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let translated = unescape_html(parsed.translated_text().unwrap_or(text));

        if is_usable(&translated, text) {
            return Ok(translated);
        }

        if parsed.status_is_429() || looks_rate_limited(&translated) {
            Err(FetchError::RateLimited)
        } else {
            Err(FetchError::Unusable(translated))
        }
    }
}
