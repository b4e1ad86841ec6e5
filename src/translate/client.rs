use serde::Deserialize;
use thiserror::Error;

use crate::translate::alignment::{self, AlignmentError};

/// The translation service rejects request payloads above this many UTF-8
/// bytes, so the client fails fast before attempting any network call.
pub const MAX_REQUEST_BYTES: usize = 10_240;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(
        "request payload is {actual} bytes; the translation service accepts \
         at most {MAX_REQUEST_BYTES} bytes per request"
    )]
    TextTooLarge { actual: usize },
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected translation response: {0}")]
    Response(#[from] serde_json::Error),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// One entry of a batch translation response: the translated text, the
/// service's raw character-offset alignment, and the word-to-word
/// alignment derived from it.
#[derive(Clone, Debug)]
pub struct BatchTranslation {
    pub translated_text: String,
    pub char_alignment: String,
    pub word_alignment: String,
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(rename = "TranslatedText")]
    translated_text: String,
    #[serde(rename = "Alignment", default)]
    alignment: Option<String>,
}

/// Thin blocking wrapper around the cloud translation HTTP endpoint.
/// No retry, no backoff: failures propagate to the caller.
pub struct TranslationClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl TranslationClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Translate a single text from `from` to `to`, returning the
    /// translated string.
    pub fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        check_payload(text.len())?;

        let url = format!("{}/translate", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .query(&[("from", from), ("to", to), ("text", text)]);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("appId", key.as_str())]);
        }

        let body = request.send()?.error_for_status()?.text()?;
        // The service returns a JSON-encoded string.
        let translated: String = serde_json::from_str(&body)?;
        Ok(translated)
    }

    /// Translate a batch of texts (all of the same source language),
    /// returning one result per input with a derived word alignment.
    pub fn translate_batch(
        &self,
        texts: &[String],
        from: &str,
        to: &str,
    ) -> Result<Vec<BatchTranslation>, TranslateError> {
        let total: usize = texts.iter().map(|t| t.len()).sum();
        check_payload(total)?;

        let texts_param = serde_json::to_string(texts)?;
        let url = format!("{}/translate-array", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .query(&[("from", from), ("to", to), ("texts", texts_param.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("appId", key.as_str())]);
        }

        let body = request.send()?.error_for_status()?.text()?;
        let items: Vec<BatchItem> = serde_json::from_str(&body)?;

        let mut results = Vec::with_capacity(items.len());
        for (source, item) in texts.iter().zip(items) {
            let char_alignment = item.alignment.unwrap_or_default();
            let word_alignment = if char_alignment.is_empty() {
                String::new()
            } else {
                let links =
                    alignment::derive_word_links(source, &item.translated_text, &char_alignment)?;
                alignment::word_alignment_string(&links)
            };
            results.push(BatchTranslation {
                translated_text: item.translated_text,
                char_alignment,
                word_alignment,
            });
        }
        Ok(results)
    }
}

fn check_payload(bytes: usize) -> Result<(), TranslateError> {
    if bytes > MAX_REQUEST_BYTES {
        Err(TranslateError::TextTooLarge { actual: bytes })
    } else {
        Ok(())
    }
}
