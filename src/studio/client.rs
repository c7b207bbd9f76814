//! Generative-AI client
//!
//! Talks to a hosted `generateContent` / `predict` style API. Every request has
//! a timeout, and timeouts or 5xx answers are retried a bounded number of times.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{Result, StudioError};
use crate::config::GenAiConfig;

/// Upper bound on `genAi.maxRetries`
pub const MAX_RETRIES: u32 = 5;
const BASE_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Delay before retrying after failed attempt `attempt` (1-based)
pub(crate) fn backoff(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor)).min(MAX_BACKOFF)
}

/// A hosted model the studio can prompt
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate text. With a schema, the text is JSON matching it.
    async fn generate_text(&self, prompt: &str, schema: Option<&Value>) -> Result<String>;

    /// Generate one image, returned as a `data:` url
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

/// Prompt for JSON matching `schema` and decode it
pub async fn generate_json<T: DeserializeOwned>(
    model: &dyn GenerativeModel,
    prompt: &str,
    schema: &Value,
) -> Result<T> {
    let text = model.generate_text(prompt, Some(schema)).await?;
    parse_json_payload(&text)
}

/// Decode a JSON answer, tolerating a markdown code fence around it
pub(crate) fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}

/// Concatenated text parts of the first candidate
pub(crate) fn extract_text(response: &Value) -> Result<String> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(StudioError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(StudioError::EmptyResponse);
    }
    Ok(text)
}

/// First prediction as a `data:` url
pub(crate) fn extract_image(response: &Value) -> Result<String> {
    let prediction = &response["predictions"][0];
    let bytes = prediction["bytesBase64Encoded"]
        .as_str()
        .filter(|b| !b.is_empty())
        .ok_or(StudioError::EmptyResponse)?;
    let mime = prediction["mimeType"].as_str().unwrap_or("image/png");
    Ok(format!("data:{};base64,{}", mime, bytes))
}

/// HTTP client for the hosted service
pub struct GenAiClient {
    client: Client,
    config: GenAiConfig,
}

impl GenAiClient {
    pub fn new(mut config: GenAiConfig) -> Result<Self> {
        if config.max_retries > MAX_RETRIES {
            warn!(
                "genAi.maxRetries {} is above the limit, using {}",
                config.max_retries, MAX_RETRIES
            );
            config.max_retries = MAX_RETRIES;
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        if !self.is_enabled() {
            return Err(StudioError::NotConfigured);
        }

        let attempts = self.config.max_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let sent = self
                .client
                .post(url)
                .header("x-goog-api-key", &self.config.api_key)
                .json(body)
                .send()
                .await;

            let retryable = match sent {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<Value>().await?);
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    if !status.is_server_error() || attempt == attempts {
                        return Err(StudioError::Status {
                            status: status.as_u16(),
                            body: text,
                        });
                    }
                    format!("status {}", status)
                }
                Err(e) if e.is_timeout() => {
                    if attempt == attempts {
                        return Err(StudioError::Timeout { attempts });
                    }
                    "timeout".to_string()
                }
                Err(e) => return Err(e.into()),
            };

            let delay = backoff(attempt);
            warn!(
                "Generative AI request failed ({}), retrying in {:?} [{}/{}]",
                retryable, delay, attempt, attempts
            );
            tokio::time::sleep(delay).await;
        }

        Err(StudioError::Timeout { attempts })
    }
}

#[async_trait]
impl GenerativeModel for GenAiClient {
    async fn generate_text(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        debug!("Generating text with {}", self.config.text_model);
        let url = self.endpoint(&self.config.text_model, "generateContent");
        let response = self.post(&url, &body).await?;
        extract_text(&response)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 },
        });

        debug!("Generating image with {}", self.config.image_model);
        let url = self.endpoint(&self.config.image_model, "predict");
        let response = self.post(&url, &body).await?;
        extract_image(&response)
    }
}
