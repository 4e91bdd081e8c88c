//! Review prose, optionally from an external text-generation service.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::model::Sentiment;

/// Review text used whenever the service is not configured or does not answer
pub const FALLBACK_REVIEW: &str = "Great quality and exactly as described. Would buy again.";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const MAX_OUTPUT_TOKENS: u32 = 120;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces review prose for a product
pub trait TextSynthesizer {
    fn review(&self, product_name: &str, sentiment: Sentiment) -> Result<String>;
}

/// Always answers with [`FALLBACK_REVIEW`]
#[derive(Debug, Default)]
pub struct CannedSynthesizer;

impl TextSynthesizer for CannedSynthesizer {
    fn review(&self, _product_name: &str, _sentiment: Sentiment) -> Result<String> {
        Ok(FALLBACK_REVIEW.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: String,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    /// Convenience field some compatible servers fill in
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for an OpenAI-style `/responses` endpoint
pub struct OpenAiSynthesizer {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiSynthesizer {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("retail-datagen/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

impl TextSynthesizer for OpenAiSynthesizer {
    fn review(&self, product_name: &str, sentiment: Sentiment) -> Result<String> {
        let request = ResponsesRequest {
            model: &self.model,
            input: review_prompt(product_name, sentiment),
            max_output_tokens: MAX_OUTPUT_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Failed to reach text service")?;

        let status = response.status();
        let text = response.text().context("Failed to read response")?;
        if !status.is_success() {
            bail!("Text service returned {}: {}", status, text);
        }

        let reply: ResponsesReply =
            serde_json::from_str(&text).context("Failed to parse text service reply")?;
        Ok(output_text(&reply))
    }
}

pub fn review_prompt(product_name: &str, sentiment: Sentiment) -> String {
    format!(
        "Write a short, realistic, specific customer review for a product called '{}'. \
         Sentiment: {}. 1-3 sentences. No emojis.",
        product_name, sentiment
    )
}

/// Concatenated `output_text` parts, trimmed
fn output_text(reply: &ResponsesReply) -> String {
    if let Some(text) = reply.output_text.as_deref() {
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }

    reply
        .output
        .iter()
        .flat_map(|item| item.content.iter())
        .filter(|part| part.kind == "output_text")
        .filter_map(|part| part.text.as_deref())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Pick the synthesizer once at startup. No key, or a client that cannot be
/// built, means canned reviews for the whole run.
pub fn select_synthesizer(
    api_key: Option<&str>,
    base_url: &str,
    model: &str,
) -> Box<dyn TextSynthesizer> {
    let Some(api_key) = api_key.map(str::trim).filter(|key| !key.is_empty()) else {
        info!("No text service key configured, using canned reviews");
        return Box::new(CannedSynthesizer);
    };

    match OpenAiSynthesizer::new(api_key, base_url, model) {
        Ok(synth) => {
            info!("Generating review text with {}", model);
            Box::new(synth)
        }
        Err(err) => {
            warn!("Text service unavailable, using canned reviews: {:#}", err);
            Box::new(CannedSynthesizer)
        }
    }
}

/// Review text for a product. Errors and empty answers fall back to [`FALLBACK_REVIEW`].
pub fn review_text(synth: &dyn TextSynthesizer, product_name: &str, sentiment: Sentiment) -> String {
    match synth.review(product_name, sentiment) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_REVIEW.to_string(),
        Err(err) => {
            warn!("Error generating review: {:#}", err);
            FALLBACK_REVIEW.to_string()
        }
    }
}
