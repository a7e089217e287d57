use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Settings;
use crate::error::ServiceError;
use crate::models::CategorizedHashtags;
use crate::prompts::{hashtag_prompt, render_template, response_schema};

static LEADING_HASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anything that can turn a topic into categorized hashtags.
#[async_trait]
pub trait HashtagService: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<CategorizedHashtags, ServiceError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    prompt_template: Option<String>,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
            model: settings.gemini_model.clone(),
            api_key: settings.api_key(),
            temperature: settings.temperature,
            prompt_template: settings.prompt_template(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn build_prompt(&self, topic: &str) -> String {
        match &self.prompt_template {
            Some(template) => render_template(template, topic),
            None => hashtag_prompt(topic),
        }
    }

    pub fn request_body(&self, prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: self.temperature,
            },
        }
    }

    async fn request(&self, topic: &str) -> Result<CategorizedHashtags, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;
        let body = self.request_body(self.build_prompt(topic));

        tracing::debug!(model = %self.model, topic = %topic, "requesting hashtags");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = response.json().await?;
        let text = response_text(&envelope)?;
        parse_hashtags(&text)
    }
}

#[async_trait]
impl HashtagService for GeminiClient {
    async fn generate(&self, topic: &str) -> Result<CategorizedHashtags, ServiceError> {
        let result = self.request(topic).await;
        match &result {
            Ok(hashtags) => tracing::info!(
                topic = %topic,
                categories = hashtags.categories().len(),
                tags = hashtags.total_tags(),
                "hashtags generated"
            ),
            Err(e) => tracing::error!(topic = %topic, error = %e, "error generating hashtags"),
        }
        result
    }
}

/// Concatenated text parts of the first candidate, trimmed.
pub fn response_text(response: &GenerateContentResponse) -> Result<String, ServiceError> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Strips leading `#` and any whitespace. Returns `None` when nothing is left.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let tag = WHITESPACE.replace_all(&LEADING_HASHES.replace(trimmed, ""), "").into_owned();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Parses the JSON object returned by the service.
pub fn parse_hashtags(text: &str) -> Result<CategorizedHashtags, ServiceError> {
    let raw: HashMap<String, Vec<String>> = serde_json::from_str(text.trim())
        .map_err(|e| ServiceError::InvalidFormat(e.to_string()))?;

    CategorizedHashtags::new(raw.into_iter().map(|(name, tags)| {
        let tags = tags.iter().filter_map(|t| normalize_tag(t)).collect();
        (name, tags)
    }))
}
