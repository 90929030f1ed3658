//! OpenAI-compatible HTTP client for vision analysis and image generation.

use crate::data_url::{encode_data_url, is_image_mime};
use crate::error::UpstreamError;
use crate::prompt::ANALYSIS_INSTRUCTIONS;
use crate::provider::{GeneratedImage, ImageAnalyzer, ImageGenerator, ImageUpload};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use slay_rs_config::UpstreamConfig;
use std::time::Duration;

/// Longest error body echoed back in an `UpstreamError::Api` message.
const MAX_ERROR_BODY_CHARS: usize = 500;
/// Content type assumed when a downloaded image does not declare one.
const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Client for the chat-completions (vision) and images endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    vision_model: String,
    image_model: String,
    image_size: String,
    image_quality: String,
    vision_max_tokens: u32,
}

impl OpenAiClient {
    /// Build a client from upstream config. A missing key only fails at call time.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        if !config.has_api_key() {
            warn!("upstream api key not configured; generation requests will fail");
        }
        info!(
            "initialized upstream client (base_url={}, image_model={}, vision_model={})",
            config.base_url, config.image_model, config.vision_model
        );
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            vision_model: config.vision_model.clone(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            image_quality: config.image_quality.clone(),
            vision_max_tokens: config.vision_max_tokens,
        })
    }

    /// Whether requests can be authenticated.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)
    }

    /// POST a JSON body and return the decoded JSON response.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, UpstreamError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        serde_json::from_str(&text).map_err(|err| {
            UpstreamError::UnexpectedResponse(format!("invalid json from {path}: {err}"))
        })
    }

    /// Download a generated image and re-encode it as a data URL.
    async fn download_as_data_url(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: format!("image download failed for {url}"),
            });
        }
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim().to_string())
            .filter(|value| is_image_mime(value))
            .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(UpstreamError::UnexpectedResponse(
                "downloaded image is empty".to_string(),
            ));
        }
        debug!("downloaded generated image (bytes={}, mime={})", bytes.len(), mime);
        Ok(encode_data_url(&mime, &bytes))
    }
}

#[async_trait]
impl ImageAnalyzer for OpenAiClient {
    async fn describe(&self, upload: &ImageUpload) -> Result<String, UpstreamError> {
        let body = json!({
            "model": self.vision_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": ANALYSIS_INSTRUCTIONS },
                    {
                        "type": "image_url",
                        "image_url": { "url": upload.to_data_url(), "detail": "high" }
                    }
                ]
            }],
            "max_tokens": self.vision_max_tokens,
        });
        debug!(
            "requesting image analysis (model={}, bytes={})",
            self.vision_model,
            upload.bytes.len()
        );
        let value = self.post_json("/chat/completions", &body).await?;
        let parsed: ChatCompletion = serde_json::from_value(value).map_err(|err| {
            UpstreamError::UnexpectedResponse(format!("chat completion shape: {err}"))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                UpstreamError::UnexpectedResponse("analysis returned no content".to_string())
            })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, UpstreamError> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "n": 1,
            "size": self.image_size,
            "quality": self.image_quality,
        });
        debug!(
            "requesting image generation (model={}, prompt_len={})",
            self.image_model,
            prompt.len()
        );
        let value = self.post_json("/images/generations", &body).await?;
        let parsed: ImagesResponse = serde_json::from_value(value).map_err(|err| {
            UpstreamError::UnexpectedResponse(format!("images response shape: {err}"))
        })?;
        let Some(item) = parsed.data.into_iter().next() else {
            return Err(UpstreamError::UnexpectedResponse(
                "no images in response".to_string(),
            ));
        };

        let data_url = match (item.b64_json, item.url) {
            (Some(encoded), _) => {
                let bytes = STANDARD.decode(encoded.trim())?;
                encode_data_url(FALLBACK_IMAGE_MIME, &bytes)
            }
            (None, Some(url)) => self.download_as_data_url(&url).await?,
            (None, None) => {
                return Err(UpstreamError::UnexpectedResponse(
                    "image entry has neither url nor b64_json".to_string(),
                ));
            }
        };
        info!("image generated (data_url_len={})", data_url.len());
        Ok(GeneratedImage {
            data_url,
            revised_prompt: item.revised_prompt,
        })
    }
}

/// Pull `error.message` out of an API error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() > MAX_ERROR_BODY_CHARS {
        let truncated: String = message.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{truncated}...")
    } else {
        message
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageItem>,
}

#[derive(Deserialize)]
struct ImageItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}
