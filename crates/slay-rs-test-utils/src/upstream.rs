use async_trait::async_trait;
use parking_lot::Mutex;
use slay_rs_upstream::{GeneratedImage, ImageAnalyzer, ImageGenerator, ImageUpload, UpstreamError};
use std::sync::Arc;

/// Generator that always returns the same data URL.
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    data_url: String,
    revised_prompt: Option<String>,
}

impl FixedGenerator {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
            revised_prompt: None,
        }
    }

    /// Report `revised` as the service's rewrite of every prompt.
    pub fn with_revised_prompt(mut self, revised: impl Into<String>) -> Self {
        self.revised_prompt = Some(revised.into());
        self
    }
}

impl Default for FixedGenerator {
    fn default() -> Self {
        Self::new("data:image/png;base64,c2xheQ==")
    }
}

#[async_trait]
impl ImageGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, UpstreamError> {
        Ok(GeneratedImage {
            data_url: self.data_url.clone(),
            revised_prompt: self.revised_prompt.clone(),
        })
    }
}

/// Generator that fails every call with an API error.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    status: u16,
    message: String,
}

impl FailingGenerator {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl Default for FailingGenerator {
    fn default() -> Self {
        Self::new(500, "upstream exploded")
    }
}

#[async_trait]
impl ImageGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, UpstreamError> {
        Err(UpstreamError::Api {
            status: self.status,
            message: self.message.clone(),
        })
    }
}

#[async_trait]
impl ImageAnalyzer for FailingGenerator {
    async fn describe(&self, _upload: &ImageUpload) -> Result<String, UpstreamError> {
        Err(UpstreamError::Api {
            status: self.status,
            message: self.message.clone(),
        })
    }
}

/// Generator that records prompts and echoes a fixed image.
#[derive(Debug, Clone, Default)]
pub struct RecordingGenerator {
    inner: FixedGenerator,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, UpstreamError> {
        self.prompts.lock().push(prompt.to_string());
        self.inner.generate(prompt).await
    }
}

/// Analyzer that returns a canned description and records upload sizes.
#[derive(Debug, Clone)]
pub struct FixedAnalyzer {
    description: String,
    uploads: Arc<Mutex<Vec<ImageUpload>>>,
}

impl FixedAnalyzer {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn uploads(&self) -> Vec<ImageUpload> {
        self.uploads.lock().clone()
    }
}

impl Default for FixedAnalyzer {
    fn default() -> Self {
        Self::new("a person standing, facing the camera")
    }
}

#[async_trait]
impl ImageAnalyzer for FixedAnalyzer {
    async fn describe(&self, upload: &ImageUpload) -> Result<String, UpstreamError> {
        self.uploads.lock().push(upload.clone());
        Ok(self.description.clone())
    }
}
