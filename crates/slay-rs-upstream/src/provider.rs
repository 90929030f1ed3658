//! Provider interfaces for image analysis and generation.

use crate::error::UpstreamError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An uploaded image handed to the analyzer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name, if the client sent one.
    pub file_name: Option<String>,
    /// Declared content type.
    pub mime_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// The upload as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        crate::data_url::encode_data_url(&self.mime_type, &self.bytes)
    }
}

/// A generated image, already re-encoded for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// `data:image/...;base64,...` payload.
    pub data_url: String,
    /// Prompt as rewritten by the service, when it reports one.
    pub revised_prompt: Option<String>,
}

/// Turns a prompt into an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the prompt.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, UpstreamError>;
}

/// Describes an uploaded image so it can be restyled.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Describe subject, pose, features and setting.
    async fn describe(&self, upload: &ImageUpload) -> Result<String, UpstreamError>;
}
