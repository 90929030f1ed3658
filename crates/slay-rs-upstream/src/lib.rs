//! Client side of the external image-generation service.
//!
//! The server only talks to the traits in [`provider`]; `OpenAiClient` is the
//! production implementation and tests swap in fakes.

pub mod data_url;
pub mod error;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod styles;

pub use data_url::{encode_data_url, is_image_mime};
pub use error::UpstreamError;
pub use openai::OpenAiClient;
pub use prompt::{ANALYSIS_INSTRUCTIONS, transformation_prompt};
pub use provider::{GeneratedImage, ImageAnalyzer, ImageGenerator, ImageUpload};
pub use styles::{StylePick, StylePicker};
