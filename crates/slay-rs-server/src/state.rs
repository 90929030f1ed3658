//! Shared handler state.

use slay_rs_config::SlayConfig;
use slay_rs_gallery::BoundedRecordLog;
use slay_rs_upstream::{ImageAnalyzer, ImageGenerator, OpenAiClient, StylePicker, UpstreamError};
use std::sync::Arc;

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide gallery.
    pub gallery: Arc<BoundedRecordLog>,
    /// Image generation backend.
    pub generator: Arc<dyn ImageGenerator>,
    /// Vision backend for uploads.
    pub analyzer: Arc<dyn ImageAnalyzer>,
    /// Random style source for `/api/generate`.
    pub styles: Arc<StylePicker>,
    /// Whether the upstream has credentials, reported by `/api/health`.
    pub upstream_configured: bool,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(
        gallery: Arc<BoundedRecordLog>,
        generator: Arc<dyn ImageGenerator>,
        analyzer: Arc<dyn ImageAnalyzer>,
    ) -> Self {
        Self {
            gallery,
            generator,
            analyzer,
            styles: Arc::new(StylePicker::default()),
            upstream_configured: true,
        }
    }

    /// Replace the style picker.
    pub fn with_styles(mut self, styles: StylePicker) -> Self {
        self.styles = Arc::new(styles);
        self
    }

    /// Override the reported upstream status.
    pub fn with_upstream_configured(mut self, configured: bool) -> Self {
        self.upstream_configured = configured;
        self
    }

    /// Production state: one OpenAI client serving both traits.
    pub fn from_config(config: &SlayConfig) -> Result<Self, UpstreamError> {
        let gallery = BoundedRecordLog::new(config.gallery.capacity)
            .with_default_latest(config.gallery.default_latest);
        let client = Arc::new(OpenAiClient::new(&config.upstream)?);
        let configured = client.is_configured();
        Ok(Self::new(Arc::new(gallery), client.clone(), client)
            .with_styles(StylePicker::new(config.styles.seed))
            .with_upstream_configured(configured))
    }
}
