//! Record model stored by the gallery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One generated image kept in the gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Insertion order within this process, strictly increasing.
    pub sequence: u64,
    /// Opaque image payload, usually a data URL.
    #[serde(rename = "imageUrl")]
    pub payload: String,
    /// Prompt that produced the image, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts returned by `count_today`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DailyCount {
    /// Records currently held.
    pub total: usize,
    /// Records created on the current local calendar day.
    pub today: usize,
}
