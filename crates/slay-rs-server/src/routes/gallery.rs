//! Gallery read and write routes.

use super::optional_json;
use crate::error::ApiError;
use crate::response::{Envelope, success};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use log::info;
use serde::{Deserialize, Serialize};
use slay_rs_gallery::{DailyCount, GalleryRecord, latest_count};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateImage {
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageList {
    images: Vec<Arc<GalleryRecord>>,
    count: usize,
}

impl From<Vec<Arc<GalleryRecord>>> for ImageList {
    fn from(images: Vec<Arc<GalleryRecord>>) -> Self {
        Self {
            count: images.len(),
            images,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatedImage {
    image: Arc<GalleryRecord>,
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Envelope<CreatedImage>>), ApiError> {
    let request: CreateImage = optional_json(body)?;
    let image = match request.prompt {
        Some(prompt) => state.gallery.insert_with_prompt(request.image_url, prompt)?,
        None => state.gallery.insert(request.image_url)?,
    };
    info!("image stored (id={}, sequence={})", image.id, image.sequence);
    Ok((StatusCode::CREATED, success(CreatedImage { image })))
}

pub(crate) async fn list_all(State(state): State<AppState>) -> Json<Envelope<ImageList>> {
    success(state.gallery.list_all().into())
}

pub(crate) async fn latest_default(State(state): State<AppState>) -> Json<Envelope<ImageList>> {
    success(state.gallery.list_latest(0).into())
}

pub(crate) async fn latest(
    State(state): State<AppState>,
    Path(count): Path<String>,
) -> Json<Envelope<ImageList>> {
    success(state.gallery.list_latest(latest_count(Some(&count))).into())
}

pub(crate) async fn stats(State(state): State<AppState>) -> Json<Envelope<DailyCount>> {
    success(state.gallery.count_today())
}
