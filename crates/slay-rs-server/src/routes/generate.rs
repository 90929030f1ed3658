//! Routes that call the image service and record the result.

use super::optional_json;
use crate::error::ApiError;
use crate::response::{Envelope, success};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use slay_rs_upstream::{ImageUpload, StylePicker, is_image_mime, transformation_prompt};
use uuid::Uuid;

/// Multipart field carrying the upload.
const IMAGE_FIELD: &str = "image";
const GIRLIFIED_MESSAGE: &str = "Slay queen! Your image has been girlified!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Girlified {
    image_url: String,
    id: Uuid,
    message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateRequest {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Generated {
    image_url: String,
    id: Uuid,
    prompt: String,
}

pub(crate) async fn girlify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<Girlified>>, ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let upload = read_upload(multipart).await?;
    info!(
        "received image for girlification (file_name={}, bytes={}, mime={})",
        upload.file_name.as_deref().unwrap_or("-"),
        upload.bytes.len(),
        upload.mime_type
    );

    let analysis = state
        .analyzer
        .describe(&upload)
        .await
        .map_err(|err| ApiError::upstream("Failed to girlify image", err))?;
    debug!("image analysis complete (len={})", analysis.len());

    let prompt = transformation_prompt(&analysis);
    let image = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|err| ApiError::upstream("Failed to girlify image", err))?;
    let prompt = image.revised_prompt.unwrap_or(prompt);
    let record = state.gallery.insert_with_prompt(image.data_url, prompt)?;

    Ok(success(Girlified {
        image_url: record.payload.clone(),
        id: record.id,
        message: GIRLIFIED_MESSAGE,
    }))
}

pub(crate) async fn generate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Envelope<Generated>>, ApiError> {
    let request: GenerateRequest = optional_json(body)?;
    let pick = match request.seed {
        Some(seed) => StylePicker::pick_seeded(seed),
        None => state.styles.pick(),
    };
    let prompt = pick.prompt();
    debug!("generating styled image (seed={:?})", request.seed);

    let image = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|err| ApiError::upstream("Failed to generate image", err))?;
    // Keep the wording the service actually rendered when it reports one.
    let prompt = image.revised_prompt.unwrap_or(prompt);
    let record = state.gallery.insert_with_prompt(image.data_url, prompt.clone())?;
    info!("styled image stored (id={}, sequence={})", record.id, record.sequence);

    Ok(success(Generated {
        image_url: record.payload.clone(),
        id: record.id,
        prompt,
    }))
}

/// Pull the `image` field out of the form, ignoring other fields.
async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        if !is_image_mime(&mime_type) {
            return Err(ApiError::InvalidInput(format!(
                "Only image files are allowed (got {})",
                if mime_type.is_empty() {
                    "no content type"
                } else {
                    mime_type.as_str()
                }
            )));
        }
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("Uploaded image is empty".to_string()));
        }
        return Ok(ImageUpload {
            file_name,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::InvalidInput("No image file provided".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::InvalidInput(err.body_text())
    }
}
