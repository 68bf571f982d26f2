use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use safari_core::admin::{GalleryImage, GalleryImageView, NewGalleryImage};
use safari_core::{ListQuery, Page};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub title: String,
    pub content_type: String,
    /// Base64, optionally as a `data:<type>;base64,` URL.
    pub data: String,
}

/// Room for the JSON envelope (title, content type, data-URL prefix).
const UPLOAD_ENVELOPE_BYTES: usize = 64 * 1024;

/// Request body cap for uploads: base64 of `max_upload_bytes` plus the envelope.
pub fn upload_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.div_ceil(3) * 4 + UPLOAD_ENVELOPE_BYTES
}

pub fn to_view(image: GalleryImage) -> GalleryImageView {
    GalleryImageView {
        size_bytes: image.size_bytes(),
        data: STANDARD.encode(&image.data),
        id: image.id,
        title: image.title,
        content_type: image.content_type,
        created_at: image.created_at,
    }
}

fn decode_payload(data: &str) -> Result<Vec<u8>, AppError> {
    let encoded = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Validation(format!("Invalid base64 image data: {}", e)))
}

/// GET /api/admin/gallery
pub async fn list_images(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<GalleryImageView>>, AppError> {
    let page = state.gallery.list_images(&query).await?;
    Ok(Json(page.map(to_view)))
}

/// POST /api/admin/gallery
pub async fn upload_image(
    State(state): State<AppState>,
    AppJson(req): AppJson<UploadImageRequest>,
) -> Result<(StatusCode, Json<GalleryImageView>), AppError> {
    let image = NewGalleryImage {
        title: req.title.trim().to_string(),
        content_type: req.content_type.trim().to_ascii_lowercase(),
        data: decode_payload(&req.data)?,
    };
    image.validate(state.business_rules.max_upload_bytes)?;

    let stored = state.gallery.save_image(image).await?;
    info!("Gallery image {} uploaded ({} bytes)", stored.id, stored.size_bytes());
    Ok((StatusCode::CREATED, Json(to_view(stored))))
}

/// DELETE /api/admin/gallery/{id}
pub async fn delete_image(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.gallery.delete_image(id).await?;
    info!("Gallery image {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_data_url() {
        assert_eq!(decode_payload("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_payload("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        assert!(decode_payload("not base64!").is_err());
    }

    #[test]
    fn test_upload_body_limit_covers_base64_expansion() {
        let max = 5 * 1024 * 1024;
        let limit = upload_body_limit(max);
        assert!(limit >= STANDARD.encode(vec![0u8; max]).len());
        assert!(limit > 2 * 1024 * 1024);
    }
}
