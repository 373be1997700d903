//! services/api/src/web/media.rs
//!
//! Multipart upload and deletion of section media. Photos and videos carry
//! their own content-type allowlists and size ceilings; everything is
//! checked before any byte hits disk. The database row is authoritative -
//! if the row insert fails after the blob was written, the blob is removed
//! so the uploads directory does not accumulate orphans.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::error::RequestError;
use crate::web::sections::load_section_checked;
use crate::web::state::{AppState, CurrentUser};
use welcomebook_core::authz::ensure_owner_or_super_admin;
use welcomebook_core::domain::{Media, MediaKind};

pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;

const PHOTO_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: Uuid,
    pub section_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl From<Media> for MediaResponse {
    fn from(m: Media) -> Self {
        Self {
            id: m.id,
            section_id: m.section_id,
            kind: m.kind.as_str().to_string(),
            url: m.url,
            filename: m.filename,
            created_at: m.created_at,
        }
    }
}

//=========================================================================================
// Upload rules
//=========================================================================================

/// Checks an upload's content type and size against the limits for its kind.
fn check_upload(kind: MediaKind, content_type: &str, size: usize) -> Result<(), String> {
    let (allowed, max_bytes, label) = match kind {
        MediaKind::Photo => (PHOTO_CONTENT_TYPES, MAX_PHOTO_BYTES, "photo"),
        MediaKind::Video => (VIDEO_CONTENT_TYPES, MAX_VIDEO_BYTES, "video"),
    };
    if !allowed.contains(&content_type) {
        return Err(format!(
            "unsupported {label} content type '{content_type}'"
        ));
    }
    if size > max_bytes {
        return Err(format!(
            "{label} exceeds the {} MB limit",
            max_bytes / (1024 * 1024)
        ));
    }
    Ok(())
}

struct UploadParts {
    bytes: Bytes,
    content_type: String,
    filename: String,
    section_id: Uuid,
    kind: MediaKind,
}

/// Pulls the `file`, `sectionId`, and `type` fields out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<UploadParts, RequestError> {
    let mut file: Option<(Bytes, String, String)> = None;
    let mut section_id: Option<Uuid> = None;
    let mut kind: Option<MediaKind> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .ok_or_else(|| {
                        RequestError::BadRequest("file field is missing a content type".into())
                    })?
                    .to_string();
                let filename = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    RequestError::BadRequest(format!("failed to read file field: {e}"))
                })?;
                file = Some((bytes, content_type, filename));
            }
            Some("sectionId") => {
                let text = field.text().await.map_err(|e| {
                    RequestError::BadRequest(format!("failed to read sectionId field: {e}"))
                })?;
                section_id = Some(text.parse().map_err(|_| {
                    RequestError::BadRequest("sectionId is not a valid uuid".into())
                })?);
            }
            Some("type") => {
                let text = field.text().await.map_err(|e| {
                    RequestError::BadRequest(format!("failed to read type field: {e}"))
                })?;
                kind = Some(
                    text.parse()
                        .map_err(RequestError::BadRequest)?,
                );
            }
            _ => {}
        }
    }

    let (bytes, content_type, filename) =
        file.ok_or_else(|| RequestError::BadRequest("file field is required".into()))?;
    let section_id =
        section_id.ok_or_else(|| RequestError::BadRequest("sectionId field is required".into()))?;
    let kind = kind.ok_or_else(|| RequestError::BadRequest("type field is required".into()))?;

    Ok(UploadParts {
        bytes,
        content_type,
        filename,
        section_id,
        kind,
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /media - Upload a photo or video into a section.
#[utoipa::path(
    post,
    path = "/media",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Media stored", body = MediaResponse),
        (status = 400, description = "Missing field, bad content type, or over the size limit"),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn upload_media_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, RequestError> {
    let upload = read_upload(multipart).await?;
    check_upload(upload.kind, &upload.content_type, upload.bytes.len())
        .map_err(RequestError::BadRequest)?;

    let section = load_section_checked(&state, &current, upload.section_id).await?;

    let url = state.blobs.save(&upload.filename, &upload.bytes).await?;

    let media = match state
        .store
        .create_media(section.id, upload.kind, &url, &upload.filename)
        .await
    {
        Ok(media) => media,
        Err(err) => {
            // The blob is already on disk; reclaim it before surfacing the error.
            if let Err(cleanup) = state.blobs.remove(&url).await {
                warn!("failed to remove orphaned upload {url}: {cleanup}");
            }
            return Err(err.into());
        }
    };

    info!(
        "user {} uploaded {} '{}' ({} bytes) to section {}",
        current.email,
        upload.kind.as_str(),
        upload.filename,
        upload.bytes.len(),
        section.id
    );
    Ok((StatusCode::CREATED, Json(MediaResponse::from(media))))
}

/// DELETE /media/{id} - Remove a media item and its stored file.
#[utoipa::path(
    delete,
    path = "/media/{id}",
    params(("id" = Uuid, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media deleted"),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Media not found")
    )
)]
pub async fn delete_media_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let media = state.store.get_media(id).await?;
    let section = state.store.get_section(media.section_id).await?;
    let welcomebook = state.store.get_welcomebook(section.welcomebook_id).await?;
    ensure_owner_or_super_admin(&current.actor(), welcomebook.user_id)?;

    state.store.delete_media(media.id).await?;
    // The row is gone; a leftover file is only a warning.
    if let Err(err) = state.blobs.remove(&media.url).await {
        warn!("failed to remove file for media {}: {err}", media.id);
    }

    info!("user {} deleted media {}", current.email, media.id);
    Ok(StatusCode::OK)
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_upload_within_limits_passes() {
        assert!(check_upload(MediaKind::Photo, "image/png", 5 * 1024 * 1024).is_ok());
        assert!(check_upload(MediaKind::Photo, "image/webp", 1).is_ok());
    }

    #[test]
    fn photo_over_ten_megabytes_is_rejected() {
        let err = check_upload(MediaKind::Photo, "image/jpeg", MAX_PHOTO_BYTES + 1).unwrap_err();
        assert!(err.contains("10 MB"));
    }

    #[test]
    fn video_over_fifty_megabytes_is_rejected() {
        let err = check_upload(MediaKind::Video, "video/mp4", MAX_VIDEO_BYTES + 1).unwrap_err();
        assert!(err.contains("50 MB"));
    }

    #[test]
    fn video_content_types_do_not_apply_to_photos() {
        assert!(check_upload(MediaKind::Photo, "video/mp4", 1024).is_err());
        assert!(check_upload(MediaKind::Video, "image/png", 1024).is_err());
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let err = check_upload(MediaKind::Photo, "image/gif", 1024).unwrap_err();
        assert!(err.contains("image/gif"));
    }

    #[test]
    fn exact_limit_is_allowed() {
        assert!(check_upload(MediaKind::Video, "video/webm", MAX_VIDEO_BYTES).is_ok());
    }
}
