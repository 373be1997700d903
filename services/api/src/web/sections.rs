//! services/api/src/web/sections.rs
//!
//! Section CRUD. Payloads are validated against the section type's schema
//! before any write; an empty payload is allowed so a host can create the
//! section first and fill it in later. Every operation resolves the parent
//! chain for an ownership check - a section behind someone else's
//! welcomebook answers Forbidden, an unknown id answers NotFound.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::error::RequestError;
use crate::web::media::MediaResponse;
use crate::web::state::{AppState, CurrentUser};
use welcomebook_core::authz::ensure_owner_or_super_admin;
use welcomebook_core::domain::{Section, SectionType};
use welcomebook_core::ports::SectionUpdate;
use welcomebook_core::sections::validate_section_data;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    pub welcomebook_id: Uuid,
    #[serde(rename = "type")]
    pub section_type: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    pub position: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub data_en: Option<Value>,
    pub position: Option<i32>,
    pub custom_title: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: Uuid,
    pub welcomebook_id: Uuid,
    #[serde(rename = "type")]
    pub section_type: String,
    #[schema(value_type = Object)]
    pub data: Value,
    #[schema(value_type = Option<Object>)]
    pub data_en: Option<Value>,
    pub position: i32,
    pub custom_title: Option<String>,
    pub media: Vec<MediaResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Section> for SectionResponse {
    fn from(s: Section) -> Self {
        Self {
            id: s.id,
            welcomebook_id: s.welcomebook_id,
            section_type: s.section_type.as_str().to_string(),
            data: s.data,
            data_en: s.data_en,
            position: s.position,
            custom_title: s.custom_title,
            media: s.media.into_iter().map(Into::into).collect(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn payload_is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Validation precedes the write and is skipped for empty payloads.
fn validate_nonempty(ty: SectionType, data: &Value) -> Result<(), RequestError> {
    if payload_is_empty(data) {
        return Ok(());
    }
    validate_section_data(ty, data)?;
    Ok(())
}

/// Resolves a section and checks the caller may touch its welcomebook.
pub(crate) async fn load_section_checked(
    state: &AppState,
    current: &CurrentUser,
    section_id: Uuid,
) -> Result<Section, RequestError> {
    let section = state.store.get_section(section_id).await?;
    let welcomebook = state.store.get_welcomebook(section.welcomebook_id).await?;
    ensure_owner_or_super_admin(&current.actor(), welcomebook.user_id)?;
    Ok(section)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /sections - Create a section for a welcomebook.
#[utoipa::path(
    post,
    path = "/sections",
    request_body = CreateSectionRequest,
    responses(
        (status = 201, description = "Section created", body = SectionResponse),
        (status = 400, description = "Unknown type or invalid payload"),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn create_section_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateSectionRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let section_type: SectionType = req
        .section_type
        .parse()
        .map_err(RequestError::BadRequest)?;

    let welcomebook = state.store.get_welcomebook(req.welcomebook_id).await?;
    ensure_owner_or_super_admin(&current.actor(), welcomebook.user_id)?;

    let data = req.data.unwrap_or_else(|| Value::Object(Default::default()));
    validate_nonempty(section_type, &data)?;

    let section = state
        .store
        .create_section(
            welcomebook.id,
            section_type,
            data,
            req.position.unwrap_or(0),
        )
        .await?;
    info!(
        "user {} added {} section to '{}'",
        current.email,
        section_type.as_str(),
        welcomebook.property_name
    );

    Ok((StatusCode::CREATED, Json(SectionResponse::from(section))))
}

/// GET /sections/{id} - Fetch one section with its media.
#[utoipa::path(
    get,
    path = "/sections/{id}",
    params(("id" = Uuid, Path, description = "Section id")),
    responses(
        (status = 200, description = "The section", body = SectionResponse),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn get_section_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let section = load_section_checked(&state, &current, id).await?;
    Ok(Json(SectionResponse::from(section)))
}

/// PUT /sections/{id} - Update payloads, position, or custom title.
/// The primary payload is validated against the stored type when non-empty.
#[utoipa::path(
    put,
    path = "/sections/{id}",
    params(("id" = Uuid, Path, description = "Section id")),
    request_body = UpdateSectionRequest,
    responses(
        (status = 200, description = "Updated section", body = SectionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn update_section_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSectionRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let existing = load_section_checked(&state, &current, id).await?;

    if let Some(data) = &req.data {
        validate_nonempty(existing.section_type, data)?;
    }
    if let Some(data_en) = &req.data_en {
        validate_nonempty(existing.section_type, data_en)?;
    }

    let section = state
        .store
        .update_section(
            id,
            SectionUpdate {
                data: req.data,
                data_en: req.data_en,
                position: req.position,
                custom_title: req.custom_title,
            },
        )
        .await?;

    Ok(Json(SectionResponse::from(section)))
}

/// DELETE /sections/{id} - Remove a section (media rows cascade).
#[utoipa::path(
    delete,
    path = "/sections/{id}",
    params(("id" = Uuid, Path, description = "Section id")),
    responses(
        (status = 200, description = "Section deleted"),
        (status = 403, description = "Not the welcomebook owner"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn delete_section_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let section = load_section_checked(&state, &current, id).await?;
    state.store.delete_section(section.id).await?;
    info!("user {} deleted section {}", current.email, section.id);
    Ok(StatusCode::OK)
}
