//! services/api/src/web/welcomebooks.rs
//!
//! Welcomebook CRUD plus the ownership-scoped list, cross-tenant transfer,
//! sensitive-access window controls, and the visit counter. Slugs are
//! derived from the property name and disambiguated against whatever is
//! already persisted; a rename regenerates the slug unless the caller pins
//! one explicitly.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::error::RequestError;
use crate::web::sections::SectionResponse;
use crate::web::state::{AppState, CurrentUser};
use welcomebook_core::access::{access_status, activation_expiry, validate_access_hours};
use welcomebook_core::authz::{
    can_view_all_welcomebooks, ensure_owner_or_super_admin, ensure_super_admin,
};
use welcomebook_core::domain::{Welcomebook, WelcomebookSummary};
use welcomebook_core::slug::{generate_slug, is_valid_slug, unique_slug};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWelcomebookRequest {
    pub property_name: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWelcomebookRequest {
    pub property_name: String,
    /// Pins an explicit slug instead of regenerating from the name.
    pub slug: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub new_user_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct ActivateAccessRequest {
    /// Window length; defaults to 48 hours when omitted, capped at one year.
    pub hours: Option<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomebookResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_name: String,
    pub slug: String,
    pub sensitive_data_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Welcomebook> for WelcomebookResponse {
    fn from(wb: Welcomebook) -> Self {
        Self {
            id: wb.id,
            user_id: wb.user_id,
            property_name: wb.property_name,
            slug: wb.slug,
            sensitive_data_expires_at: wb.sensitive_data_expires_at,
            created_at: wb.created_at,
            updated_at: wb.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomebookOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomebookListItem {
    #[serde(flatten)]
    pub welcomebook: WelcomebookResponse,
    pub owner: WelcomebookOwner,
    pub section_count: i64,
}

impl From<WelcomebookSummary> for WelcomebookListItem {
    fn from(summary: WelcomebookSummary) -> Self {
        let owner = WelcomebookOwner {
            id: summary.welcomebook.user_id,
            name: summary.owner_name,
            email: summary.owner_email,
        };
        Self {
            welcomebook: summary.welcomebook.into(),
            owner,
            section_count: summary.section_count,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomebookDetailResponse {
    #[serde(flatten)]
    pub welcomebook: WelcomebookResponse,
    pub sections: Vec<SectionResponse>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatusResponse {
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessStatusResponse {
    fn for_book(wb: &Welcomebook, now: DateTime<Utc>) -> Self {
        let status = access_status(wb.sensitive_data_expires_at, now);
        Self {
            status: status.as_str().to_string(),
            expires_at: wb.sensitive_data_expires_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct VisitCountResponse {
    pub count: i64,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Derives a unique slug for `property_name`, skipping slugs already held by
/// other welcomebooks. `exclude` lets a rename keep its current slug.
async fn derive_slug(
    state: &AppState,
    property_name: &str,
    exclude: Option<Uuid>,
) -> Result<String, RequestError> {
    let base = generate_slug(property_name);
    if !is_valid_slug(&base) {
        return Err(RequestError::BadRequest(
            "property name does not contain any characters usable in a public address".into(),
        ));
    }
    let taken: HashSet<String> = state
        .store
        .slugs_starting_with(&base, exclude)
        .await?
        .into_iter()
        .collect();
    Ok(unique_slug(&base, &taken))
}

async fn load_welcomebook_checked(
    state: &AppState,
    current: &CurrentUser,
    id: Uuid,
) -> Result<Welcomebook, RequestError> {
    let wb = state.store.get_welcomebook(id).await?;
    ensure_owner_or_super_admin(&current.actor(), wb.user_id)?;
    Ok(wb)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /welcomebooks - The caller's welcomebooks; every tenant's for a
/// super admin.
#[utoipa::path(
    get,
    path = "/welcomebooks",
    responses(
        (status = 200, description = "Welcomebooks visible to the caller", body = [WelcomebookListItem])
    )
)]
pub async fn list_welcomebooks_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, RequestError> {
    let owner = if can_view_all_welcomebooks(&current.actor()) {
        None
    } else {
        Some(current.id)
    };
    let summaries = state.store.list_welcomebooks(owner).await?;
    let items: Vec<WelcomebookListItem> = summaries.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// POST /welcomebooks - Create a welcomebook owned by the caller.
#[utoipa::path(
    post,
    path = "/welcomebooks",
    request_body = CreateWelcomebookRequest,
    responses(
        (status = 201, description = "Welcomebook created", body = WelcomebookResponse),
        (status = 400, description = "Empty or unusable property name"),
        (status = 403, description = "Caller's account is deactivated")
    )
)]
pub async fn create_welcomebook_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateWelcomebookRequest>,
) -> Result<impl IntoResponse, RequestError> {
    if !current.is_active {
        return Err(RequestError::Forbidden(
            "deactivated accounts cannot create welcomebooks".into(),
        ));
    }
    let property_name = req.property_name.trim();
    if property_name.is_empty() {
        return Err(RequestError::BadRequest("property name is required".into()));
    }

    let slug = derive_slug(&state, property_name, None).await?;
    let wb = state
        .store
        .create_welcomebook(current.id, property_name, &slug)
        .await?;
    info!(
        "user {} created welcomebook '{}' at /p/{}",
        current.email, wb.property_name, wb.slug
    );
    Ok((StatusCode::CREATED, Json(WelcomebookResponse::from(wb))))
}

/// GET /welcomebooks/{id} - One welcomebook with its ordered sections.
#[utoipa::path(
    get,
    path = "/welcomebooks/{id}",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    responses(
        (status = 200, description = "Welcomebook with sections", body = WelcomebookDetailResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn get_welcomebook_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let detail = state.store.get_welcomebook_with_sections(id).await?;
    ensure_owner_or_super_admin(&current.actor(), detail.welcomebook.user_id)?;
    Ok(Json(WelcomebookDetailResponse {
        welcomebook: detail.welcomebook.into(),
        sections: detail.sections.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /welcomebooks/{id} - Rename a welcomebook. Without an explicit slug
/// the public address is regenerated from the new name.
#[utoipa::path(
    put,
    path = "/welcomebooks/{id}",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    request_body = UpdateWelcomebookRequest,
    responses(
        (status = 200, description = "Updated welcomebook", body = WelcomebookResponse),
        (status = 400, description = "Empty name or malformed slug"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found"),
        (status = 409, description = "Requested slug already in use")
    )
)]
pub async fn update_welcomebook_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWelcomebookRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let existing = load_welcomebook_checked(&state, &current, id).await?;

    let property_name = req.property_name.trim();
    if property_name.is_empty() {
        return Err(RequestError::BadRequest("property name is required".into()));
    }

    let slug = match req.slug {
        Some(requested) => {
            if !is_valid_slug(&requested) {
                return Err(RequestError::BadRequest(format!(
                    "'{requested}' is not a valid slug"
                )));
            }
            let taken = state
                .store
                .slugs_starting_with(&requested, Some(existing.id))
                .await?;
            if taken.iter().any(|s| s == &requested) {
                return Err(RequestError::Conflict(format!(
                    "slug '{requested}' is already in use"
                )));
            }
            requested
        }
        None => derive_slug(&state, property_name, Some(existing.id)).await?,
    };

    let wb = state
        .store
        .update_welcomebook(existing.id, property_name, &slug)
        .await?;
    Ok(Json(WelcomebookResponse::from(wb)))
}

/// DELETE /welcomebooks/{id} - Delete a welcomebook; sections, media rows,
/// and visits cascade.
#[utoipa::path(
    delete,
    path = "/welcomebooks/{id}",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    responses(
        (status = 200, description = "Welcomebook deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn delete_welcomebook_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let wb = load_welcomebook_checked(&state, &current, id).await?;
    state.store.delete_welcomebook(wb.id).await?;
    info!(
        "user {} deleted welcomebook '{}'",
        current.email, wb.property_name
    );
    Ok(StatusCode::OK)
}

/// POST /welcomebooks/{id}/transfer - Move a welcomebook to another owner.
/// Super admin only; the receiving account must be active.
#[utoipa::path(
    post,
    path = "/welcomebooks/{id}/transfer",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transferred welcomebook", body = WelcomebookResponse),
        (status = 400, description = "Target account is deactivated"),
        (status = 403, description = "Super admin privileges required"),
        (status = 404, description = "Welcomebook or target user not found")
    )
)]
pub async fn transfer_welcomebook_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransferRequest>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;

    let wb = state.store.get_welcomebook(id).await?;
    let target = state.store.get_user_by_id(req.new_user_id).await?;
    if !target.is_active {
        return Err(RequestError::BadRequest(
            "cannot transfer to a deactivated account".into(),
        ));
    }

    let wb = state.store.transfer_welcomebook(wb.id, target.id).await?;
    info!(
        "super admin {} transferred '{}' to {}",
        current.email, wb.property_name, target.email
    );
    Ok(Json(WelcomebookResponse::from(wb)))
}

/// POST /welcomebooks/{id}/sensitive-access - Open the sensitive-access
/// window. Re-activation overwrites the previous expiry rather than
/// extending it.
#[utoipa::path(
    post,
    path = "/welcomebooks/{id}/sensitive-access",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    request_body = ActivateAccessRequest,
    responses(
        (status = 200, description = "Window activated", body = AccessStatusResponse),
        (status = 400, description = "Non-positive or over-long duration"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn activate_access_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActivateAccessRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let wb = load_welcomebook_checked(&state, &current, id).await?;
    validate_access_hours(req.hours).map_err(RequestError::BadRequest)?;

    let now = Utc::now();
    let expires_at = activation_expiry(now, req.hours);
    let wb = state
        .store
        .set_sensitive_expiry(wb.id, Some(expires_at))
        .await?;
    info!(
        "user {} opened sensitive access for '{}' until {}",
        current.email, wb.property_name, expires_at
    );
    Ok(Json(AccessStatusResponse::for_book(&wb, now)))
}

/// DELETE /welcomebooks/{id}/sensitive-access - Close the window early.
#[utoipa::path(
    delete,
    path = "/welcomebooks/{id}/sensitive-access",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    responses(
        (status = 200, description = "Window cleared", body = AccessStatusResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn deactivate_access_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let wb = load_welcomebook_checked(&state, &current, id).await?;
    let wb = state.store.set_sensitive_expiry(wb.id, None).await?;
    Ok(Json(AccessStatusResponse::for_book(&wb, Utc::now())))
}

/// GET /welcomebooks/{id}/sensitive-access - Report the window's status.
#[utoipa::path(
    get,
    path = "/welcomebooks/{id}/sensitive-access",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    responses(
        (status = 200, description = "Current window status", body = AccessStatusResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn access_status_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let wb = load_welcomebook_checked(&state, &current, id).await?;
    Ok(Json(AccessStatusResponse::for_book(&wb, Utc::now())))
}

/// GET /welcomebooks/{id}/visits - How many times the public guide was
/// opened.
#[utoipa::path(
    get,
    path = "/welcomebooks/{id}/visits",
    params(("id" = Uuid, Path, description = "Welcomebook id")),
    responses(
        (status = 200, description = "Visit count", body = VisitCountResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Welcomebook not found")
    )
)]
pub async fn visit_count_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    let wb = load_welcomebook_checked(&state, &current, id).await?;
    let count = state.store.count_visits(wb.id).await?;
    Ok(Json(VisitCountResponse { count }))
}
