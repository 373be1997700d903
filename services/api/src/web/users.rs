//! services/api/src/web/users.rs
//!
//! Account administration: listing, provisioning, role and active-flag
//! changes, password resets, and deletion. Every endpoint here is
//! SUPER_ADMIN only, and none of them may be applied to the caller's own
//! account - self-service lives under /auth.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::password::{hash_password, TEMP_PASSWORD};
use crate::web::error::RequestError;
use crate::web::state::{AppState, CurrentUser};
use welcomebook_core::authz::{ensure_not_self, ensure_super_admin, SelfAction};
use welcomebook_core::domain::{Role, User, UserSummary};
use welcomebook_core::ports::UserUpdate;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    /// `USER` or `ADMIN`; provisioning another super admin is not allowed.
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.as_str().to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub welcomebook_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserSummary> for UserListItem {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.as_str().to_string(),
            is_active: u.is_active,
            welcomebook_count: u.welcomebook_count,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Issued on provisioning and on password reset so the admin can hand the
/// temporary password to the account holder.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub temporary_password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUserResponse {
    pub message: String,
    pub welcomebooks_deleted: i64,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Parses a requested role and caps it at ADMIN: the only path to
/// SUPER_ADMIN is out-of-band.
fn parse_assignable_role(raw: Option<&str>) -> Result<Role, RequestError> {
    let role: Role = match raw {
        None => Role::User,
        Some(raw) => raw.parse().map_err(RequestError::BadRequest)?,
    };
    if role.is_super_admin() {
        return Err(RequestError::BadRequest(
            "cannot assign the SUPER_ADMIN role".into(),
        ));
    }
    Ok(role)
}

fn hash_or_internal(plain: &str) -> Result<String, RequestError> {
    hash_password(plain).map_err(|e| {
        error!("failed to hash password: {e}");
        RequestError::Internal("password hashing failed".to_string())
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /users - Every account with its welcomebook count, newest first.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All accounts", body = [UserListItem]),
        (status = 403, description = "Super admin privileges required")
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;
    let users = state.store.list_users().await?;
    let items: Vec<UserListItem> = users.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// POST /users - Provision an account with the temporary password.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = ProvisionedUserResponse),
        (status = 400, description = "Missing fields or unassignable role"),
        (status = 403, description = "Super admin privileges required"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;

    let email = req.email.trim().to_lowercase();
    let name = req.name.trim().to_string();
    if email.is_empty() || name.is_empty() {
        return Err(RequestError::BadRequest(
            "email and name are required".to_string(),
        ));
    }
    let role = parse_assignable_role(req.role.as_deref())?;

    let password_hash = hash_or_internal(TEMP_PASSWORD)?;
    let user = state
        .store
        .create_user(&email, &name, &password_hash, role)
        .await?;
    info!(
        "super admin {} provisioned {} account for {}",
        current.email,
        role.as_str(),
        user.email
    );

    Ok((
        StatusCode::CREATED,
        Json(ProvisionedUserResponse {
            user: user.into(),
            temporary_password: TEMP_PASSWORD.to_string(),
        }),
    ))
}

/// PATCH /users/{id} - Change an account's role or active flag.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Unknown or unassignable role"),
        (status = 403, description = "Super admin privileges required, or self-targeting"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;
    let target = state.store.get_user_by_id(id).await?;

    let role = match req.role.as_deref() {
        Some(raw) => {
            ensure_not_self(&current.actor(), target.id, SelfAction::ChangeRole)?;
            Some(parse_assignable_role(Some(raw))?)
        }
        None => None,
    };
    if req.is_active == Some(false) {
        ensure_not_self(&current.actor(), target.id, SelfAction::Deactivate)?;
    }

    let user = state
        .store
        .update_user(
            target.id,
            UserUpdate {
                role,
                is_active: req.is_active,
            },
        )
        .await?;
    info!("super admin {} updated account {}", current.email, user.email);
    Ok(Json(UserResponse::from(user)))
}

/// POST /users/{id}/reset-password - Reset an account back to the
/// temporary password.
#[utoipa::path(
    post,
    path = "/users/{id}/reset-password",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Password reset", body = ProvisionedUserResponse),
        (status = 403, description = "Super admin privileges required, or self-targeting"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;
    let target = state.store.get_user_by_id(id).await?;
    ensure_not_self(&current.actor(), target.id, SelfAction::ResetPassword)?;

    let password_hash = hash_or_internal(TEMP_PASSWORD)?;
    state.store.set_password(target.id, &password_hash).await?;
    info!(
        "super admin {} reset the password for {}",
        current.email, target.email
    );

    Ok(Json(ProvisionedUserResponse {
        user: target.into(),
        temporary_password: TEMP_PASSWORD.to_string(),
    }))
}

/// DELETE /users/{id} - Delete an account and everything it owns.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted", body = DeletedUserResponse),
        (status = 403, description = "Super admin privileges required, or self-targeting"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RequestError> {
    ensure_super_admin(&current.actor())?;
    let target = state.store.get_user_by_id(id).await?;
    ensure_not_self(&current.actor(), target.id, SelfAction::Delete)?;

    let welcomebooks_deleted = state.store.count_welcomebooks_for_user(target.id).await?;
    state.store.delete_user(target.id).await?;
    info!(
        "super admin {} deleted account {} ({} welcomebooks)",
        current.email, target.email, welcomebooks_deleted
    );

    Ok(Json(DeletedUserResponse {
        message: format!("user {} deleted", target.email),
        welcomebooks_deleted,
    }))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_defaults_to_user() {
        assert_eq!(parse_assignable_role(None).unwrap(), Role::User);
    }

    #[test]
    fn admin_is_assignable() {
        assert_eq!(parse_assignable_role(Some("ADMIN")).unwrap(), Role::Admin);
    }

    #[test]
    fn super_admin_is_not_assignable() {
        assert!(parse_assignable_role(Some("SUPER_ADMIN")).is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(parse_assignable_role(Some("OWNER")).is_err());
    }
}
