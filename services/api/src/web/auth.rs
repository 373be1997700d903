//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: signup, login, logout, and self-service
//! password change.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::web::error::RequestError;
use crate::web::middleware::{session_from_cookie, SESSION_COOKIE};
use crate::web::state::{AppState, CurrentUser};
use welcomebook_core::domain::Role;
use welcomebook_core::ports::PortError;

const SESSION_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn session_cookie(session_id: &str, max_age_seconds: i64) -> String {
    format!(
        "{SESSION_COOKIE}={session_id}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={max_age_seconds}"
    )
}

fn check_password_length(password: &str) -> Result<(), RequestError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(RequestError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

async fn open_session(state: &AppState, user_id: Uuid) -> Result<String, RequestError> {
    let session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    state
        .store
        .create_auth_session(&session_id, user_id, expires_at)
        .await?;
    Ok(session_id)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new account with the USER role.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing or too-short fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim().to_string();
    if email.is_empty() || name.is_empty() {
        return Err(RequestError::BadRequest(
            "email and name are required".to_string(),
        ));
    }
    check_password_length(&req.password)?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        error!("failed to hash password: {e}");
        RequestError::Internal("password hashing failed".to_string())
    })?;

    // Self-service signup always lands on the lowest tier.
    let user = state
        .store
        .create_user(&email, &name, &password_hash, Role::User)
        .await?;
    info!("new user signed up: {}", user.email);

    let session_id = open_session(&state, user.id).await?;
    let cookie = session_cookie(&session_id, Duration::days(SESSION_DAYS).num_seconds());

    let response = AuthResponse {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role.as_str().to_string(),
    };
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with existing account.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let email = req.email.trim().to_lowercase();

    // A missing account and a wrong password produce the same answer.
    let creds = match state.store.get_credentials_by_email(&email).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => return Err(RequestError::Unauthenticated),
        Err(e) => return Err(e.into()),
    };

    let valid = verify_password(&req.password, &creds.password_hash).map_err(|e| {
        error!("stored hash for {} is unreadable: {e}", creds.email);
        RequestError::Internal("authentication error".to_string())
    })?;
    if !valid || !creds.is_active {
        return Err(RequestError::Unauthenticated);
    }

    let session_id = open_session(&state, creds.id).await?;
    let cookie = session_cookie(&session_id, Duration::days(SESSION_DAYS).num_seconds());

    let response = AuthResponse {
        user_id: creds.id,
        email: creds.email,
        name: creds.name,
        role: creds.role.as_str().to_string(),
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Logout and invalidate the session.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RequestError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(RequestError::Unauthenticated)?;
    let session_id = session_from_cookie(cookie_header).ok_or(RequestError::Unauthenticated)?;

    state.store.delete_auth_session(session_id).await?;

    let cookie = session_cookie("", 0);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// POST /auth/change-password - Change the caller's own password.
/// Requires the current password to match; this is also the only way a
/// SUPER_ADMIN may change their own credentials.
#[utoipa::path(
    post,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password wrong or new one too short"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, RequestError> {
    check_password_length(&req.new_password)?;

    let creds = state.store.get_credentials_by_id(current.id).await?;
    let valid = verify_password(&req.current_password, &creds.password_hash).map_err(|e| {
        error!("stored hash for {} is unreadable: {e}", creds.email);
        RequestError::Internal("authentication error".to_string())
    })?;
    if !valid {
        return Err(RequestError::BadRequest(
            "current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&req.new_password).map_err(|e| {
        error!("failed to hash password: {e}");
        RequestError::Internal("password hashing failed".to_string())
    })?;
    state.store.set_password(current.id, &new_hash).await?;
    info!("user {} changed their password", creds.email);

    Ok(Json(MessageResponse {
        message: "password updated".to_string(),
    }))
}
