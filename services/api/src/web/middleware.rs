//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::web::error::RequestError;
use crate::web::state::{AppState, CurrentUser};

pub const SESSION_COOKIE: &str = "session";

/// Extracts the session id from a Cookie header value.
pub fn session_from_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix(SESSION_COOKIE)?.strip_prefix('=')
    })
}

/// Middleware that validates the auth session cookie and loads the caller.
///
/// If valid, inserts a `CurrentUser` into request extensions for handlers to
/// use. If invalid or missing, rejects before any other check runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, RequestError> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(RequestError::Unauthenticated)?;

    let session_id =
        session_from_cookie(cookie_header).ok_or(RequestError::Unauthenticated)?;

    let user_id = state
        .store
        .validate_auth_session(session_id)
        .await
        .map_err(|e| {
            warn!("auth session rejected: {e}");
            RequestError::Unauthenticated
        })?;

    let user = state.store.get_user_by_id(user_id).await.map_err(|e| {
        warn!("session resolved to missing user {user_id}: {e}");
        RequestError::Unauthenticated
    })?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
        is_active: user.is_active,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_session_cookie_among_others() {
        assert_eq!(
            session_from_cookie("theme=dark; session=abc123; lang=es"),
            Some("abc123")
        );
    }

    #[test]
    fn missing_session_cookie_yields_none() {
        assert_eq!(session_from_cookie("theme=dark"), None);
        assert_eq!(session_from_cookie("sessions=abc"), None);
    }
}
