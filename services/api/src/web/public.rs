//! services/api/src/web/public.rs
//!
//! The unauthenticated guest surface: one endpoint that resolves a slug to
//! the rendered guide. Opening it records a visit, but a failed visit write
//! never blocks the guest from reading the guide.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::error::RequestError;
use crate::web::media::MediaResponse;
use crate::web::state::AppState;
use welcomebook_core::domain::NewVisit;
use welcomebook_core::render::{render_guide, Language, PublicGuide, RenderedSection};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct PublicGuideQuery {
    /// `es` (default) or `en`.
    pub lang: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicSectionResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub section_type: String,
    pub title: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub media: Vec<MediaResponse>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicGuideResponse {
    pub property_name: String,
    pub slug: String,
    pub sensitive_access: String,
    pub under_construction: bool,
    pub sections: Vec<PublicSectionResponse>,
}

fn to_section_response(section: RenderedSection) -> PublicSectionResponse {
    let data = serde_json::to_value(&section.payload).unwrap_or(Value::Null);
    PublicSectionResponse {
        id: section.id,
        section_type: section.section_type.as_str().to_string(),
        title: section.title,
        data,
        media: section.media.into_iter().map(Into::into).collect(),
    }
}

fn to_guide_response(guide: PublicGuide) -> PublicGuideResponse {
    let under_construction = guide.is_under_construction();
    PublicGuideResponse {
        property_name: guide.property_name,
        slug: guide.slug,
        sensitive_access: guide.sensitive_access.as_str().to_string(),
        under_construction,
        sections: guide.sections.into_iter().map(to_section_response).collect(),
    }
}

//=========================================================================================
// Visit capture
//=========================================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Builds visit metadata from request headers. The client address comes
/// from the proxy headers since the service runs behind a reverse proxy.
fn visit_from_headers(headers: &HeaderMap) -> NewVisit {
    let ip_address = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("unknown")
        .to_string();

    NewVisit {
        ip_address,
        user_agent: header_str(headers, "user-agent").map(str::to_string),
        referer: header_str(headers, "referer").map(str::to_string),
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// GET /p/{slug} - The public guide behind a slug.
#[utoipa::path(
    get,
    path = "/p/{slug}",
    params(
        ("slug" = String, Path, description = "Public address of the guide"),
        ("lang" = Option<String>, Query, description = "es (default) or en")
    ),
    responses(
        (status = 200, description = "Rendered guide", body = PublicGuideResponse),
        (status = 400, description = "Unsupported language"),
        (status = 404, description = "No guide behind this slug")
    )
)]
pub async fn public_guide_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PublicGuideQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RequestError> {
    let lang = match query.lang.as_deref() {
        None => Language::default(),
        Some(raw) => raw.parse().map_err(RequestError::BadRequest)?,
    };

    let book = state.store.get_welcomebook_by_slug(&slug).await?;

    // Visit capture must never cost the guest their page.
    let visit = visit_from_headers(&headers);
    if let Err(err) = state
        .store
        .record_visit(book.welcomebook.id, visit)
        .await
    {
        warn!("failed to record visit for /p/{slug}: {err}");
    }

    let now: DateTime<Utc> = Utc::now();
    let guide = render_guide(&book, lang, now);
    Ok(Json(to_guide_response(guide)))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let visit = visit_from_headers(&headers(&[(
            "x-forwarded-for",
            "203.0.113.9, 10.0.0.1",
        )]));
        assert_eq!(visit.ip_address, "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let visit = visit_from_headers(&headers(&[("x-real-ip", "198.51.100.4")]));
        assert_eq!(visit.ip_address, "198.51.100.4");
    }

    #[test]
    fn missing_proxy_headers_degrade_to_unknown() {
        let visit = visit_from_headers(&headers(&[("user-agent", "guestbook-test")]));
        assert_eq!(visit.ip_address, "unknown");
        assert_eq!(visit.user_agent.as_deref(), Some("guestbook-test"));
        assert!(visit.referer.is_none());
    }
}
