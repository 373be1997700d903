//! crates/welcomebook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or blob storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    Media, MediaKind, NewVisit, Role, Section, SectionType, User, UserCredentials, UserSummary,
    Welcomebook, WelcomebookSummary, WelcomebookWithSections,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint (email, slug) was violated at persistence
    /// time. Slug generation is check-then-write, so concurrent creations
    /// can land here; the conflict is reported, not retried.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Mutation Inputs
//=========================================================================================

/// Partial update for a section. `None` leaves the column unchanged.
/// A blank `custom_title` effectively restores the type's default title,
/// since the render selector ignores blank overrides.
#[derive(Debug, Clone, Default)]
pub struct SectionUpdate {
    pub data: Option<Value>,
    pub data_en: Option<Value>,
    pub position: Option<i32>,
    pub custom_title: Option<String>,
}

/// Partial update for a user's role and active flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserUpdate {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

//=========================================================================================
// The Store Port
//=========================================================================================

/// The relational persistence boundary. One implementation per backend;
/// handlers depend only on this trait.
#[async_trait]
pub trait Store: Send + Sync {
    // --- User Management ---
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_credentials_by_id(&self, user_id: Uuid) -> PortResult<UserCredentials>;

    /// Everyone, newest first, with their welcomebook counts.
    async fn list_users(&self) -> PortResult<Vec<UserSummary>>;

    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> PortResult<User>;

    async fn set_password(&self, user_id: Uuid, password_hash: &str) -> PortResult<()>;

    async fn count_welcomebooks_for_user(&self, user_id: Uuid) -> PortResult<i64>;

    /// Cascades: owned welcomebooks, their sections, those sections' media.
    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves an unexpired session to its user id.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Welcomebooks ---
    async fn create_welcomebook(
        &self,
        user_id: Uuid,
        property_name: &str,
        slug: &str,
    ) -> PortResult<Welcomebook>;

    async fn get_welcomebook(&self, id: Uuid) -> PortResult<Welcomebook>;

    async fn get_welcomebook_with_sections(&self, id: Uuid)
        -> PortResult<WelcomebookWithSections>;

    async fn get_welcomebook_by_slug(&self, slug: &str) -> PortResult<WelcomebookWithSections>;

    /// `owner = None` lists every tenant's books (admin view), most recently
    /// updated first.
    async fn list_welcomebooks(&self, owner: Option<Uuid>) -> PortResult<Vec<WelcomebookSummary>>;

    async fn update_welcomebook(
        &self,
        id: Uuid,
        property_name: &str,
        slug: &str,
    ) -> PortResult<Welcomebook>;

    async fn delete_welcomebook(&self, id: Uuid) -> PortResult<()>;

    async fn transfer_welcomebook(&self, id: Uuid, new_owner: Uuid) -> PortResult<Welcomebook>;

    async fn set_sensitive_expiry(
        &self,
        id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> PortResult<Welcomebook>;

    /// Persisted slugs equal to `base` or starting with `base-`, optionally
    /// excluding one record (its own slug during rename).
    async fn slugs_starting_with(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> PortResult<Vec<String>>;

    // --- Sections ---
    async fn create_section(
        &self,
        welcomebook_id: Uuid,
        section_type: SectionType,
        data: Value,
        position: i32,
    ) -> PortResult<Section>;

    async fn get_section(&self, id: Uuid) -> PortResult<Section>;

    async fn update_section(&self, id: Uuid, update: SectionUpdate) -> PortResult<Section>;

    async fn delete_section(&self, id: Uuid) -> PortResult<()>;

    // --- Media ---
    async fn create_media(
        &self,
        section_id: Uuid,
        kind: MediaKind,
        url: &str,
        filename: &str,
    ) -> PortResult<Media>;

    async fn get_media(&self, id: Uuid) -> PortResult<Media>;

    async fn delete_media(&self, id: Uuid) -> PortResult<()>;

    // --- Visits ---
    async fn record_visit(&self, welcomebook_id: Uuid, visit: NewVisit) -> PortResult<()>;

    async fn count_visits(&self, welcomebook_id: Uuid) -> PortResult<i64>;
}

//=========================================================================================
// The Blob Store Port
//=========================================================================================

/// Byte storage for uploaded media. Writes return a retrievable locator;
/// deletion is best-effort.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the bytes and returns the public url they can be fetched at.
    async fn save(&self, original_filename: &str, bytes: &[u8]) -> PortResult<String>;

    /// Removes the blob behind a previously returned locator. Failures are
    /// reported but callers treat them as non-fatal.
    async fn remove(&self, url: &str) -> PortResult<()>;
}
