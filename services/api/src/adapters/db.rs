//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `Store` port from the `core` crate. It handles all
//! interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use welcomebook_core::domain::{
    Media, MediaKind, NewVisit, Role, Section, SectionType, User, UserCredentials, UserSummary,
    Welcomebook, WelcomebookSummary, WelcomebookWithSections,
};
use welcomebook_core::ports::{PortError, PortResult, SectionUpdate, Store, UserUpdate};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `Store` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn media_by_section(&self, section_ids: &[Uuid]) -> PortResult<HashMap<Uuid, Vec<Media>>> {
        if section_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let records = sqlx::query_as::<_, MediaRecord>(
            "SELECT id, section_id, kind, url, filename, created_at
             FROM media WHERE section_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(section_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut grouped: HashMap<Uuid, Vec<Media>> = HashMap::new();
        for record in records {
            let section_id = record.section_id;
            grouped.entry(section_id).or_default().push(record.to_domain()?);
        }
        Ok(grouped)
    }

    async fn sections_for_welcomebook(&self, welcomebook_id: Uuid) -> PortResult<Vec<Section>> {
        let records = sqlx::query_as::<_, SectionRecord>(
            "SELECT id, welcomebook_id, section_type, data, data_en, position, custom_title,
                    created_at, updated_at
             FROM sections WHERE welcomebook_id = $1
             ORDER BY position ASC, created_at ASC",
        )
        .bind(welcomebook_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut media = self.media_by_section(&ids).await?;

        records
            .into_iter()
            .map(|r| {
                let attached = media.remove(&r.id).unwrap_or_default();
                r.to_domain(attached)
            })
            .collect()
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a unique-constraint violation to `Conflict`, everything else to
/// `Unexpected`.
fn write_error(e: sqlx::Error, conflict: &str) -> PortError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            PortError::Conflict(conflict.to_string())
        }
        _ => unexpected(e),
    }
}

fn parse_enum<T: std::str::FromStr<Err = String>>(raw: &str) -> PortResult<T> {
    raw.parse::<T>().map_err(PortError::Unexpected)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: parse_enum::<Role>(&self.role)?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    role: String,
    is_active: bool,
}
impl CredentialsRecord {
    fn to_domain(self) -> PortResult<UserCredentials> {
        Ok(UserCredentials {
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            role: parse_enum::<Role>(&self.role)?,
            is_active: self.is_active,
        })
    }
}

#[derive(FromRow)]
struct UserSummaryRecord {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    is_active: bool,
    welcomebook_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserSummaryRecord {
    fn to_domain(self) -> PortResult<UserSummary> {
        Ok(UserSummary {
            id: self.id,
            email: self.email,
            name: self.name,
            role: parse_enum::<Role>(&self.role)?,
            is_active: self.is_active,
            welcomebook_count: self.welcomebook_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct WelcomebookRecord {
    id: Uuid,
    user_id: Uuid,
    property_name: String,
    slug: String,
    sensitive_data_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl WelcomebookRecord {
    fn to_domain(self) -> Welcomebook {
        Welcomebook {
            id: self.id,
            user_id: self.user_id,
            property_name: self.property_name,
            slug: self.slug,
            sensitive_data_expires_at: self.sensitive_data_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct WelcomebookSummaryRecord {
    id: Uuid,
    user_id: Uuid,
    property_name: String,
    slug: String,
    sensitive_data_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
    section_count: i64,
}
impl WelcomebookSummaryRecord {
    fn to_domain(self) -> WelcomebookSummary {
        WelcomebookSummary {
            welcomebook: Welcomebook {
                id: self.id,
                user_id: self.user_id,
                property_name: self.property_name,
                slug: self.slug,
                sensitive_data_expires_at: self.sensitive_data_expires_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            owner_name: self.owner_name,
            owner_email: self.owner_email,
            section_count: self.section_count,
        }
    }
}

#[derive(FromRow)]
struct SectionRecord {
    id: Uuid,
    welcomebook_id: Uuid,
    section_type: String,
    data: Value,
    data_en: Option<Value>,
    position: i32,
    custom_title: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl SectionRecord {
    fn to_domain(self, media: Vec<Media>) -> PortResult<Section> {
        Ok(Section {
            id: self.id,
            welcomebook_id: self.welcomebook_id,
            section_type: parse_enum::<SectionType>(&self.section_type)?,
            data: self.data,
            data_en: self.data_en,
            position: self.position,
            custom_title: self.custom_title,
            media,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct MediaRecord {
    id: Uuid,
    section_id: Uuid,
    kind: String,
    url: String,
    filename: String,
    created_at: DateTime<Utc>,
}
impl MediaRecord {
    fn to_domain(self) -> PortResult<Media> {
        Ok(Media {
            id: self.id,
            section_id: self.section_id,
            kind: parse_enum::<MediaKind>(&self.kind)?,
            url: self.url,
            filename: self.filename,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `Store` Trait Implementation
//=========================================================================================

const USER_COLUMNS: &str = "id, email, name, role, is_active, created_at, updated_at";
const WELCOMEBOOK_COLUMNS: &str =
    "id, user_id, property_name, slug, sensitive_data_expires_at, created_at, updated_at";
const SECTION_COLUMNS: &str = "id, welcomebook_id, section_type, data, data_en, position, \
                               custom_title, created_at, updated_at";

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (email, name, password_hash, role)
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "this email is already registered"))?;
        record.to_domain()
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))?;
        record.to_domain()
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, name, password_hash, role, is_active
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {email} not found")))?;
        record.to_domain()
    }

    async fn get_credentials_by_id(&self, user_id: Uuid) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, name, password_hash, role, is_active
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))?;
        record.to_domain()
    }

    async fn list_users(&self) -> PortResult<Vec<UserSummary>> {
        let records = sqlx::query_as::<_, UserSummaryRecord>(
            "SELECT u.id, u.email, u.name, u.role, u.is_active, u.created_at, u.updated_at,
                    (SELECT COUNT(*) FROM welcomebooks w WHERE w.user_id = u.id)
                        AS welcomebook_count
             FROM users u ORDER BY u.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users
             SET role = COALESCE($2::text, role),
                 is_active = COALESCE($3::boolean, is_active),
                 updated_at = now()
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))?;
        record.to_domain()
    }

    async fn set_password(&self, user_id: Uuid, password_hash: &str) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    async fn count_welcomebooks_for_user(&self, user_id: Uuid) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM welcomebooks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound("session expired or unknown".to_string()))
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_welcomebook(
        &self,
        user_id: Uuid,
        property_name: &str,
        slug: &str,
    ) -> PortResult<Welcomebook> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "INSERT INTO welcomebooks (user_id, property_name, slug)
             VALUES ($1, $2, $3) RETURNING {WELCOMEBOOK_COLUMNS}"
        ))
        .bind(user_id)
        .bind(property_name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "slug already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_welcomebook(&self, id: Uuid) -> PortResult<Welcomebook> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "SELECT {WELCOMEBOOK_COLUMNS} FROM welcomebooks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Welcomebook {id} not found")))?;
        Ok(record.to_domain())
    }

    async fn get_welcomebook_with_sections(
        &self,
        id: Uuid,
    ) -> PortResult<WelcomebookWithSections> {
        let welcomebook = self.get_welcomebook(id).await?;
        let sections = self.sections_for_welcomebook(id).await?;
        Ok(WelcomebookWithSections {
            welcomebook,
            sections,
        })
    }

    async fn get_welcomebook_by_slug(&self, slug: &str) -> PortResult<WelcomebookWithSections> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "SELECT {WELCOMEBOOK_COLUMNS} FROM welcomebooks WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Welcomebook '{slug}' not found")))?;

        let welcomebook = record.to_domain();
        let sections = self.sections_for_welcomebook(welcomebook.id).await?;
        Ok(WelcomebookWithSections {
            welcomebook,
            sections,
        })
    }

    async fn list_welcomebooks(
        &self,
        owner: Option<Uuid>,
    ) -> PortResult<Vec<WelcomebookSummary>> {
        let records = sqlx::query_as::<_, WelcomebookSummaryRecord>(
            "SELECT w.id, w.user_id, w.property_name, w.slug, w.sensitive_data_expires_at,
                    w.created_at, w.updated_at,
                    u.name AS owner_name, u.email AS owner_email,
                    (SELECT COUNT(*) FROM sections s WHERE s.welcomebook_id = w.id)
                        AS section_count
             FROM welcomebooks w
             JOIN users u ON u.id = w.user_id
             WHERE ($1::uuid IS NULL OR w.user_id = $1)
             ORDER BY w.updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_welcomebook(
        &self,
        id: Uuid,
        property_name: &str,
        slug: &str,
    ) -> PortResult<Welcomebook> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "UPDATE welcomebooks
             SET property_name = $2, slug = $3, updated_at = now()
             WHERE id = $1 RETURNING {WELCOMEBOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(property_name)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "slug already exists"))?
        .ok_or_else(|| PortError::NotFound(format!("Welcomebook {id} not found")))?;
        Ok(record.to_domain())
    }

    async fn delete_welcomebook(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM welcomebooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Welcomebook {id} not found")));
        }
        Ok(())
    }

    async fn transfer_welcomebook(&self, id: Uuid, new_owner: Uuid) -> PortResult<Welcomebook> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "UPDATE welcomebooks SET user_id = $2, updated_at = now()
             WHERE id = $1 RETURNING {WELCOMEBOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(new_owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Welcomebook {id} not found")))?;
        Ok(record.to_domain())
    }

    async fn set_sensitive_expiry(
        &self,
        id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> PortResult<Welcomebook> {
        let record = sqlx::query_as::<_, WelcomebookRecord>(&format!(
            "UPDATE welcomebooks SET sensitive_data_expires_at = $2, updated_at = now()
             WHERE id = $1 RETURNING {WELCOMEBOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Welcomebook {id} not found")))?;
        Ok(record.to_domain())
    }

    async fn slugs_starting_with(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> PortResult<Vec<String>> {
        // `base` is already a validated slug, so it is safe in a LIKE pattern.
        sqlx::query_scalar::<_, String>(
            "SELECT slug FROM welcomebooks
             WHERE (slug = $1 OR slug LIKE $2) AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn create_section(
        &self,
        welcomebook_id: Uuid,
        section_type: SectionType,
        data: Value,
        position: i32,
    ) -> PortResult<Section> {
        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "INSERT INTO sections (welcomebook_id, section_type, data, position)
             VALUES ($1, $2, $3, $4) RETURNING {SECTION_COLUMNS}"
        ))
        .bind(welcomebook_id)
        .bind(section_type.as_str())
        .bind(data)
        .bind(position)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain(Vec::new())
    }

    async fn get_section(&self, id: Uuid) -> PortResult<Section> {
        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Section {id} not found")))?;

        let mut media = self.media_by_section(&[record.id]).await?;
        let attached = media.remove(&record.id).unwrap_or_default();
        record.to_domain(attached)
    }

    async fn update_section(&self, id: Uuid, update: SectionUpdate) -> PortResult<Section> {
        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "UPDATE sections
             SET data = COALESCE($2::jsonb, data),
                 data_en = COALESCE($3::jsonb, data_en),
                 position = COALESCE($4::integer, position),
                 custom_title = COALESCE($5::text, custom_title),
                 updated_at = now()
             WHERE id = $1 RETURNING {SECTION_COLUMNS}"
        ))
        .bind(id)
        .bind(update.data)
        .bind(update.data_en)
        .bind(update.position)
        .bind(update.custom_title)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Section {id} not found")))?;

        let mut media = self.media_by_section(&[record.id]).await?;
        let attached = media.remove(&record.id).unwrap_or_default();
        record.to_domain(attached)
    }

    async fn delete_section(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Section {id} not found")));
        }
        Ok(())
    }

    async fn create_media(
        &self,
        section_id: Uuid,
        kind: MediaKind,
        url: &str,
        filename: &str,
    ) -> PortResult<Media> {
        let record = sqlx::query_as::<_, MediaRecord>(
            "INSERT INTO media (section_id, kind, url, filename)
             VALUES ($1, $2, $3, $4)
             RETURNING id, section_id, kind, url, filename, created_at",
        )
        .bind(section_id)
        .bind(kind.as_str())
        .bind(url)
        .bind(filename)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_media(&self, id: Uuid) -> PortResult<Media> {
        let record = sqlx::query_as::<_, MediaRecord>(
            "SELECT id, section_id, kind, url, filename, created_at FROM media WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Media {id} not found")))?;
        record.to_domain()
    }

    async fn delete_media(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Media {id} not found")));
        }
        Ok(())
    }

    async fn record_visit(&self, welcomebook_id: Uuid, visit: NewVisit) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO visits (welcomebook_id, ip_address, user_agent, referer)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(welcomebook_id)
        .bind(visit.ip_address)
        .bind(visit.user_agent)
        .bind(visit.referer)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn count_visits(&self, welcomebook_id: Uuid) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits WHERE welcomebook_id = $1")
            .bind(welcomebook_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }
}
