//! crates/welcomebook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The three account tiers. Ordering matters: `SuperAdmin` outranks
/// `Admin`, which outranks `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A host account. Owns zero or more welcomebooks.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login/password changes - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// A user row as listed in the admin dashboard, with its welcomebook count.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub welcomebook_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A published property guide, reachable by its globally unique slug.
#[derive(Debug, Clone)]
pub struct Welcomebook {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_name: String,
    pub slug: String,
    /// When set, the sensitive-access window is active until this instant.
    pub sensitive_data_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dashboard list row: the welcomebook plus its owner's identity and a
/// section count. Owner identity matters for the cross-tenant admin view.
#[derive(Debug, Clone)]
pub struct WelcomebookSummary {
    pub welcomebook: Welcomebook,
    pub owner_name: String,
    pub owner_email: String,
    pub section_count: i64,
}

/// A welcomebook together with its position-ordered sections.
#[derive(Debug, Clone)]
pub struct WelcomebookWithSections {
    pub welcomebook: Welcomebook,
    pub sections: Vec<Section>,
}

/// One typed block of content within a welcomebook.
///
/// `data` is the primary payload; its shape depends on `section_type` and is
/// validated by the schema registry whenever non-empty. `data_en` is the
/// optional translated payload. An empty object is permitted so hosts can
/// create a section first and fill it in later.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: Uuid,
    pub welcomebook_id: Uuid,
    pub section_type: SectionType,
    pub data: Value,
    pub data_en: Option<Value>,
    pub position: i32,
    pub custom_title: Option<String>,
    pub media: Vec<Media>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fixed enumeration of section types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    Wifi,
    Access,
    Location,
    Host,
    Emergency,
    Appliances,
    Places,
    Custom,
    Trash,
    Maps360,
    Widget,
}

impl SectionType {
    pub const ALL: [SectionType; 11] = [
        SectionType::Wifi,
        SectionType::Access,
        SectionType::Location,
        SectionType::Host,
        SectionType::Emergency,
        SectionType::Appliances,
        SectionType::Places,
        SectionType::Custom,
        SectionType::Trash,
        SectionType::Maps360,
        SectionType::Widget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Wifi => "WIFI",
            SectionType::Access => "ACCESS",
            SectionType::Location => "LOCATION",
            SectionType::Host => "HOST",
            SectionType::Emergency => "EMERGENCY",
            SectionType::Appliances => "APPLIANCES",
            SectionType::Places => "PLACES",
            SectionType::Custom => "CUSTOM",
            SectionType::Trash => "TRASH",
            SectionType::Maps360 => "MAPS360",
            SectionType::Widget => "WIDGET",
        }
    }
}

impl std::str::FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WIFI" => Ok(SectionType::Wifi),
            "ACCESS" => Ok(SectionType::Access),
            "LOCATION" => Ok(SectionType::Location),
            "HOST" => Ok(SectionType::Host),
            "EMERGENCY" => Ok(SectionType::Emergency),
            "APPLIANCES" => Ok(SectionType::Appliances),
            "PLACES" => Ok(SectionType::Places),
            "CUSTOM" => Ok(SectionType::Custom),
            "TRASH" => Ok(SectionType::Trash),
            "MAPS360" => Ok(SectionType::Maps360),
            "WIDGET" => Ok(SectionType::Widget),
            other => Err(format!("unknown section type '{other}'")),
        }
    }
}

/// An uploaded photo or video attached to a section.
#[derive(Debug, Clone)]
pub struct Media {
    pub id: Uuid,
    pub section_id: Uuid,
    pub kind: MediaKind,
    pub url: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "PHOTO",
            MediaKind::Video => "VIDEO",
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHOTO" => Ok(MediaKind::Photo),
            "VIDEO" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind '{other}'")),
        }
    }
}

/// Visit metadata captured when a public guide is opened.
/// Visits are write-only: there is no update or delete path, and the only
/// read is an aggregate count per welcomebook.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}
