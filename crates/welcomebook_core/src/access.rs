//! crates/welcomebook_core/src/access.rs
//!
//! The per-welcomebook sensitive-access window: a single optional expiry
//! timestamp. Activation overwrites any previous value rather than extending
//! it; deactivation clears it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Hours added on activation when the caller gives no explicit duration.
pub const DEFAULT_ACCESS_HOURS: i64 = 48;

/// Longest window a caller may request, one year. Durations beyond this are
/// rejected before any arithmetic; `chrono::Duration::hours` aborts on
/// values near `i64::MAX`.
pub const MAX_ACCESS_HOURS: i64 = 8760;

/// Checks a requested window length: absent is fine (the default applies),
/// explicit values must be positive and at most [`MAX_ACCESS_HOURS`].
pub fn validate_access_hours(hours: Option<i64>) -> Result<(), String> {
    match hours {
        None => Ok(()),
        Some(h) if h <= 0 => Err("hours must be a positive number".to_string()),
        Some(h) if h > MAX_ACCESS_HOURS => Err(format!(
            "hours must be at most {MAX_ACCESS_HOURS} (one year)"
        )),
        Some(_) => Ok(()),
    }
}

/// The read-side interpretation of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    /// No window has been set, or it was deactivated.
    Inactive,
    /// The window is open: the expiry lies in the future.
    Active,
    /// A window was set but its expiry has passed.
    Expired,
}

impl AccessStatus {
    /// The wire form, identical to the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Inactive => "inactive",
            AccessStatus::Active => "active",
            AccessStatus::Expired => "expired",
        }
    }
}

/// Computes the expiry for an activation at `now`. Any previously stored
/// value is to be overwritten with this result, not accumulated.
pub fn activation_expiry(now: DateTime<Utc>, hours: Option<i64>) -> DateTime<Utc> {
    now + Duration::hours(hours.unwrap_or(DEFAULT_ACCESS_HOURS))
}

/// Classifies a stored expiry relative to `now`.
pub fn access_status(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> AccessStatus {
    match expires_at {
        None => AccessStatus::Inactive,
        Some(expiry) if expiry > now => AccessStatus::Active,
        Some(_) => AccessStatus::Expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_defaults_to_forty_eight_hours() {
        let now = Utc::now();
        assert_eq!(activation_expiry(now, None), now + Duration::hours(48));
    }

    #[test]
    fn explicit_duration_overrides_the_default() {
        let now = Utc::now();
        assert_eq!(activation_expiry(now, Some(6)), now + Duration::hours(6));
    }

    #[test]
    fn reactivation_overwrites_rather_than_accumulates() {
        let now = Utc::now();
        let first = activation_expiry(now, Some(100));
        let second = activation_expiry(now, None);
        // The second activation stands on its own, regardless of the first.
        assert_eq!(second, now + Duration::hours(48));
        assert!(second < first);
    }

    #[test]
    fn hours_must_be_positive_and_within_the_ceiling() {
        assert!(validate_access_hours(None).is_ok());
        assert!(validate_access_hours(Some(1)).is_ok());
        assert!(validate_access_hours(Some(MAX_ACCESS_HOURS)).is_ok());
        assert!(validate_access_hours(Some(0)).is_err());
        assert!(validate_access_hours(Some(-3)).is_err());
        assert!(validate_access_hours(Some(MAX_ACCESS_HOURS + 1)).is_err());
        assert!(validate_access_hours(Some(i64::MAX)).is_err());
    }

    #[test]
    fn ceiling_duration_stays_within_arithmetic_range() {
        let now = Utc::now();
        assert_eq!(
            activation_expiry(now, Some(MAX_ACCESS_HOURS)),
            now + Duration::hours(MAX_ACCESS_HOURS)
        );
    }

    #[test]
    fn status_labels_match_the_serialized_form() {
        for status in [
            AccessStatus::Inactive,
            AccessStatus::Active,
            AccessStatus::Expired,
        ] {
            let serialized = serde_json::to_value(status).unwrap();
            assert_eq!(serialized, serde_json::Value::String(status.as_str().into()));
        }
    }

    #[test]
    fn status_classification() {
        let now = Utc::now();
        assert_eq!(access_status(None, now), AccessStatus::Inactive);
        assert_eq!(
            access_status(Some(now + Duration::hours(1)), now),
            AccessStatus::Active
        );
        assert_eq!(
            access_status(Some(now - Duration::seconds(1)), now),
            AccessStatus::Expired
        );
    }
}
