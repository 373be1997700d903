//! crates/welcomebook_core/src/render.rs
//!
//! The public render selector: decides, per section and requested language,
//! which payload to display, filters out unpopulated sections, and resolves
//! display titles.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::access::{access_status, AccessStatus};
use crate::domain::{Media, SectionType, WelcomebookWithSections};
use crate::sections::{section_has_data, SectionPayload};

/// The two supported display languages. Spanish is the primary payload
/// language; English uses the translated payload when one is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Es,
    En,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// The default display title for a section type, per language.
pub fn default_title(ty: SectionType, lang: Language) -> &'static str {
    match (ty, lang) {
        (SectionType::Wifi, _) => "WiFi",
        (SectionType::Access, Language::Es) => "Acceso",
        (SectionType::Access, Language::En) => "Access",
        (SectionType::Location, Language::Es) => "Ubicación",
        (SectionType::Location, Language::En) => "Location",
        (SectionType::Host, Language::Es) => "Anfitrión",
        (SectionType::Host, Language::En) => "Host",
        (SectionType::Emergency, Language::Es) => "Contactos de Emergencia",
        (SectionType::Emergency, Language::En) => "Emergency Contacts",
        (SectionType::Appliances, Language::Es) => "Electrodomésticos",
        (SectionType::Appliances, Language::En) => "Appliances",
        (SectionType::Places, Language::Es) => "Lugares Recomendados",
        (SectionType::Places, Language::En) => "Recommended Places",
        (SectionType::Custom, Language::Es) => "Información Adicional",
        (SectionType::Custom, Language::En) => "Additional Information",
        (SectionType::Trash, Language::Es) => "Basura y Reciclaje",
        (SectionType::Trash, Language::En) => "Trash & Recycling",
        (SectionType::Maps360, Language::Es) => "Tour Virtual 360°",
        (SectionType::Maps360, Language::En) => "360° Virtual Tour",
        (SectionType::Widget, Language::Es) => "Calendario",
        (SectionType::Widget, Language::En) => "Calendar",
    }
}

/// A section as presented on the public guide.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub id: Uuid,
    pub section_type: SectionType,
    pub title: String,
    pub payload: SectionPayload,
    pub media: Vec<Media>,
}

/// A rendered public guide. Zero populated sections is the explicit
/// under-construction state, never a silently empty list.
#[derive(Debug, Clone)]
pub struct PublicGuide {
    pub property_name: String,
    pub slug: String,
    /// Reported to the caller but not used to redact fields here.
    /// TODO: redact WiFi credentials and access instructions outside the
    /// window once product decides the expiry applies to the public view.
    pub sensitive_access: AccessStatus,
    pub sections: Vec<RenderedSection>,
}

impl PublicGuide {
    pub fn is_under_construction(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Renders a welcomebook for the public view.
///
/// Sections whose primary payload carries no content per-type are dropped.
/// For each kept section the translated payload is used when the requested
/// language is English and it is itself populated, otherwise the primary.
/// Stored ordinals define the order; ties fall back to creation time.
pub fn render_guide(
    book: &WelcomebookWithSections,
    lang: Language,
    now: DateTime<Utc>,
) -> PublicGuide {
    let mut sections: Vec<&crate::domain::Section> = book.sections.iter().collect();
    sections.sort_by_key(|s| (s.position, s.created_at));

    let rendered = sections
        .into_iter()
        .filter(|s| section_has_data(s.section_type, &s.data))
        .filter_map(|s| {
            let payload = select_payload(s, lang)?;
            Some(RenderedSection {
                id: s.id,
                section_type: s.section_type,
                title: resolve_title(s, lang),
                payload,
                media: s.media.clone(),
            })
        })
        .collect();

    PublicGuide {
        property_name: book.welcomebook.property_name.clone(),
        slug: book.welcomebook.slug.clone(),
        sensitive_access: access_status(book.welcomebook.sensitive_data_expires_at, now),
        sections: rendered,
    }
}

fn select_payload(section: &crate::domain::Section, lang: Language) -> Option<SectionPayload> {
    if lang == Language::En {
        if let Some(translated) = &section.data_en {
            if section_has_data(section.section_type, translated) {
                return SectionPayload::from_value(section.section_type, translated).ok();
            }
        }
    }
    SectionPayload::from_value(section.section_type, &section.data).ok()
}

fn resolve_title(section: &crate::domain::Section, lang: Language) -> String {
    match &section.custom_title {
        Some(custom) if !custom.trim().is_empty() => custom.clone(),
        _ => default_title(section.section_type, lang).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Section, SectionType, Welcomebook};
    use chrono::Duration;
    use serde_json::{json, Value};

    fn book(sections: Vec<Section>) -> WelcomebookWithSections {
        let now = Utc::now();
        WelcomebookWithSections {
            welcomebook: Welcomebook {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                property_name: "Villa del Mar".to_string(),
                slug: "villa-del-mar".to_string(),
                sensitive_data_expires_at: None,
                created_at: now,
                updated_at: now,
            },
            sections,
        }
    }

    fn section(ty: SectionType, data: Value, position: i32) -> Section {
        let now = Utc::now();
        Section {
            id: Uuid::new_v4(),
            welcomebook_id: Uuid::new_v4(),
            section_type: ty,
            data,
            data_en: None,
            position,
            custom_title: None,
            media: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn zero_populated_sections_is_under_construction() {
        let sections = vec![
            section(SectionType::Wifi, json!({}), 0),
            section(SectionType::Emergency, json!({"contacts": []}), 1),
        ];
        let guide = render_guide(&book(sections), Language::Es, Utc::now());
        assert!(guide.is_under_construction());
    }

    #[test]
    fn populated_sections_survive_in_ordinal_order() {
        let sections = vec![
            section(SectionType::Access, json!({"instructions": "ring twice"}), 2),
            section(
                SectionType::Wifi,
                json!({"networkName": "net", "password": "pw"}),
                0,
            ),
        ];
        let guide = render_guide(&book(sections), Language::Es, Utc::now());
        let types: Vec<_> = guide.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Wifi, SectionType::Access]);
    }

    #[test]
    fn ordinal_ties_fall_back_to_creation_time() {
        let mut first = section(SectionType::Access, json!({"instructions": "a"}), 1);
        let mut second = section(SectionType::Trash, json!({"instructions": "b"}), 1);
        let now = Utc::now();
        first.created_at = now - Duration::minutes(5);
        second.created_at = now;

        let guide = render_guide(&book(vec![second, first]), Language::Es, now);
        let types: Vec<_> = guide.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Access, SectionType::Trash]);
    }

    #[test]
    fn translated_payload_wins_when_populated() {
        let mut s = section(
            SectionType::Access,
            json!({"instructions": "toca dos veces"}),
            0,
        );
        s.data_en = Some(json!({"instructions": "ring twice"}));

        let guide = render_guide(&book(vec![s]), Language::En, Utc::now());
        match &guide.sections[0].payload {
            SectionPayload::Access { instructions, .. } => assert_eq!(instructions, "ring twice"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn empty_translation_falls_back_to_primary() {
        let mut s = section(
            SectionType::Access,
            json!({"instructions": "toca dos veces"}),
            0,
        );
        s.data_en = Some(json!({}));

        let guide = render_guide(&book(vec![s]), Language::En, Utc::now());
        match &guide.sections[0].payload {
            SectionPayload::Access { instructions, .. } => {
                assert_eq!(instructions, "toca dos veces")
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn custom_title_overrides_the_default_when_nonblank() {
        let mut s = section(
            SectionType::Wifi,
            json!({"networkName": "net", "password": "pw"}),
            0,
        );
        s.custom_title = Some("La red de casa".to_string());
        let guide = render_guide(&book(vec![s.clone()]), Language::Es, Utc::now());
        assert_eq!(guide.sections[0].title, "La red de casa");

        s.custom_title = Some("   ".to_string());
        let guide = render_guide(&book(vec![s]), Language::Es, Utc::now());
        assert_eq!(guide.sections[0].title, "WiFi");
    }

    #[test]
    fn default_titles_follow_the_requested_language() {
        let s = section(SectionType::Trash, json!({"instructions": "x"}), 0);
        let es = render_guide(&book(vec![s.clone()]), Language::Es, Utc::now());
        assert_eq!(es.sections[0].title, "Basura y Reciclaje");
        let en = render_guide(&book(vec![s]), Language::En, Utc::now());
        assert_eq!(en.sections[0].title, "Trash & Recycling");
    }

    #[test]
    fn sensitive_access_status_is_reported_not_redacted() {
        let mut b = book(vec![section(
            SectionType::Wifi,
            json!({"networkName": "net", "password": "pw"}),
            0,
        )]);
        let now = Utc::now();
        b.welcomebook.sensitive_data_expires_at = Some(now - Duration::hours(1));

        let guide = render_guide(&b, Language::Es, now);
        assert_eq!(guide.sensitive_access, AccessStatus::Expired);
        // The WiFi payload is still present in full.
        assert!(matches!(
            guide.sections[0].payload,
            SectionPayload::Wifi { .. }
        ));
    }
}
