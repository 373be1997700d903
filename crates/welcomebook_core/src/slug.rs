//! crates/welcomebook_core/src/slug.rs
//!
//! Property-name to URL-slug derivation and uniqueness disambiguation.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn slug_format() -> &'static Regex {
    static SLUG_FORMAT: OnceLock<Regex> = OnceLock::new();
    SLUG_FORMAT.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

/// Derives a candidate slug from a free-text property name: lowercase, strip
/// everything outside `[a-z0-9 -]`, collapse whitespace and hyphen runs to a
/// single hyphen, trim leading/trailing hyphens.
///
/// The result can be empty when the name contains no permitted character;
/// callers must reject that via [`is_valid_slug`] rather than coerce further.
pub fn generate_slug(property_name: &str) -> String {
    let lowered = property_name.to_lowercase();
    let kept: String = lowered
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            c if c.is_whitespace() => '-',
            '-' => '-',
            _ => '\0',
        })
        .filter(|c| *c != '\0')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Checks the normalized slug format: non-empty runs of `[a-z0-9]` separated
/// by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    slug_format().is_match(slug)
}

/// Picks the first free slug among `base`, `base-1`, `base-2`, ... given the
/// set of slugs already persisted. A record being renamed must be excluded
/// from `taken` by the caller so it can keep its own slug.
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(generate_slug("Villa del Mar"), "villa-del-mar");
    }

    #[test]
    fn strips_characters_outside_the_identifier_set() {
        assert_eq!(generate_slug("Casa \"Azul\" #3 (beach)"), "casa-azul-3-beach");
        assert_eq!(generate_slug("¡Señorío!"), "seoro");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(generate_slug("  Loft   -  Centro  "), "loft-centro");
    }

    #[test]
    fn output_uses_only_the_permitted_charset() {
        for name in ["Über Haus", "Flat №7", "--- xx ---", "A&B"] {
            let slug = generate_slug(name);
            if !slug.is_empty() {
                assert!(is_valid_slug(&slug), "'{name}' produced invalid '{slug}'");
            }
        }
    }

    #[test]
    fn name_with_one_permitted_character_yields_nonempty_slug() {
        assert_eq!(generate_slug("¿x?"), "x");
    }

    #[test]
    fn name_with_no_permitted_characters_yields_empty_slug() {
        let slug = generate_slug("¿¡!?");
        assert!(slug.is_empty());
        assert!(!is_valid_slug(&slug));
    }

    #[test]
    fn format_check_rejects_malformed_slugs() {
        assert!(is_valid_slug("villa-del-mar"));
        assert!(is_valid_slug("villa-1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-villa"));
        assert!(!is_valid_slug("villa-"));
        assert!(!is_valid_slug("villa--1"));
        assert!(!is_valid_slug("Villa"));
    }

    #[test]
    fn disambiguates_with_numeric_suffixes() {
        assert_eq!(unique_slug("villa", &taken(&[])), "villa");
        assert_eq!(unique_slug("villa", &taken(&["villa"])), "villa-1");
        assert_eq!(unique_slug("villa", &taken(&["villa", "villa-1"])), "villa-2");
    }

    #[test]
    fn skips_holes_left_by_deleted_records() {
        assert_eq!(unique_slug("villa", &taken(&["villa", "villa-2"])), "villa-1");
    }
}
