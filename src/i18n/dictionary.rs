//! Translated UI copy bundled with the binary.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::i18n::Locale;

const BUNDLED: &[(&str, &str)] = &[
    ("es", include_str!("../../dictionaries/es.json")),
    ("en", include_str!("../../dictionaries/en.json")),
];

/// Locale whose dictionary is used when nothing better exists.
const BASE_TAG: &str = "es";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary {tag} is not valid JSON: {source}")]
    Parse {
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no dictionary bundled for {0}")]
    Missing(&'static str),
}

/// Per-locale dictionaries with a fixed fallback.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    by_tag: HashMap<String, Value>,
    fallback: Value,
}

impl Dictionaries {
    /// Parse the bundled dictionaries.
    ///
    /// Lookups for a locale without a dictionary resolve to `default`'s
    /// dictionary, or to the Spanish one when `default` has none either.
    pub fn bundled(default: &Locale) -> Result<Self, DictionaryError> {
        let mut by_tag = HashMap::new();
        for &(tag, raw) in BUNDLED {
            let value: Value =
                serde_json::from_str(raw).map_err(|source| DictionaryError::Parse { tag, source })?;
            by_tag.insert(tag.to_string(), value);
        }

        let fallback = by_tag
            .get(default.as_str())
            .or_else(|| by_tag.get(BASE_TAG))
            .cloned()
            .ok_or(DictionaryError::Missing(BASE_TAG))?;

        Ok(Self { by_tag, fallback })
    }

    /// Whole dictionary for a locale tag.
    pub fn get(&self, tag: &str) -> &Value {
        self.by_tag.get(tag).unwrap_or(&self.fallback)
    }

    /// A nested section addressed by a dotted path, e.g. `components.artist_profile`.
    ///
    /// Missing sections yield `Value::Null`.
    pub fn section(&self, tag: &str, path: &str) -> Value {
        path.split('.')
            .try_fold(self.get(tag), |node, key| node.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// A single string entry, if present.
    pub fn text(&self, tag: &str, path: &str) -> Option<String> {
        self.section(tag, path).as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionaries() -> Dictionaries {
        Dictionaries::bundled(&Locale::parse("es").unwrap()).unwrap()
    }

    #[test]
    fn test_bundled_locales_differ() {
        let dicts = dictionaries();
        assert_eq!(dicts.text("es", "contact.title").as_deref(), Some("Contacto"));
        assert_eq!(dicts.text("en", "contact.title").as_deref(), Some("Contact"));
    }

    #[test]
    fn test_unknown_locale_falls_back_to_default() {
        let dicts = dictionaries();
        assert_eq!(dicts.get("fr"), dicts.get("es"));

        let english_default = Dictionaries::bundled(&Locale::parse("en").unwrap()).unwrap();
        assert_eq!(english_default.get("fr"), english_default.get("en"));
    }

    #[test]
    fn test_default_without_bundle_uses_spanish() {
        let dicts = Dictionaries::bundled(&Locale::parse("pt").unwrap()).unwrap();
        assert_eq!(dicts.get("pt"), dicts.get("es"));
    }

    #[test]
    fn test_section_paths() {
        let dicts = dictionaries();
        let profile = dicts.section("en", "components.artist_profile");
        assert_eq!(profile["releases_label"], "Releases");
        assert_eq!(dicts.section("en", "components.nope"), Value::Null);
    }

    #[test]
    fn test_roster_labels_present_in_every_bundle() {
        let dicts = dictionaries();
        for (tag, _) in BUNDLED {
            for key in ["role_artist", "role_dj", "role_producer", "role_default"] {
                let path = format!("components.roster_filter.{key}");
                assert!(dicts.text(tag, &path).is_some(), "{tag} missing {key}");
            }
        }
    }
}
