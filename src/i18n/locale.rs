//! Locale tags and the supported-locale set.

use std::fmt;

use serde::Serialize;

use crate::config::{I18nConfig, ValidationError};

/// A validated language tag such as `es` or `en`.
///
/// Tags are lowercase ASCII letters, digits and inner hyphens, so they are
/// always safe to use as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parse a tag, returning `None` if it is not a valid path-segment tag.
    pub fn parse(tag: &str) -> Option<Self> {
        let well_formed = !tag.is_empty()
            && !tag.starts_with('-')
            && !tag.ends_with('-')
            && tag
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        well_formed.then(|| Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the English locale, the only one with dedicated `_en` content fields.
    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    /// Pick the content field for this locale.
    ///
    /// English falls back to the Spanish text when no translation exists;
    /// every other locale reads the Spanish field.
    pub fn pick<'a>(&self, es: Option<&'a str>, en: Option<&'a str>) -> Option<&'a str> {
        let en = en.filter(|s| !s.trim().is_empty());
        match (self.is_english(), en) {
            (true, Some(text)) => Some(text),
            _ => es,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of locales the site serves, plus the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    supported: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Build a set; `None` if the default is not one of the supported locales.
    pub fn new(supported: Vec<Locale>, default: Locale) -> Option<Self> {
        supported
            .contains(&default)
            .then_some(Self { supported, default })
    }

    /// Build the set from the `[i18n]` config section.
    pub fn from_config(config: &I18nConfig) -> Result<Self, ValidationError> {
        let supported = config
            .locales
            .iter()
            .map(|tag| Locale::parse(tag).ok_or_else(|| ValidationError::InvalidLocale(tag.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let default = Locale::parse(&config.default_locale)
            .ok_or_else(|| ValidationError::InvalidLocale(config.default_locale.clone()))?;

        Self::new(supported, default).ok_or_else(|| {
            ValidationError::DefaultLocaleUnsupported(config.default_locale.clone())
        })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.supported.iter()
    }

    /// Look up a supported locale by its exact tag.
    pub fn find(&self, tag: &str) -> Option<&Locale> {
        self.supported.iter().find(|l| l.as_str() == tag)
    }

    /// Return the locale whose segment leads `path`.
    ///
    /// Matches whole segments only: `/es` and `/es/...` match `es`,
    /// `/esperanza` does not.
    pub fn leading_locale(&self, path: &str) -> Option<&Locale> {
        let rest = path.strip_prefix('/')?;
        self.supported.iter().find(|locale| {
            rest.strip_prefix(locale.as_str())
                .is_some_and(|tail| tail.is_empty() || tail.starts_with('/'))
        })
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        let es = Locale("es".to_string());
        Self {
            supported: vec![es.clone(), Locale("en".to_string())],
            default: es,
        }
    }
}
