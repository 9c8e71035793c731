//! Content records and the admin inputs that create or change them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row kept by the content store.
pub trait Record: Clone + Send + Sync + 'static {
    /// Name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Public URL slug, for records addressed by one.
    fn slug(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// Free-text function, e.g. "DJ" or "Productor". Drives the profile variant.
    pub role: Option<String>,
    /// English display text for `role`. Never used for classification.
    pub role_en: Option<String>,
    pub tagline_es: Option<String>,
    pub tagline_en: Option<String>,
    pub bio_es: Option<String>,
    pub bio_en: Option<String>,
    pub photo_url: Option<String>,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub youtube_url: Option<String>,
    pub instagram_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Artist {
    const KIND: &'static str = "artist";

    fn id(&self) -> Uuid {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Single,
    Album,
    Ep,
    Mixtape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub release_type: Option<ReleaseType>,
    pub release_date: Option<NaiveDate>,
    pub cover_url: Option<String>,
    pub link: Option<String>,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub youtube_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Release {
    const KIND: &'static str = "release";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Record for News {
    const KIND: &'static str = "news";

    fn id(&self) -> Uuid {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

/// Admin payload for creating or updating an artist.
///
/// On update, `is_active: None` keeps the current flag and `photo_url: None`
/// keeps the current photo unless `remove_photo` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistInput {
    pub name: String,
    pub slug: String,
    pub role: Option<String>,
    pub role_en: Option<String>,
    pub tagline_es: Option<String>,
    pub tagline_en: Option<String>,
    pub bio_es: Option<String>,
    pub bio_en: Option<String>,
    pub photo_url: Option<String>,
    pub remove_photo: bool,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub youtube_url: Option<String>,
    pub instagram_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Admin payload for creating or updating a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInput {
    pub artist_id: Uuid,
    pub title: String,
    #[serde(rename = "type", default)]
    pub release_type: Option<ReleaseType>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub remove_cover: bool,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub apple_music_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
}

/// Admin payload for creating or updating a news article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsInput {
    pub title: String,
    pub slug: String,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub image_url: Option<String>,
    pub remove_image: bool,
    pub is_published: bool,
}

/// Trim an optional text field, mapping blank input to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Slugs are lowercase ASCII words joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  DJ ".into())), Some("DJ".into()));
        assert_eq!(clean(Some("   ".into())), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_slugs() {
        assert!(is_valid_slug("xeuz"));
        assert!(is_valid_slug("dj-moreno-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Xeuz"));
        assert!(!is_valid_slug("-xeuz"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("a/b"));
    }

    #[test]
    fn test_release_type_field_name() {
        let input: ReleaseInput = serde_json::from_str(&format!(
            r#"{{"artist_id":"{}","title":"Noche","type":"ep","release_date":"2024-05-01"}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert_eq!(input.release_type, Some(ReleaseType::Ep));
        assert_eq!(input.release_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(!input.remove_cover);
    }
}
