//! Public page handlers.
//!
//! Each page is served as a JSON page model: the records it shows, already
//! localized, plus the dictionary section holding its translated copy.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::Request,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::content::{Artist, News, Release, RosterFilter, RosterRole};
use crate::error::SiteError;
use crate::http::server::{AppState, SiteContext};
use crate::i18n::Locale;
use crate::observability::metrics;
use crate::routing::ProfileVariant;

/// Resolve the `{lang}` segment against the supported locales.
fn resolve_locale(ctx: &SiteContext, lang: &str) -> Result<Locale, SiteError> {
    ctx.router
        .locales()
        .find(lang)
        .cloned()
        .ok_or_else(|| SiteError::NotFound(format!("Unsupported locale {lang:?}")))
}

/// The role as shown to visitors. Classification always reads `artist.role`.
fn display_role(artist: &Artist, locale: &Locale) -> Option<String> {
    locale
        .pick(artist.role.as_deref(), artist.role_en.as_deref())
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
pub struct ArtistCard {
    pub slug: String,
    pub name: String,
    pub role: Option<String>,
    pub photo_url: Option<String>,
    pub variant: ProfileVariant,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct NewsCard {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl NewsCard {
    fn localized(news: &News, locale: &Locale) -> Self {
        Self {
            slug: news.slug.clone(),
            title: locale
                .pick(Some(news.title.as_str()), news.title_en.as_deref())
                .unwrap_or(&news.title)
                .to_string(),
            excerpt: locale
                .pick(news.excerpt.as_deref(), news.excerpt_en.as_deref())
                .map(str::to_string),
            image_url: news.image_url.clone(),
            published_at: news.published_at,
            url: format!("/{}/news/{}", locale, news.slug),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub lang: Locale,
    pub labels: Value,
    pub featured_artists: Vec<ArtistCard>,
    pub latest_news: Vec<NewsCard>,
}

pub async fn home(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<HomePage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, &lang)?;
    let content = &ctx.config.content;

    let featured_artists = state
        .store
        .featured_artists(content.featured_artists)
        .into_iter()
        .map(|artist| ArtistCard {
            variant: ctx.classifier.classify(artist.role.as_deref()),
            role: display_role(&artist, &locale),
            url: format!("/{}/artists/{}", locale, artist.slug),
            slug: artist.slug,
            name: artist.name,
            photo_url: artist.photo_url,
        })
        .collect();

    let latest_news = state
        .store
        .published_news()
        .iter()
        .take(content.latest_news)
        .map(|n| NewsCard::localized(n, &locale))
        .collect();

    Ok(Json(HomePage {
        labels: ctx.dictionaries.section(locale.as_str(), "home"),
        lang: locale,
        featured_artists,
        latest_news,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    #[serde(default)]
    pub role: RosterFilter,
}

#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub slug: String,
    pub name: String,
    pub role: Option<String>,
    pub role_label: Option<String>,
    pub photo_url: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct RosterPage {
    pub lang: Locale,
    pub filter: RosterFilter,
    pub labels: Value,
    pub filter_labels: Value,
    pub artists: Vec<RosterEntry>,
}

pub async fn roster(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<RosterPage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, &lang)?;
    let filter_labels = ctx
        .dictionaries
        .section(locale.as_str(), "components.roster_filter");

    let artists = state
        .store
        .active_artists()
        .into_iter()
        .filter(|a| query.role.matches(a.role.as_deref()))
        .map(|artist| {
            let key = RosterRole::from_role(artist.role.as_deref()).dictionary_key();
            RosterEntry {
                role_label: filter_labels.get(key).and_then(Value::as_str).map(str::to_string),
                role: display_role(&artist, &locale),
                url: format!("/{}/artists/{}", locale, artist.slug),
                slug: artist.slug,
                name: artist.name,
                photo_url: artist.photo_url,
            }
        })
        .collect();

    Ok(Json(RosterPage {
        labels: ctx.dictionaries.section(locale.as_str(), "artists"),
        lang: locale,
        filter: query.role,
        filter_labels,
        artists,
    }))
}

#[derive(Debug, Serialize)]
pub struct ArtistLinks {
    pub spotify: Option<String>,
    pub apple_music: Option<String>,
    pub youtube: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtistProfile {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub role: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub links: ArtistLinks,
}

impl ArtistProfile {
    fn localized(artist: Artist, locale: &Locale) -> Self {
        Self {
            role: display_role(&artist, locale),
            tagline: locale
                .pick(artist.tagline_es.as_deref(), artist.tagline_en.as_deref())
                .map(str::to_string),
            bio: locale
                .pick(artist.bio_es.as_deref(), artist.bio_en.as_deref())
                .map(str::to_string),
            id: artist.id,
            slug: artist.slug,
            name: artist.name,
            photo_url: artist.photo_url,
            links: ArtistLinks {
                spotify: artist.spotify_url,
                apple_music: artist.apple_music_url,
                youtube: artist.youtube_url,
                instagram: artist.instagram_url,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub lang: Locale,
    pub variant: ProfileVariant,
    pub labels: Value,
    pub artist: ArtistProfile,
    pub releases: Vec<Release>,
}

/// Artist profile, rendered through the variant chosen from the artist's role.
pub async fn artist_profile(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> Result<Json<ProfilePage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, &lang)?;
    let artist = state.store.artist_by_slug(&slug).ok_or_else(|| {
        SiteError::NotFound(
            ctx.dictionaries
                .text(locale.as_str(), "not_found.artist")
                .unwrap_or_else(|| format!("Artist {slug:?} not found")),
        )
    })?;

    let variant = ctx.classifier.classify(artist.role.as_deref());
    metrics::record_profile_variant(variant);
    tracing::debug!(slug = %artist.slug, role = ?artist.role, variant = %variant, "Artist profile dispatched");

    let releases = state.store.releases_for_artist(artist.id);
    Ok(Json(ProfilePage {
        labels: ctx
            .dictionaries
            .section(locale.as_str(), "components.artist_profile"),
        artist: ArtistProfile::localized(artist, &locale),
        lang: locale,
        variant,
        releases,
    }))
}

#[derive(Debug, Serialize)]
pub struct NewsListPage {
    pub lang: Locale,
    pub labels: Value,
    pub articles: Vec<NewsCard>,
}

pub async fn news_list(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<NewsListPage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, &lang)?;
    let articles = state
        .store
        .published_news()
        .iter()
        .map(|n| NewsCard::localized(n, &locale))
        .collect();

    Ok(Json(NewsListPage {
        labels: ctx.dictionaries.section(locale.as_str(), "news"),
        lang: locale,
        articles,
    }))
}

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub lang: Locale,
    pub labels: Value,
    #[serde(flatten)]
    pub card: NewsCard,
    pub content: Option<String>,
}

pub async fn news_article(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> Result<Json<NewsPage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, &lang)?;
    let news = state.store.published_news_by_slug(&slug).ok_or_else(|| {
        SiteError::NotFound(
            ctx.dictionaries
                .text(locale.as_str(), "not_found.news")
                .unwrap_or_else(|| format!("News {slug:?} not found")),
        )
    })?;

    Ok(Json(NewsPage {
        labels: ctx.dictionaries.section(locale.as_str(), "news"),
        content: locale
            .pick(news.content.as_deref(), news.content_en.as_deref())
            .map(str::to_string),
        card: NewsCard::localized(&news, &locale),
        lang: locale,
    }))
}

#[derive(Debug, Serialize)]
pub struct StaticPage {
    pub lang: Locale,
    pub page: &'static str,
    pub labels: Value,
}

fn static_page(state: &AppState, lang: &str, page: &'static str) -> Result<Json<StaticPage>, SiteError> {
    let ctx = state.inner.load_full();
    let locale = resolve_locale(&ctx, lang)?;
    Ok(Json(StaticPage {
        labels: ctx.dictionaries.section(locale.as_str(), page),
        lang: locale,
        page,
    }))
}

pub async fn about(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<StaticPage>, SiteError> {
    static_page(&state, &lang, "about")
}

pub async fn contact(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<StaticPage>, SiteError> {
    static_page(&state, &lang, "contact")
}

/// Unmatched paths. Localized requests get the not-found copy in their language.
pub async fn fallback(State(state): State<AppState>, request: Request<Body>) -> SiteError {
    let ctx = state.inner.load_full();
    let message = request
        .extensions()
        .get::<Locale>()
        .and_then(|locale| ctx.dictionaries.text(locale.as_str(), "not_found.page"))
        .unwrap_or_else(|| "Not found".to_string());
    SiteError::NotFound(message)
}
