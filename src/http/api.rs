//! Unauthenticated API endpoints under `/api`.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::content::Artist;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtistBrief {
    pub slug: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct SlugCheck {
    pub searched_for: String,
    pub found_exact: bool,
    pub data: Option<Artist>,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub artist_count: usize,
    pub recent_artists: Vec<ArtistBrief>,
    pub slug_check: Option<SlugCheck>,
}

/// Content store connectivity check, with an optional exact-slug lookup.
pub async fn health(
    State(state): State<AppState>,
    Query(query): Query<HealthQuery>,
) -> Json<HealthReport> {
    let artists = state.store.artists();
    let recent_artists = artists
        .iter()
        .take(10)
        .map(|a| ArtistBrief {
            slug: a.slug.clone(),
            name: a.name.clone(),
            is_active: a.is_active,
        })
        .collect();

    let slug_check = query.slug.map(|slug| {
        let data = state.store.artist_by_slug(&slug);
        SlugCheck {
            searched_for: slug,
            found_exact: data.is_some(),
            data,
        }
    });

    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        artist_count: artists.len(),
        recent_artists,
        slug_check,
    })
}
