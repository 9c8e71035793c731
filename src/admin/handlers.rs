use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::content::{
    Artist, ArtistInput, ContentStore, News, NewsInput, Release, ReleaseInput, StoreCounts,
    StoreError,
};
use crate::error::SiteError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub counts: StoreCounts,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Run a store mutation on the blocking pool; each one rewrites the snapshot file.
async fn write<T, F>(state: &AppState, op: F) -> Result<T, SiteError>
where
    F: FnOnce(&ContentStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| SiteError::Internal(format!("store task failed: {e}")))?;
    Ok(result?)
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        counts: state.store.counts(),
    })
}

// Artists

pub async fn list_artists(State(state): State<AppState>) -> Json<Vec<Artist>> {
    Json(state.store.artists())
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Artist>, SiteError> {
    state
        .store
        .artist(id)
        .map(Json)
        .ok_or_else(|| SiteError::NotFound(format!("artist {id} not found")))
}

pub async fn create_artist(
    State(state): State<AppState>,
    Json(input): Json<ArtistInput>,
) -> Result<(StatusCode, Json<Artist>), SiteError> {
    Ok((StatusCode::CREATED, Json(write(&state, |s| s.create_artist(input)).await?)))
}

pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ArtistInput>,
) -> Result<Json<Artist>, SiteError> {
    Ok(Json(write(&state, move |s| s.update_artist(id, input)).await?))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    write(&state, move |s| s.delete_artist(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Releases

pub async fn list_releases(State(state): State<AppState>) -> Json<Vec<Release>> {
    Json(state.store.releases())
}

pub async fn get_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Release>, SiteError> {
    state
        .store
        .release(id)
        .map(Json)
        .ok_or_else(|| SiteError::NotFound(format!("release {id} not found")))
}

pub async fn create_release(
    State(state): State<AppState>,
    Json(input): Json<ReleaseInput>,
) -> Result<(StatusCode, Json<Release>), SiteError> {
    Ok((StatusCode::CREATED, Json(write(&state, |s| s.create_release(input)).await?)))
}

pub async fn update_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReleaseInput>,
) -> Result<Json<Release>, SiteError> {
    Ok(Json(write(&state, move |s| s.update_release(id, input)).await?))
}

pub async fn delete_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    write(&state, move |s| s.delete_release(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// News

pub async fn list_news(State(state): State<AppState>) -> Json<Vec<News>> {
    Json(state.store.news())
}

pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<News>, SiteError> {
    state
        .store
        .news_item(id)
        .map(Json)
        .ok_or_else(|| SiteError::NotFound(format!("news {id} not found")))
}

pub async fn create_news(
    State(state): State<AppState>,
    Json(input): Json<NewsInput>,
) -> Result<(StatusCode, Json<News>), SiteError> {
    Ok((StatusCode::CREATED, Json(write(&state, |s| s.create_news(input)).await?)))
}

pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewsInput>,
) -> Result<Json<News>, SiteError> {
    Ok(Json(write(&state, move |s| s.update_news(id, input)).await?))
}

pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    write(&state, move |s| s.delete_news(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Uploads

/// Store a raw image body and return its public URL.
pub async fn upload(
    State(state): State<AppState>,
    Path(folder): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), SiteError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let blobs = state.blobs.clone();
    let url = tokio::task::spawn_blocking(move || blobs.put(&folder, &content_type, &body))
        .await
        .map_err(|e| SiteError::Internal(format!("upload task failed: {e}")))??;
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
