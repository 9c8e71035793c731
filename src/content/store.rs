//! Record store for artists, releases and news.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::content::types::{
    clean, is_valid_slug, Artist, ArtistInput, News, NewsInput, Record, Release, ReleaseInput,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("{kind} slug {slug:?} is already taken")]
    SlugTaken { kind: &'static str, slug: String },

    #[error("artist {0} does not exist")]
    UnknownArtist(Uuid),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("persistence error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StoreError {
    fn not_found<T: Record>(id: Uuid) -> Self {
        StoreError::NotFound { kind: T::KIND, id }
    }
}

/// One concurrent table keyed by record id.
struct Table<T> {
    rows: DashMap<Uuid, T>,
}

impl<T: Record> Table<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    fn from_rows(rows: Vec<T>) -> Self {
        let table = Self::new();
        for row in rows {
            table.rows.insert(row.id(), row);
        }
        table
    }

    fn all(&self) -> Vec<T> {
        self.rows.iter().map(|r| r.value().clone()).collect()
    }

    fn get(&self, id: Uuid) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    fn by_slug(&self, slug: &str) -> Option<T> {
        self.rows
            .iter()
            .find(|r| r.value().slug() == Some(slug))
            .map(|r| r.value().clone())
    }

    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.rows
            .iter()
            .any(|r| r.value().slug() == Some(slug) && Some(*r.key()) != except)
    }

    fn insert(&self, row: T) -> Option<T> {
        self.rows.insert(row.id(), row)
    }

    fn remove(&self, id: Uuid) -> Option<T> {
        self.rows.remove(&id).map(|(_, row)| row)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// On-disk form of the whole store.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
    artists: Vec<Artist>,
    releases: Vec<Release>,
    news: Vec<News>,
}

/// Row counts, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub artists: usize,
    pub releases: usize,
    pub news: usize,
}

/// A thread-safe content store, optionally persisted to a JSON snapshot.
///
/// Reads go straight to the tables. Mutations are serialized by a write lock
/// and written to disk before they are applied, so readers never see a change
/// that failed to persist.
#[derive(Clone)]
pub struct ContentStore {
    artists: Arc<Table<Artist>>,
    releases: Arc<Table<Release>>,
    news: Arc<Table<News>>,
    persistence_path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl ContentStore {
    /// Create an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::from_snapshot(Snapshot::default(), None)
    }

    /// Open the store backed by `path`, loading it if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader(reader)?
        } else {
            Snapshot::default()
        };

        let store = Self::from_snapshot(snapshot, Some(path));
        tracing::info!(
            path = ?store.persistence_path,
            artists = store.artists.len(),
            releases = store.releases.len(),
            news = store.news.len(),
            "Content store opened"
        );
        Ok(store)
    }

    fn from_snapshot(snapshot: Snapshot, persistence_path: Option<PathBuf>) -> Self {
        Self {
            artists: Arc::new(Table::from_rows(snapshot.artists)),
            releases: Arc::new(Table::from_rows(snapshot.releases)),
            news: Arc::new(Table::from_rows(snapshot.news)),
            persistence_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            artists: self.artists.len(),
            releases: self.releases.len(),
            news: self.news.len(),
        }
    }

    // ---- artists ----

    /// Every artist, by name.
    pub fn artists(&self) -> Vec<Artist> {
        let mut artists = self.artists.all();
        sort_by_name(&mut artists);
        artists
    }

    /// Active artists, by name.
    pub fn active_artists(&self) -> Vec<Artist> {
        let mut artists: Vec<Artist> = self.artists.all().into_iter().filter(|a| a.is_active).collect();
        sort_by_name(&mut artists);
        artists
    }

    /// The first `limit` active artists, by name.
    pub fn featured_artists(&self, limit: usize) -> Vec<Artist> {
        let mut artists = self.active_artists();
        artists.truncate(limit);
        artists
    }

    pub fn artist(&self, id: Uuid) -> Option<Artist> {
        self.artists.get(id)
    }

    pub fn artist_by_slug(&self, slug: &str) -> Option<Artist> {
        self.artists.by_slug(slug)
    }

    pub fn create_artist(&self, input: ArtistInput) -> Result<Artist, StoreError> {
        let _guard = self.lock();
        let (name, slug) = required_name_and_slug(input.name, input.slug, "name")?;
        if self.artists.slug_taken(&slug, None) {
            return Err(StoreError::SlugTaken { kind: Artist::KIND, slug });
        }

        let artist = Artist {
            id: Uuid::new_v4(),
            slug,
            name,
            role: clean(input.role),
            role_en: clean(input.role_en),
            tagline_es: clean(input.tagline_es),
            tagline_en: clean(input.tagline_en),
            bio_es: clean(input.bio_es),
            bio_en: clean(input.bio_en),
            photo_url: clean(input.photo_url),
            spotify_url: clean(input.spotify_url),
            apple_music_url: clean(input.apple_music_url),
            youtube_url: clean(input.youtube_url),
            instagram_url: clean(input.instagram_url),
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.artists, artist.clone()),
            || {
                self.artists.insert(artist.clone());
            },
        )?;
        tracing::info!(id = %artist.id, slug = %artist.slug, "Artist created");
        Ok(artist)
    }

    pub fn update_artist(&self, id: Uuid, input: ArtistInput) -> Result<Artist, StoreError> {
        let _guard = self.lock();
        let current = self.artists.get(id).ok_or_else(|| StoreError::not_found::<Artist>(id))?;
        let (name, slug) = required_name_and_slug(input.name, input.slug, "name")?;
        if self.artists.slug_taken(&slug, Some(id)) {
            return Err(StoreError::SlugTaken { kind: Artist::KIND, slug });
        }

        let photo_url = replace_media(current.photo_url.clone(), input.photo_url, input.remove_photo);
        let updated = Artist {
            slug,
            name,
            role: clean(input.role),
            role_en: clean(input.role_en),
            tagline_es: clean(input.tagline_es),
            tagline_en: clean(input.tagline_en),
            bio_es: clean(input.bio_es),
            bio_en: clean(input.bio_en),
            photo_url,
            spotify_url: clean(input.spotify_url),
            apple_music_url: clean(input.apple_music_url),
            youtube_url: clean(input.youtube_url),
            instagram_url: clean(input.instagram_url),
            is_active: input.is_active.unwrap_or(current.is_active),
            ..current
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.artists, updated.clone()),
            || {
                self.artists.insert(updated.clone());
            },
        )?;
        tracing::info!(id = %id, slug = %updated.slug, "Artist updated");
        Ok(updated)
    }

    /// Delete an artist together with its releases.
    pub fn delete_artist(&self, id: Uuid) -> Result<Artist, StoreError> {
        let _guard = self.lock();
        let artist = self.artists.get(id).ok_or_else(|| StoreError::not_found::<Artist>(id))?;
        let orphaned: Vec<Uuid> = self
            .releases
            .all()
            .into_iter()
            .filter(|r| r.artist_id == id)
            .map(|r| r.id)
            .collect();

        self.commit(
            |snapshot| {
                snapshot.artists.retain(|a| a.id != id);
                snapshot.releases.retain(|r| r.artist_id != id);
            },
            || {
                self.artists.remove(id);
                for release in &orphaned {
                    self.releases.remove(*release);
                }
            },
        )?;
        tracing::info!(id = %id, releases = orphaned.len(), "Artist deleted");
        Ok(artist)
    }

    // ---- releases ----

    /// Every release, newest first.
    pub fn releases(&self) -> Vec<Release> {
        let mut releases = self.releases.all();
        sort_releases(&mut releases);
        releases
    }

    /// Releases of one artist, newest first; undated releases last.
    pub fn releases_for_artist(&self, artist_id: Uuid) -> Vec<Release> {
        let mut releases: Vec<Release> = self
            .releases
            .all()
            .into_iter()
            .filter(|r| r.artist_id == artist_id)
            .collect();
        sort_releases(&mut releases);
        releases
    }

    pub fn release(&self, id: Uuid) -> Option<Release> {
        self.releases.get(id)
    }

    pub fn create_release(&self, input: ReleaseInput) -> Result<Release, StoreError> {
        let _guard = self.lock();
        let title = required(input.title, "title")?;
        if self.artists.get(input.artist_id).is_none() {
            return Err(StoreError::UnknownArtist(input.artist_id));
        }

        let release = Release {
            id: Uuid::new_v4(),
            artist_id: input.artist_id,
            title,
            release_type: input.release_type,
            release_date: input.release_date,
            cover_url: clean(input.cover_url),
            link: clean(input.link),
            spotify_url: clean(input.spotify_url),
            apple_music_url: clean(input.apple_music_url),
            youtube_url: clean(input.youtube_url),
            created_at: Utc::now(),
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.releases, release.clone()),
            || {
                self.releases.insert(release.clone());
            },
        )?;
        tracing::info!(id = %release.id, artist_id = %release.artist_id, "Release created");
        Ok(release)
    }

    pub fn update_release(&self, id: Uuid, input: ReleaseInput) -> Result<Release, StoreError> {
        let _guard = self.lock();
        let current = self.releases.get(id).ok_or_else(|| StoreError::not_found::<Release>(id))?;
        let title = required(input.title, "title")?;
        if self.artists.get(input.artist_id).is_none() {
            return Err(StoreError::UnknownArtist(input.artist_id));
        }

        let cover_url = replace_media(current.cover_url.clone(), input.cover_url, input.remove_cover);
        let updated = Release {
            artist_id: input.artist_id,
            title,
            release_type: input.release_type,
            release_date: input.release_date,
            cover_url,
            link: clean(input.link),
            spotify_url: clean(input.spotify_url),
            apple_music_url: clean(input.apple_music_url),
            youtube_url: clean(input.youtube_url),
            ..current
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.releases, updated.clone()),
            || {
                self.releases.insert(updated.clone());
            },
        )?;
        tracing::info!(id = %id, "Release updated");
        Ok(updated)
    }

    pub fn delete_release(&self, id: Uuid) -> Result<Release, StoreError> {
        let _guard = self.lock();
        let release = self.releases.get(id).ok_or_else(|| StoreError::not_found::<Release>(id))?;
        self.commit(
            |snapshot| snapshot.releases.retain(|r| r.id != id),
            || {
                self.releases.remove(id);
            },
        )?;
        tracing::info!(id = %id, "Release deleted");
        Ok(release)
    }

    // ---- news ----

    /// Every article, newest first by creation.
    pub fn news(&self) -> Vec<News> {
        let mut news = self.news.all();
        news.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        news
    }

    /// Published articles, most recently published first.
    pub fn published_news(&self) -> Vec<News> {
        let mut news: Vec<News> = self.news.all().into_iter().filter(|n| n.is_published).collect();
        news.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        news
    }

    pub fn news_item(&self, id: Uuid) -> Option<News> {
        self.news.get(id)
    }

    /// A published article by slug; drafts are invisible here.
    pub fn published_news_by_slug(&self, slug: &str) -> Option<News> {
        self.news.by_slug(slug).filter(|n| n.is_published)
    }

    pub fn create_news(&self, input: NewsInput) -> Result<News, StoreError> {
        let _guard = self.lock();
        let (title, slug) = required_name_and_slug(input.title, input.slug, "title")?;
        if self.news.slug_taken(&slug, None) {
            return Err(StoreError::SlugTaken { kind: News::KIND, slug });
        }

        let now = Utc::now();
        let item = News {
            id: Uuid::new_v4(),
            slug,
            title,
            title_en: clean(input.title_en),
            excerpt: clean(input.excerpt),
            excerpt_en: clean(input.excerpt_en),
            content: clean(input.content),
            content_en: clean(input.content_en),
            image_url: clean(input.image_url),
            is_published: input.is_published,
            published_at: input.is_published.then_some(now),
            created_at: now,
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.news, item.clone()),
            || {
                self.news.insert(item.clone());
            },
        )?;
        tracing::info!(id = %item.id, slug = %item.slug, published = item.is_published, "News created");
        Ok(item)
    }

    pub fn update_news(&self, id: Uuid, input: NewsInput) -> Result<News, StoreError> {
        let _guard = self.lock();
        let current = self.news.get(id).ok_or_else(|| StoreError::not_found::<News>(id))?;
        let (title, slug) = required_name_and_slug(input.title, input.slug, "title")?;
        if self.news.slug_taken(&slug, Some(id)) {
            return Err(StoreError::SlugTaken { kind: News::KIND, slug });
        }

        let published_at = match (input.is_published, current.published_at) {
            (true, None) => Some(Utc::now()),
            (_, existing) => existing,
        };
        let image_url = replace_media(current.image_url.clone(), input.image_url, input.remove_image);
        let updated = News {
            slug,
            title,
            title_en: clean(input.title_en),
            excerpt: clean(input.excerpt),
            excerpt_en: clean(input.excerpt_en),
            content: clean(input.content),
            content_en: clean(input.content_en),
            image_url,
            is_published: input.is_published,
            published_at,
            ..current
        };

        self.commit(
            |snapshot| upsert(&mut snapshot.news, updated.clone()),
            || {
                self.news.insert(updated.clone());
            },
        )?;
        tracing::info!(id = %id, slug = %updated.slug, published = updated.is_published, "News updated");
        Ok(updated)
    }

    pub fn delete_news(&self, id: Uuid) -> Result<News, StoreError> {
        let _guard = self.lock();
        let item = self.news.get(id).ok_or_else(|| StoreError::not_found::<News>(id))?;
        self.commit(
            |snapshot| snapshot.news.retain(|n| n.id != id),
            || {
                self.news.remove(id);
            },
        )?;
        tracing::info!(id = %id, "News deleted");
        Ok(item)
    }

    // ---- persistence ----

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the store as `stage` leaves it, then run `publish`.
    ///
    /// Must be called with the write lock held. If writing fails, `publish`
    /// never runs and the tables are untouched.
    fn commit(&self, stage: impl FnOnce(&mut Snapshot), publish: impl FnOnce()) -> Result<(), StoreError> {
        if let Some(path) = &self.persistence_path {
            let mut snapshot = Snapshot {
                artists: self.artists(),
                releases: self.releases(),
                news: self.news(),
            };
            stage(&mut snapshot);
            if let Err(e) = write_snapshot(path, &snapshot) {
                tracing::error!(error = %e, "Failed to persist content store, change discarded");
                return Err(e);
            }
        }
        publish();
        Ok(())
    }
}

/// Replace the row with the same id, or append it.
fn upsert<T: Record>(rows: &mut Vec<T>, row: T) {
    match rows.iter_mut().find(|r| r.id() == row.id()) {
        Some(slot) => *slot = row,
        None => rows.push(row),
    }
}

/// Write the snapshot to a temporary file, sync it, then rename it into place.
fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let written = write_synced(&tmp, snapshot).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_synced(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn required(value: String, field: &'static str) -> Result<String, StoreError> {
    clean(Some(value)).ok_or(StoreError::Invalid {
        field,
        reason: "must not be empty",
    })
}

fn required_name_and_slug(
    name: String,
    slug: String,
    name_field: &'static str,
) -> Result<(String, String), StoreError> {
    let name = required(name, name_field)?;
    let slug = required(slug, "slug")?;
    if !is_valid_slug(&slug) {
        return Err(StoreError::Invalid {
            field: "slug",
            reason: "use lowercase letters, digits and single hyphens",
        });
    }
    Ok((name, slug))
}

/// Keep the current media URL unless a new one is supplied or removal is requested.
fn replace_media(current: Option<String>, new: Option<String>, remove: bool) -> Option<String> {
    match clean(new) {
        Some(url) => Some(url),
        None if remove => None,
        None => current,
    }
}

fn sort_by_name(artists: &mut [Artist]) {
    artists.sort_by_cached_key(|a| a.name.to_lowercase());
}

fn sort_releases(releases: &mut [Release]) {
    releases.sort_by(|a, b| {
        b.release_date
            .cmp(&a.release_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
