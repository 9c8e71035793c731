//! Hot reload of the config file.
//!
//! The watch is placed on the file's directory, not the file itself, so
//! editors that save by writing a new file and renaming it over the old one
//! are still picked up. Events for other files in that directory are ignored,
//! and a save that leaves the text unchanged does not trigger a reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::SiteConfig;

/// Watches one config file and publishes every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<SiteConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<SiteConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. Updates flow for as long as the returned handle lives.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watched_dir(&self.path).to_path_buf();
        let mut reloader = Reloader::new(self.path, self.updates);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_file(&event, &reloader.path) => {
                    reloader.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

fn watched_dir(file: &Path) -> &Path {
    file.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Whether `event` may have changed the contents of `file`.
fn touches_file(event: &Event, file: &Path) -> bool {
    let relevant = match event.kind {
        // chmod and mtime touches leave the text alone
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any => true,
        _ => false,
    };
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == file.file_name())
}

#[derive(Debug, PartialEq, Eq)]
enum Reload {
    Applied,
    Unchanged,
    Rejected,
}

/// Reads the file after a change and sends the parsed config on.
struct Reloader {
    path: PathBuf,
    last_applied: Option<String>,
    updates: mpsc::UnboundedSender<SiteConfig>,
}

impl Reloader {
    fn new(path: PathBuf, updates: mpsc::UnboundedSender<SiteConfig>) -> Self {
        // The running server was started from this text.
        let last_applied = fs::read_to_string(&path).ok();
        Self {
            path,
            last_applied,
            updates,
        }
    }

    fn reload(&mut self) -> Reload {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                // Mid-rename the file can briefly be missing; the create event follows.
                tracing::debug!(path = ?self.path, error = %e, "Config file unreadable, skipping");
                return Reload::Rejected;
            }
        };
        if self.last_applied.as_deref() == Some(text.as_str()) {
            return Reload::Unchanged;
        }

        match parse_config(&text) {
            Ok(config) => {
                tracing::info!(path = ?self.path, "Config file changed, reloading");
                let _ = self.updates.send(config);
                self.last_applied = Some(text);
                Reload::Applied
            }
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Config reload rejected, keeping current configuration");
                Reload::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};

    fn temp_config() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("umpmusic-watch-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("site.toml")
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_only_changes_to_the_config_file_count() {
        let file = Path::new("/etc/umpmusic/site.toml");
        let write = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert!(touches_file(&event(write, "/etc/umpmusic/site.toml"), file));
        assert!(touches_file(
            &event(EventKind::Create(CreateKind::File), "/etc/umpmusic/site.toml"),
            file
        ));
        assert!(!touches_file(&event(write, "/etc/umpmusic/site.toml.swp"), file));
        assert!(!touches_file(&event(write, "/etc/umpmusic/other.toml"), file));
        assert!(!touches_file(
            &event(EventKind::Access(AccessKind::Any), "/etc/umpmusic/site.toml"),
            file
        ));
        assert!(!touches_file(
            &event(EventKind::Remove(RemoveKind::File), "/etc/umpmusic/site.toml"),
            file
        ));
        assert!(!touches_file(
            &event(
                EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
                "/etc/umpmusic/site.toml"
            ),
            file
        ));
    }

    #[test]
    fn test_watched_dir_of_bare_file_name() {
        assert_eq!(watched_dir(Path::new("site.toml")), Path::new("."));
        assert_eq!(watched_dir(Path::new("conf/site.toml")), Path::new("conf"));
    }

    #[test]
    fn test_reload_skips_unchanged_and_invalid_text() {
        let path = temp_config();
        fs::write(&path, "[i18n]\nlocales = [\"es\", \"en\"]\n").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reloader = Reloader::new(path.clone(), tx);

        // same text the server started with
        assert_eq!(reloader.reload(), Reload::Unchanged);
        assert!(rx.try_recv().is_err());

        fs::write(&path, "[i18n]\nlocales = [\"es\", \"en\", \"pt\"]\n").unwrap();
        assert_eq!(reloader.reload(), Reload::Applied);
        assert_eq!(rx.try_recv().unwrap().i18n.locales, vec!["es", "en", "pt"]);
        assert_eq!(reloader.reload(), Reload::Unchanged);

        fs::write(&path, "[i18n]\ndefault_locale = \"fr\"\n").unwrap();
        assert_eq!(reloader.reload(), Reload::Rejected);
        assert!(rx.try_recv().is_err());

        fs::remove_file(&path).unwrap();
        assert_eq!(reloader.reload(), Reload::Rejected);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
