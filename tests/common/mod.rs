//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use umpmusic_site::config::SiteConfig;
use umpmusic_site::content::ContentStore;
use umpmusic_site::lifecycle::Shutdown;
use umpmusic_site::media::FsBlobStore;
use umpmusic_site::SiteServer;
use uuid::Uuid;

pub const ADMIN_KEY: &str = "test-admin-key";

/// A running site on an ephemeral port with its own data directory.
pub struct TestSite {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub store: ContentStore,
    pub config_tx: mpsc::UnboundedSender<SiteConfig>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

/// Config for tests: admin enabled with a known key, data in `data_dir`.
pub fn test_config(data_dir: &std::path::Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();
    config.content.data_path = data_dir.join("content.json").to_string_lossy().into_owned();
    config.content.assets_dir = data_dir.join("public").to_string_lossy().into_owned();
    config
}

/// Start a site with the default test config.
#[allow(dead_code)]
pub async fn start_site() -> TestSite {
    start_site_with(|_| {}).await
}

/// Start a site after applying `tweak` to the test config.
pub async fn start_site_with(tweak: impl FnOnce(&mut SiteConfig)) -> TestSite {
    let data_dir = std::env::temp_dir().join(format!("umpmusic-it-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&data_dir).unwrap();

    let mut config = test_config(&data_dir);
    tweak(&mut config);

    let store = ContentStore::open(&config.content.data_path).unwrap();
    let blobs = Arc::new(FsBlobStore::under_assets(std::path::Path::new(
        &config.content.assets_dir,
    )));

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = SiteServer::new(config, store.clone(), blobs).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestSite {
        addr,
        data_dir,
        store,
        config_tx,
        shutdown,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
