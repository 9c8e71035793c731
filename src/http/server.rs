//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with page, API and admin handlers
//! - Wire up middleware (locale routing, metrics, limits, request ID, tracing)
//! - Swap the routing context when a new config arrives
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router, ServiceExt,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tower::Layer;

use crate::admin::setup_admin_router;
use crate::config::{SiteConfig, ValidationError};
use crate::content::ContentStore;
use crate::http::middleware::locale_middleware;
use crate::http::{api, pages, request};
use crate::i18n::{Dictionaries, DictionaryError};
use crate::lifecycle::shutdown::wait_for;
use crate::media::BlobStore;
use crate::observability::metrics::track_metrics;
use crate::routing::{KeywordClassifier, LocaleRouter, RoleClassifier};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid routing configuration: {0}")]
    Routing(#[from] ValidationError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything derived from the config that request handling reads.
///
/// Rebuilt as a whole on reload and published through [`ArcSwap`], so a
/// request sees either the old context or the new one, never a mix.
pub struct SiteContext {
    pub config: SiteConfig,
    pub router: LocaleRouter,
    pub classifier: Box<dyn RoleClassifier>,
    pub dictionaries: Dictionaries,
}

impl SiteContext {
    pub fn from_config(config: SiteConfig) -> Result<Self, ServerError> {
        let router = LocaleRouter::from_config(&config)?;
        let classifier = Box::new(KeywordClassifier::from_config(&config.profiles));
        let dictionaries = Dictionaries::bundled(router.locales().default_locale())?;
        Ok(Self {
            config,
            router,
            classifier,
            dictionaries,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<SiteContext>>,
    pub store: ContentStore,
    pub blobs: Arc<dyn BlobStore>,
}

/// HTTP server for the label site.
pub struct SiteServer {
    app: NormalizePath<Router>,
    state: AppState,
}

impl SiteServer {
    pub fn new(
        config: SiteConfig,
        store: ContentStore,
        blobs: Arc<dyn BlobStore>,
    ) -> Result<Self, ServerError> {
        let context = SiteContext::from_config(config.clone())?;
        let state = AppState {
            inner: Arc::new(ArcSwap::from_pointee(context)),
            store,
            blobs,
        };
        // Trailing slashes are trimmed before routing, so `/es/` matches `/{lang}`.
        let app = NormalizePathLayer::trim_trailing_slash()
            .layer(Self::build_router(&config, state.clone()));
        Ok(Self { app, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers only wrap routes registered before them, so the fallback is
    /// added first and the locale middleware sees every request.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/health", get(api::health))
            .route("/{lang}", get(pages::home))
            .route("/{lang}/artists", get(pages::roster))
            .route("/{lang}/artists/{slug}", get(pages::artist_profile))
            .route("/{lang}/news", get(pages::news_list))
            .route("/{lang}/news/{slug}", get(pages::news_article))
            .route("/{lang}/about", get(pages::about))
            .route("/{lang}/contact", get(pages::contact))
            .nest_service("/assets", ServeDir::new(&config.content.assets_dir));

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        let mut router = router
            .fallback(pages::fallback)
            .layer(middleware::from_fn_with_state(state.clone(), locale_middleware))
            .layer(middleware::from_fn(track_metrics))
            .with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ));
        }

        router
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` replace the routing context.
    /// Listener, limits and timeouts keep their startup values.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let inner = self.state.inner.clone();
        let reload = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match SiteContext::from_config(config) {
                    Ok(context) => {
                        tracing::info!(
                            locales = ?context.config.i18n.locales,
                            default_locale = %context.config.i18n.default_locale,
                            "Routing context reloaded"
                        );
                        inner.store(Arc::new(context));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected config update, keeping current context");
                    }
                }
            }
        });

        axum::serve(listener, ServiceExt::<Request>::into_make_service(self.app))
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
