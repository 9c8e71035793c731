//! Locale middleware.
//! Normalizes every public request to a `/<lang>/...` path.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::RedirectKind;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteDecision;

pub async fn locale_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (decision, kind) = {
        let ctx = state.inner.load();
        let target = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| request.uri().path());
        (ctx.router.route(target), ctx.config.routing.redirect)
    };

    match decision {
        RouteDecision::Bypass => next.run(request).await,
        RouteDecision::Localized(locale) => {
            request.extensions_mut().insert(locale);
            next.run(request).await
        }
        RouteDecision::Redirect(location) => {
            tracing::debug!(
                path = %request.uri().path(),
                location = %location,
                "Redirecting to locale prefix"
            );
            metrics::record_redirect();
            redirect(kind, &location)
        }
    }
}

/// 307/308 keep the method and body, unlike 302/301.
fn redirect(kind: RedirectKind, location: &str) -> Response {
    match kind {
        RedirectKind::Temporary => Redirect::temporary(location).into_response(),
        RedirectKind::Permanent => Redirect::permanent(location).into_response(),
    }
}
