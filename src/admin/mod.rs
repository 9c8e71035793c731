//! Authenticated content management API.
//!
//! Every route sits behind [`admin_auth_middleware`]. The router is merged
//! into the site only when `admin.enabled` is set.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/artists", get(list_artists).post(create_artist))
        .route(
            "/admin/artists/{id}",
            get(get_artist).put(update_artist).delete(delete_artist),
        )
        .route("/admin/releases", get(list_releases).post(create_release))
        .route(
            "/admin/releases/{id}",
            get(get_release).put(update_release).delete(delete_release),
        )
        .route("/admin/news", get(list_news).post(create_news))
        .route(
            "/admin/news/{id}",
            get(get_news).put(update_news).delete(delete_news),
        )
        .route("/admin/uploads/{folder}", post(upload))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
