//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers: request ID, trace, timeout, limits)
//!     → middleware/locale.rs (bypass | redirect | pass with locale)
//!     → pages.rs (localized page models) | api.rs | admin | /assets
//!     → error.rs renders failures as JSON
//! ```

pub mod api;
pub mod middleware;
pub mod pages;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, ServerError, SiteContext, SiteServer};
