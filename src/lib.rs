//! Bilingual record label website core.

pub mod admin;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod media;
pub mod observability;
pub mod routing;

pub use config::schema::SiteConfig;
pub use http::SiteServer;
pub use lifecycle::Shutdown;
