//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the label site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Supported locales and the fallback locale.
    pub i18n: I18nConfig,

    /// Locale redirect rules.
    pub routing: RoutingConfig,

    /// Keywords driving artist profile variant selection.
    pub profiles: ProfileConfig,

    /// Record store and static asset locations.
    pub content: ContentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Response headers and body limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locale tags, in display order.
    pub locales: Vec<String>,

    /// Locale used for redirects and dictionary fallback.
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["es".to_string(), "en".to_string()],
            default_locale: "es".to_string(),
        }
    }
}

/// Status code family used for locale redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    /// 307 Temporary Redirect.
    #[default]
    Temporary,
    /// 308 Permanent Redirect.
    Permanent,
}

/// Locale routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path prefixes that skip locale handling entirely.
    pub bypass_prefixes: Vec<String>,

    /// File extensions (without the dot) that skip locale handling.
    pub bypass_extensions: Vec<String>,

    /// Redirect flavour for paths missing a locale.
    pub redirect: RedirectKind,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bypass_prefixes: ["/_internal", "/api", "/admin", "/auth", "/assets"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            bypass_extensions: ["png", "jpg", "jpeg", "webp", "svg", "ico"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            redirect: RedirectKind::Temporary,
        }
    }
}

/// Role keywords for the profile dispatcher.
///
/// DJ keywords are always checked before producer keywords.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub dj_keywords: Vec<String>,
    pub producer_keywords: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            dj_keywords: vec!["dj".to_string(), "selector".to_string()],
            producer_keywords: vec![
                "productor".to_string(),
                "producer".to_string(),
                "ingeniero".to_string(),
            ],
        }
    }
}

/// Content locations and listing sizes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// JSON snapshot file backing the record store.
    pub data_path: String,

    /// Directory served under `/assets`. Uploads land in `<assets_dir>/uploads`.
    pub assets_dir: String,

    /// Number of artists shown on the home page.
    pub featured_artists: usize,

    /// Number of news items shown on the home page.
    pub latest_news: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            data_path: "data/content.json".to_string(),
            assets_dir: "public".to_string(),
            featured_artists: 4,
            latest_news: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the `/admin` API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Key shipped in the defaults. Refused whenever the admin API is enabled.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 5 * 1024 * 1024, // 5MB, matches the upload bucket limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.i18n.locales, vec!["es", "en"]);
        assert_eq!(config.i18n.default_locale, "es");
        assert_eq!(config.routing.redirect, RedirectKind::Temporary);
        assert_eq!(config.content.featured_artists, 4);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config: SiteConfig = toml::from_str(
            r#"
            [i18n]
            locales = ["en", "es"]
            default_locale = "en"

            [routing]
            redirect = "permanent"
            "#,
        )
        .unwrap();
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.routing.redirect, RedirectKind::Permanent);
        // untouched fields in a present section still default
        assert!(config.routing.bypass_prefixes.contains(&"/api".to_string()));
    }
}
