//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the default locale belongs to the supported set
//! - Reject bypass rules that would swallow every path
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{SiteConfig, PLACEHOLDER_ADMIN_KEY};
use crate::i18n::Locale;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("i18n.locales must not be empty")]
    NoLocales,

    #[error("invalid locale tag {0:?}")]
    InvalidLocale(String),

    #[error("locale {0:?} listed more than once")]
    DuplicateLocale(String),

    #[error("default locale {0:?} is not in i18n.locales")]
    DefaultLocaleUnsupported(String),

    #[error("bypass prefix {0:?} must start with '/' and not be the root")]
    InvalidBypassPrefix(String),

    #[error("bypass extension {0:?} must be non-empty and have no leading dot")]
    InvalidBypassExtension(String),

    #[error("profiles.{0} must contain at least one non-empty keyword")]
    InvalidKeywords(&'static str),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("admin.api_key must not be empty when the admin API is enabled")]
    EmptyAdminKey,

    #[error("admin.api_key still holds the shipped placeholder; set a real key to enable the admin API")]
    PlaceholderAdminKey,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_locales(config, &mut errors);
    validate_routing(config, &mut errors);

    let profiles = &config.profiles;
    if !keywords_valid(&profiles.dj_keywords) {
        errors.push(ValidationError::InvalidKeywords("dj_keywords"));
    }
    if !keywords_valid(&profiles.producer_keywords) {
        errors.push(ValidationError::InvalidKeywords("producer_keywords"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.admin.enabled {
        let key = config.admin.api_key.trim();
        if key.is_empty() {
            errors.push(ValidationError::EmptyAdminKey);
        } else if key == PLACEHOLDER_ADMIN_KEY {
            errors.push(ValidationError::PlaceholderAdminKey);
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_locales(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    let i18n = &config.i18n;
    if i18n.locales.is_empty() {
        errors.push(ValidationError::NoLocales);
    }

    let mut seen = HashSet::new();
    for tag in &i18n.locales {
        if Locale::parse(tag).is_none() {
            errors.push(ValidationError::InvalidLocale(tag.clone()));
        } else if !seen.insert(tag.as_str()) {
            errors.push(ValidationError::DuplicateLocale(tag.clone()));
        }
    }

    if !i18n.locales.contains(&i18n.default_locale) {
        errors.push(ValidationError::DefaultLocaleUnsupported(
            i18n.default_locale.clone(),
        ));
    }
}

fn validate_routing(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    for prefix in &config.routing.bypass_prefixes {
        if !prefix.starts_with('/') || prefix == "/" {
            errors.push(ValidationError::InvalidBypassPrefix(prefix.clone()));
        }
    }
    for ext in &config.routing.bypass_extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains('/') {
            errors.push(ValidationError::InvalidBypassExtension(ext.clone()));
        }
    }
}

// An empty keyword is a substring of every role and would capture them all.
fn keywords_valid(keywords: &[String]) -> bool {
    !keywords.is_empty() && keywords.iter().all(|k| !k.trim().is_empty())
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
