//! Locale normalization for inbound request paths.
//!
//! # Responsibilities
//! - Classify every path as bypass, already localized, or needing a redirect
//! - Build the canonical `/<default>/...` redirect target
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Bypass rules are evaluated strictly before locale detection
//! - A redirect target always routes to `Localized` on the next pass,
//!   so redirects cannot loop
//! - Unknown locale-like segments (`/fr/...`) are not special-cased: they
//!   are redirected under the default locale like any other path

use crate::config::{SiteConfig, ValidationError};
use crate::i18n::{Locale, LocaleSet};
use crate::routing::matcher::{AnyMatcher, PathMatcher};

/// Outcome of routing a single request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Exempt from locale handling; pass through unchanged.
    Bypass,
    /// Already carries a supported locale; pass through unchanged.
    Localized(Locale),
    /// Missing a locale; redirect to the contained path-and-query.
    Redirect(String),
}

/// Maps request paths to a [`RouteDecision`].
#[derive(Debug)]
pub struct LocaleRouter {
    locales: LocaleSet,
    bypass: AnyMatcher,
}

impl LocaleRouter {
    pub fn new(locales: LocaleSet, bypass: AnyMatcher) -> Self {
        Self { locales, bypass }
    }

    /// Build the router from the `[i18n]` and `[routing]` sections.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ValidationError> {
        Ok(Self::new(
            LocaleSet::from_config(&config.i18n)?,
            AnyMatcher::from_config(&config.routing),
        ))
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// Route a request target (`path` or `path?query`).
    pub fn route(&self, target: &str) -> RouteDecision {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        if self.bypass.matches(path) {
            return RouteDecision::Bypass;
        }

        if let Some(locale) = self.locales.leading_locale(path) {
            return RouteDecision::Localized(locale.clone());
        }

        RouteDecision::Redirect(self.redirect_target(path, query))
    }

    fn redirect_target(&self, path: &str, query: Option<&str>) -> String {
        let default = self.locales.default_locale().as_str();
        let mut target = String::with_capacity(1 + default.len() + path.len() + 1);
        target.push('/');
        target.push_str(default);

        match path {
            "" | "/" => {}
            p if p.starts_with('/') => target.push_str(p),
            p => {
                target.push('/');
                target.push_str(p);
            }
        }

        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target
    }
}

impl Default for LocaleRouter {
    fn default() -> Self {
        Self::new(
            LocaleSet::default(),
            AnyMatcher::from_config(&Default::default()),
        )
    }
}
