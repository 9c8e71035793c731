//! Bypass rules for the locale router.
//!
//! # Responsibilities
//! - Decide whether a request path is exempt from locale handling
//! - Support raw path prefixes and file-extension suffixes
//! - Combine rules with OR semantics
//!
//! # Design Decisions
//! - Prefix matching is a plain string prefix, not segment-bound
//!   (`/api` also covers `/apidocs`)
//! - Extension matching is case-sensitive on the path, query excluded
//! - No regex to guarantee O(n) matching

use crate::config::RoutingConfig;

/// Trait for matching request paths against a condition.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path (without query string) matches.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a raw path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PathMatcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches paths ending in `.<ext>` for any extension in the allowlist.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    suffixes: Vec<String>,
}

impl ExtensionMatcher {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: extensions
                .into_iter()
                .map(|ext| format!(".{}", ext.as_ref()))
                .collect(),
        }
    }
}

impl PathMatcher for ExtensionMatcher {
    fn matches(&self, path: &str) -> bool {
        self.suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn PathMatcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn PathMatcher>>) -> Self {
        Self { matchers }
    }

    /// Build the bypass list from the `[routing]` config section.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let mut matchers: Vec<Box<dyn PathMatcher>> = config
            .bypass_prefixes
            .iter()
            .map(|prefix| Box::new(PathPrefixMatcher::new(prefix.as_str())) as Box<dyn PathMatcher>)
            .collect();
        if !config.bypass_extensions.is_empty() {
            matchers.push(Box::new(ExtensionMatcher::new(&config.bypass_extensions)));
        }
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl PathMatcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}
