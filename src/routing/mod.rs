//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path (+ query)
//!     → matcher.rs (bypass rules: static, api, admin, auth, image files)
//!     → router.rs (locale detection / canonical redirect target)
//!     → Return: Bypass | Localized(locale) | Redirect(target)
//!
//! Artist profile request
//!     → dispatch.rs (role text → Artist | Dj | Producer)
//! ```
//!
//! # Design Decisions
//! - Routing values compiled from config at startup, immutable at runtime
//! - No regex in hot path (prefix/suffix matching only)
//! - Deterministic and total: every input yields exactly one decision
//! - First match wins (bypass, then locale, then redirect; DJ, then producer)

pub mod dispatch;
pub mod matcher;
pub mod router;

pub use dispatch::{KeywordClassifier, ProfileVariant, RoleClassifier};
pub use matcher::{AnyMatcher, ExtensionMatcher, PathMatcher, PathPrefixMatcher};
pub use router::{LocaleRouter, RouteDecision};
