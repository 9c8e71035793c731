//! Internationalization subsystem.
//!
//! # Data Flow
//! ```text
//! [i18n] config section
//!     → locale.rs (validated tags, LocaleSet with default)
//!     → routing layer decides the request's locale
//!     → dictionary.rs (translated copy for that locale, with fallback)
//! ```
//!
//! # Design Decisions
//! - The locale set is a value built at startup, never a global
//! - Locale tags are valid single path segments by construction
//! - Content carries only Spanish and English fields; other locales read Spanish

pub mod dictionary;
pub mod locale;

pub use dictionary::{Dictionaries, DictionaryError};
pub use locale::{Locale, LocaleSet};
