//! Content subsystem: the label's artists, releases and news.
//!
//! # Data Flow
//! ```text
//! Admin API (JSON inputs)
//!     → store.rs (validate, trim, apply under write lock)
//!     → snapshot file (atomic temp + rename)
//!
//! Public pages
//!     → store.rs (concurrent reads from DashMap tables)
//!     → roster.rs (tab filters and role labels for the roster page)
//! ```
//!
//! # Design Decisions
//! - Whole-store JSON snapshot; the data set is small and edited rarely
//! - Mutations are serialized, reads never block on each other
//! - A failed write leaves memory and disk in agreement (rollback)

pub mod roster;
pub mod store;
pub mod types;

pub use roster::{RosterFilter, RosterRole};
pub use store::{ContentStore, StoreCounts, StoreError};
pub use types::{Artist, ArtistInput, News, NewsInput, Release, ReleaseInput, ReleaseType};
