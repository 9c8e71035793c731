//! Media uploads.
//!
//! Admin uploads are stored as received under the static assets directory
//! and referenced from content records by their public URL.

pub mod blob;

pub use blob::{extension_for, BlobError, BlobStore, FsBlobStore};
