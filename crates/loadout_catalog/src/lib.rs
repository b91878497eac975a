//! In-memory catalog of Fortnite cosmetics and playlists.
//!
//! One [`Catalog`] exists per language, held by a [`CatalogRegistry`]. The
//! refresh loop appends to it; query handlers read from it concurrently.
//! Callers that must not observe an empty catalog wait on
//! [`Catalog::wait_until_loaded`] first.

#![warn(missing_docs)]

mod catalog;
mod registry;

pub use catalog::{COSMETIC_ID_PREFIXES, Catalog, MatchMode, is_cosmetic_id};
pub use registry::CatalogRegistry;
