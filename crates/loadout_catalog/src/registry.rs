//! Language → catalog mapping.

use crate::Catalog;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-wide map of language code to [`Catalog`], created on first use.
///
/// # Example
///
/// ```
/// use loadout_catalog::CatalogRegistry;
///
/// let registry = CatalogRegistry::new();
/// let en = registry.get_or_create("en");
/// assert!(std::sync::Arc::ptr_eq(&en, &registry.get_or_create("en")));
/// assert!(registry.get("fr").is_none());
/// ```
#[derive(Debug, Default)]
pub struct CatalogRegistry {
    catalogs: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl CatalogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog for `language`, if one has been created.
    pub fn get(&self, language: &str) -> Option<Arc<Catalog>> {
        self.catalogs.read().get(language).cloned()
    }

    /// Catalog for `language`, creating an empty one if needed.
    pub fn get_or_create(&self, language: &str) -> Arc<Catalog> {
        if let Some(catalog) = self.get(language) {
            return catalog;
        }
        let mut catalogs = self.catalogs.write();
        Arc::clone(
            catalogs
                .entry(language.to_string())
                .or_insert_with(|| Arc::new(Catalog::new(language))),
        )
    }

    /// Languages with a catalog, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<_> = self.catalogs.read().keys().cloned().collect();
        languages.sort();
        languages
    }
}
