//! Per-language cosmetic and playlist catalog.

use loadout_core::{CosmeticItem, CosmeticType, PLAYLIST_ID_PREFIX, Playlist};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Id prefixes that switch a cosmetic query from name matching to id matching.
pub const COSMETIC_ID_PREFIXES: [&str; 10] = [
    "cid_",
    "bid_",
    "pickaxe_",
    "eid_",
    "musicpack_",
    "spid_",
    "lsid_",
    "wrap_",
    "glider_",
    "bannertoken_",
];

/// How query text is compared against ids or names.
///
/// Parses from `prefix`/`starts` and `substring`/`contains`.
///
/// # Examples
///
/// ```
/// use loadout_catalog::MatchMode;
///
/// assert_eq!("starts".parse::<MatchMode>().unwrap(), MatchMode::Prefix);
/// assert_eq!("contains".parse::<MatchMode>().unwrap(), MatchMode::Substring);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    /// Candidate starts with the query
    #[default]
    #[strum(to_string = "prefix", serialize = "starts")]
    Prefix,
    /// Candidate contains the query anywhere
    #[strum(to_string = "substring", serialize = "contains")]
    Substring,
}

impl MatchMode {
    /// Compare an already lowercased query against `candidate`.
    fn matches(self, candidate: &str, query_lower: &str) -> bool {
        let candidate = candidate.to_lowercase();
        match self {
            MatchMode::Prefix => candidate.starts_with(query_lower),
            MatchMode::Substring => candidate.contains(query_lower),
        }
    }
}

/// Whether `query` looks like a category-coded cosmetic id.
pub fn is_cosmetic_id(query: &str) -> bool {
    let lower = query.to_lowercase();
    COSMETIC_ID_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Append-only item list with an id index used to keep dedup checks cheap.
#[derive(Debug)]
struct Bucket<T> {
    entries: Vec<Arc<T>>,
    by_id: HashMap<String, Vec<usize>>,
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<T: PartialEq> Bucket<T> {
    fn contains(&self, id: &str, item: &T) -> bool {
        self.by_id
            .get(id)
            .is_some_and(|slots| slots.iter().any(|&slot| *self.entries[slot] == *item))
    }

    fn push(&mut self, id: &str, item: Arc<T>) {
        self.by_id
            .entry(id.to_string())
            .or_default()
            .push(self.entries.len());
        self.entries.push(item);
    }
}

#[derive(Debug, Default)]
struct Buckets {
    all: Bucket<CosmeticItem>,
    by_type: HashMap<CosmeticType, Vec<Arc<CosmeticItem>>>,
    playlists: Bucket<Playlist>,
}

/// Cosmetics and playlists for one language.
///
/// Items are only ever appended; nothing is evicted for the lifetime of the
/// process. Each bucket mutation takes a short write lock, so readers see a
/// consistent prefix of the buckets and never a half-written entry.
///
/// # Example
///
/// ```
/// use loadout_catalog::{Catalog, MatchMode};
/// use loadout_core::{CosmeticItem, CosmeticType, Rarity};
///
/// let catalog = Catalog::new("en");
/// let item = CosmeticItem::builder()
///     .id("CID_028_Athena_Commando_F")
///     .name("Renegade Raider")
///     .cosmetic_type(CosmeticType::Outfit)
///     .rarity(Rarity::new("rare", "Rare"))
///     .build()
///     .unwrap();
///
/// assert!(catalog.add_cosmetic(item.clone()));
/// assert!(!catalog.add_cosmetic(item));
/// assert!(catalog.query("renegade", None, MatchMode::Substring).is_empty());
///
/// catalog.mark_cosmetics_loaded();
/// let hits = catalog.query("renegade", None, MatchMode::Substring);
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug)]
pub struct Catalog {
    language: String,
    buckets: RwLock<Buckets>,
    cosmetics_loaded: watch::Sender<bool>,
    playlists_loaded: watch::Sender<bool>,
}

impl Catalog {
    /// Create an empty, not-yet-loaded catalog.
    pub fn new(language: impl Into<String>) -> Self {
        let language = language.into();
        tracing::debug!(language = %language, "Creating catalog");
        Self {
            language,
            buckets: RwLock::new(Buckets::default()),
            cosmetics_loaded: watch::Sender::new(false),
            playlists_loaded: watch::Sender::new(false),
        }
    }

    /// Language code this catalog holds.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Insert a cosmetic unless an equal item is already present.
    ///
    /// The item lands in the "all" bucket and, for bucketed categories, in its
    /// per-type bucket. Returns whether it was newly added.
    pub fn add_cosmetic(&self, item: CosmeticItem) -> bool {
        let mut buckets = self.buckets.write();
        if buckets.all.contains(item.id(), &item) {
            return false;
        }

        let cosmetic_type = *item.cosmetic_type();
        let id = item.id().clone();
        let item = Arc::new(item);
        buckets.all.push(&id, Arc::clone(&item));
        if cosmetic_type.is_bucketed() {
            buckets.by_type.entry(cosmetic_type).or_default().push(item);
        }
        true
    }

    /// Insert every cosmetic, returning how many were new.
    pub fn add_cosmetics(&self, items: impl IntoIterator<Item = CosmeticItem>) -> usize {
        items
            .into_iter()
            .map(|item| self.add_cosmetic(item))
            .filter(|added| *added)
            .count()
    }

    /// Insert a playlist unless an equal one is already present.
    pub fn add_playlist(&self, playlist: Playlist) -> bool {
        let mut buckets = self.buckets.write();
        if buckets.playlists.contains(playlist.id(), &playlist) {
            return false;
        }
        let id = playlist.id().clone();
        buckets.playlists.push(&id, Arc::new(playlist));
        true
    }

    /// Insert every playlist, returning how many were new.
    pub fn add_playlists(&self, playlists: impl IntoIterator<Item = Playlist>) -> usize {
        playlists
            .into_iter()
            .map(|playlist| self.add_playlist(playlist))
            .filter(|added| *added)
            .count()
    }

    /// Search cosmetics.
    ///
    /// `categories` restricts the search to those per-type buckets, visited
    /// in the order given; `None` searches everything. Queries starting with
    /// a known id prefix match ids, anything else matches names.
    /// Case-insensitive, insertion order. Empty until the first cosmetics
    /// load has been marked, even while a refresh is filling the buckets.
    #[tracing::instrument(skip(self), fields(language = %self.language))]
    pub fn query(
        &self,
        text: &str,
        categories: Option<&[CosmeticType]>,
        match_mode: MatchMode,
    ) -> Vec<Arc<CosmeticItem>> {
        let query = text.to_lowercase();
        let by_id = is_cosmetic_id(&query);
        let matches = |item: &CosmeticItem| {
            let field = if by_id { item.id() } else { item.name() };
            match_mode.matches(field, &query)
        };

        if !self.is_cosmetics_loaded() {
            tracing::debug!("Cosmetics not loaded yet");
            return Vec::new();
        }
        let buckets = self.buckets.read();

        let results: Vec<_> = match categories {
            None => buckets
                .all
                .entries
                .iter()
                .filter(|item| matches(item))
                .cloned()
                .collect(),
            Some(categories) => categories
                .iter()
                .filter_map(|category| {
                    if !category.is_bucketed() {
                        tracing::warn!(category = %category, "Category has no bucket, skipping");
                    }
                    buckets.by_type.get(category)
                })
                .flat_map(|bucket| bucket.iter())
                .filter(|item| matches(item))
                .cloned()
                .collect(),
        };

        tracing::debug!(by_id, results = results.len(), "Cosmetic query finished");
        results
    }

    /// Search playlists by id (`playlist_` queries) or display label.
    ///
    /// Empty until the first playlists load has been marked.
    #[tracing::instrument(skip(self), fields(language = %self.language))]
    pub fn query_playlists(&self, text: &str, match_mode: MatchMode) -> Vec<Arc<Playlist>> {
        if !self.is_playlists_loaded() {
            return Vec::new();
        }
        let query = text.to_lowercase();
        let by_id = query.starts_with(PLAYLIST_ID_PREFIX);

        let buckets = self.buckets.read();
        buckets
            .playlists
            .entries
            .iter()
            .filter(|playlist| {
                if by_id {
                    match_mode.matches(playlist.id(), &query)
                } else {
                    match_mode.matches(&playlist.display_label(), &query)
                }
            })
            .cloned()
            .collect()
    }

    /// Every cosmetic, in insertion order.
    pub fn all_cosmetics(&self) -> Vec<Arc<CosmeticItem>> {
        self.buckets.read().all.entries.clone()
    }

    /// Every cosmetic of one category, in insertion order.
    pub fn cosmetics_of(&self, cosmetic_type: CosmeticType) -> Vec<Arc<CosmeticItem>> {
        self.buckets
            .read()
            .by_type
            .get(&cosmetic_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of cosmetics in the "all" bucket.
    pub fn len(&self) -> usize {
        self.buckets.read().all.entries.len()
    }

    /// Whether the catalog holds no cosmetics.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cosmetics in one per-type bucket.
    pub fn bucket_len(&self, cosmetic_type: CosmeticType) -> usize {
        self.buckets
            .read()
            .by_type
            .get(&cosmetic_type)
            .map_or(0, Vec::len)
    }

    /// Number of playlists.
    pub fn playlist_len(&self) -> usize {
        self.buckets.read().playlists.entries.len()
    }

    /// Flag cosmetics as loaded and wake every waiter.
    pub fn mark_cosmetics_loaded(&self) {
        if !self.cosmetics_loaded.send_replace(true) {
            tracing::info!(language = %self.language, cosmetics = self.len(), "Cosmetics loaded");
        }
    }

    /// Flag playlists as loaded and wake every waiter.
    pub fn mark_playlists_loaded(&self) {
        if !self.playlists_loaded.send_replace(true) {
            tracing::info!(language = %self.language, playlists = self.playlist_len(), "Playlists loaded");
        }
    }

    /// Whether the first cosmetics load has completed.
    pub fn is_cosmetics_loaded(&self) -> bool {
        *self.cosmetics_loaded.borrow()
    }

    /// Whether the first playlists load has completed.
    pub fn is_playlists_loaded(&self) -> bool {
        *self.playlists_loaded.borrow()
    }

    /// Suspend until cosmetics have been loaded at least once.
    ///
    /// Returns immediately if they already are. There is no internal
    /// timeout; wrap in `tokio::time::timeout` to bound the wait.
    pub async fn wait_until_loaded(&self) {
        Self::wait_for(&self.cosmetics_loaded).await;
    }

    /// Suspend until playlists have been loaded at least once.
    pub async fn wait_until_playlists_loaded(&self) {
        Self::wait_for(&self.playlists_loaded).await;
    }

    async fn wait_for(flag: &watch::Sender<bool>) {
        let mut rx = flag.subscribe();
        // Only errors once the sender is gone, which cannot outlive `self`.
        let _ = rx.wait_for(|loaded| *loaded).await;
    }
}
