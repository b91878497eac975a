//! Baseline of the "new items" feed.

use crate::CosmeticItem;

/// Last-seen state of the new-items feed, used as the diff baseline.
#[derive(Debug, Clone, PartialEq, Default, derive_getters::Getters)]
pub struct NewItemsSnapshot {
    /// Content hash reported by the API
    hash: String,
    /// Items in feed order
    items: Vec<CosmeticItem>,
}

impl NewItemsSnapshot {
    /// Create a snapshot from a hash and its items.
    pub fn new(hash: impl Into<String>, items: Vec<CosmeticItem>) -> Self {
        Self {
            hash: hash.into(),
            items,
        }
    }

    /// Items of `self` that are absent from `baseline`, in feed order.
    ///
    /// Comparison is full structural equality. When the hashes match no
    /// comparison happens at all and the result is empty.
    pub fn added_since(&self, baseline: &NewItemsSnapshot) -> Vec<CosmeticItem> {
        if self.hash == baseline.hash {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|item| !baseline.items.contains(item))
            .cloned()
            .collect()
    }

    /// Consume the snapshot, returning its items.
    pub fn into_items(self) -> Vec<CosmeticItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CosmeticType, Rarity};

    fn item(id: &str) -> CosmeticItem {
        CosmeticItem::builder()
            .id(id)
            .name(id)
            .cosmetic_type(CosmeticType::Outfit)
            .rarity(Rarity::new("rare", "Rare"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_added_since_returns_only_new_items() {
        let baseline = NewItemsSnapshot::new("A", vec![item("x"), item("y")]);
        let feed = NewItemsSnapshot::new("B", vec![item("x"), item("y"), item("z")]);

        assert_eq!(feed.added_since(&baseline), vec![item("z")]);
    }

    #[test]
    fn test_added_since_same_hash_is_empty() {
        let baseline = NewItemsSnapshot::new("A", vec![item("x")]);
        let feed = NewItemsSnapshot::new("A", vec![item("x"), item("y")]);

        assert!(feed.added_since(&baseline).is_empty());
    }

    #[test]
    fn test_changed_attribute_counts_as_new() {
        let baseline = NewItemsSnapshot::new("A", vec![item("x")]);
        let changed = CosmeticItem::builder()
            .id("x")
            .name("x")
            .cosmetic_type(CosmeticType::Outfit)
            .rarity(Rarity::new("epic", "Epic"))
            .build()
            .unwrap();
        let feed = NewItemsSnapshot::new("B", vec![changed.clone()]);

        assert_eq!(feed.added_since(&baseline), vec![changed]);
    }
}
