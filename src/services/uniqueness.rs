use std::collections::HashSet;

use crate::models::domain::ContentItem;

/// Dedup keys already emitted for a request, including cache hits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeenKeys(HashSet<String>);

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend_from(&mut self, items: &[ContentItem]) {
        self.0.extend(items.iter().map(ContentItem::dedup_key));
    }
}

/// Stable filter: drops items whose key was already seen (including earlier in
/// the same batch) and never pads. The caller reports any shortfall.
pub fn dedupe(candidates: Vec<ContentItem>, seen: SeenKeys) -> (Vec<ContentItem>, SeenKeys) {
    let SeenKeys(mut keys) = seen;
    let unique = candidates
        .into_iter()
        .filter(|item| keys.insert(item.dedup_key()))
        .collect();
    (unique, SeenKeys(keys))
}
