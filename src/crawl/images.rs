// src/crawl/images.rs
// =============================================================================
// Duplicate image detection.
//
// The first URL to produce a digest "owns" it. Every later URL producing the
// same digest is a duplicate. The check-and-insert goes through
// DashMap::entry, which holds the shard lock for that digest, so two workers
// racing on the same new digest cannot both become the owner.
// =============================================================================

use super::hasher::Digest;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

// What observe() decided about one image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First URL seen with this digest
    First,
    /// The digest was already owned by `original`
    Duplicate { original: String },
}

#[derive(Debug, Default)]
pub struct DuplicateImageTracker {
    index: DashMap<Digest, String>,
    duplicates: DashSet<String>,
}

impl DuplicateImageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `url` produced `digest`.
    pub fn observe(&self, url: &str, digest: Digest) -> Observation {
        match self.index.entry(digest) {
            Entry::Occupied(owner) => {
                let original = owner.get().clone();
                drop(owner);
                self.duplicates.insert(url.to_string());
                Observation::Duplicate { original }
            }
            Entry::Vacant(slot) => {
                slot.insert(url.to_string());
                Observation::First
            }
        }
    }

    /// The URL that first produced `digest`, if any.
    pub fn first_url_for(&self, digest: &Digest) -> Option<String> {
        self.index.get(digest).map(|owner| owner.value().clone())
    }

    pub fn is_duplicate(&self, url: &str) -> bool {
        self.duplicates.contains(url)
    }

    /// Snapshot of every duplicate URL seen so far.
    pub fn duplicates(&self) -> Vec<String> {
        self.duplicates.iter().map(|url| url.key().clone()).collect()
    }

    /// Number of distinct digests seen.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
