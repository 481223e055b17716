//! Relation cache.

use rustc_hash::FxHashSet;
use xmltool_model::ObjectId;

/// Ids of objects already exported during one export call.
///
/// Relations to an id in the cache are exported without fields and without
/// following their relations, which bounds the output on cyclic graphs.
#[derive(Debug, Default)]
pub struct RelationCache {
    visited: FxHashSet<ObjectId>,
}

impl RelationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id. Returns `true` if it was not cached before.
    pub fn mark(&mut self, id: ObjectId) -> bool {
        self.visited.insert(id)
    }

    /// Check if an id has been exported.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.visited.contains(&id)
    }

    /// Number of cached ids.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Check if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
