use std::collections::{HashMap, HashSet};

use peakbars_geometry::GeometryId;

/// Per-geometry resources, kept only while the geometry is still drawn.
#[derive(Debug)]
pub struct GeometryCache<T> {
    entries: HashMap<GeometryId, T>,
}

impl<T> Default for GeometryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> GeometryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: GeometryId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Remove and return every entry whose id is not in `live`.
    pub fn evict_stale(&mut self, live: &HashSet<GeometryId>) -> Vec<(GeometryId, T)> {
        let stale: Vec<GeometryId> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        stale
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|value| (id, value)))
            .collect()
    }

    /// The entry for `id`, creating it with `upload` on first use.
    pub fn get_or_insert_with(&mut self, id: GeometryId, upload: impl FnOnce() -> T) -> &T {
        self.entries.entry(id).or_insert_with(upload)
    }
}
