use std::collections::HashMap;
use std::sync::Arc;

use crate::{AsciiGrid, CharsetMode};

/// Cache key: source identity plus the charset mode it was converted with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub mode: CharsetMode,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, mode: CharsetMode) -> Self {
        Self {
            source: source.into(),
            mode,
        }
    }
}

/// Converted grids owned by the caller
///
/// There is no eviction policy here; callers evict explicitly when a
/// source is superseded or the cache grows too large for them.
#[derive(Debug, Default)]
pub struct GridCache {
    entries: HashMap<CacheKey, Arc<AsciiGrid>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str, mode: CharsetMode) -> Option<Arc<AsciiGrid>> {
        self.entries.get(&CacheKey::new(source, mode)).cloned()
    }

    pub fn contains(&self, source: &str, mode: CharsetMode) -> bool {
        self.entries.contains_key(&CacheKey::new(source, mode))
    }

    /// Store a grid, returning the shared handle
    pub fn insert(&mut self, source: impl Into<String>, mode: CharsetMode, grid: AsciiGrid) -> Arc<AsciiGrid> {
        let grid = Arc::new(grid);
        self.entries.insert(CacheKey::new(source, mode), Arc::clone(&grid));
        grid
    }

    pub fn remove(&mut self, source: &str, mode: CharsetMode) -> Option<Arc<AsciiGrid>> {
        self.entries.remove(&CacheKey::new(source, mode))
    }

    /// Drop every mode cached for one source; returns how many were removed
    pub fn evict_source(&mut self, source: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.source != source);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
