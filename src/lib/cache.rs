use super::*;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub cached_tiles: usize,
    pub total_stats: TileStats,
}

/// Holds the features of every loaded tile, keyed by tile id.
///
/// Hit-testing reads from here, so the features stay available after a render has finished.
#[derive(Debug, Default)]
pub struct TileFeatureCache {
    cache: HashMap<TileId, Arc<TileData>>,
}

impl TileFeatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a tile, replacing an earlier version of it.
    pub fn insert(&mut self, tile_id: TileId, tile: Arc<TileData>) {
        if self.cache.insert(tile_id, tile).is_some() {
            log::trace!("Replaced cached features of tile {}.", tile_id);
        }
    }

    /// Get the features of a tile.
    ///
    /// Returns `None` if the tile is not in the cache.
    pub fn get(&self, tile_id: &TileId) -> Option<Arc<TileData>> {
        self.cache.get(tile_id).cloned()
    }

    pub fn remove(&mut self, tile_id: &TileId) -> Option<Arc<TileData>> {
        self.cache.remove(tile_id)
    }

    pub fn contains(&self, tile_id: &TileId) -> bool {
        self.cache.contains_key(tile_id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn get_stats(&self) -> CacheStats {
        let mut total_stats = TileStats::default();
        for tile in self.cache.values() {
            total_stats += tile.stats();
        }
        CacheStats {
            cached_tiles: self.cache.len(),
            total_stats,
        }
    }
}

#[test]
fn cache_keys_tiles_by_id() {
    let mut cache = TileFeatureCache::new();
    let tile = Arc::new(TileData::new(
        4096,
        vec![Feature::new(Geometry::Point {
            coordinates: [1.0, 1.0],
        })],
    ));

    cache.insert(TileId::new(14, 1, 2), tile.clone());
    cache.insert(TileId::new(14, 2, 1), tile);

    assert!(cache.contains(&TileId::new(14, 1, 2)));
    assert!(cache.get(&TileId::new(13, 1, 2)).is_none());
    assert_eq!(cache.get_stats().cached_tiles, 2);
    assert_eq!(cache.get_stats().total_stats.points, 2);

    cache.remove(&TileId::new(14, 1, 2));
    assert_eq!(cache.len(), 1);
}
