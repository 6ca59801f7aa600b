use lyon::math::Point;
use std::sync::Arc;

use crate::*;

/// The result of a click on a tile.
#[derive(Debug, Clone)]
pub struct FeatureHit {
    pub feature: Arc<Feature>,
    /// The index of the feature in its tile.
    pub index: usize,
    /// The distance to the click in tile units.
    pub distance: f32,
}

pub struct Collider {}

impl Collider {
    /// Finds the point feature closest to a click at `pixel` within the tile `tile_id`.
    ///
    /// Only features whose distance on both axes stays below `pixel_threshold` are considered.
    pub fn get_clicked_feature(
        cache: &TileFeatureCache,
        tile_id: &TileId,
        pixel: Point,
        tile_size: u32,
        pixel_threshold: f32,
    ) -> Option<FeatureHit> {
        let tile = match cache.get(tile_id) {
            Some(tile) => tile,
            None => {
                log::trace!("[Intersection pass] Tile {} is not in the cache.", tile_id);
                return None;
            }
        };

        let transform = tile.transform(tile_size, tile_size);
        let click = transform.inverse(pixel);
        let threshold = pixel_threshold * transform.units_per_pixel();

        let mut nearest: Option<FeatureHit> = None;
        for (index, feature) in tile.features.iter().enumerate() {
            let coordinates = match &feature.geometry {
                Geometry::Point { coordinates } => coordinates,
                _ => continue,
            };

            let dx = (coordinates[0] - click[0]).abs();
            let dy = (coordinates[1] - click[1]).abs();
            if dx >= threshold || dy >= threshold {
                continue;
            }

            let distance = (dx * dx + dy * dy).sqrt();
            if nearest.as_ref().map_or(true, |hit| distance < hit.distance) {
                nearest = Some(FeatureHit {
                    feature: feature.clone(),
                    index,
                    distance,
                });
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn cache() -> TileFeatureCache {
        let point_feature = |x, y, name: &str| {
            Feature::new(Geometry::Point { coordinates: [x, y] }).with_property("name", name)
        };

        let tile = TileData::new(
            1024,
            vec![
                point_feature(100.0, 1000.0, "far"),
                Feature::new(Geometry::LineString {
                    coordinates: vec![[200.0, 824.0], [300.0, 900.0]],
                }),
                point_feature(210.0, 820.0, "near"),
                point_feature(190.0, 800.0, "close"),
            ],
        );

        let mut cache = TileFeatureCache::new();
        cache.insert(TileId::new(10, 3, 4), Arc::new(tile));
        cache
    }

    #[test]
    fn picks_the_nearest_point_within_threshold() {
        // 256 px over 1024 units: one pixel spans four units.
        let hit = Collider::get_clicked_feature(
            &cache(),
            &TileId::new(10, 3, 4),
            point(50.0, 50.0),
            256,
            5.0,
        )
        .unwrap();

        assert_eq!(hit.index, 2);
        assert_eq!(hit.feature.properties["name"], "near");
        assert!((hit.distance - 10.770_33).abs() < 1e-3);
    }

    #[test]
    fn ignores_clicks_outside_the_threshold() {
        let cache = cache();
        let miss = |pixel| {
            Collider::get_clicked_feature(&cache, &TileId::new(10, 3, 4), pixel, 256, 2.0)
        };

        assert!(miss(point(128.0, 128.0)).is_none());
        assert!(miss(point(50.0, 50.0)).is_none());
        assert!(Collider::get_clicked_feature(
            &cache,
            &TileId::new(10, 4, 4),
            point(50.0, 50.0),
            256,
            5.0
        )
        .is_none());
    }
}
