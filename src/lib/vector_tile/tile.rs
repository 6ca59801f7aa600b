use serde_derive::{Deserialize, Serialize};
use std::sync::Arc;

use crate::*;

/// The decoded content of one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// The size of the tile-local coordinate space.
    pub granularity: u32,
    #[serde(default)]
    pub features: Vec<Arc<Feature>>,
}

impl TileData {
    pub fn new(granularity: u32, features: Vec<Feature>) -> Self {
        Self {
            granularity,
            features: features.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parses a tile from its JSON form. `origin` names the source in errors.
    pub fn from_json(origin: &str, json: &str) -> Result<Self, LoadError> {
        let tile: TileData = serde_json::from_str(json).map_err(|source| LoadError::Json {
            path: origin.to_string(),
            source,
        })?;

        if tile.granularity == 0 {
            return Err(LoadError::ZeroGranularity);
        }

        Ok(tile)
    }

    /// The transform that maps this tile onto a surface of the given pixel size.
    pub fn transform(&self, width: u32, height: u32) -> TileTransform {
        TileTransform::new(width, height, self.granularity)
    }

    pub fn stats(&self) -> TileStats {
        let mut stats = TileStats {
            features: self.features.len(),
            ..Default::default()
        };
        for feature in &self.features {
            match feature.kind() {
                GeometryKind::Point | GeometryKind::MultiPoint => stats.points += 1,
                GeometryKind::LineString | GeometryKind::MultiLineString => stats.lines += 1,
                GeometryKind::Polygon | GeometryKind::MultiPolygon => stats.polygons += 1,
                GeometryKind::GeometryCollection => stats.collections += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileStats {
    pub features: usize,
    pub points: usize,
    pub lines: usize,
    pub polygons: usize,
    pub collections: usize,
}

impl std::ops::Add for TileStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            features: self.features + rhs.features,
            points: self.points + rhs.points,
            lines: self.lines + rhs.lines,
            polygons: self.polygons + rhs.polygons,
            collections: self.collections + rhs.collections,
        }
    }
}

impl std::ops::AddAssign for TileStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tile_json() {
        let tile = TileData::from_json(
            "inline",
            r#"{
                "granularity": 4096,
                "features": [
                    { "type": "Point", "coordinates": [10, 20], "properties": { "name": "A" } },
                    { "type": "LineString", "coordinates": [[0, 0], [5, 5]] },
                    { "type": "MultiPolygon", "coordinates": [] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tile.granularity, 4096);
        assert_eq!(tile.features.len(), 3);
        assert_eq!(
            tile.stats(),
            TileStats {
                features: 3,
                points: 1,
                lines: 1,
                polygons: 1,
                collections: 0,
            }
        );
    }

    #[test]
    fn rejects_zero_granularity() {
        let result = TileData::from_json("inline", r#"{ "granularity": 0, "features": [] }"#);
        assert!(matches!(result, Err(LoadError::ZeroGranularity)));

        let result = TileData::from_json("inline", r#"{ "features": [] }"#);
        assert!(matches!(result, Err(LoadError::Json { .. })));
    }
}
