mod styled;

pub use styled::*;

use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A position in tile space, `[x, y]`.
pub type Coordinate = [f32; 2];

/// The tags attached to a feature.
///
/// A `BTreeMap` keeps the keys sorted, which makes the serialized form usable as a cache key.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Classifies a geometry without its coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

/// The geometry of a feature, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Coordinate },
    LineString { coordinates: Vec<Coordinate> },
    /// Rings; the first one is the outline, the others are holes.
    Polygon { coordinates: Vec<Vec<Coordinate>> },
    MultiPoint { coordinates: Vec<Coordinate> },
    MultiLineString { coordinates: Vec<Vec<Coordinate>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Coordinate>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point { .. } => GeometryKind::Point,
            Geometry::LineString { .. } => GeometryKind::LineString,
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::MultiPoint { .. } => GeometryKind::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryKind::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryKind::GeometryCollection,
        }
    }
}

/// A single map feature as delivered by the tile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
    /// The label anchor of a polygon, computed by the tile source.
    #[serde(default, rename = "reprpoint", skip_serializing_if = "Option::is_none")]
    pub repr_point: Option<Coordinate>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: Properties::new(),
            repr_point: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_repr_point(mut self, repr_point: Coordinate) -> Self {
        self.repr_point = Some(repr_point);
        self
    }

    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// Reads a property as a number, accepting numeric strings as well.
    pub fn property_number(&self, key: &str) -> Option<f64> {
        let value = match self.properties.get(key)? {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(string) => string.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Returns the point labels and icons of this feature are anchored at.
    ///
    /// Multi geometries and collections have no single anchor and return `None`.
    pub fn representative_point(&self) -> Option<Coordinate> {
        match &self.geometry {
            Geometry::Point { coordinates } => Some(*coordinates),
            Geometry::Polygon { .. } => self.repr_point,
            Geometry::LineString { coordinates } => coordinates.first().copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_flat_feature_layout() {
        let feature: Feature = serde_json::from_str(
            r#"{
                "type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 0]]],
                "properties": { "building": "yes", "layer": "2" },
                "reprpoint": [5, 3]
            }"#,
        )
        .unwrap();

        assert_eq!(feature.kind(), GeometryKind::Polygon);
        assert_eq!(feature.representative_point(), Some([5.0, 3.0]));
        assert_eq!(feature.property_number("layer"), Some(2.0));
        assert_eq!(feature.property_number("building"), None);
    }

    #[test]
    fn collections_hold_nested_geometries() {
        let feature: Feature = serde_json::from_str(
            r#"{
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Point", "coordinates": [1, 2] },
                    { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(feature.kind(), GeometryKind::GeometryCollection);
        assert!(feature.properties.is_empty());
        assert_eq!(feature.representative_point(), None);
    }

    #[test]
    fn representative_points() {
        let line = Feature::new(Geometry::LineString {
            coordinates: vec![[3.0, 4.0], [5.0, 6.0]],
        });
        assert_eq!(line.representative_point(), Some([3.0, 4.0]));

        let polygon = Feature::new(Geometry::Polygon {
            coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
        });
        assert_eq!(polygon.representative_point(), None);

        let multi = Feature::new(Geometry::MultiPoint {
            coordinates: vec![[1.0, 1.0]],
        });
        assert_eq!(multi.representative_point(), None);
    }
}
