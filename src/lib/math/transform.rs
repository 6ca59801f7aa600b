use lyon::math::{point, Point};

use crate::Coordinate;

/// Maps tile-local coordinates in `[0, granularity)` to surface pixels.
///
/// Tile data has its origin in the bottom left corner while the surface has it
/// in the top left corner, so the vertical axis is flipped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileTransform {
    ws: f32,
    hs: f32,
    granularity: f32,
}

impl TileTransform {
    pub fn new(width: u32, height: u32, granularity: u32) -> Self {
        let granularity = granularity.max(1) as f32;
        Self {
            ws: width as f32 / granularity,
            hs: height as f32 / granularity,
            granularity,
        }
    }

    pub fn transform(&self, coordinate: Coordinate) -> Point {
        point(
            self.ws * coordinate[0],
            self.hs * (self.granularity - coordinate[1]),
        )
    }

    pub fn transform_all(&self, coordinates: &[Coordinate]) -> Vec<Point> {
        coordinates.iter().map(|c| self.transform(*c)).collect()
    }

    /// Maps a surface pixel back into tile space.
    pub fn inverse(&self, pixel: Point) -> Coordinate {
        [pixel.x / self.ws, self.granularity - pixel.y / self.hs]
    }

    /// How many tile units a single pixel spans horizontally.
    pub fn units_per_pixel(&self) -> f32 {
        1.0 / self.ws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_vertical_axis() {
        let transform = TileTransform::new(256, 256, 4096);

        assert_eq!(transform.transform([0.0, 0.0]), point(0.0, 256.0));
        assert_eq!(transform.transform([4096.0, 4096.0]), point(256.0, 0.0));
        assert_eq!(transform.transform([2048.0, 1024.0]), point(128.0, 192.0));
    }

    #[test]
    fn inverse_round_trips_a_pixel() {
        let transform = TileTransform::new(512, 256, 1024);
        let coordinate = transform.inverse(point(100.0, 64.0));

        assert_eq!(coordinate, [200.0, 768.0]);
        assert_eq!(transform.transform(coordinate), point(100.0, 64.0));
    }

    #[test]
    fn zero_granularity_does_not_divide_by_zero() {
        let transform = TileTransform::new(256, 256, 0);
        let p = transform.transform([1.0, 1.0]);

        assert!(p.x.is_finite() && p.y.is_finite());
    }
}
