use lyon::math::Point;
use ncollide2d::{
    bounding_volume::{BoundingVolume, AABB},
    math::{Point as AabbPoint, Vector},
};

use crate::*;

/// Who placed a box.
///
/// Boxes of the same feature never collide with each other, tile boxes collide with everything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    Tile,
    Feature(StyleId),
}

impl Owner {
    fn exempts(&self, other: &Owner) -> bool {
        match (self, other) {
            (Owner::Feature(a), Owner::Feature(b)) => a == b,
            _ => false,
        }
    }
}

/// An axis aligned screen space box claimed by a label, an icon or the tile border.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBox {
    pub aabb: AABB<f32>,
    pub owner: Owner,
}

impl CollisionBox {
    /// Builds a box from two corners in any order.
    pub fn new(a: Point, b: Point, owner: Owner) -> Self {
        let mins = AabbPoint::new(a.x.min(b.x), a.y.min(b.y));
        let maxs = AabbPoint::new(a.x.max(b.x), a.y.max(b.y));
        Self {
            aabb: AABB::new(mins, maxs),
            owner,
        }
    }

    /// A `width` × `height` box around `center`, grown by `padding` on every side.
    pub fn centered(center: Point, width: f32, height: f32, padding: f32, owner: Owner) -> Self {
        let half_extents = Vector::new(
            (width / 2.0 + padding).abs(),
            (height / 2.0 + padding).abs(),
        );
        Self {
            aabb: AABB::from_half_extents(AabbPoint::new(center.x, center.y), half_extents),
            owner,
        }
    }

    /// Whether the two boxes touch or overlap, edges included.
    pub fn intersects(&self, other: &CollisionBox) -> bool {
        self.aabb.intersects(&other.aabb)
    }

    /// The top left corner and the size of the box, for outlining it.
    pub fn rect(&self) -> (Point, f32, f32) {
        let center = self.aabb.center();
        let half = self.aabb.half_extents();
        (
            lyon::math::point(center.x - half.x, center.y - half.y),
            half.x * 2.0,
            half.y * 2.0,
        )
    }
}

/// All boxes claimed so far during one tile render.
///
/// Lookups are linear; a tile holds few enough labels for that to be fine.
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    boxes: Vec<CollisionBox>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index that already contains the four edges of a `width` × `height` tile,
    /// so nothing gets placed across a tile seam.
    pub fn for_tile(width: f32, height: f32) -> Self {
        let mut index = Self::new();
        let corner = |x, y| lyon::math::point(x, y);
        index.add_box(CollisionBox::new(corner(0.0, 0.0), corner(width, 0.0), Owner::Tile));
        index.add_box(CollisionBox::new(corner(0.0, height), corner(width, height), Owner::Tile));
        index.add_box(CollisionBox::new(corner(width, 0.0), corner(width, height), Owner::Tile));
        index.add_box(CollisionBox::new(corner(0.0, 0.0), corner(0.0, height), Owner::Tile));
        index
    }

    pub fn add_box(&mut self, collision_box: CollisionBox) {
        self.boxes.push(collision_box);
    }

    /// Registers a centered box and returns a reference to it.
    pub fn add_centered(
        &mut self,
        center: Point,
        width: f32,
        height: f32,
        padding: f32,
        owner: Owner,
    ) -> &CollisionBox {
        self.boxes
            .push(CollisionBox::centered(center, width, height, padding, owner));
        &self.boxes[self.boxes.len() - 1]
    }

    /// Whether `candidate` hits any stored box not owned by the same feature.
    pub fn overlaps(&self, candidate: &CollisionBox) -> bool {
        self.boxes
            .iter()
            .filter(|stored| !stored.owner.exempts(&candidate.owner))
            .any(|stored| stored.intersects(candidate))
    }

    /// Tests an unpadded centered box. Returns the candidate if it collides.
    pub fn check_centered(
        &self,
        center: Point,
        width: f32,
        height: f32,
        owner: Owner,
    ) -> Option<CollisionBox> {
        let candidate = CollisionBox::centered(center, width, height, 0.0, owner);
        if self.overlaps(&candidate) {
            Some(candidate)
        } else {
            None
        }
    }

    pub fn boxes(&self) -> &[CollisionBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
