use lyon::math::{point, Point};

use crate::*;

/// A label that should follow a line.
#[derive(Debug, Clone, Copy)]
pub struct PathTextRequest<'a> {
    /// The line in surface pixels.
    pub points: &'a [Point],
    pub text: &'a str,
    pub label: &'a LabelStyle,
    pub owner: Owner,
}

/// Lays text out along a line.
///
/// Implementations check their glyph boxes against `collisions` and register what they
/// draw, so line labels take part in placement like every other label.
pub trait PathTextLayout {
    /// Returns whether the text was drawn.
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        request: &PathTextRequest,
        collisions: &mut CollisionIndex,
    ) -> bool;
}

/// Draws the label horizontally, centered on the longest segment of the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightPathText;

impl StraightPathText {
    fn anchor(points: &[Point]) -> Option<Point> {
        points
            .windows(2)
            .map(|segment| (segment[0], segment[1]))
            .fold(None, |longest: Option<(Point, Point, f32)>, (from, to)| {
                let length = (to - from).length();
                match longest {
                    Some((_, _, max)) if max >= length => longest,
                    _ => Some((from, to, length)),
                }
            })
            .map(|(from, to, _)| point((from.x + to.x) / 2.0, (from.y + to.y) / 2.0))
    }
}

impl PathTextLayout for StraightPathText {
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        request: &PathTextRequest,
        collisions: &mut CollisionIndex,
    ) -> bool {
        let anchor = match Self::anchor(request.points) {
            Some(anchor) => anchor,
            None => return false,
        };
        let center = point(anchor.x, anchor.y + request.label.offset);

        place_label(
            surface,
            collisions,
            request.text,
            center,
            request.label,
            request.owner,
        )
        .is_ok()
    }
}
