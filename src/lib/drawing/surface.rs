use lyon::math::Point;
use lyon::path::Path;
use std::sync::Arc;

use crate::*;

/// What a fill paints with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Any CSS color string.
    Color(String),
    /// A repeating image pattern.
    Pattern(Arc<Image>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub paint: Paint,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub opacity: f32,
    pub dashes: Option<Vec<f32>>,
}

impl StrokeStyle {
    /// A thin solid outline, used for debug drawing.
    pub fn outline(color: &str) -> Self {
        Self {
            color: color.to_string(),
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            opacity: 1.0,
            dashes: None,
        }
    }
}

/// How a piece of text is filled or stroked. Colors already carry the text opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: String,
    pub line_width: f32,
}

/// The 2D drawing surface a tile is rendered onto.
///
/// Coordinates are surface pixels with the origin in the top left corner.
/// Text is drawn centered horizontally and vertically around the given point.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn save(&mut self);
    fn restore(&mut self);

    fn fill(&mut self, path: &Path, style: &FillStyle);
    fn stroke(&mut self, path: &Path, style: &StrokeStyle);

    /// Blits `image` with its top left corner at `at`.
    fn draw_image(&mut self, image: &Image, at: Point);

    /// The rendered width of `text` in pixels.
    fn measure_text(&mut self, text: &str, font: &Font) -> f32;
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
    fn stroke_text(&mut self, text: &str, at: Point, style: &TextStyle);
}
