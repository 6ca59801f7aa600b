use lyon::math::Point;
use lyon::path::{Path, PathEvent};

use crate::*;

/// The sub paths of a path as lists of points, plus whether each one is closed.
pub fn path_outlines(path: &Path) -> Vec<(Vec<Point>, bool)> {
    let mut outlines = vec![];
    let mut current = vec![];
    for event in path.iter() {
        match event {
            PathEvent::Begin { at } => current = vec![at],
            PathEvent::Line { to, .. }
            | PathEvent::Quadratic { to, .. }
            | PathEvent::Cubic { to, .. } => current.push(to),
            PathEvent::End { close, .. } => {
                outlines.push((std::mem::take(&mut current), close))
            }
        }
    }
    outlines
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Fill {
        outlines: Vec<(Vec<Point>, bool)>,
        style: FillStyle,
    },
    Stroke {
        outlines: Vec<(Vec<Point>, bool)>,
        style: StrokeStyle,
    },
    Image {
        name: String,
        at: Point,
    },
    FillText {
        text: String,
        at: Point,
        style: TextStyle,
    },
    StrokeText {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// A surface that logs every call instead of drawing.
///
/// Text is measured as `0.6 × font size` per character, which keeps layouts reproducible.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    depth: usize,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 0,
            calls: vec![],
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    /// How many `save`s are not matched by a `restore` yet.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.depth += 1;
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            log::warn!("Unbalanced restore on recording surface.");
        }
        self.depth = self.depth.saturating_sub(1);
        self.calls.push(DrawCall::Restore);
    }

    fn fill(&mut self, path: &Path, style: &FillStyle) {
        self.calls.push(DrawCall::Fill {
            outlines: path_outlines(path),
            style: style.clone(),
        });
    }

    fn stroke(&mut self, path: &Path, style: &StrokeStyle) {
        self.calls.push(DrawCall::Stroke {
            outlines: path_outlines(path),
            style: style.clone(),
        });
    }

    fn draw_image(&mut self, image: &Image, at: Point) {
        self.calls.push(DrawCall::Image {
            name: image.name.clone(),
            at,
        });
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * font.size * 0.6
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }

    fn stroke_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.calls.push(DrawCall::StrokeText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;
    use lyon::path::builder::PathBuilder;

    #[test]
    fn records_outlines_of_every_sub_path() {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(1.0, 0.0));
        builder.line_to(point(1.0, 1.0));
        builder.end(true);
        builder.begin(point(5.0, 5.0));
        builder.line_to(point(6.0, 6.0));
        builder.end(false);
        let path = builder.build();

        let mut surface = RecordingSurface::new(16, 16);
        surface.save();
        surface.stroke(&path, &StrokeStyle::outline("red"));
        surface.restore();

        assert_eq!(surface.depth(), 0);
        match &surface.calls()[1] {
            DrawCall::Stroke { outlines, style } => {
                assert_eq!(outlines.len(), 2);
                assert_eq!(outlines[0].0.len(), 3);
                assert!(outlines[0].1);
                assert!(!outlines[1].1);
                assert_eq!(style.color, "red");
            }
            call => panic!("unexpected call {:?}", call),
        }
    }

    #[test]
    fn measures_text_by_character_count() {
        let mut surface = RecordingSurface::new(16, 16);
        let font = Font {
            family: None,
            size: 10.0,
        };
        assert_eq!(surface.measure_text("Straße", &font), 36.0);
    }
}
