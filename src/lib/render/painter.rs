use lyon::path::builder::PathBuilder;
use lyon::path::path::Builder;
use lyon::path::Path;

use crate::*;

/// Stroke and fill color when a declaration does not name one.
pub const DEFAULT_PAINT: &str = "rgba(0,0,0,0.5)";

#[derive(Debug, Copy, Clone, PartialEq)]
enum Pass {
    Fill,
    Casing,
    Line,
}

impl Pass {
    fn wants(&self, style: &StyleDeclaration) -> bool {
        match self {
            Pass::Fill => style.has_fill(),
            Pass::Casing => style.has_casing(),
            Pass::Line => style.has_line(),
        }
    }
}

/// Composites the geometry of a tile: fills, casings and lines, layer by layer.
pub struct GeometryPainter<'a> {
    surface: &'a mut dyn Surface,
    assets: &'a dyn AssetCache,
    transform: TileTransform,
    commits: usize,
}

impl<'a> GeometryPainter<'a> {
    pub fn new(
        surface: &'a mut dyn Surface,
        assets: &'a dyn AssetCache,
        transform: TileTransform,
    ) -> Self {
        Self {
            surface,
            assets,
            transform,
            commits: 0,
        }
    }

    /// How many fill and stroke batches were committed so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Fills the whole surface, one pixel past every edge, with the canvas color.
    pub fn paint_background(&mut self, canvas: &StyleDeclaration) {
        let color = match &canvas.fill_color {
            Some(color) => color.clone(),
            None => return,
        };
        let width = self.surface.width() as f32;
        let height = self.surface.height() as f32;
        let path = rect_path(
            lyon::math::point(-1.0, -1.0),
            lyon::math::point(width + 1.0, height + 1.0),
        );

        self.surface.save();
        self.surface.fill(
            &path,
            &FillStyle {
                paint: Paint::Color(color),
                opacity: canvas.fill_opacity.or(canvas.opacity).unwrap_or(1.0),
            },
        );
        self.surface.restore();
    }

    pub fn paint_layer(&mut self, layer: &Layer) {
        for pass in &[Pass::Fill, Pass::Casing, Pass::Line] {
            self.paint_pass(*pass, &layer.features);
        }
    }

    /// Runs of features that share one declaration are drawn with a single call.
    fn paint_pass(&mut self, pass: Pass, features: &[StyledFeature]) {
        let mut builder = Path::builder();
        let mut pending = false;

        for (i, feature) in features.iter().enumerate() {
            if !pass.wants(&feature.style) {
                continue;
            }

            pending |= append_geometry(
                &mut builder,
                &feature.feature.geometry,
                &self.transform,
                pass == Pass::Fill,
            );

            let run_continues = features
                .get(i + 1)
                .map_or(false, |next| next.shares_style(feature));
            if run_continues {
                continue;
            }

            let path = std::mem::replace(&mut builder, Path::builder()).build();
            if pending {
                self.commit(pass, &path, &feature.style);
            }
            pending = false;
        }
    }

    fn commit(&mut self, pass: Pass, path: &Path, style: &StyleDeclaration) {
        self.commits += 1;
        self.surface.save();
        match pass {
            Pass::Fill => self.commit_fill(path, style),
            Pass::Casing => self.surface.stroke(path, &casing_stroke(style)),
            Pass::Line => self.surface.stroke(path, &line_stroke(style)),
        }
        self.surface.restore();
    }

    fn commit_fill(&mut self, path: &Path, style: &StyleDeclaration) {
        let opacity = style.fill_opacity.or(style.opacity).unwrap_or(1.0);

        if let Some(color) = &style.fill_color {
            self.surface.fill(
                path,
                &FillStyle {
                    paint: Paint::Color(color.clone()),
                    opacity,
                },
            );
        }

        if let Some(name) = &style.fill_image {
            match self.assets.image(name) {
                Some(image) => self.surface.fill(
                    path,
                    &FillStyle {
                        paint: Paint::Pattern(image),
                        opacity,
                    },
                ),
                None => log::trace!("Fill pattern {} is not loaded, skipping it.", name),
            }
        }
    }
}

pub fn casing_stroke(style: &StyleDeclaration) -> StrokeStyle {
    StrokeStyle {
        color: style
            .casing_color
            .clone()
            .or_else(|| style.color.clone())
            .unwrap_or_else(|| DEFAULT_PAINT.to_string()),
        width: 2.0 * style.casing_width.unwrap_or(0.0) + style.width.unwrap_or(0.0),
        cap: style.casing_linecap.or(style.linecap).unwrap_or(LineCap::Butt),
        join: style.casing_linejoin.or(style.linejoin).unwrap_or(LineJoin::Round),
        opacity: style.casing_opacity.or(style.opacity).unwrap_or(1.0),
        dashes: style.casing_dashes.clone().or_else(|| style.dashes.clone()),
    }
}

pub fn line_stroke(style: &StyleDeclaration) -> StrokeStyle {
    StrokeStyle {
        color: style
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_PAINT.to_string()),
        width: style.width.unwrap_or(0.0),
        cap: style.linecap.unwrap_or(LineCap::Round),
        join: style.linejoin.unwrap_or(LineJoin::Round),
        opacity: style.opacity.unwrap_or(1.0),
        dashes: style.dashes.clone(),
    }
}

/// Adds the outlines of `geometry` to `builder`. Returns whether anything was added.
///
/// Fills only take polygon rings; strokes take lines and rings.
fn append_geometry(
    builder: &mut Builder,
    geometry: &Geometry,
    transform: &TileTransform,
    fill: bool,
) -> bool {
    match geometry {
        Geometry::Point { .. } | Geometry::MultiPoint { .. } => false,
        Geometry::LineString { coordinates } => {
            !fill && append_ring(builder, coordinates, transform, false)
        }
        Geometry::MultiLineString { coordinates } => {
            !fill
                && coordinates
                    .iter()
                    .fold(false, |added, line| append_ring(builder, line, transform, false) | added)
        }
        Geometry::Polygon { coordinates } => coordinates
            .iter()
            .fold(false, |added, ring| append_ring(builder, ring, transform, true) | added),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .flatten()
            .fold(false, |added, ring| append_ring(builder, ring, transform, true) | added),
        Geometry::GeometryCollection { geometries } => geometries
            .iter()
            .fold(false, |added, g| append_geometry(builder, g, transform, fill) | added),
    }
}

fn append_ring(
    builder: &mut Builder,
    coordinates: &[Coordinate],
    transform: &TileTransform,
    close: bool,
) -> bool {
    if coordinates.len() < 2 {
        return false;
    }

    builder.begin(transform.transform(coordinates[0]));
    for coordinate in &coordinates[1..] {
        builder.line_to(transform.transform(*coordinate));
    }
    builder.end(close);
    true
}

/// A closed rectangle between two corners.
pub fn rect_path(min: lyon::math::Point, max: lyon::math::Point) -> Path {
    let mut builder = Path::builder();
    builder.begin(min);
    builder.line_to(lyon::math::point(max.x, min.y));
    builder.line_to(max);
    builder.line_to(lyon::math::point(min.x, max.y));
    builder.end(true);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casing_width_wraps_the_line() {
        let style = StyleDeclaration {
            casing_width: Some(1.5),
            width: Some(4.0),
            color: Some("#336699".to_string()),
            linecap: Some(LineCap::Square),
            dashes: Some(vec![3.0, 1.0]),
            ..Default::default()
        };

        let casing = casing_stroke(&style);
        assert_eq!(casing.width, 7.0);
        assert_eq!(casing.color, "#336699");
        assert_eq!(casing.cap, LineCap::Square);
        assert_eq!(casing.join, LineJoin::Round);
        assert_eq!(casing.dashes, Some(vec![3.0, 1.0]));

        let casing = casing_stroke(&StyleDeclaration {
            casing_width: Some(2.0),
            ..Default::default()
        });
        assert_eq!(casing.width, 4.0);
        assert_eq!(casing.cap, LineCap::Butt);
        assert_eq!(casing.color, DEFAULT_PAINT);
    }

    #[test]
    fn line_defaults_to_round_caps() {
        let line = line_stroke(&StyleDeclaration {
            width: Some(2.0),
            opacity: Some(0.4),
            ..Default::default()
        });
        assert_eq!(line.cap, LineCap::Round);
        assert_eq!(line.join, LineJoin::Round);
        assert_eq!(line.color, DEFAULT_PAINT);
        assert_eq!(line.opacity, 0.4);
    }

    #[test]
    fn fills_skip_lines_and_points() {
        let transform = TileTransform::new(256, 256, 256);
        let line = Geometry::LineString {
            coordinates: vec![[0.0, 0.0], [10.0, 10.0]],
        };
        let polygon = Geometry::MultiPolygon {
            coordinates: vec![vec![vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]]],
        };

        let mut builder = Path::builder();
        assert!(!append_geometry(&mut builder, &line, &transform, true));
        assert!(append_geometry(&mut builder, &polygon, &transform, true));
        assert!(append_geometry(&mut builder, &line, &transform, false));

        let outlines = path_outlines(&builder.build());
        assert_eq!(outlines.len(), 2);
        assert!(outlines[0].1);
        assert!(!outlines[1].1);
    }
}
