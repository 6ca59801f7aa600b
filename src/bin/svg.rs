use lyon::math::Point;
use lyon::path::{Path, PathEvent};
use std::fmt::Write;
use tilepaint::*;

/// Approximate advance of a glyph relative to the font size, without real font metrics.
const GLYPH_ADVANCE: f32 = 0.6;

/// A surface that writes an SVG document.
pub struct SvgSurface {
    width: u32,
    height: u32,
    depth: usize,
    patterns: Vec<String>,
    body: String,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 0,
            patterns: vec![],
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        if !self.patterns.is_empty() {
            svg.push_str("<defs>\n");
            for pattern in &self.patterns {
                svg.push_str(pattern);
            }
            svg.push_str("</defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn pattern_id(&mut self, image: &Image) -> String {
        let id = format!("pattern-{}", escape(&image.name));
        if !self.patterns.iter().any(|p| p.contains(&format!("id=\"{}\"", id))) {
            self.patterns.push(format!(
                "<pattern id=\"{}\" patternUnits=\"userSpaceOnUse\" width=\"{}\" height=\"{}\"><image xlink:href=\"{}\" width=\"{}\" height=\"{}\"/></pattern>\n",
                id,
                image.width,
                image.height,
                escape(image.href.as_deref().unwrap_or(&image.name)),
                image.width,
                image.height
            ));
        }
        id
    }
}

fn path_data(path: &Path) -> String {
    let mut d = String::new();
    for event in path.iter() {
        // Writing into a String cannot fail.
        let _ = match event {
            PathEvent::Begin { at } => write!(d, "M{} {} ", at.x, at.y),
            PathEvent::Line { to, .. } => write!(d, "L{} {} ", to.x, to.y),
            PathEvent::Quadratic { ctrl, to, .. } => {
                write!(d, "Q{} {} {} {} ", ctrl.x, ctrl.y, to.x, to.y)
            }
            PathEvent::Cubic {
                ctrl1, ctrl2, to, ..
            } => write!(
                d,
                "C{} {} {} {} {} {} ",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
            PathEvent::End { close: true, .. } => write!(d, "Z "),
            PathEvent::End { close: false, .. } => Ok(()),
        };
    }
    d.trim_end().to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn cap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn join_name(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

impl Surface for SvgSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn fill(&mut self, path: &Path, style: &FillStyle) {
        let paint = match &style.paint {
            Paint::Color(color) => escape(color),
            Paint::Pattern(image) => format!("url(#{})", self.pattern_id(image)),
        };
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="{}" fill-opacity="{}" fill-rule="evenodd"/>"#,
            path_data(path),
            paint,
            style.opacity
        );
    }

    fn stroke(&mut self, path: &Path, style: &StrokeStyle) {
        let dashes = match &style.dashes {
            Some(dashes) if !dashes.is_empty() => format!(
                r#" stroke-dasharray="{}""#,
                dashes
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            _ => String::new(),
        };
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}" stroke-opacity="{}"{}/>"#,
            path_data(path),
            escape(&style.color),
            style.width,
            cap_name(style.cap),
            join_name(style.join),
            style.opacity,
            dashes
        );
    }

    fn draw_image(&mut self, image: &Image, at: Point) {
        let _ = writeln!(
            self.body,
            r#"<image xlink:href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            escape(image.href.as_deref().unwrap_or(&image.name)),
            at.x,
            at.y,
            image.width,
            image.height
        );
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * font.size * GLYPH_ADVANCE
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" style="font: {}" fill="{}">{}</text>"#,
            at.x,
            at.y,
            escape(&style.font.to_css()),
            escape(&style.color),
            escape(text)
        );
    }

    fn stroke_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" style="font: {}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round">{}</text>"#,
            at.x,
            at.y,
            escape(&style.font.to_css()),
            escape(&style.color),
            style.line_width,
            escape(text)
        );
    }
}
