use lyon::math::{point, Point};

use crate::*;

pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_HALO_COLOR: &str = "#ffffff";
/// Space kept free around a label unless `-x-mapnik-min-distance` says otherwise.
pub const DEFAULT_LABEL_PADDING: f32 = 20.0;

/// The resolved look of a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub fill: TextStyle,
    /// Drawn underneath the fill when a halo radius is set.
    pub halo: Option<TextStyle>,
    pub offset: f32,
    pub padding: f32,
    pub allow_overlap: bool,
}

impl LabelStyle {
    pub fn from_declaration(style: &StyleDeclaration) -> Self {
        let font = Font::from_declaration(style);
        let opacity = style.text_opacity.or(style.opacity).unwrap_or(1.0);
        let line_width = style.text_halo_radius.map_or(1.0, |radius| radius + 2.0);

        let mut color = style
            .text_color
            .clone()
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string());
        let mut halo_color = style
            .text_halo_color
            .clone()
            .unwrap_or_else(|| DEFAULT_HALO_COLOR.to_string());

        if opacity < 1.0 {
            color = bake_opacity(&color, opacity);
            halo_color = bake_opacity(&halo_color, opacity);
        }

        Self {
            halo: style.text_halo_radius.map(|_| TextStyle {
                font: font.clone(),
                color: halo_color,
                line_width,
            }),
            fill: TextStyle {
                font,
                color,
                line_width,
            },
            offset: style.text_offset.unwrap_or(0.0),
            padding: style.mapnik_min_distance.unwrap_or(DEFAULT_LABEL_PADDING),
            allow_overlap: style.allows_text_overlap(),
        }
    }
}

/// Folds `opacity` into the alpha channel of a CSS color.
fn bake_opacity(color: &str, opacity: f32) -> String {
    match Color::parse(color) {
        Some(parsed) => parsed.with_opacity(opacity).to_rgba_string(),
        None => {
            log::info!("Color {} is not supported, drawing the label opaque.", color);
            color.to_string()
        }
    }
}

/// Approximates the height of a label from its width.
pub fn label_height(width: f32, text: &str) -> f32 {
    let characters = text.chars().count().max(1) as f32;
    width / characters * 2.5
}

/// Measures, checks, draws and registers one horizontal label centered at `center`.
///
/// A colliding label is neither drawn nor registered; the rejected candidate is returned instead.
pub fn place_label(
    surface: &mut dyn Surface,
    collisions: &mut CollisionIndex,
    text: &str,
    center: Point,
    label: &LabelStyle,
    owner: Owner,
) -> Result<(), CollisionBox> {
    let width = surface.measure_text(text, &label.fill.font);
    let height = label_height(width, text);

    if !label.allow_overlap {
        if let Some(rejected) = collisions.check_centered(center, width, height, owner) {
            return Err(rejected);
        }
    }

    surface.save();
    if let Some(halo) = &label.halo {
        surface.stroke_text(text, center, halo);
    }
    surface.fill_text(text, center, &label.fill);
    surface.restore();

    collisions.add_centered(center, width, height, label.padding, owner);
    Ok(())
}

/// Places icons and labels so that they do not overlap.
pub struct Decorator<'a> {
    surface: &'a mut dyn Surface,
    assets: &'a dyn AssetCache,
    path_text: &'a mut dyn PathTextLayout,
    transform: TileTransform,
    collisions: CollisionIndex,
    debug: DebugOptions,
}

impl<'a> Decorator<'a> {
    pub fn new(
        surface: &'a mut dyn Surface,
        assets: &'a dyn AssetCache,
        path_text: &'a mut dyn PathTextLayout,
        transform: TileTransform,
        debug: DebugOptions,
    ) -> Self {
        let collisions =
            CollisionIndex::for_tile(surface.width() as f32, surface.height() as f32);
        Self {
            surface,
            assets,
            path_text,
            transform,
            collisions,
            debug,
        }
    }

    pub fn collisions(&self) -> &CollisionIndex {
        &self.collisions
    }

    /// Decorates every layer in [`decoration_order`].
    pub fn decorate(&mut self, stack: &LayerStack) {
        for (id, features) in decoration_order(stack) {
            log::trace!("Decorating layer {} with {} features.", id, features.len());

            for feature in &features {
                let style = &feature.style;
                if style.has_icon() && !style.has_text() {
                    self.place(feature, false, true);
                }
            }

            for feature in &features {
                let style = &feature.style;
                if style.has_text() && style.is_line_text() {
                    self.place_line_text(feature);
                }
            }

            for feature in &features {
                let style = &feature.style;
                if style.has_text() && !style.is_line_text() && !style.has_icon() {
                    self.place(feature, true, false);
                }
            }

            for feature in &features {
                let style = &feature.style;
                if style.has_icon() && style.has_text() {
                    self.place(feature, true, true);
                }
            }
        }
    }

    fn place_line_text(&mut self, feature: &StyledFeature) {
        let coordinates = match &feature.feature.geometry {
            Geometry::LineString { coordinates } => coordinates,
            _ => return self.place(feature, true, false),
        };
        let text = match feature.style.label() {
            Some(text) => text,
            None => return,
        };

        let points = self.transform.transform_all(coordinates);
        let label = LabelStyle::from_declaration(&feature.style);
        let registered = self.collisions.len();

        self.path_text.render(
            &mut *self.surface,
            &PathTextRequest {
                points: &points,
                text,
                label: &label,
                owner: Owner::Feature(feature.style_id),
            },
            &mut self.collisions,
        );

        self.outline_boxes_since(registered);
    }

    /// Places the icon, the label or both of a feature at its representative point.
    ///
    /// A missing icon image or a colliding icon drops the label as well.
    fn place(&mut self, feature: &StyledFeature, render_text: bool, render_icon: bool) {
        let anchor = match feature.feature.representative_point() {
            Some(anchor) => anchor,
            None => return,
        };
        let style = &feature.style;
        let owner = Owner::Feature(feature.style_id);
        let at = self.transform.transform(anchor);

        let icon = match (render_icon, style.icon_image.as_deref()) {
            (true, Some(name)) => {
                let image = match self.assets.image(name) {
                    Some(image) => image,
                    None => {
                        log::trace!("Icon {} is not loaded, skipping the feature.", name);
                        return;
                    }
                };
                let (width, height) = (image.width as f32, image.height as f32);
                if let Some(rejected) = self.collisions.check_centered(at, width, height, owner) {
                    self.outline_rejected(&rejected);
                    return;
                }
                let padding = style.mapnik_min_distance.unwrap_or(0.0);
                let registered = self.collisions.len();
                self.collisions.add_centered(at, width, height, padding, owner);
                self.outline_boxes_since(registered);
                Some(image)
            }
            _ => None,
        };

        if render_text {
            if let Some(text) = style.label() {
                let label = LabelStyle::from_declaration(style);
                let center = point(at.x, at.y + label.offset);
                let registered = self.collisions.len();
                match place_label(
                    &mut *self.surface,
                    &mut self.collisions,
                    text,
                    center,
                    &label,
                    owner,
                ) {
                    Ok(()) => self.outline_boxes_since(registered),
                    Err(rejected) => self.outline_rejected(&rejected),
                }
            }
        }

        if let Some(image) = icon {
            let corner = point(
                (at.x - image.width as f32 / 2.0).floor(),
                (at.y - image.height as f32 / 2.0).floor(),
            );
            self.surface.draw_image(&image, corner);
        }
    }

    fn outline_boxes_since(&mut self, index: usize) {
        if !self.debug.boxes {
            return;
        }
        let boxes: Vec<_> = self.collisions.boxes()[index..].to_vec();
        for placed in &boxes {
            self.outline(placed, "red");
        }
    }

    fn outline_rejected(&mut self, rejected: &CollisionBox) {
        if self.debug.checks {
            self.outline(rejected, "darkblue");
        }
    }

    fn outline(&mut self, collision_box: &CollisionBox, color: &str) {
        let (origin, width, height) = collision_box.rect();
        let path = rect_path(origin, point(origin.x + width, origin.y + height));
        self.surface.save();
        self.surface.stroke(&path, &StrokeStyle::outline(color));
        self.surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_is_baked_into_both_colors() {
        let label = LabelStyle::from_declaration(&StyleDeclaration {
            text: Some("A".to_string()),
            text_halo_radius: Some(1.0),
            text_opacity: Some(0.5),
            opacity: Some(0.9),
            ..Default::default()
        });

        assert_eq!(label.fill.color, "rgba(0, 0, 0, 0.5)");
        let halo = label.halo.unwrap();
        assert_eq!(halo.color, "rgba(255, 255, 255, 0.5)");
        assert_eq!(halo.line_width, 3.0);
    }

    #[test]
    fn opaque_labels_keep_plain_colors() {
        let label = LabelStyle::from_declaration(&StyleDeclaration {
            text: Some("A".to_string()),
            text_color: Some("red".to_string()),
            ..Default::default()
        });

        assert_eq!(label.fill.color, "red");
        assert!(label.halo.is_none());
        assert_eq!(label.padding, DEFAULT_LABEL_PADDING);
        assert_eq!(label.offset, 0.0);
    }

    #[test]
    fn explicit_zero_min_distance_is_kept() {
        let label = LabelStyle::from_declaration(&StyleDeclaration {
            mapnik_min_distance: Some(0.0),
            ..Default::default()
        });
        assert_eq!(label.padding, 0.0);
    }

    #[test]
    fn label_height_follows_character_width() {
        assert_eq!(label_height(40.0, "abcd"), 25.0);
        assert_eq!(label_height(0.0, ""), 0.0);
    }

    #[test]
    fn rejected_labels_are_not_registered() {
        let mut surface = RecordingSurface::new(256, 256);
        let mut collisions = CollisionIndex::new();
        let label = LabelStyle::from_declaration(&StyleDeclaration::default());
        let first = Owner::Feature(StyleId(1));
        let second = Owner::Feature(StyleId(2));

        let mut place = |at: Point, label: &LabelStyle, owner: Owner| {
            place_label(&mut surface, &mut collisions, "Main", at, label, owner).is_ok()
        };

        assert!(place(point(100.0, 100.0), &label, first));
        assert!(!place(point(110.0, 100.0), &label, second));

        let overlapping = LabelStyle {
            allow_overlap: true,
            ..label.clone()
        };
        assert!(place(point(110.0, 100.0), &overlapping, second));
        drop(place);

        assert_eq!(collisions.len(), 2);
        let fills = surface
            .calls()
            .iter()
            .filter(|call| matches!(call, DrawCall::FillText { .. }))
            .count();
        assert_eq!(fills, 2);
    }
}
