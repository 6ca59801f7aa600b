use serde_derive::{Deserialize, Serialize};

use super::lenient;

/// The end cap of a stroked line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// The corner shape of a stroked line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// Moves a feature out of the numeric layer order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerDirective {
    Top,
    Bottom,
}

/// One resolved style variant of a feature.
///
/// Every field is optional: a missing field means the property was not requested,
/// which is different from it being zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleDeclaration {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub fill_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,

    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub casing_width: Option<f32>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub casing_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::dashes", skip_serializing_if = "Option::is_none")]
    pub casing_dashes: Option<Vec<f32>>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub casing_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casing_linecap: Option<LineCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casing_linejoin: Option<LineJoin>,

    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::dashes", skip_serializing_if = "Option::is_none")]
    pub dashes: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linecap: Option<LineCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linejoin: Option<LineJoin>,

    /// Kept verbatim; see [`StyleDeclaration::z_index`] for the parsed value.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub text_position: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub text_offset: Option<f32>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub text_halo_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub text_halo_radius: Option<f32>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub text_opacity: Option<f32>,
    #[serde(default, deserialize_with = "lenient::boolean", skip_serializing_if = "Option::is_none")]
    pub text_allow_overlap: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(default, rename = "-x-mapnik-layer", skip_serializing_if = "Option::is_none")]
    pub mapnik_layer: Option<LayerDirective>,
    #[serde(
        default,
        rename = "-x-mapnik-min-distance",
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub mapnik_min_distance: Option<f32>,
}

impl StyleDeclaration {
    /// The draw order rank requested by this declaration.
    ///
    /// Missing or non-numeric values count as `0`.
    pub fn z_index(&self) -> f64 {
        let z = self
            .z_index
            .as_deref()
            .and_then(|z| z.trim().parse::<f64>().ok())
            .filter(|z| z.is_finite())
            .unwrap_or(0.0);
        // -0 and 0 are the same rank.
        if z == 0.0 {
            0.0
        } else {
            z
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill_color.is_some() || self.fill_image.is_some()
    }

    pub fn has_casing(&self) -> bool {
        self.casing_width.is_some()
    }

    pub fn has_line(&self) -> bool {
        self.width.is_some()
    }

    pub fn has_icon(&self) -> bool {
        self.icon_image.is_some()
    }

    /// Empty labels are treated like missing ones.
    pub fn label(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_text(&self) -> bool {
        self.label().is_some()
    }

    pub fn is_line_text(&self) -> bool {
        self.text_position.as_deref() == Some("line")
    }

    pub fn allows_text_overlap(&self) -> bool {
        self.text_allow_overlap.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_css_style_keys() {
        let declaration: StyleDeclaration = serde_json::from_str(
            r##"{
                "fill-color": "#ff0000",
                "casing-width": "1.5",
                "casing-dashes": "4,2",
                "linecap": "square",
                "z-index": 3,
                "text": 42,
                "text-allow-overlap": "true",
                "-x-mapnik-layer": "top",
                "-x-mapnik-min-distance": 5
            }"##,
        )
        .unwrap();

        assert_eq!(declaration.fill_color.as_deref(), Some("#ff0000"));
        assert_eq!(declaration.casing_width, Some(1.5));
        assert_eq!(declaration.casing_dashes, Some(vec![4.0, 2.0]));
        assert_eq!(declaration.linecap, Some(LineCap::Square));
        assert_eq!(declaration.z_index(), 3.0);
        assert_eq!(declaration.label(), Some("42"));
        assert!(declaration.allows_text_overlap());
        assert_eq!(declaration.mapnik_layer, Some(LayerDirective::Top));
        assert_eq!(declaration.mapnik_min_distance, Some(5.0));

        // Absent keys stay absent instead of defaulting to zero.
        assert_eq!(declaration.width, None);
        assert!(!declaration.has_line());
    }

    #[test]
    fn invalid_z_index_counts_as_zero() {
        let declaration = StyleDeclaration {
            z_index: Some("high".to_string()),
            ..Default::default()
        };
        assert_eq!(declaration.z_index(), 0.0);
        assert_eq!(StyleDeclaration::default().z_index(), 0.0);
    }

    #[test]
    fn negative_zero_z_index_is_zero() {
        let declaration = StyleDeclaration {
            z_index: Some("-0".to_string()),
            ..Default::default()
        };
        assert!(declaration.z_index().is_sign_positive());
    }

    #[test]
    fn empty_text_is_no_label() {
        let declaration = StyleDeclaration {
            text: Some(String::new()),
            ..Default::default()
        };
        assert!(!declaration.has_text());
    }

    #[test]
    fn rejects_garbage_numbers() {
        let result = serde_json::from_str::<StyleDeclaration>(r#"{ "width": "thick" }"#);
        assert!(result.is_err());
    }
}
