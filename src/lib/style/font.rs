use super::StyleDeclaration;

pub const DEFAULT_FONT_SIZE: f32 = 9.0;

/// The font a label is set in.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: Option<String>,
    pub size: f32,
}

impl Font {
    pub fn from_declaration(style: &StyleDeclaration) -> Self {
        Self {
            family: style.font_family.clone().filter(|f| !f.is_empty()),
            size: style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        }
    }

    /// Builds a CSS font shorthand, e.g. `italic bold 12px DejaVu Sans Bold Oblique, Arial, Helvetica, sans-serif`.
    ///
    /// Weight and slant are guessed from the family name.
    pub fn to_css(&self) -> String {
        let name = self.family.as_deref().unwrap_or("");
        let lower = name.to_lowercase();

        let mut parts = vec![];
        if lower.contains("italic") || lower.contains("oblique") {
            parts.push("italic".to_string());
        }
        if lower.contains("bold") {
            parts.push("bold".to_string());
        }
        parts.push(format!("{}px", self.size));

        let mut family = if name.is_empty() {
            String::new()
        } else {
            format!("{}, ", name)
        };
        if lower.contains("serif") {
            family += "Georgia, serif";
        } else {
            family += "Arial, Helvetica, sans-serif";
        }
        parts.push(family);

        parts.join(" ")
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: None,
            size: DEFAULT_FONT_SIZE,
        }
    }
}

#[test]
fn css_font_shorthand() {
    assert_eq!(Font::default().to_css(), "9px Arial, Helvetica, sans-serif");

    let font = Font {
        family: Some("DejaVu Sans Bold Oblique".to_string()),
        size: 12.0,
    };
    assert_eq!(
        font.to_css(),
        "italic bold 12px DejaVu Sans Bold Oblique, Arial, Helvetica, sans-serif"
    );

    let font = Font {
        family: Some("DejaVu Serif".to_string()),
        size: 10.5,
    };
    assert_eq!(font.to_css(), "10.5px DejaVu Serif, Georgia, serif");
}
