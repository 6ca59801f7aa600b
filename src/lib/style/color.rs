use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res},
    number::complete::float,
    sequence::{delimited, tuple},
    IResult,
};

/// A struct to represent any RGB color.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0, a: 1.0 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 1.0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(..)`, `rgba(..)` or a basic color name.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match all_consuming(alt((hex_color, short_hex_color, rgba_color, rgb_color)))(input) {
            Ok((_, color)) => Some(color),
            Err(_) => named(input),
        }
    }

    /// Multiplies the color's own alpha by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (self.a * opacity).max(0.0).min(1.0),
            ..self
        }
    }

    /// Formats the color so the alpha is part of the color value itself.
    pub fn to_rgba_string(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn named(name: &str) -> Option<Color> {
    let color = match &name.to_lowercase()[..] {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::RED,
        "green" => Color::GREEN,
        "blue" => Color::BLUE,
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "silver" => Color::rgb(192, 192, 192),
        "brown" => Color::rgb(165, 42, 42),
        "purple" => Color::rgb(128, 0, 128),
        "transparent" => Color::TRANSPARENT,
        // Other CSS colors to come later.
        _ => return None,
    };
    Some(color)
}

/// Converts a hex string into an `u8`.
fn from_hex(input: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(input, 16)
}

/// `true` if `c` is a hexadecimal valid digit.
fn is_hex_digit(c: char) -> bool {
    c.is_digit(16)
}

/// Parse an actual hex code.
fn hex_primary(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), from_hex)(input)
}

/// Parse a single hex digit and widen it, `f` becomes `ff`.
fn short_hex_primary(input: &str) -> IResult<&str, u8> {
    map(map_res(take_while_m_n(1, 1, is_hex_digit), from_hex), |v| {
        v * 17
    })(input)
}

/// Parse a single hex color code including the `#`.
fn hex_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("#")(input)?;
    let (input, (r, g, b)) = tuple((hex_primary, hex_primary, hex_primary))(input)?;

    Ok((input, Color::rgb(r, g, b)))
}

/// Parse a three digit hex color code including the `#`.
fn short_hex_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("#")(input)?;
    let (input, (r, g, b)) =
        tuple((short_hex_primary, short_hex_primary, short_hex_primary))(input)?;

    Ok((input, Color::rgb(r, g, b)))
}

fn channel(input: &str) -> IResult<&str, u8> {
    map_res(delimited(multispace0, digit1, multispace0), |v: &str| {
        v.parse::<u8>()
    })(input)
}

fn alpha(input: &str) -> IResult<&str, f32> {
    delimited(multispace0, float, multispace0)(input)
}

/// Parse a `rgba(r, g, b, a)` color.
fn rgba_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("rgba(")(input)?;
    let (input, (r, _, g, _, b, _, a)) = tuple((
        channel,
        char(','),
        channel,
        char(','),
        channel,
        char(','),
        alpha,
    ))(input)?;
    let (input, _) = tag(")")(input)?;
    Ok((input, Color { r, g, b, a }))
}

/// Parse a `rgb(r, g, b)` color.
fn rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("rgb(")(input)?;
    let (input, (r, _, g, _, b)) =
        tuple((channel, char(','), channel, char(','), channel))(input)?;
    let (input, _) = tag(")")(input)?;
    Ok((input, Color::rgb(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::parse("#F80"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::parse("#ff80"), None);
    }

    #[test]
    fn parses_functional_colors() {
        assert_eq!(Color::parse("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(
            Color::parse("rgba(10,20,30,0.25)"),
            Some(Color { r: 10, g: 20, b: 30, a: 0.25 })
        );
        assert_eq!(Color::parse("rgb(300, 0, 0)"), None);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(Color::parse("Red"), Some(Color::RED));
        assert_eq!(Color::parse("chartreuse"), None);
    }

    #[test]
    fn bakes_opacity_into_the_color() {
        let color = Color::parse("#000000").unwrap().with_opacity(0.5);
        assert_eq!(color.to_rgba_string(), "rgba(0, 0, 0, 0.5)");

        let color = Color::parse("rgba(255,255,255,0.5)").unwrap().with_opacity(0.5);
        assert_eq!(color.to_rgba_string(), "rgba(255, 255, 255, 0.25)");
    }
}
