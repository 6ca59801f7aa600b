use std::str::FromStr;

/// Addresses a single tile of the map by zoom level and column/row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TileId {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileId {
    type Err = String;

    /// Parses the `z/x/y` notation used in tile URLs and file names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .trim()
            .split('/')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid tile id '{}': {}", value, e))?;

        match parts[..] {
            [z, x, y] => Ok(Self::new(z, x, y)),
            _ => Err(format!(
                "Invalid tile id '{}': expected the form z/x/y.",
                value
            )),
        }
    }
}

#[test]
fn parse_tile_id() {
    assert_eq!("14/8580/5738".parse(), Ok(TileId::new(14, 8580, 5738)));
    assert_eq!(TileId::new(3, 1, 2).to_string(), "3/1/2");
    assert!("14/8580".parse::<TileId>().is_err());
    assert!("a/b/c".parse::<TileId>().is_err());
}
