use serde_derive::Deserialize;

/// Visual aids for tuning label placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct DebugOptions {
    /// Outline every box that was registered in the collision index.
    #[serde(default)]
    pub boxes: bool,
    /// Outline every candidate box that was rejected.
    #[serde(default)]
    pub checks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RenderOptions {
    /// Paint the canvas style underneath the tile.
    #[serde(default = "default_background")]
    pub background: bool,
    #[serde(default)]
    pub debug: DebugOptions,
}

fn default_background() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: default_background(),
            debug: DebugOptions::default(),
        }
    }
}
