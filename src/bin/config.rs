use once_cell::sync::Lazy;
use serde_derive::Deserialize;
use tilepaint::DebugOptions;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new().expect("Config could not be loaded."));

#[derive(Debug, Deserialize)]
pub struct Renderer {
    pub style: String,
    pub tile_size: u32,
    pub zoom: u32,
    #[serde(default = "default_true")]
    pub background: bool,
    #[serde(default)]
    pub debug: DebugOptions,
    #[serde(default)]
    pub icons: Vec<Icon>,
}

/// An icon the style may reference by name.
#[derive(Debug, Deserialize)]
pub struct Icon {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct TileSource {
    /// The tile id in `z/x/y` notation.
    pub id: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: log::Level,
    pub output_dir: String,
    /// Keep running and re-render whenever the style file changes.
    #[serde(default)]
    pub watch: bool,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub renderer: Renderer,
    #[serde(default)]
    pub tiles: Vec<TileSource>,
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut s = config::Config::new();

        // Start off by merging in the "default" configuration file
        s.merge(config::File::with_name("config/default"))?;

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        s.merge(config::File::with_name("config/local").required(false))?;

        s.try_into()
    }
}
