use std::{fs::File, io::Read, path::Path, sync::Arc};

use super::*;

/// Reads and parses a tile stored as JSON.
pub fn load_tile_data(path: impl AsRef<Path>) -> Result<TileData, LoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let mut buffer = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut buffer))
        .map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;

    let tile = TileData::from_json(&display, &buffer)?;
    log::debug!(
        "Loaded {} features with granularity {} from {}.",
        tile.features.len(),
        tile.granularity,
        display
    );
    Ok(tile)
}

/// Loads a tile into the feature cache unless it is already present.
pub fn fetch_tile(
    cache: &mut TileFeatureCache,
    tile_id: TileId,
    path: impl AsRef<Path>,
) -> Result<Arc<TileData>, LoadError> {
    if let Some(tile) = cache.get(&tile_id) {
        return Ok(tile);
    }
    let tile = Arc::new(load_tile_data(path)?);
    cache.insert(tile_id, tile.clone());
    Ok(tile)
}
