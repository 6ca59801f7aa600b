mod config;
mod style_source;
mod svg;

use crate::config::CONFIG;
use std::path::Path;
use std::time::Duration;
use tilepaint::*;

fn load_assets() -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    for icon in &CONFIG.renderer.icons {
        assets.insert(Image::new(&icon.name, icon.width, icon.height).with_href(&icon.path));
    }
    assets
}

fn render_tile(
    cache: &mut TileFeatureCache,
    resolver: &mut StyleResolver,
    engine: &dyn StyleEngine,
    assets: &MemoryAssets,
    source: &config::TileSource,
) -> Result<(), Box<dyn std::error::Error>> {
    let tile_id: TileId = source.id.parse()?;
    let tile = fetch_tile(cache, tile_id, &source.path)?;

    let size = CONFIG.renderer.tile_size;
    let mut surface = svg::SvgSurface::new(size, size);
    let mut path_text = StraightPathText;
    let options = RenderOptions {
        background: CONFIG.renderer.background,
        debug: CONFIG.renderer.debug,
    };

    let job = RenderJob::new(
        &tile,
        CONFIG.renderer.zoom,
        resolver,
        engine,
        RenderTarget {
            surface: &mut surface,
            assets,
            path_text: &mut path_text,
        },
        options,
    )
    .on_complete(|timings| log::info!("Rendered tile {}:\n{}", tile_id, timings));

    let geometry = job.render_geometry();
    std::thread::yield_now();
    geometry.render_decorations();

    let output = Path::new(&CONFIG.general.output_dir).join(format!(
        "{}-{}-{}.svg",
        tile_id.z, tile_id.x, tile_id.y
    ));
    std::fs::create_dir_all(&CONFIG.general.output_dir)?;
    std::fs::write(&output, surface.finish())?;
    log::debug!("Wrote {}.", output.display());

    Ok(())
}

fn render_all(
    cache: &mut TileFeatureCache,
    resolver: &mut StyleResolver,
    engine: &dyn StyleEngine,
    assets: &MemoryAssets,
) {
    for source in &CONFIG.tiles {
        if let Err(e) = render_tile(cache, resolver, engine, assets, source) {
            log::error!("Failed to render tile {}. Reason:\r\n{}", source.id, e);
        }
    }

    let stats = resolver.stats();
    log::debug!(
        "Style cache holds {} entries ({} hits, {} misses).",
        stats.entries,
        stats.hits,
        stats.misses
    );
}

fn main() {
    log::set_max_level(CONFIG.general.log_level.to_level_filter());
    pretty_env_logger::init();

    let mut style = match style_source::StyleSource::load(
        &CONFIG.renderer.style,
        CONFIG.general.watch,
    ) {
        Ok(style) => style,
        Err(e) => {
            log::error!("Unable to load the style. Reason:\r\n{}", e);
            std::process::exit(1);
        }
    };

    let assets = load_assets();
    let mut cache = TileFeatureCache::new();
    let mut resolver = StyleResolver::new();

    render_all(&mut cache, &mut resolver, style.engine(), &assets);

    if !CONFIG.general.watch {
        return;
    }

    log::info!("Watching {} for changes.", CONFIG.renderer.style);
    loop {
        if style.update(&mut resolver) {
            render_all(&mut cache, &mut resolver, style.engine(), &assets);
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}
