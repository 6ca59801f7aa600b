use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::*;

/// Where a time was spent during one tile render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderTimings {
    pub styling: Duration,
    pub geometry: Duration,
    pub decorations: Duration,
}

impl RenderTimings {
    pub fn total(&self) -> Duration {
        self.styling + self.geometry + self.decorations
    }
}

impl std::fmt::Display for RenderTimings {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        writeln!(f, "{:.3} ms: layers styled", ms(self.styling))?;
        writeln!(f, "{:.3} ms: map rendered", ms(self.geometry))?;
        writeln!(f, "{:.3} ms: icons/text rendered", ms(self.decorations))?;
        write!(f, "{:.3} ms: total", ms(self.total()))
    }
}

/// The collaborators a job draws with.
pub struct RenderTarget<'a> {
    pub surface: &'a mut dyn Surface,
    pub assets: &'a dyn AssetCache,
    pub path_text: &'a mut dyn PathTextLayout,
}

/// One render of one tile, split into a geometry and a decoration phase.
///
/// The host is free to yield between the phases. Once started, each phase runs to completion.
pub struct RenderJob<'a> {
    target: RenderTarget<'a>,
    transform: TileTransform,
    layers: LayerStack,
    canvas: Option<Arc<StyleDeclaration>>,
    options: RenderOptions,
    on_complete: Option<Box<dyn FnOnce(&RenderTimings) + 'a>>,
    started: Instant,
    styled: Instant,
}

impl<'a> RenderJob<'a> {
    /// Styles the features of `tile` and sorts them into layers.
    pub fn new(
        tile: &TileData,
        zoom: u32,
        resolver: &mut StyleResolver,
        engine: &dyn StyleEngine,
        target: RenderTarget<'a>,
        options: RenderOptions,
    ) -> Self {
        let started = Instant::now();

        let styled = stylize_features(&tile.features, zoom, resolver, engine);
        let layers = LayerStack::build(styled);
        let canvas = if options.background {
            resolver.resolve_canvas(engine, zoom).get("default").cloned()
        } else {
            None
        };
        let transform = tile.transform(target.surface.width(), target.surface.height());

        log::debug!(
            "Styled {} features into {} variants on {} layers.",
            tile.features.len(),
            layers.feature_count(),
            layers.layers().len()
        );

        Self {
            target,
            transform,
            layers,
            canvas,
            options,
            on_complete: None,
            started,
            styled: Instant::now(),
        }
    }

    /// Registers the callback that receives the timings once decorations are done.
    pub fn on_complete(mut self, callback: impl FnOnce(&RenderTimings) + 'a) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Composites background, fills, casings and lines of every layer, bottom to top.
    ///
    /// Consumes the job; decorations can only be placed through the returned stage.
    pub fn render_geometry(mut self) -> GeometryComplete<'a> {
        let mut painter = GeometryPainter::new(
            &mut *self.target.surface,
            self.target.assets,
            self.transform,
        );

        if let Some(canvas) = &self.canvas {
            painter.paint_background(canvas);
        }
        for layer in self.layers.layers() {
            painter.paint_layer(layer);
        }

        log::trace!("Geometry committed in {} batches.", painter.commits());
        GeometryComplete {
            job: self,
            finished: Instant::now(),
        }
    }

    /// Runs both phases back to back.
    pub fn run_to_completion(self) -> RenderTimings {
        self.render_geometry().render_decorations()
    }
}

/// A job whose geometry has been composited.
///
/// Only [`RenderJob::render_geometry`] hands these out, so decorations cannot be placed
/// before the geometry underneath them is drawn, and each job draws its geometry once.
pub struct GeometryComplete<'a> {
    job: RenderJob<'a>,
    finished: Instant,
}

impl<'a> GeometryComplete<'a> {
    pub fn layers(&self) -> &LayerStack {
        &self.job.layers
    }

    /// Places icons and labels and reports the timings of the whole render.
    pub fn render_decorations(self) -> RenderTimings {
        let GeometryComplete { job, finished: geometry_finished } = self;
        let RenderJob {
            target,
            transform,
            layers,
            options,
            on_complete,
            started,
            styled,
            ..
        } = job;

        let mut decorator = Decorator::new(
            target.surface,
            target.assets,
            target.path_text,
            transform,
            options.debug,
        );
        decorator.decorate(&layers);
        log::trace!(
            "Placed decorations, {} boxes claimed.",
            decorator.collisions().len()
        );

        let finished = Instant::now();
        let timings = RenderTimings {
            styling: styled - started,
            geometry: geometry_finished - styled,
            decorations: finished - geometry_finished,
        };
        log::debug!("Tile rendered in {:?}.", timings.total());

        if let Some(callback) = on_complete {
            callback(&timings);
        }
        timings
    }
}
