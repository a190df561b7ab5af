use tracing::{debug, error, info};

use crate::completion::Completion;
use crate::coord::Viewport;
use crate::render::{RenderResult, Renderer};
use crate::settings::RenderSettings;

/// Tile count used when nothing else is asked for.
pub const DEFAULT_TILES: usize = 8;

const ZOOM_IN: f64 = 0.8;
const ZOOM_OUT: f64 = 1.25;

/// Live view state. Interactions only raise the flag; rendering happens in
/// [`Explorer::render_if_needed`].
pub struct Explorer {
    renderer: Renderer,
    viewport: Viewport,
    settings: RenderSettings,
    tiles: usize,
    needs_render: bool,
}

impl Explorer {
    pub fn new(renderer: Renderer, settings: RenderSettings) -> Self {
        Self {
            renderer,
            viewport: Viewport::default(),
            settings,
            tiles: DEFAULT_TILES,
            needs_render: true,
        }
    }

    pub fn with_tiles(mut self, tiles: usize) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self.needs_render = true;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn tiles(&self) -> usize {
        self.tiles
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Zooms around pixel `(px, py)`. Clicks outside the image are ignored;
    /// returns whether the viewport changed.
    pub fn zoom_at(&mut self, px: u32, py: u32, zoom_in: bool) -> bool {
        if px >= self.settings.width || py >= self.settings.height {
            debug!(px, py, "zoom outside the image ignored");
            return false;
        }
        let factor = if zoom_in { ZOOM_IN } else { ZOOM_OUT };
        self.viewport
            .zoom_to_point(px, py, self.settings.width, self.settings.height, factor);
        self.needs_render = true;
        true
    }

    pub fn pan(&mut self, xfrac: f64, yfrac: f64) {
        self.viewport.pan_relative(xfrac, yfrac);
        self.needs_render = true;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.settings.width = width;
        self.settings.height = height;
        self.needs_render = true;
    }

    pub fn reset(&mut self) {
        self.viewport = Viewport::default();
        self.needs_render = true;
    }

    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    /// Renders the current snapshot if a render was requested.
    ///
    /// The flag is cleared whatever the outcome: a failed frame is logged
    /// and stays failed until the next interaction asks again.
    pub fn render_if_needed(&mut self) -> Option<Completion<RenderResult>> {
        if !self.needs_render {
            return None;
        }
        let (viewport, settings) = (self.viewport, self.settings);
        let outcome = self.renderer.render(viewport, settings, self.tiles);
        self.needs_render = false;

        match &outcome {
            Completion::Value(result) => info!(
                width = settings.width,
                height = settings.height,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "frame rendered"
            ),
            Completion::Error(e) => error!(error = %e, "render failed"),
            Completion::Stopped => debug!("render stopped"),
        }
        Some(outcome)
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(Renderer::default(), RenderSettings::default())
    }
}
