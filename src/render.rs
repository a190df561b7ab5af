use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use ndarray::{s, Array2};
use tracing::{debug, warn};

use crate::completion::{Completion, StopToken};
use crate::coord::Viewport;
use crate::error::{RenderError, Result};
use crate::grid::{try_filled, ColorGrid, PixelGrid, BLACK};
use crate::painter::{self, Palette};
use crate::region::{partition, PixelRegion};
use crate::settings::RenderSettings;
use crate::solver::{EscapeTime, Solver};
use crate::threads::{PoolError, WorkerPool};
use crate::tile::{compute_tile, Tile};

#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub pixels: PixelGrid,
    pub colors: ColorGrid,
    pub viewport: Viewport,
    pub settings: RenderSettings,
    pub elapsed: Duration,
}

impl RenderResult {
    pub fn empty(viewport: Viewport, settings: RenderSettings) -> Self {
        Self {
            pixels: Array2::zeros((0, 0)),
            colors: Array2::from_elem((0, 0), BLACK),
            viewport,
            settings,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn to_image(&self) -> RgbImage {
        painter::to_image(&self.colors)
    }
}

/// Renders row strips in parallel on a fixed-size pool. Overlapping calls
/// from several threads are fine.
pub struct Renderer {
    pool: WorkerPool,
    palette: Palette,
}

impl Renderer {
    pub fn new(threads: usize) -> Self {
        Self {
            pool: WorkerPool::new(threads),
            palette: Palette::default(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn threads(&self) -> usize {
        self.pool.size()
    }

    /// Renders `viewport` into `tiles` row strips.
    pub fn render(
        &self,
        viewport: Viewport,
        settings: RenderSettings,
        tiles: usize,
    ) -> Completion<RenderResult> {
        self.render_with_stop(viewport, settings, tiles, &StopToken::new())
    }

    /// Like [`Renderer::render`], but tiles give up at the next row once
    /// `stop` is set and the call completes as [`Completion::Stopped`].
    pub fn render_with_stop(
        &self,
        viewport: Viewport,
        settings: RenderSettings,
        tiles: usize,
        stop: &StopToken,
    ) -> Completion<RenderResult> {
        self.render_with_solver(viewport, settings, tiles, stop, EscapeTime::from(&settings))
    }

    pub fn render_with_solver<S>(
        &self,
        viewport: Viewport,
        settings: RenderSettings,
        tiles: usize,
        stop: &StopToken,
        solver: S,
    ) -> Completion<RenderResult>
    where
        S: Solver + 'static,
    {
        if let Err(e) = viewport.validate().and_then(|_| settings.validate()) {
            return Completion::Error(e);
        }
        if tiles == 0 {
            debug!("zero tiles requested, nothing to dispatch");
            return Completion::Value(RenderResult::empty(viewport, settings));
        }

        let start = Instant::now();
        let regions = partition(settings.height, settings.width, tiles);
        let solver = Arc::new(solver);
        let tasks: Vec<_> = regions
            .iter()
            .map(|&region| {
                let solver = Arc::clone(&solver);
                let palette = self.palette;
                let stop = stop.clone();
                move || compute_tile(&viewport, &settings, region, &*solver, &palette, &stop)
            })
            .collect();

        debug!(
            tiles,
            workers = self.pool.size(),
            width = settings.width,
            height = settings.height,
            "dispatching tiles"
        );
        let outcomes = self.pool.scatter(tasks).join();

        let tiles = match settle(&regions, outcomes) {
            Completion::Value(tiles) => tiles,
            Completion::Error(e) => {
                warn!(error = %e, "render aborted");
                return Completion::Error(e);
            }
            Completion::Stopped => {
                debug!("render stopped");
                return Completion::Stopped;
            }
        };

        match merge(&settings, tiles) {
            Ok((pixels, colors)) => {
                let elapsed = start.elapsed();
                debug!(elapsed_ms = elapsed.as_millis() as u64, "render complete");
                Completion::Value(RenderResult {
                    pixels,
                    colors,
                    viewport,
                    settings,
                    elapsed,
                })
            }
            Err(e) => Completion::Error(e),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            pool: WorkerPool::with_physical_cpus(),
            palette: Palette::default(),
        }
    }
}

/// Reduces the per-tile outcomes to one. The failure with the lowest region
/// index wins; failures win over stops.
fn settle(
    regions: &[PixelRegion],
    outcomes: Vec<std::result::Result<Completion<Tile>, PoolError>>,
) -> Completion<Vec<Tile>> {
    let mut tiles = Vec::with_capacity(outcomes.len());
    let mut stopped = false;
    for (region, outcome) in regions.iter().zip(outcomes) {
        match outcome {
            Ok(Completion::Value(tile)) => tiles.push(tile),
            Ok(Completion::Error(e)) => return Completion::Error(e),
            Ok(Completion::Stopped) => stopped = true,
            Err(e) => return Completion::Error(RenderError::computation(*region, e)),
        }
    }
    if stopped {
        Completion::Stopped
    } else {
        Completion::Value(tiles)
    }
}

/// Copies every tile into full-size grids at its own region's offsets.
///
/// Rows that would land at or below `settings.height` are dropped. A tile
/// that is wider than the image or whose grids disagree with its region is
/// rejected outright.
pub(crate) fn merge(settings: &RenderSettings, tiles: Vec<Tile>) -> Result<(PixelGrid, ColorGrid)> {
    let (height, width) = (settings.height as usize, settings.width as usize);
    let whole = PixelRegion::new(0, settings.height, 0, settings.width);
    let mut pixels = try_filled(height, width, 0u32).map_err(|e| RenderError::computation(whole, e))?;
    let mut colors = try_filled(height, width, BLACK).map_err(|e| RenderError::computation(whole, e))?;

    for tile in tiles {
        let region = tile.region;
        let misshapen = tile.pixels.dim() != region.shape() || tile.colors.dim() != region.shape();
        if region.start_row > region.end_row
            || region.start_col > region.end_col
            || region.end_col > settings.width
            || misshapen
        {
            return Err(RenderError::InvalidRegion {
                region,
                width: settings.width,
                height: settings.height,
            });
        }

        let rows = region.end_row.min(settings.height).saturating_sub(region.start_row) as usize;
        if rows < region.rows() as usize {
            warn!(%region, skipped = region.rows() as usize - rows, "tile rows beyond image height dropped");
        }
        if rows == 0 {
            continue;
        }

        let (y0, x0, x1) = (
            region.start_row as usize,
            region.start_col as usize,
            region.end_col as usize,
        );
        pixels
            .slice_mut(s![y0..y0 + rows, x0..x1])
            .assign(&tile.pixels.slice(s![..rows, ..]));
        colors
            .slice_mut(s![y0..y0 + rows, x0..x1])
            .assign(&tile.colors.slice(s![..rows, ..]));
    }

    Ok((pixels, colors))
}
