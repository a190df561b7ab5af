use ndarray::Array2;

use crate::completion::{Completion, StopToken};
use crate::coord::{to_complex_point, Viewport};
use crate::error::RenderError;
use crate::grid::{try_buffer, Color, ColorGrid, GridError, PixelGrid};
use crate::painter::ColorScale;
use crate::region::PixelRegion;
use crate::settings::RenderSettings;
use crate::solver::Solver;

/// Output of one tile task, tagged with the region it covers so the merge
/// never depends on completion order.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub region: PixelRegion,
    pub pixels: PixelGrid,
    pub colors: ColorGrid,
}

/// Computes the local pixel and color grids for `region`.
///
/// Global pixel `(x, y)` lands at local `[[y - start_row, x - start_col]]`.
/// The stop token is checked before every row.
pub fn compute_tile<S, P>(
    viewport: &Viewport,
    settings: &RenderSettings,
    region: PixelRegion,
    solver: &S,
    scale: &P,
    stop: &StopToken,
) -> Completion<Tile>
where
    S: Solver + ?Sized,
    P: ColorScale + ?Sized,
{
    if stop.is_stopped() {
        return Completion::Stopped;
    }
    match fill(viewport, settings, region, solver, scale, stop) {
        Ok(Some(tile)) => Completion::Value(tile),
        Ok(None) => Completion::Stopped,
        Err(e) => Completion::Error(RenderError::computation(region, e)),
    }
}

fn fill<S, P>(
    viewport: &Viewport,
    settings: &RenderSettings,
    region: PixelRegion,
    solver: &S,
    scale: &P,
    stop: &StopToken,
) -> Result<Option<Tile>, GridError>
where
    S: Solver + ?Sized,
    P: ColorScale + ?Sized,
{
    let shape = region.shape();
    let mut pixels: Vec<u32> = try_buffer(shape.0, shape.1)?;
    let mut colors: Vec<Color> = try_buffer(shape.0, shape.1)?;
    let max_iterations = solver.max_iterations();

    for y in region.start_row..region.end_row {
        if stop.is_stopped() {
            return Ok(None);
        }
        for x in region.start_col..region.end_col {
            let c = to_complex_point(x, y, viewport, settings.width, settings.height);
            let i = solver.solve(c);
            pixels.push(i);
            colors.push(scale.color(i, max_iterations));
        }
    }

    Ok(Some(Tile {
        region,
        pixels: Array2::from_shape_vec(shape, pixels)?,
        colors: Array2::from_shape_vec(shape, colors)?,
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::painter::{to_color, Rainbow};
    use crate::complex::C;
    use crate::solver::{escape_time, EscapeTime};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> (Viewport, RenderSettings, EscapeTime) {
        let viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0);
        let settings = RenderSettings::new(10, 10, 50, 2.0);
        (viewport, settings, EscapeTime::from(&settings))
    }

    #[test]
    fn test_tile_uses_local_indexing() {
        let (viewport, settings, solver) = setup();
        let region = PixelRegion::new(3, 5, 2, 6);
        let tile = compute_tile(&viewport, &settings, region, &solver, &Rainbow, &StopToken::new())
            .value()
            .unwrap();

        assert_eq!(tile.region, region);
        assert_eq!(tile.pixels.dim(), (2, 4));
        assert_eq!(tile.colors.dim(), (2, 4));
        for y in 3..5u32 {
            for x in 2..6u32 {
                let c = to_complex_point(x, y, &viewport, 10, 10);
                let i = escape_time(c, 50, 2.0);
                let local = [(y - 3) as usize, (x - 2) as usize];
                assert_eq!(tile.pixels[local], i);
                assert_eq!(tile.colors[local], to_color(i, 50));
            }
        }
    }

    #[test]
    fn test_empty_region_yields_empty_grids() {
        let (viewport, settings, solver) = setup();
        for region in [PixelRegion::new(4, 4, 0, 10), PixelRegion::new(0, 10, 7, 7)] {
            let tile =
                compute_tile(&viewport, &settings, region, &solver, &Rainbow, &StopToken::new())
                    .value()
                    .unwrap();
            assert_eq!(tile.pixels.len(), 0);
            assert_eq!(tile.colors.len(), 0);
            assert_eq!(tile.pixels.dim(), region.shape());
        }
    }

    #[test]
    fn test_stopped_token_yields_stopped() {
        let (viewport, settings, solver) = setup();
        let stop = StopToken::new();
        stop.stop();
        let out = compute_tile(
            &viewport,
            &settings,
            PixelRegion::new(0, 10, 0, 10),
            &solver,
            &Rainbow,
            &stop,
        );
        assert!(out.is_stopped());
    }

    /// Raises `stop` the first time it sees a point on or below the real axis.
    struct StopsAtAxis {
        stop: StopToken,
        calls: AtomicUsize,
    }

    impl Solver for StopsAtAxis {
        fn solve(&self, c: C<f64>) -> u32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if c.im >= 0.0 {
                self.stop.stop();
            }
            1
        }

        fn max_iterations(&self) -> u32 {
            10
        }
    }

    #[test]
    fn test_stop_during_the_tile_ends_at_the_next_row() {
        let (viewport, settings, _) = setup();
        let stop = StopToken::new();
        let solver = StopsAtAxis {
            stop: stop.clone(),
            calls: AtomicUsize::new(0),
        };

        // row 5 is the first with im >= 0; it finishes, row 6 never starts
        let out = compute_tile(
            &viewport,
            &settings,
            PixelRegion::new(0, 10, 0, 10),
            &solver,
            &Rainbow,
            &stop,
        );
        assert!(out.is_stopped());
        assert_eq!(solver.calls.load(Ordering::SeqCst), 60);
    }

    #[test]
    fn test_unallocatable_region_fails_instead_of_returning_partial_data() {
        let (viewport, settings, solver) = setup();
        let region = PixelRegion::new(0, u32::MAX, 0, u32::MAX);
        let out = compute_tile(&viewport, &settings, region, &solver, &Rainbow, &StopToken::new());
        match out {
            Completion::Error(RenderError::ComputationFailure { region: r, .. }) => {
                assert_eq!(r, region)
            }
            other => panic!("expected a computation failure, got {:?}", other),
        }
    }
}
