//! Escape-time Mandelbrot rendering split into row strips that are computed
//! in parallel on a worker pool and stitched back together.

pub mod bench;
pub mod completion;
pub mod complex;
pub mod coord;
pub mod error;
pub mod explorer;
pub mod grid;
pub mod painter;
pub mod region;
pub mod render;
pub mod settings;
pub mod solver;
pub mod threads;
pub mod tile;

pub use completion::{Completion, StopToken};
pub use coord::Viewport;
pub use error::{RenderError, Result};
pub use explorer::{Explorer, DEFAULT_TILES};
pub use painter::Palette;
pub use region::PixelRegion;
pub use render::{RenderResult, Renderer};
pub use settings::RenderSettings;

/// Renders one frame on a throwaway pool sized to the physical CPUs.
pub fn render(viewport: Viewport, settings: RenderSettings, tiles: usize) -> Completion<RenderResult> {
    Renderer::default().render(viewport, settings, tiles)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_one_shot_render() {
        let settings = RenderSettings::new(16, 12, 25, 2.0);
        let result = render(Viewport::default(), settings, DEFAULT_TILES)
            .into_result()
            .unwrap();
        assert_eq!(result.pixels.dim(), (12, 16));
        assert_eq!(result.to_image().dimensions(), (16, 12));
    }
}
