use crate::error::{RenderError, Result};

/// Immutable per-request render parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub escape_radius: f64,
}

impl RenderSettings {
    pub fn new(width: u32, height: u32, max_iterations: u32, escape_radius: f64) -> Self {
        Self {
            width,
            height,
            max_iterations,
            escape_radius,
        }
    }

    /// A request with no pixels. Still legal: it renders to empty grids.
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(self.escape_radius.is_finite() && self.escape_radius > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "escape_radius must be a positive finite number, got {}",
                self.escape_radius
            )));
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(800, 600, 100, 2.0)
    }
}
