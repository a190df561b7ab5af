use crate::complex::*;
use crate::settings::RenderSettings;

/// Per-point iteration kernel used by tile tasks.
pub trait Solver: Send + Sync {
    /// Iteration count for `c`, in `[0, max_iterations]`.
    fn solve(&self, c: C<f64>) -> u32;

    fn max_iterations(&self) -> u32;
}

/// Classic escape-time iteration of `z -> z^2 + c` from `z = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeTime {
    pub max_iterations: u32,
    pub escape_radius: f64,
}

impl EscapeTime {
    pub fn new(max_iterations: u32, escape_radius: f64) -> Self {
        Self {
            max_iterations,
            escape_radius,
        }
    }
}

impl From<&RenderSettings> for EscapeTime {
    fn from(settings: &RenderSettings) -> Self {
        Self::new(settings.max_iterations, settings.escape_radius)
    }
}

impl Default for EscapeTime {
    fn default() -> Self {
        Self::new(100, 2.0)
    }
}

impl Solver for EscapeTime {
    fn solve(&self, c: C<f64>) -> u32 {
        escape_time(c, self.max_iterations, self.escape_radius)
    }

    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

/// Returns the first `n` with `|z_n| > escape_radius`, or `max_iterations`
/// when the orbit stays bounded that long.
pub fn escape_time(c: C<f64>, max_iterations: u32, escape_radius: f64) -> u32 {
    let radius_sqr = escape_radius * escape_radius;
    let wide = !radius_sqr.is_finite();
    let mut z = ZERO;
    for n in 0..max_iterations {
        let out = if wide {
            escaped_norm(z, escape_radius)
        } else {
            escaped(z, radius_sqr)
        };
        if out {
            return n;
        }
        z = z * z + c;
    }
    max_iterations
}
