use crate::complex::*;
use crate::error::{RenderError, Result};

/// Rectangular window into the complex plane. Row 0 of the image sits at
/// `y_min`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn from_center(center: C<f64>, width: f64, height: f64) -> Self {
        Self::new(
            center.re - width / 2.0,
            center.re + width / 2.0,
            center.im - height / 2.0,
            center.im + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> C<f64> {
        c(
            (self.x_max + self.x_min) / 2.0,
            (self.y_max + self.y_min) / 2.0,
        )
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::InvalidViewport(format!(
                "bounds must be finite, got {:?}",
                bounds
            )));
        }
        if self.x_max <= self.x_min {
            return Err(RenderError::InvalidViewport(format!(
                "x_max ({}) must exceed x_min ({})",
                self.x_max, self.x_min
            )));
        }
        if self.y_max <= self.y_min {
            return Err(RenderError::InvalidViewport(format!(
                "y_max ({}) must exceed y_min ({})",
                self.y_max, self.y_min
            )));
        }
        Ok(())
    }

    /// Recenters on the point under pixel `(px, py)` and scales both extents
    /// by `factor`. A factor below 1 zooms in.
    pub fn zoom_to_point(&mut self, px: u32, py: u32, width: u32, height: u32, factor: f64) {
        let target = to_complex_point(px, py, self, width, height);
        *self = Self::from_center(target, self.width() * factor, self.height() * factor);
    }

    /// Scales both extents by `factor` around the current center.
    pub fn zoom(&mut self, factor: f64) {
        let xc = (self.x_max + self.x_min) / 2.0;
        let yc = (self.y_max + self.y_min) / 2.0;
        self.x_min = xc + (self.x_min - xc) * factor;
        self.x_max = xc + (self.x_max - xc) * factor;
        self.y_min = yc + (self.y_min - yc) * factor;
        self.y_max = yc + (self.y_max - yc) * factor;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
    }

    /// Pans by a fraction of the current extents.
    pub fn pan_relative(&mut self, xfrac: f64, yfrac: f64) {
        self.pan(xfrac * self.width(), yfrac * self.height());
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(-2.5, 1.5, -2.0, 2.0)
    }
}

/// Maps pixel `(x, y)` of a `width x height` image onto the viewport.
///
/// The divisor is the full dimension, so pixel `(0, 0)` lands exactly on
/// `(x_min, y_min)` while the last pixel stops one step short of
/// `(x_max, y_max)`.
#[inline]
pub fn to_complex_point(x: u32, y: u32, viewport: &Viewport, width: u32, height: u32) -> C<f64> {
    let re = viewport.x_min + (x as f64 / width as f64) * (viewport.x_max - viewport.x_min);
    let im = viewport.y_min + (y as f64 / height as f64) * (viewport.y_max - viewport.y_min);
    c(re, im)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_top_left_is_exact() {
        let viewport = Viewport::default();
        let p = to_complex_point(0, 0, &viewport, 800, 600);
        assert_eq!(p.re, viewport.x_min);
        assert_eq!(p.im, viewport.y_min);
    }

    #[test]
    fn test_bottom_right_is_near_max() {
        let viewport = Viewport::default();
        let p = to_complex_point(799, 599, &viewport, 800, 600);
        assert!(p.re < viewport.x_max);
        assert!(p.im < viewport.y_max);
        assert!((p.re - viewport.x_max).abs() < 1e-2);
        assert!((p.im - viewport.y_max).abs() < 1e-2);
    }

    #[test]
    fn test_center_pixel_is_midpoint() {
        let viewport = Viewport::default();
        let p = to_complex_point(400, 300, &viewport, 800, 600);
        assert_eq!(p.re, (viewport.x_min + viewport.x_max) / 2.0);
        assert_eq!(p.im, (viewport.y_min + viewport.y_max) / 2.0);

        let square = Viewport::new(-2.0, 2.0, -2.0, 2.0);
        assert_eq!(to_complex_point(50, 50, &square, 100, 100), c(0.0, 0.0));
    }

    #[test]
    fn test_extents() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width(), 4.0);
        assert_eq!(viewport.height(), 4.0);
        assert_eq!(viewport.center(), c(-0.5, 0.0));
    }

    #[test]
    fn test_validate() {
        assert!(Viewport::default().validate().is_ok());
        assert!(matches!(
            Viewport::new(1.0, 1.0, -1.0, 1.0).validate(),
            Err(RenderError::InvalidViewport(_))
        ));
        assert!(Viewport::new(-1.0, 1.0, 2.0, -2.0).validate().is_err());
        assert!(Viewport::new(f64::NAN, 1.0, -1.0, 1.0).validate().is_err());
        assert!(Viewport::new(-1.0, f64::INFINITY, -1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_zoom_to_point_recenters_and_scales() {
        let mut viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0);
        viewport.zoom_to_point(50, 50, 100, 100, 0.5);
        assert_eq!(viewport, Viewport::new(-1.0, 1.0, -1.0, 1.0));

        let mut viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0);
        viewport.zoom_to_point(0, 0, 100, 100, 0.8);
        assert!((viewport.center() - c(-2.0, -2.0)).norm() < 1e-12);
        assert!((viewport.width() - 3.2).abs() < 1e-12);
        assert!((viewport.height() - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_and_pan() {
        let mut viewport = Viewport::new(-2.0, 2.0, -1.0, 1.0);
        viewport.zoom(0.5);
        assert_eq!(viewport, Viewport::new(-1.0, 1.0, -0.5, 0.5));
        viewport.pan_relative(0.5, -1.0);
        assert_eq!(viewport, Viewport::new(0.0, 2.0, -1.5, -0.5));
    }
}
