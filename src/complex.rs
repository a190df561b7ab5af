use num::complex::Complex;

pub type C<T> = Complex<T>;

pub const ZERO: C<f64> = Complex::new(0.0, 0.0);

pub fn c(re: f64, im: f64) -> C<f64> {
    Complex::new(re, im)
}

/// Squared magnitude compared against a squared radius, so the hot loop
/// never takes a square root.
#[inline]
pub fn escaped(z: C<f64>, radius_sqr: f64) -> bool {
    z.norm_sqr() > radius_sqr
}

/// Unsquared test for radii whose square overflows. An orbit that has
/// already overflowed to inf or NaN counts as escaped.
#[inline]
pub fn escaped_norm(z: C<f64>, radius: f64) -> bool {
    let n = z.norm();
    n.is_nan() || n > radius
}
