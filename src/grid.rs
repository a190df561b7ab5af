use std::collections::TryReserveError;

use image::Rgb;
use ndarray::{Array2, ShapeError};
use thiserror::Error;

pub type Color = Rgb<u8>;

pub const BLACK: Color = Rgb([0, 0, 0]);

/// Iteration counts, indexed `[[row, col]]`.
pub type PixelGrid = Array2<u32>;

pub type ColorGrid = Array2<Color>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("cannot allocate a {rows}x{cols} grid: {source}")]
    Alloc {
        rows: usize,
        cols: usize,
        source: TryReserveError,
    },

    #[error("grid shape mismatch: {0}")]
    Shape(#[from] ShapeError),
}

/// Row-major buffer for a `rows x cols` grid, reserved up front so that an
/// allocation failure is reported instead of aborting the process.
pub fn try_buffer<T>(rows: usize, cols: usize) -> Result<Vec<T>, GridError> {
    let len = rows.checked_mul(cols).unwrap_or(usize::MAX);
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| GridError::Alloc { rows, cols, source })?;
    Ok(buf)
}

pub fn try_filled<T: Clone>(rows: usize, cols: usize, fill: T) -> Result<Array2<T>, GridError> {
    let mut buf = try_buffer(rows, cols)?;
    buf.resize(rows * cols, fill);
    Ok(Array2::from_shape_vec((rows, cols), buf)?)
}
