use std::fmt;

use crate::threads::RangeSplitter;

/// Half-open block of pixels, `[start_row, end_row) x [start_col, end_col)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRegion {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl PixelRegion {
    pub fn new(start_row: u32, end_row: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start_row,
            end_row,
            start_col,
            end_col,
        }
    }

    pub fn rows(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn cols(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col)
    }

    /// `(rows, cols)`, the shape of the grid a tile over this region holds.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows() as usize, self.cols() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.start_row <= self.end_row
            && self.start_col <= self.end_col
            && self.end_row <= height
            && self.end_col <= width
    }
}

impl fmt::Display for PixelRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..{}, cols {}..{}",
            self.start_row, self.end_row, self.start_col, self.end_col
        )
    }
}

/// Cuts an image of `height` rows into `n` full-width row strips, top to
/// bottom. The first `height % n` strips get one extra row. With more strips
/// than rows the trailing strips are empty.
pub fn partition(height: u32, width: u32, n: usize) -> Vec<PixelRegion> {
    RangeSplitter::split(0, height as usize, n)
        .into_iter()
        .map(|(start, end)| PixelRegion::new(start as u32, end as u32, 0, width))
        .collect()
}
