//! Dense cell grid used for placement and doorway marking.
//!
//! Row-major flat buffer indexed by `y * width + x`. Cell values follow the
//! output encoding: `0` empty, `room_id + 1` occupied, `-1` doorway.

use crate::constants::cells;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementGrid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl PlacementGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![cells::EMPTY; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write one cell. Returns false if out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: i32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// True if the `w × h` rectangle at `(x, y)` lies inside the grid and
    /// every cell in it is empty.
    pub fn is_free(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        if x + w > self.width || y + h > self.height {
            return false;
        }
        (y..y + h).all(|row| {
            let start = row * self.width + x;
            self.cells[start..start + w].iter().all(|&c| c == cells::EMPTY)
        })
    }

    /// Fill the rectangle (clipped to the grid) with `value`.
    pub fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, value: i32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.cells[start + x.min(x_end)..start + x_end].fill(value);
        }
    }

    /// First row-major origin where a `w × h` rectangle fits.
    pub fn first_free(&self, w: usize, h: usize) -> Option<(usize, usize)> {
        if w > self.width || h > self.height {
            return None;
        }
        for y in 0..=self.height - h {
            for x in 0..=self.width - w {
                if self.is_free(x, y, w, h) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn count(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// Nested `[row][col]` copy for the output contract.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells.chunks(self.width).map(|r| r.to_vec()).collect()
    }

    /// Rebuild from nested rows. Returns None if rows are ragged.
    pub fn from_rows(rows: &[Vec<i32>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.concat(),
        })
    }
}
