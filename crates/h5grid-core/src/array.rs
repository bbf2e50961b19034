//! Owned, shaped arrays produced by extraction.
//!
//! Every array stores its axis sizes independently and addresses its
//! flat row-major storage with one stride per axis, so a rectangular
//! grid can never be indexed with the wrong axis length.

use indexmap::IndexMap;
use std::ops::Index;

/// A single integer read from a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarInt {
    /// The value.
    pub value: i32,
}

/// A `rows x cols` grid of 32-bit integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntGrid2D {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl IntGrid2D {
    /// Wrap row-major data. Returns `None` if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<i32>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Number of rows (axis 0).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (axis 1).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Row `row` as a slice of length [`cols`](Self::cols).
    pub fn row(&self, row: usize) -> Option<&[i32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Iterate over rows. Yields [`rows`](Self::rows) slices, empty ones
    /// for a zero-column grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        (0..self.rows).map(move |row| {
            let start = row * self.cols;
            &self.data[start..start + self.cols]
        })
    }

    /// Flat row-major storage.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }
}

impl Index<usize> for IntGrid2D {
    type Output = [i32];

    fn index(&self, row: usize) -> &[i32] {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }
}

/// An `axis0 x axis1 x axis2` grid of 32-bit floats.
///
/// For coordinate grids the innermost axis holds the coordinate
/// components of one cell, so `grid[(i, j)]` is the vector stored at
/// cell `(i, j)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatGrid3D {
    dims: [usize; 3],
    data: Vec<f32>,
}

impl FloatGrid3D {
    /// Wrap row-major data. Returns `None` if the length does not match.
    pub fn from_row_major(dims: [usize; 3], data: Vec<f32>) -> Option<Self> {
        let expected = dims[0].checked_mul(dims[1])?.checked_mul(dims[2])?;
        if expected != data.len() {
            return None;
        }
        Some(Self { dims, data })
    }

    /// Per-axis sizes.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.dims[1] + j) * self.dims[2] + k
    }

    /// Element at `(i, j, k)`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        if i >= self.dims[0] || j >= self.dims[1] || k >= self.dims[2] {
            return None;
        }
        Some(self.data[self.offset(i, j, k)])
    }

    /// The innermost vector at cell `(i, j)`.
    pub fn cell(&self, i: usize, j: usize) -> Option<&[f32]> {
        if i >= self.dims[0] || j >= self.dims[1] {
            return None;
        }
        let start = self.offset(i, j, 0);
        Some(&self.data[start..start + self.dims[2]])
    }

    /// Flat row-major storage.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl Index<(usize, usize)> for FloatGrid3D {
    type Output = [f32];

    fn index(&self, (i, j): (usize, usize)) -> &[f32] {
        assert!(
            i < self.dims[0] && j < self.dims[1],
            "cell ({i}, {j}) out of bounds for {}x{}",
            self.dims[0],
            self.dims[1]
        );
        let start = self.offset(i, j, 0);
        &self.data[start..start + self.dims[2]]
    }
}

/// Any of the typed arrays extraction can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray {
    /// A scalar integer.
    Scalar(ScalarInt),
    /// A 2D integer grid.
    Int2(IntGrid2D),
    /// A 3D float grid.
    Float3(FloatGrid3D),
}

/// The datasets materialized from one container.
///
/// Fields stay `None` when the corresponding dataset was absent or could
/// not be extracted; checking for required fields is the caller's job.
/// Datasets mapped by a custom schema land in [`extra`](Self::extra)
/// keyed by name, in discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionResult {
    /// Number of physical dimensions (`dim`).
    pub dimension_count: Option<ScalarInt>,
    /// Domain bounding box grid (`domain_box`).
    pub domain_box: Option<IntGrid2D>,
    /// Interior bounding box grid (`interior_box`).
    pub interior_box: Option<IntGrid2D>,
    /// Cell mask grid (`mask`).
    pub mask: Option<IntGrid2D>,
    /// Per-cell coordinate pairs (`xy`).
    pub xy: Option<FloatGrid3D>,
    /// Arrays for schema entries outside the reference five.
    pub extra: IndexMap<String, TypedArray>,
}

impl ExtractionResult {
    /// Returns `true` if all five reference datasets are present.
    pub fn is_complete(&self) -> bool {
        self.dimension_count.is_some()
            && self.domain_box.is_some()
            && self.interior_box.is_some()
            && self.mask.is_some()
            && self.xy.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_grid_rejects_wrong_length() {
        assert!(IntGrid2D::from_row_major(2, 3, vec![0; 5]).is_none());
        assert!(IntGrid2D::from_row_major(2, 3, vec![0; 6]).is_some());
    }

    #[test]
    fn int_grid_rectangular_indexing_uses_column_stride() {
        let g = IntGrid2D::from_row_major(2, 3, vec![0, 1, 2, 10, 11, 12]).unwrap();
        assert_eq!(g[1], [10, 11, 12]);
        assert_eq!(g.get(1, 2), Some(12));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 3), None);
        assert_eq!(g.iter_rows().count(), 2);
    }

    #[test]
    fn zero_column_grid_yields_empty_rows() {
        let g = IntGrid2D::from_row_major(4, 0, vec![]).unwrap();
        assert_eq!(g.iter_rows().count(), g.rows());
        assert!(g.iter_rows().all(|r| r.is_empty()));
        assert_eq!(g.row(0), Some(&[][..]));
    }

    #[test]
    fn float_grid_cell_returns_inner_vector() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let g = FloatGrid3D::from_row_major([2, 3, 2], data).unwrap();
        assert_eq!(g[(1, 2)], [10.0, 11.0]);
        assert_eq!(g.cell(0, 1), Some(&[2.0, 3.0][..]));
        assert_eq!(g.get(1, 0, 1), Some(7.0));
        assert_eq!(g.get(2, 0, 0), None);
    }

    #[test]
    fn empty_result_is_incomplete() {
        assert!(!ExtractionResult::default().is_complete());
    }
}
