//! Sparse similarity graphs.
//!
//! A minimal CSR representation for the input to spectral clustering: a square,
//! symmetric matrix of non-negative pairwise affinities. Every constructor
//! validates the matrix, so a [`SimilarityMatrix`] that exists is always a
//! valid clustering input.

use crate::{Error, Result};
use ndarray::Array2;

/// Absolute tolerance (scaled by entry magnitude) when checking `A == Aᵀ`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A square, symmetric, non-negative similarity matrix in CSR layout.
///
/// Rows store `(col, weight)` pairs sorted by column. Explicit zeros are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build from a list of `(row, col, weight)` triplets on a `rows × cols` shape.
    ///
    /// Duplicate `(row, col)` entries keep the **maximum** weight. Both `(i, j)`
    /// and `(j, i)` must be present (within tolerance) for off-diagonal entries.
    pub fn from_triplets(rows: usize, cols: usize, entries: &[(usize, usize, f64)]) -> Result<Self> {
        if rows != cols {
            return Err(Error::NotSquare(rows, cols));
        }
        let n = rows;
        let mut checked = Vec::with_capacity(entries.len());
        for &(r, c, w) in entries {
            if r >= n || c >= n {
                return Err(Error::IndexOutOfBounds { row: r, col: c, n });
            }
            check_weight(r, c, w)?;
            checked.push((r, c, w));
        }
        let m = Self::assemble(n, checked);
        m.ensure_symmetric()?;
        Ok(m)
    }

    /// Build an undirected graph from an edge list.
    ///
    /// Each edge `(u, v, w)` inserts both `(u, v)` and `(v, u)`. Self-loops are skipped.
    pub fn from_undirected_edges(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        let mut entries: Vec<(usize, usize, f64)> = Vec::with_capacity(edges.len() * 2);
        for &(u, v, w) in edges {
            if u >= n || v >= n {
                return Err(Error::IndexOutOfBounds { row: u, col: v, n });
            }
            check_weight(u, v, w)?;
            if u == v {
                continue;
            }
            entries.push((u, v, w));
            entries.push((v, u, w));
        }
        Ok(Self::assemble(n, entries))
    }

    /// Build from a dense matrix, keeping the non-zero entries.
    pub fn from_dense(dense: &Array2<f64>) -> Result<Self> {
        let (rows, cols) = dense.dim();
        if rows != cols {
            return Err(Error::NotSquare(rows, cols));
        }
        let mut entries = Vec::new();
        for ((r, c), &w) in dense.indexed_iter() {
            check_weight(r, c, w)?;
            if w != 0.0 {
                entries.push((r, c, w));
            }
        }
        let m = Self::assemble(rows, entries);
        m.ensure_symmetric()?;
        Ok(m)
    }

    fn assemble(n: usize, mut entries: Vec<(usize, usize, f64)>) -> Self {
        entries.retain(|&(_, _, w)| w != 0.0);
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut dedup: Vec<(usize, usize, f64)> = Vec::with_capacity(entries.len());
        for (r, c, w) in entries {
            if let Some((pr, pc, pw)) = dedup.last_mut() {
                if *pr == r && *pc == c {
                    if w > *pw {
                        *pw = w;
                    }
                    continue;
                }
            }
            dedup.push((r, c, w));
        }

        let mut row_ptr = vec![0usize; n + 1];
        for &(r, _, _) in &dedup {
            row_ptr[r + 1] += 1;
        }
        for i in 0..n {
            row_ptr[i + 1] += row_ptr[i];
        }

        // Entries are already sorted by (row, col), so a single pass fills CSR.
        let (col_idx, values): (Vec<usize>, Vec<f64>) = dedup.into_iter().map(|(_, c, w)| (c, w)).unzip();

        Self {
            n,
            row_ptr,
            col_idx,
            values,
        }
    }

    fn ensure_symmetric(&self) -> Result<()> {
        for r in 0..self.n {
            for (c, w) in self.row(r) {
                let wt = self.get(c, r);
                let scale = 1.0f64.max(w.abs()).max(wt.abs());
                if (w - wt).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(Error::Asymmetric { row: r, col: c });
                }
            }
        }
        Ok(())
    }

    /// Number of items (rows == cols).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entry `(row, col)`, zero if absent or out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.n {
            return 0.0;
        }
        let cols = &self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]];
        match cols.binary_search(&col) {
            Ok(at) => self.values[self.row_ptr[row] + at],
            Err(_) => 0.0,
        }
    }

    /// Non-zero `(col, weight)` pairs of a row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Row sums (degrees).
    pub fn degree_vector(&self) -> Vec<f64> {
        (0..self.n).map(|r| self.row(r).map(|(_, w)| w).sum()).collect()
    }

    /// Dense copy.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n, self.n));
        for r in 0..self.n {
            for (c, w) in self.row(r) {
                dense[[r, c]] = w;
            }
        }
        dense
    }
}

fn check_weight(row: usize, col: usize, w: f64) -> Result<()> {
    if !w.is_finite() || w < 0.0 {
        return Err(Error::NegativeEntry {
            row,
            col,
            value: w,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn undirected_edges_are_mirrored() {
        let m = SimilarityMatrix::from_undirected_edges(3, &[(0, 1, 0.5), (1, 2, 2.0)]).unwrap();
        assert_eq!(m.n(), 3);
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.get(1, 0), 0.5);
        assert_eq!(m.get(2, 1), 2.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.degree_vector(), vec![0.5, 2.5, 2.0]);
    }

    #[test]
    fn duplicate_edges_keep_max_weight() {
        let m = SimilarityMatrix::from_undirected_edges(2, &[(0, 1, 0.2), (1, 0, 0.7)]).unwrap();
        assert_eq!(m.get(0, 1), 0.7);
        assert_eq!(m.get(1, 0), 0.7);
    }

    #[test]
    fn self_loops_are_skipped_for_edges_but_kept_for_dense() {
        let m = SimilarityMatrix::from_undirected_edges(2, &[(0, 0, 1.0), (0, 1, 1.0)]).unwrap();
        assert_eq!(m.get(0, 0), 0.0);

        let d = SimilarityMatrix::from_dense(&array![[1.0, 0.5], [0.5, 1.0]]).unwrap();
        assert_eq!(d.get(0, 0), 1.0);
        assert_eq!(d.to_dense(), array![[1.0, 0.5], [0.5, 1.0]]);
    }

    #[test]
    fn rejects_non_square() {
        let err = SimilarityMatrix::from_dense(&Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, Error::NotSquare(2, 3)));
        let err = SimilarityMatrix::from_triplets(3, 4, &[]).unwrap_err();
        assert!(matches!(err, Error::NotSquare(3, 4)));
    }

    #[test]
    fn rejects_asymmetric() {
        let err = SimilarityMatrix::from_triplets(2, 2, &[(0, 1, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::Asymmetric { .. }));

        let err = SimilarityMatrix::from_dense(&array![[0.0, 1.0], [0.9, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::Asymmetric { .. }));
    }

    #[test]
    fn tolerates_rounding_asymmetry() {
        let m = SimilarityMatrix::from_dense(&array![[0.0, 0.3], [0.1 + 0.2, 0.0]]).unwrap();
        assert_eq!(m.nnz(), 2);
    }

    #[test]
    fn rejects_negative_and_nan() {
        let err = SimilarityMatrix::from_dense(&array![[0.0, -1.0], [-1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::NegativeEntry { row: 0, col: 1, .. }));

        let err = SimilarityMatrix::from_undirected_edges(2, &[(0, 1, f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::NegativeEntry { .. }));
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = SimilarityMatrix::from_undirected_edges(2, &[(0, 5, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { row: 0, col: 5, n: 2 }));
    }

    #[test]
    fn empty_matrix_is_valid() {
        let m = SimilarityMatrix::from_undirected_edges(0, &[]).unwrap();
        assert_eq!(m.n(), 0);
        assert!(m.degree_vector().is_empty());
    }
}
