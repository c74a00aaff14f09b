//! Eigen-decomposition of symmetric operators.
//!
//! Solvers return an [`EigenDecomposition`]: eigenvalues in ascending order with
//! matching eigenvector columns. Spectral clustering rarely needs the whole
//! spectrum, so every solver accepts an [`EigenRange`] and keeps only the
//! requested end.
//!
//! | Solver | Method | Cost |
//! |--------|--------|------|
//! | [`JacobiSolver`] | cyclic Jacobi rotations | O(n³), exact, deterministic |
//! | [`SubspaceSolver`] | orthogonal iteration + Rayleigh–Ritz | O(n² m) per step |
//! | `FaerSolver` (feature `faer`) | dense self-adjoint EVD | O(n³) |

use crate::{Error, Result};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "faer")]
use faer::{Mat, Side};

/// Which end of the spectrum carries the informative eigenvectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending eigenvalue order (smallest first).
    Forward,
    /// Descending eigenvalue order (largest first).
    Backward,
}

/// How much of the spectrum a solver should compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenRange {
    /// Every eigenpair.
    All,
    /// The `m` smallest eigenvalues.
    Lowest(usize),
    /// The `m` largest eigenvalues.
    Greatest(usize),
}

impl EigenRange {
    /// Range covering `m` pairs at the informative end for `direction`.
    pub fn toward(direction: Direction, m: usize) -> Self {
        match direction {
            Direction::Forward => EigenRange::Lowest(m),
            Direction::Backward => EigenRange::Greatest(m),
        }
    }

    /// Number of pairs this range yields for an `n × n` operator.
    pub fn count(&self, n: usize) -> usize {
        match *self {
            EigenRange::All => n,
            EigenRange::Lowest(m) | EigenRange::Greatest(m) => m.min(n),
        }
    }
}

/// Eigenvalues (ascending) and their eigenvectors (as columns).
///
/// `total` is the dimension of the decomposed operator, which may exceed the
/// number of pairs actually computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDecomposition")]
pub struct EigenDecomposition {
    values: Vec<f64>,
    vectors: Array2<f64>,
    total: usize,
}

/// Serialized form, checked by [`EigenDecomposition::new`] before use.
#[derive(Deserialize)]
struct RawDecomposition {
    values: Vec<f64>,
    vectors: Array2<f64>,
    total: usize,
}

impl TryFrom<RawDecomposition> for EigenDecomposition {
    type Error = Error;

    fn try_from(raw: RawDecomposition) -> Result<Self> {
        EigenDecomposition::new(raw.values, raw.vectors, raw.total)
    }
}

/// One eigenvalue with a borrowed view of its eigenvector.
#[derive(Debug, Clone)]
pub struct EigenPair<'a> {
    pub value: f64,
    pub vector: ArrayView1<'a, f64>,
}

impl EigenDecomposition {
    /// Wrap precomputed pairs. Values must be ascending and match the vector columns.
    pub fn new(values: Vec<f64>, vectors: Array2<f64>, total: usize) -> Result<Self> {
        if vectors.ncols() != values.len() {
            return Err(Error::DimensionMismatch {
                expected: values.len(),
                found: vectors.ncols(),
            });
        }
        if vectors.nrows() != total {
            return Err(Error::DimensionMismatch {
                expected: total,
                found: vectors.nrows(),
            });
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidParameter {
                name: "values",
                message: "eigenvalues must be in ascending order".into(),
            });
        }
        Ok(Self {
            values,
            vectors,
            total,
        })
    }

    /// Sort raw solver output ascending and keep the slice selected by `range`.
    pub(crate) fn from_unsorted(
        values: Vec<f64>,
        vectors: &Array2<f64>,
        range: EigenRange,
    ) -> Self {
        let n = vectors.nrows();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

        let m = range.count(order.len());
        let kept = match range {
            EigenRange::Greatest(_) => &order[order.len() - m..],
            EigenRange::All | EigenRange::Lowest(_) => &order[..m],
        };

        let mut out = Array2::<f64>::zeros((n, m));
        for (col, &idx) in kept.iter().enumerate() {
            out.column_mut(col).assign(&vectors.column(idx));
        }
        Self {
            values: kept.iter().map(|&i| values[i]).collect(),
            vectors: out,
            total: n,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    /// Dimension of the decomposed operator.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of computed pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Walk the pairs in `direction`.
    pub fn iter(&self, direction: Direction) -> EigenIterator<'_> {
        EigenIterator {
            decomposition: self,
            direction,
            taken: 0,
        }
    }

    /// The first `k` pairs in `direction`, as a new decomposition (ascending again).
    pub fn leading(&self, direction: Direction, k: usize) -> Self {
        let k = k.min(self.len());
        let range = match direction {
            Direction::Forward => 0..k,
            Direction::Backward => self.len() - k..self.len(),
        };
        Self {
            values: self.values[range.clone()].to_vec(),
            vectors: self.vectors.slice(s![.., range]).to_owned(),
            total: self.total,
        }
    }

    pub(crate) fn vectors_mut(&mut self) -> &mut Array2<f64> {
        &mut self.vectors
    }
}

/// Single-pass iterator over eigenpairs in a fixed direction.
#[derive(Debug, Clone)]
pub struct EigenIterator<'a> {
    decomposition: &'a EigenDecomposition,
    direction: Direction,
    taken: usize,
}

impl EigenIterator<'_> {
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<'a> Iterator for EigenIterator<'a> {
    type Item = EigenPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.decomposition.len();
        if self.taken >= len {
            return None;
        }
        let idx = match self.direction {
            Direction::Forward => self.taken,
            Direction::Backward => len - 1 - self.taken,
        };
        self.taken += 1;
        Some(EigenPair {
            value: self.decomposition.values[idx],
            vector: self.decomposition.vectors.column(idx),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.decomposition.len() - self.taken;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for EigenIterator<'_> {}

/// A symmetric eigensolver.
pub trait EigenSolver {
    /// Decompose the symmetric `matrix`, keeping only `range`.
    fn solve(&self, matrix: &Array2<f64>, range: EigenRange) -> Result<EigenDecomposition>;
}

fn ensure_square(a: &Array2<f64>) -> Result<usize> {
    let (n, m) = a.dim();
    if n != m {
        return Err(Error::NotSquare(n, m));
    }
    Ok(n)
}

/// Cyclic Jacobi eigensolver for dense symmetric matrices.
///
/// Deterministic and stable for small and medium `n`; always computes the full
/// spectrum and then discards what `range` excludes.
#[derive(Debug, Clone)]
pub struct JacobiSolver {
    /// Stop once the largest off-diagonal magnitude is at most this.
    pub tolerance: f64,
    /// Maximum number of full sweeps over the upper triangle.
    pub max_sweeps: usize,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_sweeps: 100,
        }
    }
}

impl JacobiSolver {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Full decomposition: `(eigenvalues, eigenvectors as columns)`, unsorted.
    pub(crate) fn eigh(&self, a: &Array2<f64>) -> Result<(Vec<f64>, Array2<f64>)> {
        let n = ensure_square(a)?;
        let mut d = a.to_owned();
        let mut v = Array2::<f64>::eye(n);

        let off_diagonal_max = |d: &Array2<f64>| {
            let mut max = 0.0f64;
            for i in 0..n {
                for j in (i + 1)..n {
                    max = max.max(d[[i, j]].abs());
                }
            }
            max
        };

        let mut sweeps = 0;
        while off_diagonal_max(&d) > self.tolerance {
            if sweeps == self.max_sweeps {
                return Err(Error::NotConverged { iterations: sweeps });
            }
            sweeps += 1;

            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = d[[p, q]];
                    if apq == 0.0 {
                        continue;
                    }
                    let app = d[[p, p]];
                    let aqq = d[[q, q]];

                    let tau = (aqq - app) / (2.0 * apq);
                    let t = if tau >= 0.0 {
                        1.0 / (tau + (1.0 + tau * tau).sqrt())
                    } else {
                        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                    };
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = t * c;

                    for i in 0..n {
                        if i != p && i != q {
                            let dip = d[[i, p]];
                            let diq = d[[i, q]];
                            d[[i, p]] = c * dip - s * diq;
                            d[[p, i]] = d[[i, p]];
                            d[[i, q]] = s * dip + c * diq;
                            d[[q, i]] = d[[i, q]];
                        }
                    }

                    d[[p, p]] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
                    d[[q, q]] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
                    d[[p, q]] = 0.0;
                    d[[q, p]] = 0.0;

                    for i in 0..n {
                        let vip = v[[i, p]];
                        let viq = v[[i, q]];
                        v[[i, p]] = c * vip - s * viq;
                        v[[i, q]] = s * vip + c * viq;
                    }
                }
            }
        }
        debug!(n, sweeps, "jacobi converged");

        Ok(((0..n).map(|i| d[[i, i]]).collect(), v))
    }
}

impl EigenSolver for JacobiSolver {
    fn solve(&self, matrix: &Array2<f64>, range: EigenRange) -> Result<EigenDecomposition> {
        let (values, vectors) = self.eigh(matrix)?;
        Ok(EigenDecomposition::from_unsorted(values, &vectors, range))
    }
}

/// Partial eigensolver: orthogonal (subspace) iteration with Rayleigh–Ritz.
///
/// Only the `m` requested pairs (plus a small oversampling block) are iterated,
/// so the cost per step is O(n² m) rather than the O(n³) of a full solve.
/// [`EigenRange::All`] falls back to [`JacobiSolver`].
#[derive(Debug, Clone)]
pub struct SubspaceSolver {
    /// Maximum number of power steps.
    pub max_iters: usize,
    /// Residual bound `‖A v − λ v‖` for every returned pair, relative to the
    /// operator's Gershgorin radius (never below 1).
    pub tolerance: f64,
    /// Extra columns iterated alongside the requested ones.
    pub oversample: usize,
    /// Solver for the small projected problem.
    pub inner: JacobiSolver,
}

impl Default for SubspaceSolver {
    fn default() -> Self {
        Self {
            max_iters: 1_000,
            tolerance: 1e-8,
            oversample: 2,
            inner: JacobiSolver::default(),
        }
    }
}

impl SubspaceSolver {
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Gershgorin interval `[lo, hi]` containing every eigenvalue.
fn gershgorin_bounds(a: &Array2<f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (i, row) in a.axis_iter(Axis(0)).enumerate() {
        let radius: f64 = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, x)| x.abs())
            .sum();
        lo = lo.min(row[i] - radius);
        hi = hi.max(row[i] + radius);
    }
    (lo, hi)
}

/// Modified Gram–Schmidt on the columns.
fn orthonormalize(mut x: Array2<f64>) -> Array2<f64> {
    let r = x.ncols();
    for j in 0..r {
        for i in 0..j {
            let dot = x.column(i).dot(&x.column(j));
            let col_i = x.column(i).to_owned();
            x.column_mut(j).scaled_add(-dot, &col_i);
        }
        let norm = x.column(j).dot(&x.column(j)).sqrt();
        if norm > 0.0 {
            x.column_mut(j).mapv_inplace(|v| v / norm);
        }
    }
    x
}

impl EigenSolver for SubspaceSolver {
    fn solve(&self, matrix: &Array2<f64>, range: EigenRange) -> Result<EigenDecomposition> {
        let n = ensure_square(matrix)?;
        let m = range.count(n);
        let block = (m + self.oversample).min(n);
        if matches!(range, EigenRange::All) || block >= n {
            return self.inner.solve(matrix, range);
        }
        if m == 0 {
            return Ok(EigenDecomposition::from_unsorted(
                Vec::new(),
                &Array2::zeros((n, 0)),
                range,
            ));
        }

        // Shift so the wanted end becomes the dominant (largest, non-negative) end.
        let (lo, hi) = gershgorin_bounds(matrix);
        // Residual rounding grows with the operator's magnitude.
        let tolerance = self.tolerance * lo.abs().max(hi.abs()).max(1.0);
        let shifted = match range {
            EigenRange::Greatest(_) => matrix - &(Array2::<f64>::eye(n) * lo),
            _ => Array2::<f64>::eye(n) * hi - matrix,
        };

        let mut q = Array2::<f64>::zeros((n, block));
        for i in 0..n {
            for j in 0..block {
                // Deterministic pseudo-random start.
                q[[i, j]] = ((((i + 1) * 1315423911usize) ^ ((j + 1) * 2654435761usize)) % 10_000)
                    as f64
                    / 10_000.0
                    - 0.5;
            }
        }
        q = orthonormalize(q);

        for iter in 1..=self.max_iters {
            q = orthonormalize(shifted.dot(&q));

            // Rayleigh–Ritz on the unshifted operator.
            let projected = q.t().dot(&matrix.dot(&q));
            let projected = (&projected + &projected.t()) * 0.5;
            let (theta, y) = self.inner.eigh(&projected)?;
            let ritz = q.dot(&y);

            let mut order: Vec<usize> = (0..block).collect();
            order.sort_by(|&i, &j| theta[i].total_cmp(&theta[j]));
            let wanted: Vec<usize> = match range {
                EigenRange::Greatest(_) => order[block - m..].to_vec(),
                _ => order[..m].to_vec(),
            };

            let residual = wanted
                .iter()
                .map(|&c| {
                    let v = ritz.column(c);
                    let r: Array1<f64> = matrix.dot(&v) - &v * theta[c];
                    r.dot(&r).sqrt()
                })
                .fold(0.0f64, f64::max);

            if residual <= tolerance {
                debug!(n, m, iter, residual, "subspace iteration converged");
                let values = wanted.iter().map(|&c| theta[c]).collect();
                let mut vectors = Array2::<f64>::zeros((n, m));
                for (col, &c) in wanted.iter().enumerate() {
                    vectors.column_mut(col).assign(&ritz.column(c));
                }
                return Ok(EigenDecomposition::from_unsorted(values, &vectors, EigenRange::All));
            }
            q = ritz;
        }

        Err(Error::NotConverged {
            iterations: self.max_iters,
        })
    }
}

/// Dense self-adjoint eigendecomposition via `faer`.
#[cfg(feature = "faer")]
#[derive(Debug, Clone, Default)]
pub struct FaerSolver;

#[cfg(feature = "faer")]
impl EigenSolver for FaerSolver {
    fn solve(&self, matrix: &Array2<f64>, range: EigenRange) -> Result<EigenDecomposition> {
        let n = ensure_square(matrix)?;

        let mut m = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                m[(i, j)] = matrix[[i, j]];
            }
        }

        let evd = m
            .self_adjoint_eigen(Side::Lower)
            .map_err(|e| Error::Backend(format!("faer self_adjoint_eigen: {e:?}")))?;
        let u = evd.U();

        let mut vectors = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                vectors[[i, j]] = u[(i, j)];
            }
        }
        // Rayleigh quotients of the unit eigenvectors.
        let values: Vec<f64> = vectors
            .columns()
            .into_iter()
            .map(|v| v.dot(&matrix.dot(&v)))
            .collect();
        Ok(EigenDecomposition::from_unsorted(values, &vectors, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn path_laplacian(n: usize) -> Array2<f64> {
        let mut l = Array2::<f64>::zeros((n, n));
        for i in 0..n - 1 {
            l[[i, i + 1]] = -1.0;
            l[[i + 1, i]] = -1.0;
            l[[i, i]] += 1.0;
            l[[i + 1, i + 1]] += 1.0;
        }
        l
    }

    fn assert_eigenpairs(a: &Array2<f64>, dec: &EigenDecomposition, tol: f64) {
        for pair in dec.iter(Direction::Forward) {
            let av = a.dot(&pair.vector);
            for i in 0..a.nrows() {
                assert!(
                    (av[i] - pair.value * pair.vector[i]).abs() < tol,
                    "not an eigenpair for value {}",
                    pair.value
                );
            }
        }
    }

    #[test]
    fn jacobi_diagonal_matrix() {
        let a = array![[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let dec = JacobiSolver::default().solve(&a, EigenRange::All).unwrap();
        assert_eq!(dec.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(dec.total(), 3);
    }

    #[test]
    fn jacobi_recovers_eigenpairs() {
        let a = path_laplacian(6);
        let dec = JacobiSolver::default().solve(&a, EigenRange::All).unwrap();
        assert_eq!(dec.len(), 6);
        assert!(dec.values()[0].abs() < 1e-9);
        assert_eigenpairs(&a, &dec, 1e-8);
    }

    #[test]
    fn jacobi_reports_non_convergence() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        let err = JacobiSolver::default()
            .with_max_sweeps(0)
            .solve(&a, EigenRange::All)
            .unwrap_err();
        assert!(matches!(err, Error::NotConverged { iterations: 0 }));
    }

    #[test]
    fn range_keeps_requested_end() {
        let a = path_laplacian(5);
        let all = JacobiSolver::default().solve(&a, EigenRange::All).unwrap();
        let low = JacobiSolver::default().solve(&a, EigenRange::Lowest(2)).unwrap();
        let high = JacobiSolver::default().solve(&a, EigenRange::Greatest(2)).unwrap();

        assert_eq!(low.len(), 2);
        assert_eq!(high.len(), 2);
        assert_eq!(low.total(), 5);
        assert_eq!(low.values(), &all.values()[..2]);
        assert_eq!(high.values(), &all.values()[3..]);
    }

    #[test]
    fn range_larger_than_matrix_is_clamped() {
        let a = path_laplacian(3);
        let dec = JacobiSolver::default().solve(&a, EigenRange::Lowest(10)).unwrap();
        assert_eq!(dec.len(), 3);
    }

    #[test]
    fn iterator_directions() {
        let dec = EigenDecomposition::new(vec![0.0, 1.0, 2.0], Array2::eye(3), 3).unwrap();

        let fwd: Vec<f64> = dec.iter(Direction::Forward).map(|p| p.value).collect();
        let bwd: Vec<f64> = dec.iter(Direction::Backward).map(|p| p.value).collect();
        assert_eq!(fwd, vec![0.0, 1.0, 2.0]);
        assert_eq!(bwd, vec![2.0, 1.0, 0.0]);

        let mut it = dec.iter(Direction::Backward);
        assert_eq!(it.len(), 3);
        let first = it.next().unwrap();
        assert_eq!(first.vector[2], 1.0);
        assert_eq!(it.len(), 2);
        it.next();
        it.next();
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn leading_takes_informative_end() {
        let dec = EigenDecomposition::new(vec![0.0, 1.0, 2.0], Array2::eye(3), 3).unwrap();
        let back = dec.leading(Direction::Backward, 2);
        assert_eq!(back.values(), &[1.0, 2.0]);
        assert_eq!(back.vectors().column(1)[2], 1.0);
        let fwd = dec.leading(Direction::Forward, 1);
        assert_eq!(fwd.values(), &[0.0]);
    }

    #[test]
    fn new_validates_shapes_and_order() {
        assert!(EigenDecomposition::new(vec![0.0], Array2::zeros((3, 2)), 3).is_err());
        assert!(EigenDecomposition::new(vec![0.0, 1.0], Array2::zeros((2, 2)), 3).is_err());
        assert!(EigenDecomposition::new(vec![1.0, 0.0], Array2::zeros((2, 2)), 2).is_err());
    }

    #[test]
    fn subspace_matches_jacobi_at_both_ends() {
        let a = path_laplacian(20);
        let exact = JacobiSolver::default().solve(&a, EigenRange::All).unwrap();
        let solver = SubspaceSolver::default();

        let low = solver.solve(&a, EigenRange::Lowest(3)).unwrap();
        assert_eq!(low.len(), 3);
        for (got, want) in low.values().iter().zip(&exact.values()[..3]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
        assert_eigenpairs(&a, &low, 1e-6);

        let high = solver.solve(&a, EigenRange::Greatest(2)).unwrap();
        for (got, want) in high.values().iter().zip(&exact.values()[18..]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn subspace_reports_non_convergence() {
        let a = path_laplacian(30);
        let err = SubspaceSolver::default()
            .with_max_iters(1)
            .with_tolerance(1e-14)
            .solve(&a, EigenRange::Lowest(2))
            .unwrap_err();
        assert!(matches!(err, Error::NotConverged { iterations: 1 }));
    }

    #[test]
    fn subspace_converges_on_large_weights() {
        let n = 20;
        for scale in [1.0, 1e4, 1e8, 1e12] {
            let a = path_laplacian(n) * scale;
            let dec = SubspaceSolver::default()
                .solve(&a, EigenRange::Lowest(2))
                .unwrap();
            // Path eigenvalues: 2 - 2cos(kπ/n).
            for (k, got) in dec.values().iter().enumerate() {
                let want = scale * (2.0 - 2.0 * (k as f64 * std::f64::consts::PI / n as f64).cos());
                assert!((got - want).abs() <= 1e-6 * scale, "scale {scale}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn inconsistent_serialized_decomposition_is_rejected() {
        let dec = EigenDecomposition::new(vec![0.0, 1.0], Array2::eye(2), 2).unwrap();
        let mut bytes = bincode::serialize(&dec).unwrap();
        // `total` is the trailing u64.
        let at = bytes.len() - 8;
        bytes[at..].copy_from_slice(&3u64.to_le_bytes());
        assert!(bincode::deserialize::<EigenDecomposition>(&bytes).is_err());

        let mut bytes = bincode::serialize(&dec).unwrap();
        // First eigenvalue follows the u64 length prefix; make the values descending.
        bytes[8..16].copy_from_slice(&5.0f64.to_le_bytes());
        assert!(bincode::deserialize::<EigenDecomposition>(&bytes).is_err());
    }

    #[test]
    fn decomposition_is_serializable() {
        let dec = JacobiSolver::default()
            .solve(&path_laplacian(4), EigenRange::Lowest(2))
            .unwrap();
        let bytes = bincode::serialize(&dec).unwrap();
        let back: EigenDecomposition = bincode::deserialize(&bytes).unwrap();
        assert_eq!(dec, back);
    }
}
