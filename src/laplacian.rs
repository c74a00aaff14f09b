//! Graph Laplacians.
//!
//! ```text
//! Unnormalised:          L     = D - A
//! Symmetric normalised:  L_sym = D^{-1/2} (D - A) D^{-1/2} = I - D^{-1/2} A D^{-1/2}
//! Random walk:           L_rw  = D^{-1} (D - A)            = I - D^{-1} A
//! Warped:                W     = D^{-1/2} A D^{-1/2}
//! ```
//!
//! `D^{-1/2}` and `D^{-1}` treat a zero degree as zero, so an isolated node gives
//! an all-zero row and column rather than NaN.
//!
//! The three Laplacians carry cluster structure in their **smallest**
//! eigenvalues; the warped (normalised adjacency) matrix carries it in its
//! **largest**. [`GraphLaplacian::direction`] reports which end to read.

use crate::eigen::{Direction, EigenDecomposition, EigenIterator, EigenRange, EigenSolver};
use crate::sparse::SimilarityMatrix;
use crate::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Normalisation scheme used to turn a similarity matrix into a Laplacian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GraphLaplacian {
    /// `L = D - A`
    Unnormalised,
    /// `L = I - D^{-1/2} A D^{-1/2}` (Ng, Jordan, Weiss)
    #[default]
    SymmetricNormalised,
    /// `L = I - D^{-1} A` (Shi, Malik)
    RandomWalk,
    /// `W = D^{-1/2} A D^{-1/2}`, read from the top of the spectrum.
    Warped,
}

/// A Laplacian matrix together with the degrees it was built from.
#[derive(Debug, Clone)]
pub struct Laplacian {
    kind: GraphLaplacian,
    matrix: Array2<f64>,
    degrees: Array1<f64>,
    /// Symmetric operator sharing the spectrum, when `matrix` is not symmetric.
    symmetric: Option<Array2<f64>>,
}

fn inv_sqrt(d: f64) -> f64 {
    if d > 0.0 {
        1.0 / d.sqrt()
    } else {
        0.0
    }
}

fn inv(d: f64) -> f64 {
    if d > 0.0 {
        1.0 / d
    } else {
        0.0
    }
}

impl GraphLaplacian {
    /// Build the Laplacian of a validated similarity matrix.
    pub fn laplacian(&self, adj: &SimilarityMatrix) -> Laplacian {
        let n = adj.n();
        let degrees = Array1::from(adj.degree_vector());
        let d_inv_sqrt = degrees.mapv(inv_sqrt);

        let symmetric_normalised = || {
            let mut l = Array2::<f64>::zeros((n, n));
            for i in 0..n {
                l[[i, i]] = d_inv_sqrt[i] * degrees[i] * d_inv_sqrt[i];
                for (j, w) in adj.row(i) {
                    l[[i, j]] -= d_inv_sqrt[i] * w * d_inv_sqrt[j];
                }
            }
            l
        };

        let (matrix, symmetric) = match self {
            GraphLaplacian::Unnormalised => {
                let mut l = Array2::<f64>::zeros((n, n));
                for i in 0..n {
                    l[[i, i]] = degrees[i];
                    for (j, w) in adj.row(i) {
                        l[[i, j]] -= w;
                    }
                }
                (l, None)
            }
            GraphLaplacian::SymmetricNormalised => (symmetric_normalised(), None),
            GraphLaplacian::RandomWalk => {
                let mut l = Array2::<f64>::zeros((n, n));
                for i in 0..n {
                    let d_inv = inv(degrees[i]);
                    l[[i, i]] = d_inv * degrees[i];
                    for (j, w) in adj.row(i) {
                        l[[i, j]] -= d_inv * w;
                    }
                }
                (l, Some(symmetric_normalised()))
            }
            GraphLaplacian::Warped => {
                let mut w_norm = Array2::<f64>::zeros((n, n));
                for i in 0..n {
                    for (j, w) in adj.row(i) {
                        w_norm[[i, j]] = d_inv_sqrt[i] * w * d_inv_sqrt[j];
                    }
                }
                (w_norm, None)
            }
        };

        Laplacian {
            kind: *self,
            matrix,
            degrees,
            symmetric,
        }
    }

    /// Validate a dense adjacency matrix and build its Laplacian.
    ///
    /// Fails if `adj` is not square, not symmetric, or has negative entries.
    pub fn laplacian_from_dense(&self, adj: &Array2<f64>) -> Result<Laplacian> {
        Ok(self.laplacian(&SimilarityMatrix::from_dense(adj)?))
    }

    /// End of the spectrum holding the informative eigenvectors.
    pub fn direction(&self) -> Direction {
        match self {
            GraphLaplacian::Warped => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    /// Eigenpairs of `decomposition`, most informative first.
    pub fn eigen_iterator<'a>(&self, decomposition: &'a EigenDecomposition) -> EigenIterator<'a> {
        decomposition.iter(self.direction())
    }
}

impl Laplacian {
    pub fn kind(&self) -> GraphLaplacian {
        self.kind
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Diagonal of the degree matrix.
    pub fn degrees(&self) -> &Array1<f64> {
        &self.degrees
    }

    pub fn n(&self) -> usize {
        self.matrix.nrows()
    }

    /// Symmetric matrix whose eigenvalues equal this Laplacian's.
    ///
    /// For the random-walk Laplacian this is `L_sym`; eigenvectors of it must be
    /// passed through [`Laplacian::lift`].
    pub fn symmetric_operator(&self) -> &Array2<f64> {
        self.symmetric.as_ref().unwrap_or(&self.matrix)
    }

    /// Map eigenvectors of [`Laplacian::symmetric_operator`] to eigenvectors of
    /// [`Laplacian::matrix`].
    ///
    /// Only the random-walk Laplacian needs this: `v = D^{-1/2} u`, rescaled to
    /// unit length. Isolated nodes keep their component unchanged.
    pub fn lift(&self, mut decomposition: EigenDecomposition) -> EigenDecomposition {
        if self.symmetric.is_none() {
            return decomposition;
        }
        let scale = self
            .degrees
            .mapv(|d| if d > 0.0 { 1.0 / d.sqrt() } else { 1.0 });
        for mut col in decomposition.vectors_mut().columns_mut() {
            col *= &scale;
            let norm = col.dot(&col).sqrt();
            if norm > 0.0 {
                col.mapv_inplace(|x| x / norm);
            }
        }
        decomposition
    }

    /// Eigen-decompose this Laplacian, keeping `range`.
    pub fn decompose(&self, solver: &dyn EigenSolver, range: EigenRange) -> Result<EigenDecomposition> {
        let decomposition = solver.solve(self.symmetric_operator(), range)?;
        Ok(self.lift(decomposition))
    }
}
