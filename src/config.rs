//! Spectral clustering configuration.

use crate::chooser::EigenChooser;
use crate::eigen::{EigenDecomposition, EigenRange, EigenSolver, JacobiSolver, SubspaceSolver};
use crate::laplacian::GraphLaplacian;
use crate::Result;
use ndarray::Array2;

#[cfg(feature = "faer")]
use crate::eigen::FaerSolver;

/// Eigensolver backend.
#[derive(Debug, Clone)]
pub enum Solver {
    /// Full dense decomposition; exact, O(n³).
    Jacobi(JacobiSolver),
    /// Partial decomposition of only the requested pairs.
    Subspace(SubspaceSolver),
    #[cfg(feature = "faer")]
    Faer(FaerSolver),
}

impl Default for Solver {
    fn default() -> Self {
        Solver::Jacobi(JacobiSolver::default())
    }
}

impl EigenSolver for Solver {
    fn solve(&self, matrix: &Array2<f64>, range: EigenRange) -> Result<EigenDecomposition> {
        match self {
            Solver::Jacobi(s) => s.solve(matrix, range),
            Solver::Subspace(s) => s.solve(matrix, range),
            #[cfg(feature = "faer")]
            Solver::Faer(s) => s.solve(matrix, range),
        }
    }
}

/// Everything a spectral clustering run needs besides its input.
///
/// ```rust
/// use speclust::{EigenChooser, GraphLaplacian, Kmeans, SpectralClusteringConfig};
///
/// let config = SpectralClusteringConfig::new(Kmeans::new(3))
///     .with_laplacian(GraphLaplacian::SymmetricNormalised)
///     .with_chooser(EigenChooser::FixedCount { count: 3 });
/// assert_eq!(config.chooser, EigenChooser::FixedCount { count: 3 });
/// ```
#[derive(Debug, Clone)]
pub struct SpectralClusteringConfig<C> {
    /// Clusterer run on the rows of the embedding.
    pub clusterer: C,
    /// Laplacian normalisation; also fixes which end of the spectrum is read.
    pub laplacian: GraphLaplacian,
    /// How many eigenvectors to embed with.
    pub chooser: EigenChooser,
    pub solver: Solver,
}

impl<C> SpectralClusteringConfig<C> {
    /// Symmetric-normalised Laplacian, default relative-gap chooser, Jacobi solver.
    pub fn new(clusterer: C) -> Self {
        Self {
            clusterer,
            laplacian: GraphLaplacian::default(),
            chooser: EigenChooser::default(),
            solver: Solver::default(),
        }
    }

    pub fn with_laplacian(mut self, laplacian: GraphLaplacian) -> Self {
        self.laplacian = laplacian;
        self
    }

    pub fn with_chooser(mut self, chooser: EigenChooser) -> Self {
        self.chooser = chooser;
        self
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }
}
