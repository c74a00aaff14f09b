//! # speclust
//!
//! Spectral clustering: graph Laplacians, eigenvector selection, row-normalised
//! eigenspace embeddings.
//!
//! ## The Core Idea
//!
//! Cluster structure in a similarity graph shows up in the eigenvectors of its
//! Laplacian. Embed every item with the coordinates those eigenvectors give it,
//! then any ordinary point clusterer can separate the groups.
//!
//! ```text
//! similarity ──► Laplacian ──► eigenpairs ──► chooser (K) ──► n × K embedding
//!                                                                 │
//!                                     clusters ◄── inner clusterer ◄┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SimilarityMatrix`] | Validated sparse symmetric affinities |
//! | [`GraphLaplacian`] | Normalisation scheme, and which end of the spectrum to read |
//! | [`EigenChooser`] | How many eigenvectors to embed with |
//! | [`SpectralClusteringConfig`] | Inner clusterer + Laplacian + chooser + solver |
//! | [`SpectralClustering`] | The end-to-end driver |
//! | [`CachedSpectralClustering`] | Driver that reuses stored eigenpairs |
//! | [`MultiviewSpectralClustering`] | Co-regularised clustering of several views |
//! | [`PreparedSpectralClustering`] | Clustering from eigenpairs computed elsewhere |
//!
//! ## Quick Start
//!
//! ```rust
//! use speclust::{EigenChooser, Kmeans, SimilarityMatrix, SpectralClustering, SpectralClusteringConfig};
//!
//! // Two triangles joined by one weak edge.
//! let edges = [
//!     (0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0),
//!     (3, 4, 1.0), (4, 5, 1.0), (3, 5, 1.0),
//!     (2, 3, 0.05),
//! ];
//! let similarity = SimilarityMatrix::from_undirected_edges(6, &edges).unwrap();
//!
//! let config = SpectralClusteringConfig::new(Kmeans::new(2))
//!     .with_chooser(EigenChooser::FixedCount { count: 2 });
//! let result = SpectralClustering::new(config).cluster(&similarity).unwrap();
//!
//! assert_eq!(result.clusters().n_clusters(), 2);
//! assert_eq!(result.clusters().n_entries(), 6);
//! ```
//!
//! ## The Laplacian Zoo
//!
//! ```text
//! Unnormalised:   L = D - A
//!   - Null space dimension = number of connected components
//!
//! Normalised (symmetric):   L_sym = I - D^{-1/2} A D^{-1/2}
//!   - Eigenvalues in [0, 2]
//!   - Ng, Jordan, Weiss
//!
//! Random walk:   L_rw = I - D^{-1} A
//!   - Same eigenvalues as L_sym, eigenvectors D^{-1/2} u
//!
//! Warped:   W = D^{-1/2} A D^{-1/2}
//!   - Eigenvalues 1 - λ(L_sym); read from the top
//! ```
//!
//! ## What Can Go Wrong
//!
//! 1. **Isolated nodes**: zero degree. The normalised Laplacians give them an
//!    all-zero row, and their embedding row stays zero.
//! 2. **Too few eigenvectors**: a relative-gap chooser with a small
//!    `max_select` cannot express more than `max_select · n` clusters.
//! 3. **Scaling**: the Laplacian is dense. [`SubspaceSolver`] only computes the
//!    pairs the chooser can use, but storage is still O(n²).
//!
//! ## References
//!
//! - Shi & Malik (2000). "Normalized cuts and image segmentation"
//! - Ng, Jordan, Weiss (2001). "On Spectral Clustering"
//! - von Luxburg (2007). "A Tutorial on Spectral Clustering"
//! - Kumar, Rai, Daumé (2011). "Co-regularized Multi-view Spectral Clustering"

use thiserror::Error;

pub mod cache;
pub mod chooser;
pub mod clusters;
pub mod config;
pub mod driver;
pub mod eigen;
pub mod inner;
pub mod laplacian;
pub mod multiview;
pub mod prepared;
pub mod similarity;
pub mod sparse;

pub use cache::{EigenCache, FileEigenCache, MemoryEigenCache};
pub use chooser::EigenChooser;
pub use clusters::IndexedClusters;
pub use config::{Solver, SpectralClusteringConfig};
pub use driver::{CachedSpectralClustering, SpectralClustering};
pub use eigen::{
    Direction, EigenDecomposition, EigenIterator, EigenPair, EigenRange, EigenSolver, JacobiSolver,
    SubspaceSolver,
};
#[cfg(feature = "faer")]
pub use eigen::FaerSolver;
pub use inner::{Dbscan, Kmeans, LeaderAssigner, SpatialClusterer, SpatialModel};
pub use laplacian::{GraphLaplacian, Laplacian};
pub use multiview::{MultiviewSpectralClustering, StoppingCondition};
pub use prepared::{PreparedSpectralClustering, SpectralClusters};
pub use sparse::SimilarityMatrix;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix is not square: {0} x {1}")]
    NotSquare(usize, usize),

    #[error("matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },

    #[error("invalid similarity {value} at ({row}, {col})")]
    NegativeEntry { row: usize, col: usize, value: f64 },

    #[error("index ({row}, {col}) out of bounds for {n} x {n} matrix")]
    IndexOutOfBounds { row: usize, col: usize, n: usize },

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("empty input")]
    EmptyInput,

    #[error("invalid {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("cannot form {requested} clusters from {n_items} items")]
    InvalidClusterCount { requested: usize, n_items: usize },

    #[error("eigensolver did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("no eigenvectors selected")]
    EmptySelection,

    #[error("requested {requested} eigenvectors, only {available} available")]
    TooManyEigenvectors { requested: usize, available: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
