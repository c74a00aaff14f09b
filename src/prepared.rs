//! Clustering from a precomputed eigen-decomposition.
//!
//! 1. Choose K eigenvectors in the Laplacian's direction.
//! 2. Stack them as the columns of an n × K matrix U.
//! 3. Normalise the rows of U to unit length.
//! 4. Cluster the rows of U with the inner clusterer.

use crate::clusters::IndexedClusters;
use crate::config::SpectralClusteringConfig;
use crate::eigen::{EigenDecomposition, EigenPair};
use crate::inner::{SpatialClusterer, SpatialModel};
use crate::{Error, Result};
use ndarray::Array2;
use tracing::{debug, warn};

/// Cluster assignments plus the eigenpairs that produced them.
#[derive(Debug, Clone)]
pub struct SpectralClusters {
    clusters: IndexedClusters,
    eigenvalues: Vec<f64>,
    eigenvectors: Array2<f64>,
}

impl SpectralClusters {
    pub fn clusters(&self) -> &IndexedClusters {
        &self.clusters
    }

    /// Selected eigenvalues, most informative first.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Selected eigenvectors as columns, in the order of [`SpectralClusters::eigenvalues`].
    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    pub fn into_clusters(self) -> IndexedClusters {
        self.clusters
    }
}

/// Row-normalised embedding from the first `k` pairs.
///
/// Rows that receive no mass from any selected eigenvector stay zero.
pub fn embedding<'a, I>(pairs: I, n: usize, k: usize) -> Array2<f64>
where
    I: IntoIterator<Item = EigenPair<'a>>,
{
    let mut u = Array2::<f64>::zeros((n, k));
    let mut row_sq = vec![0.0f64; n];

    for (col, pair) in pairs.into_iter().take(k).enumerate() {
        for (row, &x) in pair.vector.iter().enumerate() {
            if x != 0.0 {
                u[[row, col]] = x;
                row_sq[row] += x * x;
            }
        }
    }

    let mut empty = 0;
    for (mut row, &sq) in u.rows_mut().into_iter().zip(&row_sq) {
        if sq > 0.0 {
            let norm = sq.sqrt();
            row.mapv_inplace(|x| x / norm);
        } else {
            empty += 1;
        }
    }
    if empty > 0 {
        warn!(empty, n, k, "embedding rows with zero mass left unnormalised");
    }
    u
}

/// Spectral clustering given eigenpairs computed elsewhere.
#[derive(Debug)]
pub struct PreparedSpectralClustering<'a, C> {
    config: &'a SpectralClusteringConfig<C>,
}

impl<'a, C: SpatialClusterer> PreparedSpectralClustering<'a, C> {
    pub fn new(config: &'a SpectralClusteringConfig<C>) -> Self {
        Self { config }
    }

    /// Cluster the items behind `decomposition`.
    pub fn cluster(&self, decomposition: &EigenDecomposition) -> Result<SpectralClusters> {
        let laplacian = self.config.laplacian;
        let n = decomposition.total();

        let k = self
            .config
            .chooser
            .select_count(laplacian.eigen_iterator(decomposition), n)?;
        if k == 0 {
            return Err(Error::EmptySelection);
        }

        let u = embedding(laplacian.eigen_iterator(decomposition), n, k);
        debug!(n, k, "embedding built");

        let model = self.config.clusterer.fit(u.view())?;
        let labels = match model.training_assignments() {
            Some(labels) => labels.to_vec(),
            None => u.rows().into_iter().map(|row| model.assign(row)).collect(),
        };
        if labels.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: labels.len(),
            });
        }

        let mut eigenvalues = Vec::with_capacity(k);
        let mut eigenvectors = Array2::<f64>::zeros((n, k));
        for (col, pair) in laplacian.eigen_iterator(decomposition).take(k).enumerate() {
            eigenvalues.push(pair.value);
            eigenvectors.column_mut(col).assign(&pair.vector);
        }

        Ok(SpectralClusters {
            clusters: IndexedClusters::from_assignments(&labels),
            eigenvalues,
            eigenvectors,
        })
    }
}
