//! End-to-end spectral clustering of a similarity matrix.

use crate::cache::EigenCache;
use crate::config::SpectralClusteringConfig;
use crate::eigen::EigenDecomposition;
use crate::inner::SpatialClusterer;
use crate::prepared::{PreparedSpectralClustering, SpectralClusters};
use crate::sparse::SimilarityMatrix;
use crate::{Error, Result};
use tracing::info;

/// Similarity matrix → Laplacian → eigenpairs → embedding → clusters.
#[derive(Debug, Clone)]
pub struct SpectralClustering<C> {
    config: SpectralClusteringConfig<C>,
}

impl<C: SpatialClusterer> SpectralClustering<C> {
    pub fn new(config: SpectralClusteringConfig<C>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpectralClusteringConfig<C> {
        &self.config
    }

    /// Laplacian eigenpairs, computing only what the chooser can select.
    pub fn decompose(&self, similarity: &SimilarityMatrix) -> Result<EigenDecomposition> {
        let n = similarity.n();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        self.config.chooser.validate()?;

        let laplacian = self.config.laplacian.laplacian(similarity);
        let range = self.config.chooser.prepare(n, self.config.laplacian.direction());
        info!(n, nnz = similarity.nnz(), laplacian = ?self.config.laplacian, ?range, "decomposing laplacian");
        laplacian.decompose(&self.config.solver, range)
    }

    /// Cluster the items of `similarity`.
    pub fn cluster(&self, similarity: &SimilarityMatrix) -> Result<SpectralClusters> {
        let decomposition = self.decompose(similarity)?;
        self.cluster_decomposition(&decomposition)
    }

    /// Cluster from eigenpairs computed earlier.
    pub fn cluster_decomposition(&self, decomposition: &EigenDecomposition) -> Result<SpectralClusters> {
        let result = PreparedSpectralClustering::new(&self.config).cluster(decomposition)?;
        info!(
            n = decomposition.total(),
            k = result.eigenvalues().len(),
            clusters = result.clusters().n_clusters(),
            "spectral clustering done"
        );
        Ok(result)
    }
}

/// [`SpectralClustering`] that loads eigenpairs from a cache when present and
/// stores freshly computed ones.
///
/// The cache is trusted: a stored decomposition is used as-is, whatever matrix
/// is passed in, as long as it has one row per item.
#[derive(Debug)]
pub struct CachedSpectralClustering<C, S> {
    inner: SpectralClustering<C>,
    cache: S,
}

impl<C: SpatialClusterer, S: EigenCache> CachedSpectralClustering<C, S> {
    pub fn new(config: SpectralClusteringConfig<C>, cache: S) -> Self {
        Self {
            inner: SpectralClustering::new(config),
            cache,
        }
    }

    pub fn cache(&self) -> &S {
        &self.cache
    }

    /// Cached eigenpairs, computing and storing them on a miss.
    pub fn decompose(&self, similarity: &SimilarityMatrix) -> Result<EigenDecomposition> {
        if let Some(decomposition) = self.cache.load()? {
            info!(pairs = decomposition.len(), "eigen cache hit");
            if decomposition.total() != similarity.n() {
                return Err(Error::DimensionMismatch {
                    expected: similarity.n(),
                    found: decomposition.total(),
                });
            }
            return Ok(decomposition);
        }
        info!("eigen cache miss");
        let decomposition = self.inner.decompose(similarity)?;
        self.cache.store(&decomposition)?;
        Ok(decomposition)
    }

    pub fn cluster(&self, similarity: &SimilarityMatrix) -> Result<SpectralClusters> {
        let decomposition = self.decompose(similarity)?;
        self.inner.cluster_decomposition(&decomposition)
    }
}
