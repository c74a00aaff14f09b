//! Similarity graphs from feature vectors.
//!
//! Points are the rows of an `n × d` matrix. Every builder returns a validated
//! [`SimilarityMatrix`] with an empty diagonal.

use crate::inner::squared_distance;
use crate::sparse::SimilarityMatrix;
use crate::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// Euclidean distance between every pair of rows.
pub fn pairwise_distances(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = points.nrows();
    let mut out = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = squared_distance(points.row(i), points.row(j)).sqrt();
            out[[i, j]] = d;
            out[[j, i]] = d;
        }
    }
    out
}

/// Fully connected graph with `A[i,j] = exp(-||x_i - x_j||² / (2σ²))`.
pub fn gaussian_similarity(points: ArrayView2<'_, f64>, sigma: f64) -> Result<SimilarityMatrix> {
    if !(sigma > 0.0 && sigma.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "sigma",
            message: format!("must be positive, got {sigma}"),
        });
    }
    let n = points.nrows();
    let sigma_sq_2 = 2.0 * sigma * sigma;

    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let sim = (-squared_distance(points.row(i), points.row(j)) / sigma_sq_2).exp();
            edges.push((i, j, sim));
        }
    }
    SimilarityMatrix::from_undirected_edges(n, &edges)
}

/// Unweighted k-nearest-neighbour graph, symmetrised: `i ~ j` if either is
/// among the other's `k` nearest.
///
/// Ties at the k-th distance are broken by index.
pub fn knn_graph(points: ArrayView2<'_, f64>, k: usize) -> Result<SimilarityMatrix> {
    let n = points.nrows();
    if k == 0 || k >= n.max(1) {
        return Err(Error::InvalidParameter {
            name: "k",
            message: format!("need 0 < k < n, got k={k} for n={n}"),
        });
    }
    let distances = pairwise_distances(points);

    let mut edges = Vec::with_capacity(n * k);
    for i in 0..n {
        let mut dists: Vec<(usize, f64)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, distances[[i, j]]))
            .collect();
        dists.sort_by(|a, b| a.1.total_cmp(&b.1));
        edges.extend(dists.iter().take(k).map(|&(j, _)| (i, j, 1.0)));
    }
    SimilarityMatrix::from_undirected_edges(n, &edges)
}

/// Unweighted epsilon-neighbourhood graph: `i ~ j` if `||x_i - x_j|| < epsilon`.
pub fn epsilon_graph(points: ArrayView2<'_, f64>, epsilon: f64) -> Result<SimilarityMatrix> {
    if !(epsilon > 0.0) {
        return Err(Error::InvalidParameter {
            name: "epsilon",
            message: format!("must be positive, got {epsilon}"),
        });
    }
    let n = points.nrows();
    let eps_sq = epsilon * epsilon;

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if squared_distance(points.row(i), points.row(j)) < eps_sq {
                edges.push((i, j, 1.0));
            }
        }
    }
    SimilarityMatrix::from_undirected_edges(n, &edges)
}
