//! Spatial clusterers applied to the spectral embedding.
//!
//! Spectral clustering only produces coordinates; the final partition comes
//! from an ordinary point clusterer run on the rows of the embedding. Any
//! [`SpatialClusterer`] can be plugged into the pipeline.
//!
//! | Clusterer | Needs k | Training labels |
//! |-----------|---------|-----------------|
//! | [`Kmeans`] | yes | yes |
//! | [`Dbscan`] | no | yes |
//! | [`LeaderAssigner`] | no | no (assigns by nearest leader) |

mod dbscan;
mod kmeans;
mod leader;

pub use dbscan::{Dbscan, DbscanModel};
pub use kmeans::{Kmeans, KmeansModel};
pub use leader::{LeaderAssigner, LeaderModel};

use crate::Result;
use ndarray::{ArrayView1, ArrayView2};

/// A point clusterer.
pub trait SpatialClusterer {
    /// Fitted state returned by [`SpatialClusterer::fit`].
    type Model: SpatialModel;

    /// Fit to the rows of `points` (one point per row).
    fn fit(&self, points: ArrayView2<'_, f64>) -> Result<Self::Model>;
}

/// A fitted clusterer.
pub trait SpatialModel {
    /// Labels of the points the model was fitted on, when the algorithm
    /// produces them as a by-product.
    fn training_assignments(&self) -> Option<&[usize]>;

    /// Hard-assign a point to a cluster.
    fn assign(&self, point: ArrayView1<'_, f64>) -> usize;
}

pub(crate) fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of the row of `centres` nearest to `point`, with its squared distance.
pub(crate) fn nearest(centres: ArrayView2<'_, f64>, point: ArrayView1<'_, f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centre) in centres.rows().into_iter().enumerate() {
        let d = squared_distance(point, centre);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}
