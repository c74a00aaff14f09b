//! K-means on embedding rows.
//!
//! Lloyd iterations from k-means++ seeds. Several seeded restarts are run and
//! the one with the lowest within-cluster sum of squares wins, which matters on
//! the tiny, highly degenerate point sets spectral embeddings often produce.

use super::{nearest, SpatialClusterer, SpatialModel};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    restarts: usize,
    seed: u64,
}

/// Fitted k-means: centroids and the labels of the training rows.
#[derive(Debug, Clone)]
pub struct KmeansModel {
    centroids: Array2<f64>,
    labels: Vec<usize>,
    wcss: f64,
}

impl KmeansModel {
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Within-cluster sum of squares of the training rows.
    pub fn wcss(&self) -> f64 {
        self.wcss
    }
}

impl Kmeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-8,
            restarts: 4,
            seed: 42,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn init_centroids(&self, data: ArrayView2<'_, f64>, rng: &mut StdRng) -> Array2<f64> {
        let n = data.nrows();
        let mut centroids = Array2::zeros((self.k, data.ncols()));

        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        for i in 1..self.k {
            let chosen = centroids.slice(ndarray::s![..i, ..]);
            let distances: Vec<f64> = data.rows().into_iter().map(|p| nearest(chosen, p).1).collect();

            let total: f64 = distances.iter().sum();
            if total == 0.0 {
                let idx = rng.random_range(0..n);
                centroids.row_mut(i).assign(&data.row(idx));
                continue;
            }

            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (j, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold && d > 0.0 {
                    selected = j;
                    break;
                }
            }
            centroids.row_mut(i).assign(&data.row(selected));
        }

        centroids
    }

    fn run(&self, data: ArrayView2<'_, f64>, seed: u64) -> KmeansModel {
        let (n, d) = data.dim();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = self.init_centroids(data, &mut rng);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            for (i, label) in labels.iter_mut().enumerate() {
                *label = nearest(centroids.view(), data.row(i)).0;
            }

            let mut next = Array2::<f64>::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];
            for (i, &c) in labels.iter().enumerate() {
                let mut row = next.row_mut(c);
                row += &data.row(i);
                counts[c] += 1;
            }
            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    next.row_mut(c).mapv_inplace(|x| x / count as f64);
                } else {
                    // Empty cluster: reseed from a random point.
                    let idx = rng.random_range(0..n);
                    next.row_mut(c).assign(&data.row(idx));
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(next.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            centroids = next;
            if shift < self.tol {
                break;
            }
        }

        let mut wcss = 0.0;
        for (i, label) in labels.iter_mut().enumerate() {
            let (c, dist) = nearest(centroids.view(), data.row(i));
            *label = c;
            wcss += dist;
        }

        KmeansModel {
            centroids,
            labels,
            wcss,
        }
    }
}

impl SpatialClusterer for Kmeans {
    type Model = KmeansModel;

    fn fit(&self, points: ArrayView2<'_, f64>) -> Result<KmeansModel> {
        let n = points.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let mut best: Option<KmeansModel> = None;
        for t in 0..self.restarts.max(1) as u64 {
            let model = self.run(points, self.seed.wrapping_add(t));
            if best.as_ref().map_or(true, |b| model.wcss < b.wcss) {
                best = Some(model);
            }
        }
        best.ok_or(Error::EmptyInput)
    }
}

impl SpatialModel for KmeansModel {
    fn training_assignments(&self) -> Option<&[usize]> {
        Some(&self.labels)
    }

    fn assign(&self, point: ArrayView1<'_, f64>) -> usize {
        nearest(self.centroids.view(), point).0
    }
}
