//! DBSCAN on embedding rows.
//!
//! Density-based: the number of clusters is discovered, not given. Points
//! that are neither core nor border are noise; they are collected into one
//! extra cluster placed after the dense ones.

use super::{squared_distance, SpatialClusterer, SpatialModel};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

const UNASSIGNED: usize = usize::MAX;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    epsilon: f64,
    min_pts: usize,
}

/// Fitted DBSCAN: the training rows and their labels.
#[derive(Debug, Clone)]
pub struct DbscanModel {
    points: Array2<f64>,
    labels: Vec<usize>,
    core: Vec<bool>,
    epsilon: f64,
    noise_label: Option<usize>,
    n_dense: usize,
}

impl DbscanModel {
    /// Number of dense clusters, excluding the noise cluster.
    pub fn n_dense_clusters(&self) -> usize {
        self.n_dense
    }

    /// Label used for noise points, if there were any.
    pub fn noise_label(&self) -> Option<usize> {
        self.noise_label
    }
}

impl Dbscan {
    /// `epsilon`: neighbourhood radius; `min_pts`: neighbours (including the
    /// point itself) needed for a core point.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    fn region_query(&self, data: ArrayView2<'_, f64>, idx: usize) -> Vec<usize> {
        let eps_sq = self.epsilon * self.epsilon;
        let point = data.row(idx);
        (0..data.nrows())
            .filter(|&j| j != idx && squared_distance(point, data.row(j)) <= eps_sq)
            .collect()
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl SpatialClusterer for Dbscan {
    type Model = DbscanModel;

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<DbscanModel> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if !(self.epsilon > 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive".into(),
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1".into(),
            });
        }

        let neighbours: Vec<Vec<usize>> = (0..n).map(|i| self.region_query(data, i)).collect();
        let core: Vec<bool> = neighbours
            .iter()
            .map(|nb| nb.len() + 1 >= self.min_pts)
            .collect();

        let mut labels = vec![UNASSIGNED; n];
        let mut cluster_id = 0;
        for start in 0..n {
            if labels[start] != UNASSIGNED || !core[start] {
                continue;
            }
            labels[start] = cluster_id;
            let mut frontier = neighbours[start].clone();
            while let Some(p) = frontier.pop() {
                if labels[p] != UNASSIGNED {
                    continue;
                }
                labels[p] = cluster_id;
                if core[p] {
                    frontier.extend(neighbours[p].iter().filter(|&&q| labels[q] == UNASSIGNED));
                }
            }
            cluster_id += 1;
        }

        let noise_label = labels.contains(&UNASSIGNED).then_some(cluster_id);
        if let Some(noise) = noise_label {
            for label in labels.iter_mut().filter(|l| **l == UNASSIGNED) {
                *label = noise;
            }
        }

        Ok(DbscanModel {
            points: data.to_owned(),
            labels,
            core,
            epsilon: self.epsilon,
            noise_label,
            n_dense: cluster_id,
        })
    }
}

impl SpatialModel for DbscanModel {
    fn training_assignments(&self) -> Option<&[usize]> {
        Some(&self.labels)
    }

    /// Cluster of the nearest core point within `epsilon`, else noise.
    fn assign(&self, point: ArrayView1<'_, f64>) -> usize {
        let eps_sq = self.epsilon * self.epsilon;
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.points.rows().into_iter().enumerate() {
            if !self.core[i] {
                continue;
            }
            let d = squared_distance(point, row);
            if d <= eps_sq && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((self.labels[i], d));
            }
        }
        match best {
            Some((label, _)) => label,
            None => self.noise_label.unwrap_or(self.n_dense),
        }
    }
}
