//! Leader clustering: an exact, distance-based assigner.
//!
//! Rows are scanned in order; a row further than `radius` from every existing
//! leader becomes a new leader. The model keeps only the leaders, so labels
//! come from [`SpatialModel::assign`] (nearest leader) rather than from fitting.
//!
//! On well-separated embeddings (every row within `radius` of its own group and
//! further than `2 · radius` from other groups) the result is exact and does
//! not depend on row order.

use super::{nearest, SpatialClusterer, SpatialModel};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Leader clustering with a fixed radius.
#[derive(Debug, Clone)]
pub struct LeaderAssigner {
    radius: f64,
}

/// The leaders chosen during fitting.
#[derive(Debug, Clone)]
pub struct LeaderModel {
    leaders: Array2<f64>,
}

impl LeaderModel {
    pub fn leaders(&self) -> &Array2<f64> {
        &self.leaders
    }
}

impl LeaderAssigner {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for LeaderAssigner {
    /// Unit-norm embedding rows of different clusters are roughly orthogonal,
    /// i.e. about `√2` apart.
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl SpatialClusterer for LeaderAssigner {
    type Model = LeaderModel;

    fn fit(&self, points: ArrayView2<'_, f64>) -> Result<LeaderModel> {
        if points.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if !(self.radius >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "radius",
                message: "must be non-negative".into(),
            });
        }

        let radius_sq = self.radius * self.radius;
        let mut leaders = Array2::<f64>::zeros((0, points.ncols()));
        for row in points.rows() {
            let far = leaders.nrows() == 0 || nearest(leaders.view(), row).1 > radius_sq;
            if far {
                leaders.push(Axis(0), row)?;
            }
        }
        Ok(LeaderModel { leaders })
    }
}

impl SpatialModel for LeaderModel {
    fn training_assignments(&self) -> Option<&[usize]> {
        None
    }

    fn assign(&self, point: ArrayView1<'_, f64>) -> usize {
        nearest(self.leaders.view(), point).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn leaders_follow_separation() {
        let data = array![[1.0, 0.0], [0.0, 1.0], [0.99, 0.01], [0.02, 0.98]];
        let model = LeaderAssigner::default().fit(data.view()).unwrap();
        assert_eq!(model.leaders().nrows(), 2);
        assert!(model.training_assignments().is_none());
        assert_eq!(model.assign(data.row(2)), 0);
        assert_eq!(model.assign(data.row(3)), 1);
    }

    #[test]
    fn zero_radius_makes_every_distinct_row_a_leader() {
        let data = array![[0.0], [1.0], [1.0], [2.0]];
        let model = LeaderAssigner::new(0.0).fit(data.view()).unwrap();
        assert_eq!(model.leaders().nrows(), 3);
    }

    #[test]
    fn rejects_empty_and_negative_radius() {
        assert!(LeaderAssigner::default()
            .fit(Array2::<f64>::zeros((0, 2)).view())
            .is_err());
        assert!(LeaderAssigner::new(-1.0)
            .fit(array![[0.0]].view())
            .is_err());
    }
}
