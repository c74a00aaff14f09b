//! Co-regularised spectral clustering over several similarity views.
//!
//! Each view is first decomposed on its own, giving an eigenspace `U_v` of
//! `K_v` columns. Then, every round, each view's operator is pulled toward the
//! other views' eigenspaces:
//!
//! ```text
//! M_v = S_v + s · λ · Σ_{w ≠ v} U_w U_wᵀ
//! ```
//!
//! where `S_v` is the symmetric Laplacian operator of view `v` and `s` is `+1`
//! when clusters live at the top of the spectrum, `-1` when they live at the
//! bottom. The leading `K_v` eigenvectors of `M_v` become the new `U_v`. The
//! loop runs until a [`StoppingCondition`] says stop; there is no other bound.
//!
//! The first view's refined eigenspace is then clustered as usual.

use crate::config::SpectralClusteringConfig;
use crate::eigen::{Direction, EigenDecomposition, EigenRange, EigenSolver};
use crate::inner::SpatialClusterer;
use crate::laplacian::Laplacian;
use crate::prepared::{PreparedSpectralClustering, SpectralClusters};
use crate::sparse::SimilarityMatrix;
use crate::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// When to end the co-regularisation loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StoppingCondition {
    /// Run exactly this many refinement rounds; 0 is rejected.
    HardCoded { iterations: usize },
    /// Stop once no view's eigenspace moves more than `tolerance` (Frobenius
    /// distance between projectors) in one round.
    Converged { tolerance: f64 },
}

impl StoppingCondition {
    /// `iteration` counts completed rounds (from 1); `change` is the largest
    /// projector movement in the latest round.
    pub fn should_stop(&self, iteration: usize, change: f64) -> bool {
        match *self {
            StoppingCondition::HardCoded { iterations } => iteration >= iterations,
            StoppingCondition::Converged { tolerance } => change <= tolerance,
        }
    }

    /// At least one refinement round always runs, so `HardCoded` needs
    /// `iterations ≥ 1`.
    fn validate(&self) -> Result<()> {
        match *self {
            StoppingCondition::HardCoded { iterations: 0 } => Err(Error::InvalidParameter {
                name: "iterations",
                message: "must be at least 1".into(),
            }),
            StoppingCondition::Converged { tolerance } if !(tolerance >= 0.0) => {
                Err(Error::InvalidParameter {
                    name: "tolerance",
                    message: format!("must be non-negative, got {tolerance}"),
                })
            }
            _ => Ok(()),
        }
    }
}

/// One view's state during refinement.
struct View {
    laplacian: Laplacian,
    /// Current eigenspace of the symmetric operator, most informative column first.
    basis: Array2<f64>,
    projector: Array2<f64>,
}

/// Leading `k` eigenvectors in `direction`, as columns.
fn leading_basis(decomposition: &EigenDecomposition, direction: Direction, k: usize) -> Array2<f64> {
    let mut basis = Array2::<f64>::zeros((decomposition.total(), k));
    for (col, pair) in decomposition.iter(direction).take(k).enumerate() {
        basis.column_mut(col).assign(&pair.vector);
    }
    basis
}

/// Spectral clustering of several views of the same items.
#[derive(Debug, Clone)]
pub struct MultiviewSpectralClustering<C> {
    config: SpectralClusteringConfig<C>,
    lambda: f64,
    stopping: StoppingCondition,
}

impl<C: SpatialClusterer> MultiviewSpectralClustering<C> {
    pub fn new(config: SpectralClusteringConfig<C>, lambda: f64, stopping: StoppingCondition) -> Self {
        Self {
            config,
            lambda,
            stopping,
        }
    }

    pub fn config(&self) -> &SpectralClusteringConfig<C> {
        &self.config
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn stopping(&self) -> StoppingCondition {
        self.stopping
    }

    /// Cluster the items shared by `views`.
    pub fn cluster(&self, views: &[SimilarityMatrix]) -> Result<SpectralClusters> {
        let decomposition = self.refine(views)?;
        PreparedSpectralClustering::new(&self.config).cluster(&decomposition)
    }

    /// The first view's co-regularised eigenpairs.
    ///
    /// Eigenvalues are Rayleigh quotients of the refined vectors against the
    /// first view's own Laplacian, so they stay on that Laplacian's scale.
    pub fn refine(&self, views: &[SimilarityMatrix]) -> Result<EigenDecomposition> {
        let first = views.first().ok_or(Error::EmptyInput)?;
        let n = first.n();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some(bad) = views.iter().find(|v| v.n() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: bad.n(),
            });
        }
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "lambda",
                message: format!("must be finite and non-negative, got {}", self.lambda),
            });
        }
        self.config.chooser.validate()?;
        self.stopping.validate()?;

        let kind = self.config.laplacian;
        let direction = kind.direction();
        let solver: &dyn EigenSolver = &self.config.solver;
        let range = self.config.chooser.prepare(n, direction);
        info!(views = views.len(), n, lambda = self.lambda, ?range, "multiview decomposition");

        let mut state = Vec::with_capacity(views.len());
        for similarity in views {
            let laplacian = kind.laplacian(similarity);
            let decomposition = solver.solve(laplacian.symmetric_operator(), range)?;
            let k = self
                .config
                .chooser
                .select_count(decomposition.iter(direction), n)?;
            let basis = leading_basis(&decomposition, direction, k);
            let projector = basis.dot(&basis.t());
            state.push(View {
                laplacian,
                basis,
                projector,
            });
        }

        let sign = match direction {
            Direction::Backward => 1.0,
            Direction::Forward => -1.0,
        };
        let weight = sign * self.lambda;

        let mut iteration = 0;
        loop {
            iteration += 1;
            let mut refined = Vec::with_capacity(state.len());
            for (v, view) in state.iter().enumerate() {
                let mut operator = view.laplacian.symmetric_operator().clone();
                for (w, other) in state.iter().enumerate() {
                    if w != v {
                        operator.scaled_add(weight, &other.projector);
                    }
                }
                let k = view.basis.ncols();
                let decomposition = solver.solve(&operator, EigenRange::toward(direction, k))?;
                refined.push(leading_basis(&decomposition, direction, k));
            }

            let mut change = 0.0f64;
            for (view, basis) in state.iter_mut().zip(refined) {
                let projector = basis.dot(&basis.t());
                let moved = (&projector - &view.projector).mapv(|x| x * x).sum().sqrt();
                change = change.max(moved);
                view.basis = basis;
                view.projector = projector;
            }
            debug!(iteration, change, "co-regularisation round");

            if self.stopping.should_stop(iteration, change) {
                info!(iteration, change, "multiview refinement stopped");
                break;
            }
        }

        let view = &state[0];
        let operator = view.laplacian.symmetric_operator();
        let values: Vec<f64> = view
            .basis
            .columns()
            .into_iter()
            .map(|u| u.dot(&operator.dot(&u)))
            .collect();
        let decomposition = EigenDecomposition::from_unsorted(values, &view.basis, EigenRange::All);
        Ok(view.laplacian.lift(decomposition))
    }
}
