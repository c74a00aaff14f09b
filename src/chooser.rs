//! Choosing how many eigenvectors to embed with.
//!
//! A chooser reads eigenpairs in the Laplacian's informative direction and
//! decides the embedding dimension K.
//!
//! - [`EigenChooser::FixedCount`]: always K.
//! - [`EigenChooser::RelativeGap`]: stop at the first eigengap that is large
//!   relative to the gaps accumulated so far.
//! - [`EigenChooser::AbsoluteGap`]: stop once eigenvalues drift too far from a
//!   reference eigenvalue, relative to the largest value seen.
//!
//! The gap choosers are capped at `max_select · n` vectors, which bounds the
//! smallest average cluster size the embedding can express.

use crate::eigen::{Direction, EigenPair, EigenRange};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Eigenvector selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EigenChooser {
    /// Select exactly `count` eigenvectors.
    FixedCount { count: usize },
    /// Stop when `gap > multiplier · accumulated_gap`.
    RelativeGap { multiplier: f64, max_select: f64 },
    /// Stop when `|λ - λ_ref| / max|λ| > threshold`.
    AbsoluteGap { threshold: f64, max_select: f64 },
}

impl Default for EigenChooser {
    fn default() -> Self {
        EigenChooser::RelativeGap {
            multiplier: 30.0,
            max_select: 0.1,
        }
    }
}

/// Eigenvalues below `-NEGATIVE_TOLERANCE` end gap-based selection; smaller
/// negatives are rounding noise around zero.
pub const NEGATIVE_TOLERANCE: f64 = 1e-9;

/// Largest selection allowed by a `max_select` fraction of `total`.
fn cap(max_select: f64, total: usize) -> usize {
    ((max_select * total as f64).floor() as usize).clamp(1, total.max(1))
}

fn check_fraction(max_select: f64) -> Result<()> {
    if !(max_select > 0.0 && max_select <= 1.0) {
        return Err(Error::InvalidParameter {
            name: "max_select",
            message: format!("must be in (0, 1], got {max_select}"),
        });
    }
    Ok(())
}

impl EigenChooser {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        match *self {
            EigenChooser::FixedCount { count } => {
                if count == 0 {
                    return Err(Error::EmptySelection);
                }
            }
            EigenChooser::RelativeGap {
                multiplier,
                max_select,
            } => {
                if !(multiplier > 0.0) {
                    return Err(Error::InvalidParameter {
                        name: "multiplier",
                        message: format!("must be positive, got {multiplier}"),
                    });
                }
                check_fraction(max_select)?;
            }
            EigenChooser::AbsoluteGap {
                threshold,
                max_select,
            } => {
                if !(threshold >= 0.0) {
                    return Err(Error::InvalidParameter {
                        name: "threshold",
                        message: format!("must be non-negative, got {threshold}"),
                    });
                }
                check_fraction(max_select)?;
            }
        }
        Ok(())
    }

    /// Solver request for an `n × n` Laplacian: only as many pairs as this
    /// chooser can ever select, taken from the informative end.
    pub fn prepare(&self, n: usize, direction: Direction) -> EigenRange {
        let m = match *self {
            EigenChooser::FixedCount { count } => count.min(n),
            EigenChooser::RelativeGap { max_select, .. }
            | EigenChooser::AbsoluteGap { max_select, .. } => cap(max_select, n).min(n),
        };
        EigenRange::toward(direction, m)
    }

    /// Number of eigenvectors to keep.
    ///
    /// `pairs` yields eigenpairs most-informative first; `total_available` is the
    /// operator dimension. The result is at least 1 and never exceeds either
    /// `total_available` or the number of pairs `pairs` yields.
    pub fn select_count<'a, I>(&self, pairs: I, total_available: usize) -> Result<usize>
    where
        I: IntoIterator<Item = EigenPair<'a>>,
    {
        self.validate()?;
        let mut values = pairs.into_iter().map(|p| p.value);

        let count = match *self {
            EigenChooser::FixedCount { count } => {
                let available = values.count();
                if count > total_available || count > available {
                    return Err(Error::TooManyEigenvectors {
                        requested: count,
                        available: available.min(total_available),
                    });
                }
                count
            }
            EigenChooser::RelativeGap {
                multiplier,
                max_select,
            } => {
                let limit = cap(max_select, total_available);
                let Some(mut prev) = values.next() else {
                    return Err(Error::EmptySelection);
                };
                let mut count = 1;
                let mut accumulated = 0.0;
                while count < limit {
                    let Some(value) = values.next() else { break };
                    if value < -NEGATIVE_TOLERANCE {
                        debug!(count, value, "negative eigenvalue ends selection");
                        break;
                    }
                    let gap = (value - prev).abs();
                    // The gap after the first eigenvalue only seeds the accumulator.
                    if count >= 2 && gap > multiplier * accumulated {
                        debug!(count, gap, accumulated, "relative eigengap found");
                        break;
                    }
                    accumulated += gap;
                    prev = value;
                    count += 1;
                }
                count
            }
            EigenChooser::AbsoluteGap {
                threshold,
                max_select,
            } => {
                let limit = cap(max_select, total_available);
                let Some(first) = values.next() else {
                    return Err(Error::EmptySelection);
                };
                let mut count = 1;
                let mut max_seen = first.abs();
                let mut reference = None;
                while count < limit {
                    let Some(value) = values.next() else { break };
                    if value < -NEGATIVE_TOLERANCE {
                        debug!(count, value, "negative eigenvalue ends selection");
                        break;
                    }
                    max_seen = max_seen.max(value.abs());
                    match reference {
                        None => reference = Some(value),
                        Some(r) => {
                            let gap = if max_seen > 0.0 {
                                (value - r).abs() / max_seen
                            } else {
                                0.0
                            };
                            if gap > threshold {
                                debug!(count, gap, "absolute eigengap found");
                                break;
                            }
                        }
                    }
                    count += 1;
                }
                count
            }
        };

        let count = count.min(total_available);
        if count == 0 {
            return Err(Error::EmptySelection);
        }
        debug!(count, total_available, "eigenvectors selected");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::EigenDecomposition;
    use ndarray::Array2;
    use proptest::prelude::*;

    fn spectrum(values: &[f64]) -> EigenDecomposition {
        let n = values.len();
        EigenDecomposition::new(values.to_vec(), Array2::eye(n), n).unwrap()
    }

    #[test]
    fn fixed_count_is_idempotent() {
        let dec = spectrum(&[0.0, 0.1, 0.5, 0.9]);
        let chooser = EigenChooser::FixedCount { count: 2 };
        let a = chooser.select_count(dec.iter(Direction::Forward), dec.total()).unwrap();
        let b = chooser.select_count(dec.iter(Direction::Forward), dec.total()).unwrap();
        assert_eq!(a, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_count_rejects_zero_and_overflow() {
        let dec = spectrum(&[0.0, 0.1, 0.5]);
        let err = EigenChooser::FixedCount { count: 0 }
            .select_count(dec.iter(Direction::Forward), 3)
            .unwrap_err();
        assert!(matches!(err, Error::EmptySelection));

        let err = EigenChooser::FixedCount { count: 4 }
            .select_count(dec.iter(Direction::Forward), 3)
            .unwrap_err();
        assert!(matches!(err, Error::TooManyEigenvectors { requested: 4, .. }));

        // Fewer pairs computed than the operator dimension.
        let partial = dec.leading(Direction::Forward, 2);
        let err = EigenChooser::FixedCount { count: 3 }
            .select_count(partial.iter(Direction::Forward), 3)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyEigenvectors {
                requested: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn relative_gap_stops_before_jump() {
        let dec = spectrum(&[0.0, 1.0, 1.01, 1.02, 50.0, 51.0]);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 10.0,
            max_select: 1.0,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 6).unwrap();
        assert_eq!(k, 4);
    }

    #[test]
    fn relative_gap_counts_zero_eigenvalues_of_components() {
        // Three disconnected components give three (noisy) zeros.
        let dec = spectrum(&[-1e-16, 0.0, 2e-16, 0.2, 0.21, 0.22, 0.23, 5.0]);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 5.0,
            max_select: 1.0,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 8).unwrap();
        assert_eq!(k, 3);
    }

    #[test]
    fn relative_gap_first_gap_is_never_a_stop() {
        let dec = spectrum(&[0.0, 3.0, 3.1, 3.2]);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 2.0,
            max_select: 1.0,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 4).unwrap();
        assert_eq!(k, 4);
    }

    #[test]
    fn relative_gap_respects_cap() {
        let values: Vec<f64> = (0..20).map(|i| i as f64 * 0.01).collect();
        let dec = spectrum(&values);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 10.0,
            max_select: 0.1,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 20).unwrap();
        assert_eq!(k, 2);
    }

    #[test]
    fn relative_gap_stops_on_negative_values() {
        let dec = spectrum(&[-0.5, -0.1, 0.2, 0.9]);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 100.0,
            max_select: 1.0,
        };
        // Backward: 0.9, 0.2, then -0.1 stops.
        let k = chooser.select_count(dec.iter(Direction::Backward), 4).unwrap();
        assert_eq!(k, 2);
    }

    #[test]
    fn relative_gap_exhausted_iterator() {
        let dec = spectrum(&[0.0, 0.1, 0.2]);
        let chooser = EigenChooser::RelativeGap {
            multiplier: 10.0,
            max_select: 1.0,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 10).unwrap();
        assert_eq!(k, 3);
    }

    #[test]
    fn absolute_gap_measures_from_second_value() {
        let dec = spectrum(&[0.0, 0.1, 0.12, 0.15, 0.9, 1.0]);
        let chooser = EigenChooser::AbsoluteGap {
            threshold: 0.3,
            max_select: 1.0,
        };
        // 0.15: |0.15-0.1|/0.15 = 0.33 > 0.3, stop.
        let k = chooser.select_count(dec.iter(Direction::Forward), 6).unwrap();
        assert_eq!(k, 3);

        let loose = EigenChooser::AbsoluteGap {
            threshold: 0.5,
            max_select: 1.0,
        };
        // 0.9: |0.9-0.1|/0.9 = 0.89 > 0.5, stop.
        let k = loose.select_count(dec.iter(Direction::Forward), 6).unwrap();
        assert_eq!(k, 4);
    }

    #[test]
    fn absolute_gap_all_zero_spectrum() {
        let dec = spectrum(&[0.0, 0.0, 0.0]);
        let chooser = EigenChooser::AbsoluteGap {
            threshold: 0.1,
            max_select: 1.0,
        };
        let k = chooser.select_count(dec.iter(Direction::Forward), 3).unwrap();
        assert_eq!(k, 3);
    }

    #[test]
    fn empty_iterator_is_an_error() {
        let dec = spectrum(&[]);
        let err = EigenChooser::default()
            .select_count(dec.iter(Direction::Forward), 0)
            .unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let dec = spectrum(&[0.0, 1.0]);
        for chooser in [
            EigenChooser::RelativeGap {
                multiplier: 0.0,
                max_select: 0.5,
            },
            EigenChooser::RelativeGap {
                multiplier: 1.0,
                max_select: 1.5,
            },
            EigenChooser::AbsoluteGap {
                threshold: -1.0,
                max_select: 0.5,
            },
            EigenChooser::AbsoluteGap {
                threshold: 0.1,
                max_select: 0.0,
            },
        ] {
            let err = chooser.select_count(dec.iter(Direction::Forward), 2).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { .. }), "{chooser:?}");
        }
    }

    #[test]
    fn prepare_requests_informative_end() {
        let fixed = EigenChooser::FixedCount { count: 3 };
        assert_eq!(fixed.prepare(10, Direction::Forward), EigenRange::Lowest(3));
        assert_eq!(fixed.prepare(2, Direction::Backward), EigenRange::Greatest(2));

        let gap = EigenChooser::RelativeGap {
            multiplier: 10.0,
            max_select: 0.25,
        };
        assert_eq!(gap.prepare(40, Direction::Forward), EigenRange::Lowest(10));
        assert_eq!(gap.prepare(3, Direction::Backward), EigenRange::Greatest(1));
    }

    proptest! {
        #[test]
        fn prop_selection_within_bounds(
            mut values in prop::collection::vec(-1.0f64..10.0, 1..40),
            multiplier in 0.5f64..50.0,
            threshold in 0.0f64..1.0,
            max_select in 0.01f64..=1.0,
            backward in any::<bool>(),
        ) {
            values.sort_by(f64::total_cmp);
            let dec = spectrum(&values);
            let direction = if backward { Direction::Backward } else { Direction::Forward };
            let total = values.len();
            for chooser in [
                EigenChooser::RelativeGap { multiplier, max_select },
                EigenChooser::AbsoluteGap { threshold, max_select },
            ] {
                let k = chooser.select_count(dec.iter(direction), total).unwrap();
                prop_assert!(k >= 1);
                prop_assert!(k <= total);
                prop_assert!(k <= cap(max_select, total));
            }
        }
    }
}
