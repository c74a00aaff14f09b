//! Indexed cluster assignments.
//!
//! Text form:
//!
//! ```text
//! N-Clusters: 2
//! Entities: 5
//! 0: [0, 1, 4]
//! 1: [2, 3]
//! ```

use crate::{Error, Result};
use std::fmt;
use std::io::{BufRead, Write};

/// Items grouped by cluster id: `clusters()[c]` lists the items in cluster `c`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexedClusters {
    clusters: Vec<Vec<usize>>,
}

impl IndexedClusters {
    pub fn new(clusters: Vec<Vec<usize>>) -> Self {
        Self { clusters }
    }

    /// Group items by label; `labels[i]` is the cluster of item `i`.
    ///
    /// Cluster ids run from 0 to the largest label, so unused ids are empty clusters.
    pub fn from_assignments(labels: &[usize]) -> Self {
        let n_clusters = labels.iter().max().map_or(0, |&m| m + 1);
        let mut clusters = vec![Vec::new(); n_clusters];
        for (item, &label) in labels.iter().enumerate() {
            clusters[label].push(item);
        }
        Self { clusters }
    }

    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of items across all clusters.
    pub fn n_entries(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Per-item labels, the inverse of [`IndexedClusters::from_assignments`].
    ///
    /// Items missing from every cluster are reported as `None`.
    pub fn assignments(&self) -> Vec<Option<usize>> {
        let n = self
            .clusters
            .iter()
            .flatten()
            .max()
            .map_or(0, |&m| m + 1);
        let mut labels = vec![None; n];
        for (c, items) in self.clusters.iter().enumerate() {
            for &i in items {
                labels[i] = Some(c);
            }
        }
        labels
    }

    /// Write the text form.
    pub fn write_ascii<W: Write>(&self, mut out: W) -> Result<()> {
        write!(out, "{self}")?;
        Ok(())
    }

    /// Parse the text form written by [`IndexedClusters::write_ascii`].
    pub fn read_ascii<R: BufRead>(input: R) -> Result<Self> {
        let mut lines = input.lines();
        let mut header = |key: &str| -> Result<usize> {
            let line = lines
                .next()
                .ok_or_else(|| Error::Parse(format!("missing '{key}' header")))??;
            line.strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(':'))
                .ok_or_else(|| Error::Parse(format!("expected '{key}:', got '{line}'")))?
                .trim()
                .parse()
                .map_err(|e| Error::Parse(format!("bad '{key}' value: {e}")))
        };
        let n_clusters = header("N-Clusters")?;
        let n_entries = header("Entities")?;

        let mut clusters = Vec::with_capacity(n_clusters);
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (index, items) = line
                .split_once(':')
                .ok_or_else(|| Error::Parse(format!("malformed cluster line '{line}'")))?;
            let index: usize = index
                .trim()
                .parse()
                .map_err(|e| Error::Parse(format!("bad cluster index: {e}")))?;
            if index != clusters.len() {
                return Err(Error::Parse(format!(
                    "cluster {index} out of order, expected {}",
                    clusters.len()
                )));
            }
            let body = items
                .trim()
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| Error::Parse(format!("cluster {index} is not a [list]")))?;
            let members = body
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse()
                        .map_err(|e| Error::Parse(format!("bad item '{s}': {e}")))
                })
                .collect::<Result<Vec<usize>>>()?;
            clusters.push(members);
        }

        let parsed = Self { clusters };
        if parsed.n_clusters() != n_clusters || parsed.n_entries() != n_entries {
            return Err(Error::Parse(format!(
                "header says {n_clusters} clusters / {n_entries} entities, body has {} / {}",
                parsed.n_clusters(),
                parsed.n_entries()
            )));
        }
        Ok(parsed)
    }
}

impl fmt::Display for IndexedClusters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "N-Clusters: {}", self.n_clusters())?;
        writeln!(f, "Entities: {}", self.n_entries())?;
        for (i, items) in self.clusters.iter().enumerate() {
            let joined: Vec<String> = items.iter().map(usize::to_string).collect();
            writeln!(f, "{i}: [{}]", joined.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_assignments_groups_items() {
        let c = IndexedClusters::from_assignments(&[1, 0, 1, 2, 0]);
        assert_eq!(c.n_clusters(), 3);
        assert_eq!(c.n_entries(), 5);
        assert_eq!(c.clusters(), &[vec![1, 4], vec![0, 2], vec![3]]);
        assert_eq!(
            c.assignments(),
            vec![Some(1), Some(0), Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn ascii_format() {
        let c = IndexedClusters::new(vec![vec![0, 1, 4], vec![2, 3]]);
        let text = c.to_string();
        assert_eq!(text, "N-Clusters: 2\nEntities: 5\n0: [0, 1, 4]\n1: [2, 3]\n");
    }

    #[test]
    fn ascii_round_trip_with_empty_cluster() {
        let c = IndexedClusters::new(vec![vec![2], vec![], vec![0, 1]]);
        let mut buf = Vec::new();
        c.write_ascii(&mut buf).unwrap();
        let back = IndexedClusters::read_ascii(buf.as_slice()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn read_rejects_inconsistent_header() {
        let text = "N-Clusters: 2\nEntities: 9\n0: [0]\n1: [1]\n";
        let err = IndexedClusters::read_ascii(text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn read_rejects_garbage() {
        for text in ["", "Clusters: 1\n", "N-Clusters: 1\nEntities: 1\n0 [0]\n", "N-Clusters: 1\nEntities: 1\n0: [x]\n"] {
            assert!(IndexedClusters::read_ascii(text.as_bytes()).is_err(), "{text:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_ascii_round_trip_counts(labels in prop::collection::vec(0usize..6, 0..60)) {
            let c = IndexedClusters::from_assignments(&labels);
            let back = IndexedClusters::read_ascii(c.to_string().as_bytes()).unwrap();
            prop_assert_eq!(back.n_clusters(), c.n_clusters());
            prop_assert_eq!(back.n_entries(), labels.len());
        }
    }
}
