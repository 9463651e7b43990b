//! Entry-point for recursive bisection partitioning.
//!
//! [`partition`] labels every vertex of a graph with one of `k` parts by
//! repeatedly bisecting vertex subsets with one [`Strategy`]; [`partition_with_config`]
//! exposes the full [`PartitionerConfig`] and returns per-split diagnostics.

pub mod bisect;
mod driver;
pub mod metrics;
pub mod multiway;
pub mod parallel;

pub use self::bisect::{BinarySplit, Bisector, SplitPath, TargetSizes, TieBreak};
pub use self::metrics::*;
pub use self::multiway::{MultiwayMode, partition_multiway};
pub use crate::linalg::EigenConfig;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use self::driver::Driver;
use crate::data::Coordinates;
use crate::graph::PartitionableGraph;
use crate::partition_error::PartitionError;

pub type PartitionId = usize;

/// How vertex subsets are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Median cut along the widest coordinate axis (RCB).
    Coordinate,
    /// Median cut along the principal inertial axis (RIB).
    Inertial,
    /// Median cut of the Fiedler vector (RSB).
    Spectral,
    /// One-shot k-way partition by METIS, bypassing recursive bisection.
    Multiway(MultiwayMode),
}

impl Strategy {
    pub fn requires_coordinates(&self) -> bool {
        matches!(self, Strategy::Coordinate | Strategy::Inertial)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Coordinate => write!(f, "coordinate"),
            Strategy::Inertial => write!(f, "inertial"),
            Strategy::Spectral => write!(f, "spectral"),
            Strategy::Multiway(mode) => write!(f, "metis-{mode}"),
        }
    }
}

impl FromStr for Strategy {
    type Err = PartitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coordinate" | "rcb" => Ok(Strategy::Coordinate),
            "inertial" | "rib" => Ok(Strategy::Inertial),
            "spectral" | "rsb" => Ok(Strategy::Spectral),
            "metis-kway" => Ok(Strategy::Multiway(MultiwayMode::KWay)),
            "metis-recursive" => Ok(Strategy::Multiway(MultiwayMode::Recursive)),
            other => Err(PartitionError::invalid(format!(
                "unknown partitioning strategy `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionerConfig {
    pub n_parts: usize,
    pub strategy: Strategy,
    /// Base seed for every randomized step; combined with the subset being split.
    pub rng_seed: u64,
    pub eigen: EigenConfig,
    /// Evaluate sibling subtrees on the rayon pool.
    pub parallel: bool,
    /// Smallest subset whose children are forked.
    pub parallel_min_size: usize,
    /// Log a warning when the final balance exceeds this value.
    pub max_balance: Option<f64>,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            n_parts: 2,
            strategy: Strategy::Spectral,
            rng_seed: 42,
            eigen: EigenConfig::default(),
            parallel: true,
            parallel_min_size: 1024,
            max_balance: None,
        }
    }
}

/// Diagnostics of one internal node of the partition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub subset_size: usize,
    /// Inclusive label range of the node.
    pub labels: (PartitionId, PartitionId),
    pub left_size: usize,
    pub right_size: usize,
    pub path: SplitPath,
    /// The first attempt was degenerate and the perturbed retry succeeded.
    pub retried: bool,
}

/// A labeling together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOutcome {
    labels: Vec<PartitionId>,
    n_parts: usize,
    splits: Vec<SplitRecord>,
}

impl PartitionOutcome {
    pub fn labels(&self) -> &[PartitionId] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<PartitionId> {
        self.labels
    }

    pub fn n_parts(&self) -> usize {
        self.n_parts
    }

    /// Split records in pre-order of the partition tree. Empty for multiway runs.
    pub fn splits(&self) -> &[SplitRecord] {
        &self.splits
    }

    /// Splits that fell back to component boundaries.
    pub fn disconnected_splits(&self) -> impl Iterator<Item = &SplitRecord> + '_ {
        self.splits
            .iter()
            .filter(|s| matches!(s.path, SplitPath::ComponentBoundary { .. }))
    }

    pub fn quality<G: PartitionableGraph>(
        &self,
        graph: &G,
    ) -> Result<QualityReport, PartitionError> {
        quality_with_parts(graph, &self.labels, self.n_parts)
    }
}

/// Partition `graph` into `k` parts with `strategy`.
///
/// `coords` is required by the coordinate and inertial strategies and ignored
/// otherwise (though still validated when given). Fails with `InvalidArgument` for
/// `k == 0`, `k > n`, or missing or mismatched coordinates.
pub fn partition<G: PartitionableGraph>(
    graph: &G,
    coords: Option<&Coordinates>,
    k: usize,
    strategy: Strategy,
) -> Result<Vec<PartitionId>, PartitionError> {
    let cfg = PartitionerConfig {
        n_parts: k,
        strategy,
        ..PartitionerConfig::default()
    };
    partition_with_config(graph, coords, &cfg).map(PartitionOutcome::into_labels)
}

/// Partition `graph` as described by `cfg`.
pub fn partition_with_config<G: PartitionableGraph>(
    graph: &G,
    coords: Option<&Coordinates>,
    cfg: &PartitionerConfig,
) -> Result<PartitionOutcome, PartitionError> {
    let n = graph.num_vertices();
    let k = cfg.n_parts;
    if k == 0 {
        return Err(PartitionError::invalid("number of parts must be at least 1"));
    }
    if k > n.max(1) {
        return Err(PartitionError::invalid(format!(
            "cannot partition {n} vertices into {k} parts"
        )));
    }
    if let Some(c) = coords {
        c.check_len(n)?;
    } else if cfg.strategy.requires_coordinates() {
        return Err(PartitionError::invalid(format!(
            "{} partitioning requires vertex coordinates",
            cfg.strategy
        )));
    }

    let (labels, splits) = match cfg.strategy {
        Strategy::Multiway(mode) => {
            let labels = partition_multiway(graph, k, mode)?;
            check_labels(graph, &labels, k)
                .map_err(|e| PartitionError::External(e.to_string()))?;
            (labels, Vec::new())
        }
        strategy => {
            let bisector = Bisector::for_strategy(strategy, cfg.eigen).ok_or_else(|| {
                PartitionError::invalid(format!("{strategy} is not a bisection strategy"))
            })?;
            Driver::new(graph, coords, bisector, cfg).run(k)?
        }
    };

    let outcome = PartitionOutcome {
        labels,
        n_parts: k,
        splits,
    };
    if let Some(limit) = cfg.max_balance {
        let b = balance(&outcome.labels, k);
        if b > limit {
            log::warn!(
                "{} partition into {k} parts has balance {b:.3} > {limit}",
                cfg.strategy
            );
        }
    }
    log::debug!(
        "{} partition of {n} vertices into {k} parts: {} splits, {} along component boundaries",
        cfg.strategy,
        outcome.splits.len(),
        outcome.disconnected_splits().count()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightedGraph;

    fn path(n: usize) -> WeightedGraph {
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1, 1.0)).collect();
        WeightedGraph::from_edges(n, &edges).unwrap()
    }

    fn line_coords(n: usize) -> Coordinates {
        let pts: Vec<[f64; 2]> = (0..n).map(|i| [i as f64, 0.0]).collect();
        Coordinates::from_points(&pts).unwrap()
    }

    #[test]
    fn strategy_names_round_trip() {
        for s in [
            Strategy::Coordinate,
            Strategy::Inertial,
            Strategy::Spectral,
            Strategy::Multiway(MultiwayMode::KWay),
            Strategy::Multiway(MultiwayMode::Recursive),
        ] {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("RSB".parse::<Strategy>().unwrap(), Strategy::Spectral);
        assert_eq!("rcb".parse::<Strategy>().unwrap(), Strategy::Coordinate);
        assert!("louvain".parse::<Strategy>().is_err());
    }

    #[test]
    fn single_part_labels_everything_zero() {
        let g = path(5);
        for s in [Strategy::Coordinate, Strategy::Inertial, Strategy::Spectral] {
            let labels = partition(&g, Some(&line_coords(5)), 1, s).unwrap();
            assert_eq!(labels, vec![0; 5]);
        }
    }

    #[test]
    fn argument_errors() {
        let g = path(4);
        let c = line_coords(4);
        assert!(matches!(
            partition(&g, Some(&c), 0, Strategy::Spectral),
            Err(PartitionError::InvalidArgument(_))
        ));
        assert!(matches!(
            partition(&g, Some(&c), 5, Strategy::Spectral),
            Err(PartitionError::InvalidArgument(_))
        ));
        assert!(matches!(
            partition(&g, None, 2, Strategy::Inertial),
            Err(PartitionError::InvalidArgument(_))
        ));
        assert!(matches!(
            partition(&g, Some(&line_coords(3)), 2, Strategy::Spectral),
            Err(PartitionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn three_parts_of_a_path() {
        let g = path(9);
        let labels = partition(&g, Some(&line_coords(9)), 3, Strategy::Coordinate).unwrap();
        // left half takes 2 labels and 6 vertices
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn outcome_records_splits_in_preorder() {
        let g = path(8);
        let cfg = PartitionerConfig {
            n_parts: 4,
            strategy: Strategy::Coordinate,
            ..PartitionerConfig::default()
        };
        let out = partition_with_config(&g, Some(&line_coords(8)), &cfg).unwrap();
        let ranges: Vec<_> = out.splits().iter().map(|s| s.labels).collect();
        assert_eq!(ranges, vec![(0, 3), (0, 1), (2, 3)]);
        assert!(out.splits().iter().all(|s| !s.retried));
        assert_eq!(out.disconnected_splits().count(), 0);
        let q = out.quality(&g).unwrap();
        assert_eq!(q.edge_cut, 3.0);
        assert_eq!(q.balance, 1.0);
    }

    #[test]
    fn empty_graph_single_part() {
        let g = WeightedGraph::empty(0);
        assert_eq!(partition(&g, None, 1, Strategy::Spectral).unwrap(), Vec::<usize>::new());
        assert!(partition(&g, None, 2, Strategy::Spectral).is_err());
    }

    #[cfg(not(feature = "metis-support"))]
    #[test]
    fn multiway_without_feature_is_invalid() {
        let g = path(4);
        assert!(matches!(
            partition(&g, None, 2, Strategy::Multiway(MultiwayMode::KWay)),
            Err(PartitionError::InvalidArgument(_))
        ));
    }
}
