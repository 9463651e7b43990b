//! Bisection strategies.
//!
//! Every bisector maps a vertex subset to a [`BinarySplit`] whose left half
//! approximates a requested size. The strategies form the closed set
//! [`Bisector`]; the driver picks one per call and never needs anything but
//! [`Bisector::bisect`].

pub mod coordinate;
pub mod inertial;
pub mod spectral;

pub use coordinate::CoordinateBisector;
pub use inertial::InertialBisector;
pub use spectral::SpectralBisector;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data::Coordinates;
use crate::graph::PartitionableGraph;
use crate::linalg::EigenConfig;
use crate::partition_error::PartitionError;
use crate::partitioning::Strategy;

/// Requested outcome of one bisection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSizes {
    /// Vertices wanted in the left half.
    pub left: usize,
    /// Vertices wanted in the right half.
    pub right: usize,
    /// Labels the left half will be split into further; it needs at least this many vertices.
    pub left_parts: usize,
    /// Labels the right half will be split into further.
    pub right_parts: usize,
}

/// Order applied to vertices whose sort keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lower global index first.
    #[default]
    Ascending,
    /// Higher global index first; used for the perturbed retry.
    Descending,
}

impl TieBreak {
    fn cmp(self, a: usize, b: usize) -> Ordering {
        match self {
            TieBreak::Ascending => a.cmp(&b),
            TieBreak::Descending => b.cmp(&a),
        }
    }
}

/// One bisection request.
#[derive(Debug, Clone, Copy)]
pub struct BisectRequest<'a> {
    /// Global ids of the vertices to split.
    pub subset: &'a [usize],
    pub target: TargetSizes,
    pub tie_break: TieBreak,
    /// Seed for any randomized step (spectral start vector).
    pub seed: u64,
}

/// How a split was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitPath {
    /// Median cut along coordinate `axis`.
    CoordinateAxis { axis: usize },
    /// Median cut along the principal inertial axis; `variance` is its eigenvalue.
    InertialAxis { variance: f64 },
    /// Median cut of the Fiedler vector.
    Fiedler { lambda2: f64, iterations: usize },
    /// The subgraph was disconnected and was split along component boundaries.
    /// `split_component` is set when one component had to be cut to respect the
    /// minimum half sizes.
    ComponentBoundary {
        components: usize,
        split_component: bool,
    },
}

/// Output of a bisector: two halves of global ids.
#[derive(Debug, Clone, PartialEq)]
pub struct BinarySplit {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub path: SplitPath,
}

/// The closed set of bisection strategies.
#[derive(Debug, Clone)]
pub enum Bisector {
    Coordinate(CoordinateBisector),
    Inertial(InertialBisector),
    Spectral(SpectralBisector),
}

impl Bisector {
    /// The bisector implementing `strategy`, or `None` for the multiway strategy,
    /// which bypasses recursive bisection.
    pub fn for_strategy(strategy: Strategy, eigen: EigenConfig) -> Option<Self> {
        match strategy {
            Strategy::Coordinate => Some(Bisector::Coordinate(CoordinateBisector)),
            Strategy::Inertial => Some(Bisector::Inertial(InertialBisector)),
            Strategy::Spectral => Some(Bisector::Spectral(SpectralBisector::new(eigen))),
            Strategy::Multiway(_) => None,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Bisector::Coordinate(_) => Strategy::Coordinate,
            Bisector::Inertial(_) => Strategy::Inertial,
            Bisector::Spectral(_) => Strategy::Spectral,
        }
    }

    /// Split `req.subset` into two halves.
    ///
    /// Fails with `InvalidArgument` for subsets of fewer than two vertices, target
    /// sizes that do not add up, or missing coordinates; with `DegenerateSplit`
    /// if the strategy leaves one half empty.
    pub fn bisect<G: PartitionableGraph>(
        &self,
        graph: &G,
        coords: Option<&Coordinates>,
        req: &BisectRequest<'_>,
    ) -> Result<BinarySplit, PartitionError> {
        let n = req.subset.len();
        if n < 2 {
            return Err(PartitionError::invalid(format!(
                "cannot bisect a subset of {n} vertices"
            )));
        }
        let t = req.target;
        if t.left + t.right != n || t.left == 0 || t.right == 0 {
            return Err(PartitionError::invalid(format!(
                "target sizes ({}, {}) do not split {n} vertices",
                t.left, t.right
            )));
        }

        let split = match self {
            Bisector::Coordinate(b) => b.bisect(require_coords(coords, self.strategy())?, req)?,
            Bisector::Inertial(b) => b.bisect(require_coords(coords, self.strategy())?, req)?,
            Bisector::Spectral(b) => b.bisect(graph, req)?,
        };
        validate_split(split, n, self.strategy())
    }
}

fn require_coords(
    coords: Option<&Coordinates>,
    strategy: Strategy,
) -> Result<&Coordinates, PartitionError> {
    coords.ok_or_else(|| {
        PartitionError::invalid(format!("{strategy} bisection requires vertex coordinates"))
    })
}

/// Reject splits that leave a half empty or lose vertices.
pub(crate) fn validate_split(
    split: BinarySplit,
    subset_size: usize,
    strategy: Strategy,
) -> Result<BinarySplit, PartitionError> {
    if split.left.len() + split.right.len() != subset_size {
        return Err(PartitionError::PartitioningFailed {
            subset_size,
            strategy,
        });
    }
    if subset_size >= 2 && (split.left.is_empty() || split.right.is_empty()) {
        return Err(PartitionError::DegenerateSplit {
            subset_size,
            strategy,
        });
    }
    Ok(split)
}

/// Sort `(key, vertex)` pairs by key, breaking ties on the vertex id, and cut after
/// the first `left` entries.
pub(crate) fn median_cut(
    mut keyed: Vec<(f64, usize)>,
    left: usize,
    tie_break: TieBreak,
) -> (Vec<usize>, Vec<usize>) {
    // -0.0 and 0.0 must tie
    keyed.iter_mut().for_each(|k| k.0 += 0.0);
    keyed.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then_with(|| tie_break.cmp(a.1, b.1)));
    let mut order: Vec<usize> = keyed.into_iter().map(|(_, v)| v).collect();
    let right = order.split_off(left.min(order.len()));
    (order, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightedGraph;

    #[test]
    fn median_cut_breaks_ties_by_index() {
        let keyed = vec![(1.0, 4), (0.0, 7), (1.0, 2), (0.0, 3)];
        let (l, r) = median_cut(keyed.clone(), 3, TieBreak::Ascending);
        assert_eq!(l, vec![3, 7, 2]);
        assert_eq!(r, vec![4]);
        let (l, r) = median_cut(keyed, 3, TieBreak::Descending);
        assert_eq!(l, vec![7, 3, 4]);
        assert_eq!(r, vec![2]);
    }

    #[test]
    fn empty_half_is_degenerate() {
        let split = BinarySplit {
            left: vec![0, 1],
            right: vec![],
            path: SplitPath::CoordinateAxis { axis: 0 },
        };
        let err = validate_split(split, 2, Strategy::Coordinate).unwrap_err();
        assert_eq!(
            err,
            PartitionError::DegenerateSplit {
                subset_size: 2,
                strategy: Strategy::Coordinate
            }
        );
    }

    #[test]
    fn lost_vertices_fail() {
        let split = BinarySplit {
            left: vec![0],
            right: vec![1],
            path: SplitPath::CoordinateAxis { axis: 0 },
        };
        assert!(matches!(
            validate_split(split, 3, Strategy::Coordinate),
            Err(PartitionError::PartitioningFailed { .. })
        ));
    }

    #[test]
    fn geometric_bisectors_need_coordinates() {
        let g = WeightedGraph::empty(2);
        let req = BisectRequest {
            subset: &[0, 1],
            target: TargetSizes {
                left: 1,
                right: 1,
                left_parts: 1,
                right_parts: 1,
            },
            tie_break: TieBreak::Ascending,
            seed: 0,
        };
        for s in [Strategy::Coordinate, Strategy::Inertial] {
            let b = Bisector::for_strategy(s, EigenConfig::default()).unwrap();
            assert!(matches!(
                b.bisect(&g, None, &req),
                Err(PartitionError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn rejects_inconsistent_targets() {
        let g = WeightedGraph::empty(3);
        let b = Bisector::for_strategy(Strategy::Spectral, EigenConfig::default()).unwrap();
        let req = BisectRequest {
            subset: &[0, 1, 2],
            target: TargetSizes {
                left: 3,
                right: 0,
                left_parts: 1,
                right_parts: 1,
            },
            tie_break: TieBreak::Ascending,
            seed: 0,
        };
        assert!(b.bisect(&g, None, &req).is_err());
        let single = BisectRequest {
            subset: &[0],
            ..req
        };
        assert!(b.bisect(&g, None, &single).is_err());
    }
}
