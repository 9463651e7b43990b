//! Recursive bisection driver.
//!
//! A node of the partition tree owns a vertex subset and a contiguous label range
//! `[lo, hi]`. With `labels = hi - lo + 1 > 1` it asks the bisector for a split of
//! sizes
//!
//! ```text
//! mid = lo + ceil(labels / 2)
//! n1  = round(|subset| * (mid - lo) / labels)    (halves rounded up)
//! ```
//!
//! and recurses into `([left], [lo, mid-1])` and `([right], [mid, hi])`. Leaves
//! carry a single label. Sibling subtrees share nothing mutable and are evaluated
//! through [`fork_join`]; leaves are scattered into the labeling once the whole tree
//! has succeeded, so a failure never leaves a partial labeling behind.

use super::bisect::{BinarySplit, BisectRequest, Bisector, TargetSizes, TieBreak};
use super::parallel::{fork_join, subset_seed};
use super::{PartitionId, PartitionerConfig, SplitRecord};
use crate::data::Coordinates;
use crate::graph::PartitionableGraph;
use crate::partition_error::PartitionError;

pub(crate) struct Driver<'a, G> {
    graph: &'a G,
    coords: Option<&'a Coordinates>,
    bisector: Bisector,
    cfg: &'a PartitionerConfig,
}

struct Leaf {
    label: PartitionId,
    vertices: Vec<usize>,
}

/// Leaves and split records of a subtree, both in pre-order.
struct Subtree {
    leaves: Vec<Leaf>,
    splits: Vec<SplitRecord>,
}

impl<'a, G: PartitionableGraph> Driver<'a, G> {
    pub(crate) fn new(
        graph: &'a G,
        coords: Option<&'a Coordinates>,
        bisector: Bisector,
        cfg: &'a PartitionerConfig,
    ) -> Self {
        Self {
            graph,
            coords,
            bisector,
            cfg,
        }
    }

    /// Label every vertex with one of `n_parts` labels.
    pub(crate) fn run(
        &self,
        n_parts: usize,
    ) -> Result<(Vec<PartitionId>, Vec<SplitRecord>), PartitionError> {
        let n = self.graph.num_vertices();
        let root: Vec<usize> = (0..n).collect();
        let tree = self.descend(root, 0, n_parts - 1)?;

        let mut labels = vec![PartitionId::MAX; n];
        for leaf in tree.leaves {
            for v in leaf.vertices {
                labels[v] = leaf.label;
            }
        }
        if let Some(v) = labels.iter().position(|&p| p == PartitionId::MAX) {
            log::error!("vertex {v} received no label");
            return Err(PartitionError::PartitioningFailed {
                subset_size: n,
                strategy: self.bisector.strategy(),
            });
        }
        Ok((labels, tree.splits))
    }

    fn descend(
        &self,
        subset: Vec<usize>,
        lo: PartitionId,
        hi: PartitionId,
    ) -> Result<Subtree, PartitionError> {
        let labels = hi - lo + 1;
        if labels == 1 {
            return Ok(Subtree {
                leaves: vec![Leaf {
                    label: lo,
                    vertices: subset,
                }],
                splits: Vec::new(),
            });
        }
        if subset.len() < labels {
            return Err(PartitionError::InsufficientVertices {
                subset_size: subset.len(),
                labels,
            });
        }

        let mid = lo + labels.div_ceil(2);
        let target = target_sizes(subset.len(), mid - lo, labels);
        let (split, retried) = split_with_retry(|attempt| {
            let req = BisectRequest {
                subset: &subset,
                target,
                tie_break: if attempt == 0 {
                    TieBreak::Ascending
                } else {
                    TieBreak::Descending
                },
                seed: subset_seed(self.cfg.rng_seed, attempt, &subset),
            };
            self.bisector.bisect(self.graph, self.coords, &req)
        })?;
        log::debug!(
            "labels [{lo}, {hi}]: {} vertices -> {} + {} via {:?}",
            subset.len(),
            split.left.len(),
            split.right.len(),
            split.path
        );

        let record = SplitRecord {
            subset_size: subset.len(),
            labels: (lo, hi),
            left_size: split.left.len(),
            right_size: split.right.len(),
            path: split.path,
            retried,
        };
        let fork = self.cfg.parallel && subset.len() >= self.cfg.parallel_min_size;
        let BinarySplit { left, right, .. } = split;
        let (l, r) = fork_join(
            fork,
            || self.descend(left, lo, mid - 1),
            || self.descend(right, mid, hi),
        );
        let (mut l, r) = (l?, r?);

        let mut splits = Vec::with_capacity(1 + l.splits.len() + r.splits.len());
        splits.push(record);
        splits.append(&mut l.splits);
        splits.extend(r.splits);
        l.leaves.extend(r.leaves);
        Ok(Subtree {
            leaves: l.leaves,
            splits,
        })
    }
}

/// Target half sizes for `len` vertices when the left half takes `left_parts` of
/// `labels` labels. The proportional size is rounded half up and clamped so each
/// half keeps at least one vertex per label.
pub(crate) fn target_sizes(len: usize, left_parts: usize, labels: usize) -> TargetSizes {
    let right_parts = labels - left_parts;
    let proportional = (2 * len * left_parts + labels) / (2 * labels);
    let left = proportional.clamp(left_parts, len - right_parts);
    TargetSizes {
        left,
        right: len - left,
        left_parts,
        right_parts,
    }
}

/// Run `attempt(0)`; on a degenerate split, retry once with `attempt(1)` (perturbed
/// tie-break and seed). A second degenerate split becomes `PartitioningFailed`.
/// Returns the split and whether the retry was needed.
pub(crate) fn split_with_retry<F>(mut attempt: F) -> Result<(BinarySplit, bool), PartitionError>
where
    F: FnMut(u32) -> Result<BinarySplit, PartitionError>,
{
    match attempt(0) {
        Err(PartitionError::DegenerateSplit {
            subset_size,
            strategy,
        }) => {
            log::warn!(
                "{strategy} bisection of {subset_size} vertices left a half empty; retrying with perturbed tie-break"
            );
        }
        other => return other.map(|split| (split, false)),
    }
    match attempt(1) {
        Err(PartitionError::DegenerateSplit {
            subset_size,
            strategy,
        }) => Err(PartitionError::PartitioningFailed {
            subset_size,
            strategy,
        }),
        other => other.map(|split| (split, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::{SplitPath, Strategy};

    #[test]
    fn target_sizes_follow_rounding_rule() {
        // 10 vertices, 2 labels -> 5/5
        assert_eq!(target_sizes(10, 1, 2).left, 5);
        // 7 vertices, 2 labels -> 3.5 rounds up to 4
        assert_eq!(target_sizes(7, 1, 2).left, 4);
        // 10 vertices, 3 labels, left takes 2 -> 6.67 -> 7
        assert_eq!(target_sizes(10, 2, 3).left, 7);
        // 3 vertices, 3 labels -> 2/1, one vertex per label
        let t = target_sizes(3, 2, 3);
        assert_eq!((t.left, t.right), (2, 1));
        assert_eq!((t.left_parts, t.right_parts), (2, 1));
        // 100 vertices, 4 labels -> 50/50
        assert_eq!(target_sizes(100, 2, 4).left, 50);
    }

    #[test]
    fn target_sizes_never_starve_a_half() {
        for len in 2usize..40 {
            for labels in 2..=len {
                let left_parts = labels.div_ceil(2);
                let t = target_sizes(len, left_parts, labels);
                assert!(t.left >= t.left_parts && t.right >= t.right_parts);
                assert_eq!(t.left + t.right, len);
            }
        }
    }

    fn degenerate() -> PartitionError {
        PartitionError::DegenerateSplit {
            subset_size: 4,
            strategy: Strategy::Spectral,
        }
    }

    fn ok_split() -> BinarySplit {
        BinarySplit {
            left: vec![0, 1],
            right: vec![2, 3],
            path: SplitPath::CoordinateAxis { axis: 0 },
        }
    }

    #[test]
    fn degenerate_split_retried_once() {
        let mut calls = Vec::new();
        let (split, retried) = split_with_retry(|a| {
            calls.push(a);
            if a == 0 { Err(degenerate()) } else { Ok(ok_split()) }
        })
        .unwrap();
        assert!(retried);
        assert_eq!(split, ok_split());
        assert_eq!(calls, vec![0, 1]);
    }

    #[test]
    fn persistent_degenerate_split_fails() {
        let err = split_with_retry(|_| Err(degenerate())).unwrap_err();
        assert_eq!(
            err,
            PartitionError::PartitioningFailed {
                subset_size: 4,
                strategy: Strategy::Spectral
            }
        );
    }

    #[test]
    fn other_errors_not_retried() {
        let mut calls = 0;
        let err = split_with_retry(|_| {
            calls += 1;
            Err(PartitionError::EigenConvergenceFailure {
                iterations: 10,
                residual: 1.0,
            })
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, PartitionError::EigenConvergenceFailure { .. }));
    }
}
