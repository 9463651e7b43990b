//! Recursive spectral bisection step.
//!
//! For a connected subset the combinatorial Laplacian `L = D − A` of the induced
//! subgraph is handed to the Lanczos solver with the constant vector deflated, which
//! yields the Fiedler pair directly. Vertices are median-cut along the Fiedler vector.
//!
//! A disconnected subgraph has a Laplacian null space of dimension > 1 and no
//! meaningful Fiedler vector. Components are detected up front and the subset is
//! split along component boundaries instead (`SplitPath::ComponentBoundary`).

use itertools::Itertools;
use rand::Rng;

use super::{BinarySplit, BisectRequest, SplitPath, TargetSizes, TieBreak, median_cut};
use crate::graph::{Components, InducedSubgraph, PartitionableGraph};
use crate::linalg::{EigenConfig, SymmetricOperator, smallest_eigenpair};
use crate::partition_error::PartitionError;
use crate::partitioning::parallel::subset_rng;

/// λ₂ below this fraction of the Laplacian bound is reported as a near-disconnection.
const NEAR_DISCONNECTED: f64 = 1e-10;

const START_NOISE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralBisector {
    eigen: EigenConfig,
}

/// The subgraph Laplacian as a Lanczos operator.
struct Laplacian<'g, 's>(&'g InducedSubgraph<'s>);

impl SymmetricOperator for Laplacian<'_, '_> {
    fn dim(&self) -> usize {
        self.0.len()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        self.0.laplacian_apply(x, y);
    }

    fn norm_bound(&self) -> f64 {
        self.0.laplacian_bound()
    }
}

impl SpectralBisector {
    pub fn new(eigen: EigenConfig) -> Self {
        Self { eigen }
    }

    pub fn bisect<G: PartitionableGraph>(
        &self,
        graph: &G,
        req: &BisectRequest<'_>,
    ) -> Result<BinarySplit, PartitionError> {
        let sub = InducedSubgraph::new(graph, req.subset);
        let components = sub.components();
        if components.count() > 1 {
            log::info!(
                "subset of {} vertices has {} connected components; splitting along component boundaries",
                sub.len(),
                components.count()
            );
            return Ok(component_split(&sub, &components, req.target, req.tie_break));
        }

        let n = sub.len();
        let ones = vec![vec![1.0 / (n as f64).sqrt(); n]];
        let start = level_start(&sub, req.seed);
        let op = Laplacian(&sub);
        let pair = smallest_eigenpair(&op, &ones, start, &self.eigen)?;
        if pair.value <= NEAR_DISCONNECTED * op.norm_bound() {
            log::warn!(
                "subset of {n} vertices is nearly disconnected (lambda2 = {:.3e})",
                pair.value
            );
        }

        // Orient the Fiedler vector so the subset's first vertex is on the non-positive side.
        let sign = if pair.vector[0] > 0.0 { -1.0 } else { 1.0 };
        let keyed = pair
            .vector
            .iter()
            .zip(req.subset)
            .map(|(&x, &v)| (sign * x, v))
            .collect();
        let (left, right) = median_cut(keyed, req.target.left, req.tie_break);
        Ok(BinarySplit {
            left,
            right,
            path: SplitPath::Fiedler {
                lambda2: pair.value,
                iterations: pair.iterations,
            },
        })
    }
}

/// Start vector for the Fiedler solve: a half cosine over the BFS levels from a
/// pseudo-peripheral vertex, which approximates the slowest mode of long and
/// thin subgraphs, plus a seeded perturbation of relative size `START_NOISE`.
fn level_start(sub: &InducedSubgraph<'_>, seed: u64) -> Vec<f64> {
    let (_, levels) = sub.pseudo_peripheral();
    let depth = levels.iter().copied().max().unwrap_or(0);
    let mut rng = subset_rng(seed);
    levels
        .iter()
        .map(|&l| {
            let phase = std::f64::consts::PI * (l as f64 + 0.5) / (depth as f64 + 1.0);
            phase.cos() + START_NOISE * rng.gen_range(-1.0..1.0)
        })
        .collect()
}

/// Split a disconnected subgraph without cutting components where possible.
///
/// Components are packed first-fit into the left half, largest first, without
/// exceeding the left target. If that leaves either half smaller than the number
/// of labels it must carry, the vertices are instead ordered component by
/// component (packed ones first) and cut at the target, which divides at most one
/// component.
fn component_split(
    sub: &InducedSubgraph<'_>,
    components: &Components,
    target: TargetSizes,
    tie_break: TieBreak,
) -> BinarySplit {
    let order: Vec<usize> = (0..components.count())
        .sorted_by(|&a, &b| components.sizes[b].cmp(&components.sizes[a]).then(a.cmp(&b)))
        .collect();
    let mut packed = vec![false; components.count()];
    let mut left_size = 0;
    for &c in &order {
        if left_size + components.sizes[c] <= target.left {
            packed[c] = true;
            left_size += components.sizes[c];
        }
    }

    let right_size = sub.len() - left_size;
    let whole = left_size >= target.left_parts.max(1) && right_size >= target.right_parts.max(1);
    let path = SplitPath::ComponentBoundary {
        components: components.count(),
        split_component: !whole,
    };

    if whole {
        let (left, right): (Vec<usize>, Vec<usize>) = sub
            .vertices()
            .iter()
            .enumerate()
            .partition_map(|(i, &v)| {
                if packed[components.labels[i]] {
                    itertools::Either::Left(v)
                } else {
                    itertools::Either::Right(v)
                }
            });
        return BinarySplit { left, right, path };
    }

    let mut rank = vec![0usize; components.count()];
    for (r, &c) in order
        .iter()
        .filter(|&&c| packed[c])
        .chain(order.iter().filter(|&&c| !packed[c]))
        .enumerate()
    {
        rank[c] = r;
    }
    let keyed = sub
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, &v)| (rank[components.labels[i]] as f64, v))
        .collect();
    let (left, right) = median_cut(keyed, target.left, tie_break);
    BinarySplit { left, right, path }
}
