//! Partitioning metrics utilities.
//!
//! This module provides functions for evaluating the quality of a partition
//! labeling: edge cut, ratio cut, normalized cut and balance, plus the per-part
//! sizes and volumes they are built from. All of them are pure functions of the
//! graph and the labeling. Terms that would divide by an empty part or a part of
//! zero volume contribute zero.

use hashbrown::HashMap;
use num_traits::ToPrimitive;
use rayon::iter::ParallelIterator;
use serde::{Deserialize, Serialize};

use super::PartitionId;
use crate::graph::PartitionableGraph;
use crate::partition_error::PartitionError;

/// Scalar quality measures of one labeling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub n_parts: usize,
    pub edge_cut: f64,
    pub normalized_cut: f64,
    pub ratio_cut: f64,
    pub balance: f64,
}

/// Quality of `labels`, with the part count inferred as `max label + 1`.
pub fn quality<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
) -> Result<QualityReport, PartitionError> {
    let n_parts = labels.iter().copied().max().map_or(1, |m| m + 1);
    quality_with_parts(g, labels, n_parts)
}

/// Quality of `labels` over exactly `n_parts` parts (some possibly empty).
///
/// Fails only for malformed input: a labeling whose length differs from the
/// vertex count, `n_parts == 0`, or a label `>= n_parts`.
pub fn quality_with_parts<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
    n_parts: usize,
) -> Result<QualityReport, PartitionError> {
    check_labels(g, labels, n_parts)?;
    let crossing = crossing_edges(g, labels);
    let sizes = part_sizes(labels, n_parts);
    let volumes = part_volumes(g, labels, n_parts);
    Ok(QualityReport {
        n_parts,
        edge_cut: crossing.iter().map(|&(_, _, w)| w).sum(),
        normalized_cut: normalized_cut_from(&crossing, labels, &volumes),
        ratio_cut: ratio_cut_from(&crossing, labels, &sizes),
        balance: balance_from(&sizes, labels.len()),
    })
}

/// Validate a labeling against a graph and a part count.
pub fn check_labels<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
    n_parts: usize,
) -> Result<(), PartitionError> {
    if labels.len() != g.num_vertices() {
        return Err(PartitionError::invalid(format!(
            "labeling has {} entries but the graph has {} vertices",
            labels.len(),
            g.num_vertices()
        )));
    }
    if n_parts == 0 {
        return Err(PartitionError::invalid("number of parts must be positive"));
    }
    if let Some((v, &p)) = labels.iter().enumerate().find(|&(_, &p)| p >= n_parts) {
        return Err(PartitionError::invalid(format!(
            "vertex {v} has label {p}, outside [0, {n_parts})"
        )));
    }
    Ok(())
}

/// Computes the edge cut of a labeling (O(E)): the total weight of edges whose
/// endpoints carry different labels.
pub fn edge_cut<G: PartitionableGraph>(g: &G, labels: &[PartitionId]) -> f64 {
    debug_assert_eq!(g.num_vertices(), labels.len());
    g.edges()
        .filter(|&(u, v, _)| labels[u] != labels[v])
        .map(|(_, _, w)| w)
        .sum()
}

/// Ratio cut generalised to `n_parts` parts: the sum over unordered label pairs
/// `(i, j)` of `cut(i, j) / (|i| · |j|)`.
pub fn ratio_cut<G: PartitionableGraph>(g: &G, labels: &[PartitionId], n_parts: usize) -> f64 {
    ratio_cut_from(&crossing_edges(g, labels), labels, &part_sizes(labels, n_parts))
}

/// Normalized cut: the sum over parts `i` of `cut(i, rest) / vol(i)`.
pub fn normalized_cut<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
    n_parts: usize,
) -> f64 {
    normalized_cut_from(
        &crossing_edges(g, labels),
        labels,
        &part_volumes(g, labels, n_parts),
    )
}

/// Size of the largest part over the ideal size `n / n_parts`; 1.0 is perfectly
/// balanced. An empty labeling is balanced.
pub fn balance(labels: &[PartitionId], n_parts: usize) -> f64 {
    balance_from(&part_sizes(labels, n_parts), labels.len())
}

/// Largest relative deviation of a part size above the ideal size.
pub fn imbalance(labels: &[PartitionId], n_parts: usize) -> f64 {
    if n_parts == 0 || labels.is_empty() {
        return 0.0;
    }
    let ideal = labels.len().to_f64().unwrap_or(0.0) / n_parts.to_f64().unwrap_or(1.0);
    part_sizes(labels, n_parts)
        .into_iter()
        .map(|size| (size.to_f64().unwrap_or(0.0) - ideal) / ideal)
        .fold(0.0f64, f64::max)
}

/// Number of vertices carrying each label. Labels `>= n_parts` are ignored.
pub fn part_sizes(labels: &[PartitionId], n_parts: usize) -> Vec<usize> {
    let mut sizes = vec![0; n_parts];
    for &p in labels {
        if p < n_parts {
            sizes[p] += 1;
        }
    }
    sizes
}

/// Sum of weighted degrees of the vertices of each part.
pub fn part_volumes<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
    n_parts: usize,
) -> Vec<f64> {
    let mut volumes = vec![0.0; n_parts];
    for (v, &p) in labels.iter().enumerate() {
        if p < n_parts {
            volumes[p] += g.weighted_degree(v);
        }
    }
    volumes
}

/// Edges `(u, v, w)`, `u < v`, whose endpoints carry different labels, in vertex order.
fn crossing_edges<G: PartitionableGraph>(
    g: &G,
    labels: &[PartitionId],
) -> Vec<(usize, usize, f64)> {
    g.edges()
        .filter(|&(u, v, _)| labels[u] != labels[v])
        .collect()
}

fn ratio_cut_from(
    crossing: &[(usize, usize, f64)],
    labels: &[PartitionId],
    sizes: &[usize],
) -> f64 {
    let mut pair_cut: HashMap<(PartitionId, PartitionId), f64> = HashMap::new();
    for &(u, v, w) in crossing {
        let (a, b) = (labels[u].min(labels[v]), labels[u].max(labels[v]));
        *pair_cut.entry((a, b)).or_insert(0.0) += w;
    }
    // Sum in label order so the result does not depend on hash iteration order.
    let mut pairs: Vec<_> = pair_cut.into_iter().collect();
    pairs.sort_unstable_by_key(|&(key, _)| key);
    pairs
        .into_iter()
        .filter(|&((a, b), _)| sizes[a] > 0 && sizes[b] > 0)
        .map(|((a, b), cut)| cut / (sizes[a] as f64 * sizes[b] as f64))
        .sum()
}

fn normalized_cut_from(
    crossing: &[(usize, usize, f64)],
    labels: &[PartitionId],
    volumes: &[f64],
) -> f64 {
    let mut boundary = vec![0.0; volumes.len()];
    for &(u, v, w) in crossing {
        boundary[labels[u]] += w;
        boundary[labels[v]] += w;
    }
    boundary
        .iter()
        .zip(volumes)
        .filter(|&(_, &vol)| vol > 0.0)
        .map(|(cut, vol)| cut / vol)
        .sum()
}

fn balance_from(sizes: &[usize], n: usize) -> f64 {
    if n == 0 || sizes.is_empty() {
        return 1.0;
    }
    let ideal = n as f64 / sizes.len() as f64;
    sizes.iter().copied().max().unwrap_or(0) as f64 / ideal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightedGraph;

    fn cycle4() -> WeightedGraph {
        // 4-cycle: 0-1-2-3-0, weights 1, 2, 3, 4
        WeightedGraph::from_edges(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)])
            .unwrap()
    }

    #[test]
    fn edge_cut_cycle() {
        let g = cycle4();
        assert_eq!(edge_cut(&g, &[0, 0, 0, 0]), 0.0);
        // (0,1) in part 0, (2,3) in part 1: edges 1-2 and 3-0 cross
        assert_eq!(edge_cut(&g, &[0, 0, 1, 1]), 6.0);
    }

    #[test]
    fn ratio_and_normalized_cut_two_parts() {
        let g = cycle4();
        let labels = [0, 0, 1, 1];
        // cut(0,1) = 6, |0| = |1| = 2
        assert!((ratio_cut(&g, &labels, 2) - 1.5).abs() < 1e-12);
        // vol(0) = 5 + 3 = 8, vol(1) = 5 + 7 = 12
        let expected = 6.0 / 8.0 + 6.0 / 12.0;
        assert!((normalized_cut(&g, &labels, 2) - expected).abs() < 1e-12);
        assert_eq!(part_volumes(&g, &labels, 2), vec![8.0, 12.0]);
    }

    #[test]
    fn ratio_cut_sums_over_pairs() {
        let g = cycle4();
        let labels = [0, 1, 2, 2];
        // pairs: (0,1) w1, (1,2) w2, (0,2) w4; sizes 1, 1, 2
        let expected = 1.0 / 1.0 + 2.0 / 2.0 + 4.0 / 2.0;
        assert!((ratio_cut(&g, &labels, 3) - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_parts_contribute_nothing() {
        let g = cycle4();
        let labels = [0, 0, 2, 2];
        let q = quality_with_parts(&g, &labels, 3).unwrap();
        assert!((q.ratio_cut - 1.5).abs() < 1e-12);
        assert!(q.normalized_cut.is_finite());
        // largest part 2 over ideal 4/3
        assert!((q.balance - 1.5).abs() < 1e-12);
    }

    #[test]
    fn single_part_is_trivial() {
        let g = cycle4();
        let q = quality(&g, &[0, 0, 0, 0]).unwrap();
        assert_eq!(q.n_parts, 1);
        assert_eq!(q.edge_cut, 0.0);
        assert_eq!(q.ratio_cut, 0.0);
        assert_eq!(q.normalized_cut, 0.0);
        assert_eq!(q.balance, 1.0);
    }

    #[test]
    fn zero_volume_part_ignored() {
        // vertex 2 is isolated and alone in part 1
        let g = WeightedGraph::from_edges(3, &[(0, 1, 1.0)]).unwrap();
        let q = quality(&g, &[0, 0, 1]).unwrap();
        assert_eq!(q.edge_cut, 0.0);
        assert_eq!(q.normalized_cut, 0.0);
    }

    #[test]
    fn balance_and_imbalance() {
        let labels = [0, 0, 0, 1];
        assert!((balance(&labels, 2) - 1.5).abs() < 1e-12);
        assert!((imbalance(&labels, 2) - 0.5).abs() < 1e-12);
        assert_eq!(balance(&[], 3), 1.0);
        assert_eq!(imbalance(&[0, 1], 2), 0.0);
        assert_eq!(part_sizes(&labels, 3), vec![3, 1, 0]);
    }

    #[test]
    fn malformed_labelings_rejected() {
        let g = cycle4();
        assert!(quality(&g, &[0, 1]).is_err());
        assert!(quality_with_parts(&g, &[0, 1, 2, 3], 3).is_err());
        assert!(quality_with_parts(&g, &[0, 0, 0, 0], 0).is_err());
    }
}
