#![allow(dead_code)]
use mesh_bisect::prelude::*;

/// Path 0-1-...-(n-1) with unit weights.
pub fn path(n: usize) -> WeightedGraph {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i, 1.0)).collect();
    WeightedGraph::from_edges(n, &edges).unwrap()
}

/// Complete graph on `base..base+size` as edge triples.
pub fn clique_edges(base: usize, size: usize) -> Vec<(usize, usize, f64)> {
    let mut edges = Vec::new();
    for i in 0..size {
        for j in i + 1..size {
            edges.push((base + i, base + j, 1.0));
        }
    }
    edges
}

/// Two cliques of `size` vertices joined by a single unit-weight bridge.
pub fn barbell(size: usize) -> WeightedGraph {
    let mut edges = clique_edges(0, size);
    edges.extend(clique_edges(size, size));
    edges.push((size - 1, size, 1.0));
    WeightedGraph::from_edges(2 * size, &edges).unwrap()
}

/// `nx × ny` grid graph and its vertex positions, row-major.
pub fn grid(nx: usize, ny: usize) -> (WeightedGraph, Coordinates) {
    let id = |i: usize, j: usize| j * nx + i;
    let mut edges = Vec::new();
    let mut pts = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            if i + 1 < nx {
                edges.push((id(i, j), id(i + 1, j), 1.0));
            }
            if j + 1 < ny {
                edges.push((id(i, j), id(i, j + 1), 1.0));
            }
            pts.push([i as f64, j as f64]);
        }
    }
    (
        WeightedGraph::from_edges(nx * ny, &edges).unwrap(),
        Coordinates::from_points(&pts).unwrap(),
    )
}

/// Every vertex labeled, labels in `[0, k)`, every label used.
pub fn assert_valid_labeling(labels: &[PartitionId], n: usize, k: usize) {
    assert_eq!(labels.len(), n, "labeling length");
    let mut seen = vec![false; k];
    for (v, &p) in labels.iter().enumerate() {
        assert!(p < k, "vertex {v} has label {p} >= {k}");
        seen[p] = true;
    }
    assert!(seen.iter().all(|&s| s), "unused labels in {labels:?}");
}

/// Vertices carrying label `p`, ascending.
pub fn part(labels: &[PartitionId], p: PartitionId) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|&(_, &q)| q == p)
        .map(|(v, _)| v)
        .collect()
}
