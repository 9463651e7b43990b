//! Induced subgraph of a vertex subset, re-indexed locally.
//!
//! The bisectors work on one vertex subset at a time. [`InducedSubgraph`] keeps the
//! subset's global ids (local index = position in the subset) and a local CSR of the
//! edges with both endpoints inside the subset. Degrees are taken inside the
//! subgraph, so the Laplacian built from it is that of the induced subgraph.

use std::collections::VecDeque;

use hashbrown::HashMap;
use rayon::prelude::*;

use super::graph_traits::PartitionableGraph;

/// Above this many rows the Laplacian product runs on the rayon pool.
const PAR_MATVEC_MIN_ROWS: usize = 4096;

/// Local CSR view of the subgraph induced by a vertex subset.
#[derive(Debug, Clone)]
pub struct InducedSubgraph<'s> {
    vertices: &'s [usize],
    xadj: Vec<usize>,
    adjncy: Vec<usize>,
    adjwgt: Vec<f64>,
    degree: Vec<f64>,
}

/// Connected components of an [`InducedSubgraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// Component id of each local vertex. Ids are assigned in order of each
    /// component's lowest local index.
    pub labels: Vec<usize>,
    /// Number of vertices in each component.
    pub sizes: Vec<usize>,
}

impl Components {
    pub fn count(&self) -> usize {
        self.sizes.len()
    }
}

impl<'s> InducedSubgraph<'s> {
    /// Extract the subgraph of `graph` induced by `vertices` (global ids, no duplicates).
    pub fn new<G: PartitionableGraph>(graph: &G, vertices: &'s [usize]) -> Self {
        let local_of: HashMap<usize, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let mut xadj = Vec::with_capacity(vertices.len() + 1);
        let mut adjncy = Vec::new();
        let mut adjwgt = Vec::new();
        let mut degree = Vec::with_capacity(vertices.len());
        xadj.push(0);
        for &v in vertices {
            let mut d = 0.0;
            for (u, w) in graph.neighbors(v) {
                if u == v {
                    continue;
                }
                if let Some(&lu) = local_of.get(&u) {
                    adjncy.push(lu);
                    adjwgt.push(w);
                    d += w;
                }
            }
            xadj.push(adjncy.len());
            degree.push(d);
        }

        Self {
            vertices,
            xadj,
            adjncy,
            adjwgt,
            degree,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Global ids, indexed by local vertex.
    pub fn vertices(&self) -> &'s [usize] {
        self.vertices
    }

    /// Weighted degree of local vertex `i` inside the subgraph.
    pub fn degree(&self, i: usize) -> f64 {
        self.degree[i]
    }

    /// `(local neighbor, weight)` pairs of local vertex `i`.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = (self.xadj[i], self.xadj[i + 1]);
        self.adjncy[start..end]
            .iter()
            .copied()
            .zip(self.adjwgt[start..end].iter().copied())
    }

    /// Gershgorin bound on the Laplacian spectrum: `2 * max degree`.
    pub fn laplacian_bound(&self) -> f64 {
        2.0 * self.degree.iter().copied().fold(0.0, f64::max)
    }

    /// `y = (D - A) x` for the subgraph Laplacian.
    pub fn laplacian_apply(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.len());
        debug_assert_eq!(y.len(), self.len());
        let row = |i: usize| -> f64 {
            let off: f64 = self.neighbors(i).map(|(j, w)| w * x[j]).sum();
            self.degree[i] * x[i] - off
        };
        if self.len() >= PAR_MATVEC_MIN_ROWS {
            y.par_iter_mut().enumerate().for_each(|(i, yi)| *yi = row(i));
        } else {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = row(i);
            }
        }
    }

    /// Breadth-first distance of every local vertex from `root`; `usize::MAX`
    /// marks vertices in other components.
    pub fn bfs_levels(&self, root: usize) -> Vec<usize> {
        let mut levels = vec![usize::MAX; self.len()];
        let mut queue = VecDeque::new();
        levels[root] = 0;
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            for (u, _) in self.neighbors(v) {
                if levels[u] == usize::MAX {
                    levels[u] = levels[v] + 1;
                    queue.push_back(u);
                }
            }
        }
        levels
    }

    /// Root of maximal eccentricity found by repeated sweeps from local vertex 0,
    /// with its BFS levels. Each sweep restarts from the lowest-indexed vertex
    /// of the deepest level, until the depth stops growing.
    pub fn pseudo_peripheral(&self) -> (usize, Vec<usize>) {
        let depth = |levels: &[usize]| {
            levels
                .iter()
                .copied()
                .filter(|&l| l != usize::MAX)
                .max()
                .unwrap_or(0)
        };
        let mut root = 0;
        let mut levels = self.bfs_levels(root);
        loop {
            let ecc = depth(&levels);
            let Some(far) = levels.iter().position(|&l| l == ecc) else {
                break;
            };
            let candidate = self.bfs_levels(far);
            if depth(&candidate) <= ecc {
                break;
            }
            root = far;
            levels = candidate;
        }
        (root, levels)
    }

    /// Breadth-first labelling of connected components.
    pub fn components(&self) -> Components {
        let n = self.len();
        let mut labels = vec![usize::MAX; n];
        let mut sizes = Vec::new();
        let mut queue = VecDeque::new();
        for root in 0..n {
            if labels[root] != usize::MAX {
                continue;
            }
            let cid = sizes.len();
            let mut size = 0;
            labels[root] = cid;
            queue.push_back(root);
            while let Some(v) = queue.pop_front() {
                size += 1;
                for (u, _) in self.neighbors(v) {
                    if labels[u] == usize::MAX {
                        labels[u] = cid;
                        queue.push_back(u);
                    }
                }
            }
            sizes.push(size);
        }
        Components { labels, sizes }
    }
}
