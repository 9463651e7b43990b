//! Immutable CSR (compressed-sparse-row) storage of a weighted undirected graph.
//
// Layout follows the usual METIS triple plus edge weights:
//
// * `xadj[i] .. xadj[i+1]`   = neighbour range of vertex *i*
// * `adjncy`                 = concatenated neighbour vertices, sorted per row
// * `adjwgt`                 = edge weight parallel to `adjncy`
//
// The graph is **symmetric** (i↔j appear in both lists with equal weight),
// **self-free** (no loops) and carries only strictly positive weights.

use std::iter::{Copied, Zip};
use std::slice::Iter;

use sprs::CsMat;

use super::graph_traits::PartitionableGraph;
use crate::partition_error::PartitionError;

/// Iterator over `(neighbor, weight)` pairs of a [`WeightedGraph`] vertex.
pub type Neighbors<'a> = Zip<Copied<Iter<'a, usize>>, Copied<Iter<'a, f64>>>;

/// Symmetric weighted adjacency in CSR form.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    xadj: Vec<usize>,
    adjncy: Vec<usize>,
    adjwgt: Vec<f64>,
}

impl WeightedGraph {
    /// A graph with `n` vertices and no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            xadj: vec![0; n + 1],
            adjncy: Vec::new(),
            adjwgt: Vec::new(),
        }
    }

    /// Build from undirected edges `(u, v, w)`.
    ///
    /// Each edge is inserted in both directions; repeated edges have their weights
    /// summed. Self-loops and zero weights are ignored. Negative or non-finite
    /// weights and endpoints `>= n` are rejected.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self, PartitionError> {
        let mut entries = Vec::with_capacity(edges.len() * 2);
        for &(u, v, w) in edges {
            if let Some(w) = check_entry(n, u, v, w)? {
                entries.push((u, v, w));
                entries.push((v, u, w));
            }
        }
        Ok(Self::assemble(n, entries))
    }

    /// Build from sparse matrix triples `(row, col, w)`.
    ///
    /// The triple set must describe a symmetric matrix; repeated triples are summed
    /// before the symmetry check. Diagonal entries are ignored.
    pub fn from_triplets(
        n: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self, PartitionError> {
        let mut entries = Vec::with_capacity(triplets.len());
        for &(r, c, w) in triplets {
            if let Some(w) = check_entry(n, r, c, w)? {
                entries.push((r, c, w));
            }
        }
        let graph = Self::assemble(n, entries);
        graph.check_symmetric()?;
        Ok(graph)
    }

    /// Build from a square `sprs` matrix (CSR or CSC); must be symmetric.
    pub fn from_csmat(mat: &CsMat<f64>) -> Result<Self, PartitionError> {
        if mat.rows() != mat.cols() {
            return Err(PartitionError::invalid(format!(
                "adjacency matrix must be square, got {}x{}",
                mat.rows(),
                mat.cols()
            )));
        }
        let triplets: Vec<(usize, usize, f64)> =
            mat.iter().map(|(&w, (r, c))| (r, c, w)).collect();
        Self::from_triplets(mat.rows(), &triplets)
    }

    /// Export as a CSR `sprs` matrix, e.g. for plotting or external solvers.
    pub fn to_csmat(&self) -> CsMat<f64> {
        let n = self.num_vertices();
        CsMat::new(
            (n, n),
            self.xadj.clone(),
            self.adjncy.clone(),
            self.adjwgt.clone(),
        )
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.adjncy.len() / 2
    }

    /// Sum of all undirected edge weights.
    pub fn total_weight(&self) -> f64 {
        self.adjwgt.iter().sum::<f64>() / 2.0
    }

    /// Weight of edge `{u, v}`, if present.
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        if u >= self.num_vertices() {
            return None;
        }
        let (start, end) = (self.xadj[u], self.xadj[u + 1]);
        self.adjncy[start..end]
            .binary_search(&v)
            .ok()
            .map(|i| self.adjwgt[start + i])
    }

    pub fn xadj(&self) -> &[usize] {
        &self.xadj
    }

    pub fn adjncy(&self) -> &[usize] {
        &self.adjncy
    }

    pub fn adjwgt(&self) -> &[f64] {
        &self.adjwgt
    }

    // -----------------------------------------------------------------------
    // internal routines
    // -----------------------------------------------------------------------

    /// Sort directed entries, merge duplicates, and lay them out as CSR.
    fn assemble(n: usize, mut entries: Vec<(usize, usize, f64)>) -> Self {
        entries.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let mut merged: Vec<(usize, usize, f64)> = Vec::with_capacity(entries.len());
        for (u, v, w) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == u && last.1 == v => last.2 += w,
                _ => merged.push((u, v, w)),
            }
        }

        let mut xadj = vec![0usize; n + 1];
        for &(u, _, _) in &merged {
            xadj[u + 1] += 1;
        }
        for i in 0..n {
            xadj[i + 1] += xadj[i];
        }
        let (adjncy, adjwgt) = merged.into_iter().map(|(_, v, w)| (v, w)).unzip();
        Self {
            xadj,
            adjncy,
            adjwgt,
        }
    }

    fn check_symmetric(&self) -> Result<(), PartitionError> {
        for u in 0..self.num_vertices() {
            for (v, w) in self.neighbors(u) {
                let back = self.edge_weight(v, u).unwrap_or(0.0);
                let scale = w.abs().max(back.abs()).max(1.0);
                if (w - back).abs() > 1e-12 * scale {
                    return Err(PartitionError::invalid(format!(
                        "adjacency is not symmetric: w({u},{v}) = {w} but w({v},{u}) = {back}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validate one entry; `Ok(None)` means the entry is dropped (self-loop or zero weight).
fn check_entry(n: usize, u: usize, v: usize, w: f64) -> Result<Option<f64>, PartitionError> {
    if u >= n || v >= n {
        return Err(PartitionError::invalid(format!(
            "edge ({u}, {v}) out of range for {n} vertices"
        )));
    }
    if !w.is_finite() || w < 0.0 {
        return Err(PartitionError::invalid(format!(
            "edge ({u}, {v}) has invalid weight {w}"
        )));
    }
    if u == v {
        log::debug!("ignoring self-loop on vertex {u}");
        return Ok(None);
    }
    if w == 0.0 {
        return Ok(None);
    }
    Ok(Some(w))
}

impl PartitionableGraph for WeightedGraph {
    type NeighIter<'a> = Neighbors<'a>;

    fn num_vertices(&self) -> usize {
        self.xadj.len() - 1
    }

    fn neighbors(&self, v: usize) -> Self::NeighIter<'_> {
        let (start, end) = (self.xadj[v], self.xadj[v + 1]);
        self.adjncy[start..end]
            .iter()
            .copied()
            .zip(self.adjwgt[start..end].iter().copied())
    }

    fn weighted_degree(&self, v: usize) -> f64 {
        self.adjwgt[self.xadj[v]..self.xadj[v + 1]].iter().sum()
    }
}
