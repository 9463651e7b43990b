// Graph trait abstraction for partitioning
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Read-only view of a symmetric, nonnegatively weighted undirected graph.
///
/// Vertices are the dense indices `0..num_vertices()`. Every edge `{u, v}` must be
/// reported from both endpoints with the same weight. All methods are read-only and
/// thread-safe; the partitioner evaluates sibling subtrees concurrently against the
/// same graph.
pub trait PartitionableGraph: Sync {
    /// Sequential iterator over `(neighbor, weight)` pairs.
    type NeighIter<'a>: Iterator<Item = (usize, f64)> + 'a
    where
        Self: 'a;

    /// Number of vertices.
    fn num_vertices(&self) -> usize;

    /// Returns `(neighbor, weight)` pairs of `v`.
    fn neighbors(&self, v: usize) -> Self::NeighIter<'_>;

    /// Weighted degree (volume) of `v`: sum of incident edge weights, self-loops excluded.
    fn weighted_degree(&self, v: usize) -> f64 {
        self.neighbors(v)
            .filter(|&(u, _)| u != v)
            .map(|(_, w)| w)
            .sum()
    }

    /// Returns a parallel, indexable iterator over all vertices.
    fn vertices(&self) -> rayon::range::Iter<usize> {
        (0..self.num_vertices()).into_par_iter()
    }

    /// Returns a parallel iterator over all undirected edges `(u, v, w)` with `u < v`.
    fn edges(&self) -> impl ParallelIterator<Item = (usize, usize, f64)> + '_ {
        self.vertices().flat_map_iter(move |u| {
            self.neighbors(u)
                .filter(move |&(v, _)| u < v)
                .map(move |(v, w)| (u, v, w))
                .collect::<Vec<_>>()
                .into_iter()
        })
    }
}
