//! Weighted undirected graphs: the read-only trait the partitioner consumes, the
//! CSR implementation, and induced subgraphs of vertex subsets.

pub mod csr;
pub mod graph_traits;
pub mod subgraph;

pub use csr::WeightedGraph;
pub use graph_traits::PartitionableGraph;
pub use subgraph::{Components, InducedSubgraph};
