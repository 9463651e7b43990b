//! # mesh-bisect
//!
//! mesh-bisect partitions weighted undirected graphs into `k` balanced,
//! low-connectivity parts by recursive bisection, and measures the quality of any
//! labeling it is given.
//!
//! ## Features
//! - Coordinate (RCB), inertial (RIB) and spectral (RSB) bisectors behind one
//!   closed [`Bisector`](crate::partitioning::Bisector) type
//! - Arbitrary part counts through proportional label splits
//! - Thick-restart Lanczos eigensolver with deflation for Fiedler vectors on large
//!   sparse subgraphs; disconnected subgraphs are split along components
//! - Edge cut, ratio cut, normalized cut and balance metrics
//! - Fork-join parallelism over the partition tree with rayon
//! - Optional METIS k-way/recursive partitioning (`metis-support`)
//!
//! ## Determinism
//!
//! All randomized decisions use `SmallRng` seeds derived from the configured
//! `rng_seed` and the vertex subset being split, so runs are reproducible and the
//! parallel and sequential paths produce identical labelings.
//!
//! ## Usage
//!
//! ```
//! use mesh_bisect::prelude::*;
//!
//! let edges: Vec<_> = (0..7).map(|i| (i, i + 1, 1.0)).collect();
//! let graph = WeightedGraph::from_edges(8, &edges)?;
//! let labels = partition(&graph, None, 2, Strategy::Spectral)?;
//! let report = quality(&graph, &labels)?;
//! assert_eq!(report.edge_cut, 1.0);
//! # Ok::<(), PartitionError>(())
//! ```

pub mod data;
pub mod graph;
pub mod linalg;
pub mod partition_error;
pub mod partitioning;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::Coordinates;
    pub use crate::graph::{PartitionableGraph, WeightedGraph};
    pub use crate::linalg::EigenConfig;
    pub use crate::partition_error::PartitionError;
    pub use crate::partitioning::{
        MultiwayMode, PartitionId, PartitionOutcome, PartitionerConfig, QualityReport,
        SplitPath, SplitRecord, Strategy, partition, partition_with_config, quality,
        quality_with_parts,
    };
}
