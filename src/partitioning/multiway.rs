//! Adapter to the METIS multilevel partitioner, a one-shot alternative to recursive
//! bisection with the same output contract.
//!
//! METIS only accepts integer edge weights; weights are rounded to the nearest
//! integer and clamped to at least 1 so no edge disappears.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PartitionId;
use crate::graph::PartitionableGraph;
use crate::partition_error::PartitionError;

/// Which METIS driver to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiwayMode {
    /// `METIS_PartGraphKway`
    KWay,
    /// `METIS_PartGraphRecursive`
    Recursive,
}

impl fmt::Display for MultiwayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiwayMode::KWay => write!(f, "kway"),
            MultiwayMode::Recursive => write!(f, "recursive"),
        }
    }
}

/// Partition `graph` into `n_parts` parts with METIS.
#[cfg(feature = "metis-support")]
pub fn partition_multiway<G: PartitionableGraph>(
    graph: &G,
    n_parts: usize,
    mode: MultiwayMode,
) -> Result<Vec<PartitionId>, PartitionError> {
    use metis::Idx;

    let n = graph.num_vertices();
    if n_parts == 1 {
        return Ok(vec![0; n]);
    }
    let to_idx = |x: usize| {
        Idx::try_from(x)
            .map_err(|_| PartitionError::invalid(format!("{x} exceeds the METIS index range")))
    };

    let mut xadj: Vec<Idx> = Vec::with_capacity(n + 1);
    let mut adjncy: Vec<Idx> = Vec::new();
    let mut adjwgt: Vec<Idx> = Vec::new();
    xadj.push(0);
    for v in 0..n {
        for (u, w) in graph.neighbors(v) {
            if u == v {
                continue;
            }
            adjncy.push(to_idx(u)?);
            let w: Idx = num_traits::cast(w.round().max(1.0)).ok_or_else(|| {
                PartitionError::invalid(format!("edge weight {w} exceeds the METIS range"))
            })?;
            adjwgt.push(w);
        }
        xadj.push(to_idx(adjncy.len())?);
    }

    let mut part: Vec<Idx> = vec![0; n];
    let handle = metis::Graph::new(1, to_idx(n_parts)?, &mut xadj, &mut adjncy)
        .map_err(|e| PartitionError::External(e.to_string()))?
        .set_adjwgt(&mut adjwgt);
    let objval = match mode {
        MultiwayMode::KWay => handle.part_kway(&mut part),
        MultiwayMode::Recursive => handle.part_recursive(&mut part),
    }
    .map_err(|e| PartitionError::External(e.to_string()))?;
    log::debug!("METIS {mode} partition into {n_parts} parts: objective {objval}");

    part.into_iter()
        .map(|p| {
            usize::try_from(p)
                .map_err(|_| PartitionError::External(format!("METIS returned label {p}")))
        })
        .collect()
}

/// Partition `graph` into `n_parts` parts with METIS.
///
/// Always fails: the crate was built without the `metis-support` feature.
#[cfg(not(feature = "metis-support"))]
pub fn partition_multiway<G: PartitionableGraph>(
    _graph: &G,
    _n_parts: usize,
    mode: MultiwayMode,
) -> Result<Vec<PartitionId>, PartitionError> {
    Err(PartitionError::invalid(format!(
        "METIS {mode} partitioning requires the `metis-support` feature"
    )))
}
