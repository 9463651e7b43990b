//! Recursive coordinate bisection step: a median cut along the axis of largest spread.
//!
//! Edge weights are ignored entirely; this is the geometric baseline the other
//! strategies are compared against.

use itertools::{Itertools, MinMaxResult};

use super::{BinarySplit, BisectRequest, SplitPath, median_cut};
use crate::data::Coordinates;
use crate::partition_error::PartitionError;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateBisector;

impl CoordinateBisector {
    pub fn bisect(
        &self,
        coords: &Coordinates,
        req: &BisectRequest<'_>,
    ) -> Result<BinarySplit, PartitionError> {
        let axis = widest_axis(coords, req.subset);
        let keyed = req
            .subset
            .iter()
            .map(|&v| (coords.point(v)[axis], v))
            .collect();
        let (left, right) = median_cut(keyed, req.target.left, req.tie_break);
        Ok(BinarySplit {
            left,
            right,
            path: SplitPath::CoordinateAxis { axis },
        })
    }
}

/// Axis with the largest `max - min` over `subset`; the lowest axis wins ties.
pub fn widest_axis(coords: &Coordinates, subset: &[usize]) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for axis in 0..coords.dimension() {
        let spread = match subset.iter().map(|&v| coords.point(v)[axis]).minmax() {
            MinMaxResult::NoElements => 0.0,
            MinMaxResult::OneElement(_) => 0.0,
            MinMaxResult::MinMax(lo, hi) => hi - lo,
        };
        if spread > best.1 {
            best = (axis, spread);
        }
    }
    best.0
}
