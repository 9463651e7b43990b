//! Recursive inertial bisection step.
//!
//! The subset's coordinates are centred at their centroid; the eigenvector of the
//! largest eigenvalue of their `d × d` covariance matrix is the principal inertial
//! axis. Vertices are projected onto it and median-cut exactly like the
//! coordinate bisector.

use itertools::Itertools;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use super::{BinarySplit, BisectRequest, SplitPath, median_cut};
use crate::data::Coordinates;
use crate::partition_error::PartitionError;

#[derive(Debug, Clone, Copy, Default)]
pub struct InertialBisector;

impl InertialBisector {
    pub fn bisect(
        &self,
        coords: &Coordinates,
        req: &BisectRequest<'_>,
    ) -> Result<BinarySplit, PartitionError> {
        let centroid = centroid(coords, req.subset);
        let (axis, variance) = principal_axis(coords, req.subset, &centroid);
        let keyed = req
            .subset
            .iter()
            .map(|&v| {
                let p = DVector::from_column_slice(coords.point(v)) - &centroid;
                (p.dot(&axis), v)
            })
            .collect();
        let (left, right) = median_cut(keyed, req.target.left, req.tie_break);
        Ok(BinarySplit {
            left,
            right,
            path: SplitPath::InertialAxis { variance },
        })
    }
}

fn centroid(coords: &Coordinates, subset: &[usize]) -> DVector<f64> {
    let mut c = DVector::zeros(coords.dimension());
    for &v in subset {
        c += DVector::from_column_slice(coords.point(v));
    }
    if !subset.is_empty() {
        c /= subset.len() as f64;
    }
    c
}

/// Unit principal axis of the subset and the variance along it.
///
/// The eigenvalue order returned by the dense solver is unspecified, so the first
/// index of the largest eigenvalue is taken, and the axis is oriented so that its
/// largest-magnitude component is positive. A point cloud stretched along a
/// coordinate axis therefore yields exactly that unit axis.
pub fn principal_axis(
    coords: &Coordinates,
    subset: &[usize],
    centroid: &DVector<f64>,
) -> (DVector<f64>, f64) {
    let d = coords.dimension();
    let mut cov = DMatrix::<f64>::zeros(d, d);
    for &v in subset {
        let p = DVector::from_column_slice(coords.point(v)) - centroid;
        cov += &p * p.transpose();
    }
    if !subset.is_empty() {
        cov /= subset.len() as f64;
    }

    let eig = SymmetricEigen::new(cov);
    let idx = eig
        .eigenvalues
        .iter()
        .position_min_by(|a, b| b.total_cmp(a))
        .unwrap_or(0);
    let mut axis: DVector<f64> = eig.eigenvectors.column(idx).into_owned();
    let lead = axis
        .iter()
        .position_min_by(|a, b| b.abs().total_cmp(&a.abs()))
        .unwrap_or(0);
    if axis[lead] < 0.0 {
        axis = -axis;
    }
    (axis, eig.eigenvalues[idx])
}
