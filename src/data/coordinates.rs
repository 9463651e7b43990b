//! Vertex embedding storage for the geometric bisectors.
//!
//! Coordinates are stored row-major with a fixed dimension per vertex; row `v`
//! is the position of graph vertex `v`.

use crate::partition_error::PartitionError;

/// Dense `n × d` vertex coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinates {
    dimension: usize,
    values: Vec<f64>,
}

impl Coordinates {
    /// Wrap a row-major buffer of `n * dimension` values.
    ///
    /// Fails on a zero dimension, a buffer length that is not a multiple of the
    /// dimension, or non-finite values.
    pub fn try_new(dimension: usize, values: Vec<f64>) -> Result<Self, PartitionError> {
        if dimension == 0 {
            return Err(PartitionError::invalid("coordinate dimension must be positive"));
        }
        if values.len() % dimension != 0 {
            return Err(PartitionError::invalid(format!(
                "{} coordinate values do not form rows of dimension {dimension}",
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|x| !x.is_finite()) {
            return Err(PartitionError::invalid(format!(
                "non-finite coordinate for vertex {}",
                pos / dimension
            )));
        }
        Ok(Self { dimension, values })
    }

    /// Build from fixed-size points, e.g. `&[[x, y]]`.
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Result<Self, PartitionError> {
        Self::try_new(D, points.iter().flatten().copied().collect())
    }

    /// Build from rows that must all share one length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, PartitionError> {
        let dimension = rows.first().map_or(1, Vec::len);
        if let Some((v, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimension) {
            return Err(PartitionError::invalid(format!(
                "vertex {v} has {} coordinates, expected {dimension}",
                row.len()
            )));
        }
        Self::try_new(dimension, rows.concat())
    }

    /// Returns the spatial dimension per vertex.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of vertices described.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.dimension
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the coordinates of vertex `v`.
    #[inline]
    pub fn point(&self, v: usize) -> &[f64] {
        &self.values[v * self.dimension..(v + 1) * self.dimension]
    }

    /// Row-major backing buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Ensure these coordinates describe exactly `n` vertices.
    pub fn check_len(&self, n: usize) -> Result<(), PartitionError> {
        if self.len() != n {
            return Err(PartitionError::invalid(format!(
                "coordinates describe {} vertices but the graph has {n}",
                self.len()
            )));
        }
        Ok(())
    }
}
