//! Thick-restart Lanczos iteration for the smallest eigenpair of a sparse
//! symmetric operator on the orthogonal complement of a known subspace.
//!
//! Each cycle grows an orthonormal basis `V` to `krylov_dim` vectors by applying
//! the operator to the newest basis vector, with two Gram-Schmidt passes against
//! the basis and the deflated subspace. The projection `H = Vᵀ A V` is solved with
//! [`nalgebra::SymmetricEigen`]. When the smallest Ritz pair has not reached
//! `‖A y − θ y‖ ≤ tolerance · ‖A‖`, the cycle restarts from the lowest half of the
//! Ritz vectors plus the normalized residual, which keeps the Krylov structure
//! and the progress made on the low end of the spectrum. Only operator products
//! and basis vectors touch the full dimension; nothing of size `n × n` is formed.

use itertools::Itertools;
use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

use super::{dot, norm, normalize, orthogonalize};
use crate::partition_error::PartitionError;

/// A linear operator `y = A x` with `A` symmetric.
pub trait SymmetricOperator: Sync {
    fn dim(&self) -> usize;
    fn apply(&self, x: &[f64], y: &mut [f64]);
    /// Upper bound on the spectral radius, used to scale tolerances.
    fn norm_bound(&self) -> f64;
}

/// Iteration budget and stopping rule of the eigensolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenConfig {
    /// Maximum basis size per restart cycle; at least 2 is used.
    pub krylov_dim: usize,
    /// Restart cycles before giving up.
    pub max_restarts: usize,
    /// Relative residual tolerance.
    pub tolerance: f64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            krylov_dim: 48,
            max_restarts: 400,
            tolerance: 1e-9,
        }
    }
}

/// A converged eigenpair.
#[derive(Debug, Clone)]
pub struct EigenPair {
    pub value: f64,
    /// Unit-norm eigenvector.
    pub vector: Vec<f64>,
    /// Operator applications spent.
    pub iterations: usize,
    pub residual: f64,
}

/// Relative size under which a new basis direction counts as a breakdown, i.e.
/// the basis spans an invariant subspace and its Ritz pairs are exact.
const BREAKDOWN: f64 = 1e-12;

/// Smallest eigenpair of `op` restricted to the complement of `deflation`.
///
/// `deflation` must be orthonormal. `start` seeds the first cycle and must not lie
/// inside the deflated subspace.
pub fn smallest_eigenpair<A: SymmetricOperator>(
    op: &A,
    deflation: &[Vec<f64>],
    start: Vec<f64>,
    cfg: &EigenConfig,
) -> Result<EigenPair, PartitionError> {
    let n = op.dim();
    if start.len() != n {
        return Err(PartitionError::invalid(format!(
            "start vector has length {}, operator dimension is {n}",
            start.len()
        )));
    }
    let free = n.saturating_sub(deflation.len());
    if free == 0 {
        return Err(PartitionError::invalid(
            "deflated subspace leaves no room for an eigenvector",
        ));
    }
    let m = cfg.krylov_dim.max(2).min(free);
    let keep = (m / 2).max(1);
    let scale = op.norm_bound().max(f64::MIN_POSITIVE);
    let threshold = cfg.tolerance * scale;

    let mut q0 = start;
    orthogonalize(&mut q0, deflation);
    if normalize(&mut q0) <= BREAKDOWN {
        return Err(PartitionError::invalid(
            "start vector lies in the deflated subspace",
        ));
    }

    let mut basis: Vec<Vec<f64>> = vec![q0];
    let mut images: Vec<Vec<f64>> = Vec::with_capacity(m);
    let mut h = DMatrix::<f64>::zeros(m, m);
    let mut iterations = 0;
    let mut residual = f64::INFINITY;
    for cycle in 0..=cfg.max_restarts {
        let mut invariant = false;
        while images.len() < basis.len() {
            let j = images.len();
            let mut w = vec![0.0; n];
            op.apply(&basis[j], &mut w);
            iterations += 1;
            for (i, q) in basis.iter().enumerate() {
                let hij = dot(q, &w);
                h[(i, j)] = hij;
                h[(j, i)] = hij;
            }
            if basis.len() < m {
                let mut next = w.clone();
                // Two passes keep the basis orthogonal to working precision.
                for _ in 0..2 {
                    orthogonalize(&mut next, deflation);
                    orthogonalize(&mut next, &basis);
                }
                let b = normalize(&mut next);
                images.push(w);
                if b <= BREAKDOWN * scale {
                    invariant = true;
                    break;
                }
                basis.push(next);
            } else {
                images.push(w);
            }
        }

        let k = basis.len();
        let eig = SymmetricEigen::new(h.view((0, 0), (k, k)).into_owned());
        let order: Vec<usize> = (0..k)
            .sorted_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]))
            .collect();
        let theta = eig.eigenvalues[order[0]];
        let s = eig.eigenvectors.column(order[0]);
        let y = combine(&basis, s.iter());
        let ay = combine(&images, s.iter());
        let mut r: Vec<f64> = ay.iter().zip(&y).map(|(a, x)| a - theta * x).collect();
        residual = norm(&r);
        log::trace!("lanczos cycle {cycle}: basis={k} ritz={theta:.6e} residual={residual:.3e}");
        // A basis spanning the whole complement gives exact Ritz pairs.
        if residual <= threshold || invariant || k == free {
            return Ok(finish(theta, y, deflation, iterations, residual));
        }
        if cycle == cfg.max_restarts {
            break;
        }

        // Restart from the lowest Ritz vectors; the residual continues the basis.
        let kept = keep.min(k - 1);
        let mut ritz = Vec::with_capacity(m);
        let mut ritz_images = Vec::with_capacity(m);
        h.fill(0.0);
        for (slot, &c) in order.iter().take(kept).enumerate() {
            let col = eig.eigenvectors.column(c);
            ritz.push(combine(&basis, col.iter()));
            ritz_images.push(combine(&images, col.iter()));
            h[(slot, slot)] = eig.eigenvalues[c];
        }
        for _ in 0..2 {
            orthogonalize(&mut r, deflation);
            orthogonalize(&mut r, &ritz);
        }
        if normalize(&mut r) <= BREAKDOWN * scale {
            return Ok(finish(theta, y, deflation, iterations, residual));
        }
        ritz.push(r);
        basis = ritz;
        images = ritz_images;
    }

    Err(PartitionError::EigenConvergenceFailure {
        iterations,
        residual,
    })
}

fn finish(
    value: f64,
    mut vector: Vec<f64>,
    deflation: &[Vec<f64>],
    iterations: usize,
    residual: f64,
) -> EigenPair {
    orthogonalize(&mut vector, deflation);
    normalize(&mut vector);
    EigenPair {
        value,
        vector,
        iterations,
        residual,
    }
}

/// `Σ cᵢ vᵢ` over the leading vectors of `vectors`.
fn combine<'c>(vectors: &[Vec<f64>], coeffs: impl Iterator<Item = &'c f64>) -> Vec<f64> {
    let mut out = vec![0.0; vectors.first().map_or(0, Vec::len)];
    for (v, &c) in vectors.iter().zip(coeffs) {
        out.iter_mut().zip(v).for_each(|(o, x)| *o += c * x);
    }
    out
}
