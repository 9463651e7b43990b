//! Small dense vector kernels and the sparse symmetric eigensolver used by the
//! spectral bisector.

pub mod lanczos;

pub use lanczos::{EigenConfig, EigenPair, SymmetricOperator, smallest_eigenpair};

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Scale `v` to unit length and return its previous norm. Zero vectors are left untouched.
pub fn normalize(v: &mut [f64]) -> f64 {
    let n = norm(v);
    if n > 0.0 {
        v.iter_mut().for_each(|x| *x /= n);
    }
    n
}

/// Remove from `v` its components along each vector of the orthonormal `basis`.
pub fn orthogonalize<B: AsRef<[f64]>>(v: &mut [f64], basis: &[B]) {
    for q in basis {
        let q = q.as_ref();
        let c = dot(q, v);
        v.iter_mut().zip(q).for_each(|(x, qi)| *x -= c * qi);
    }
}
