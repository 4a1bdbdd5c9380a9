use ark_ff::PrimeField;
use rayon::prelude::*;

pub mod errors;

/// Inner product of a sparse row `(column, coefficient)` with a dense assignment.
pub fn evaluate_sparse_row<F: PrimeField>(row: &[(usize, F)], z: &[F]) -> F {
    row.iter()
        .map(|(col, coeff)| *coeff * z[*col])
        .fold(F::zero(), |acc, term| acc + term)
}

/// Successive powers `[1, x, x^2, ..., x^(n-1)]`.
pub fn powers<F: PrimeField>(x: F, n: usize) -> Vec<F> {
    std::iter::successors(Some(F::one()), |acc| Some(*acc * x))
        .take(n)
        .collect()
}

/// Multiplies coefficient `i` by `g^i`. Moves a polynomial's evaluations onto the coset `g·H`.
#[tracing::instrument(skip_all)]
pub fn distribute_powers<F: PrimeField>(coeffs: &mut [F], g: F) {
    let g_powers = powers(g, coeffs.len());
    coeffs
        .par_iter_mut()
        .zip(g_powers.par_iter())
        .for_each(|(c, p)| *c *= p);
}
