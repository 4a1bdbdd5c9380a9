//! Reduction of an R1CS instance to a Quadratic Arithmetic Program over a radix-2 domain.
//!
//! Row `i` of the constraint system is bound to the `i`-th domain point. The instance columns
//! (constant one and public signals) get one extra row each in `A` so that their polynomials
//! stay linearly independent, which the verifier equation relies on.

use ark_ff::PrimeField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;

use crate::r1cs::{SparseMatrix, R1CS};
use crate::utils::distribute_powers;

/// The constraint matrices as the prover needs them to compute the quotient polynomial.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct QapConstraints<F: PrimeField> {
    pub a: SparseMatrix<F>,
    pub b: SparseMatrix<F>,
    pub c: SparseMatrix<F>,
    /// Instance columns, the constant one included.
    pub num_inputs: usize,
}

/// `u_i(τ), v_i(τ), w_i(τ)` for every column, and `Z(τ)`.
pub struct QapEvaluation<F: PrimeField> {
    pub a: Vec<F>,
    pub b: Vec<F>,
    pub c: Vec<F>,
    pub zt: F,
    pub domain_size: usize,
}

impl<F: PrimeField> QapConstraints<F> {
    pub fn from_r1cs(r1cs: &R1CS<F>) -> Self {
        Self {
            a: r1cs.a().clone(),
            b: r1cs.b().clone(),
            c: r1cs.c().clone(),
            num_inputs: r1cs.num_inputs(),
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.a.num_rows()
    }

    pub fn num_signals(&self) -> usize {
        self.a.num_cols
    }

    /// Smallest domain holding every constraint row plus one row per instance column.
    /// `None` if the field has no radix-2 subgroup that large.
    pub fn domain(&self) -> Option<Radix2EvaluationDomain<F>> {
        Radix2EvaluationDomain::new(self.num_constraints() + self.num_inputs)
    }

    pub fn min_domain_size(&self) -> usize {
        self.num_constraints() + self.num_inputs
    }

    #[tracing::instrument(skip_all, name = "QapConstraints::evaluate_at")]
    pub fn evaluate_at(&self, tau: F) -> Option<QapEvaluation<F>> {
        let domain = self.domain()?;
        let zt = domain.evaluate_vanishing_polynomial(tau);
        let u = domain.evaluate_all_lagrange_coefficients(tau);

        let num_constraints = self.num_constraints();
        let mut a = vec![F::zero(); self.num_signals()];
        let mut b = vec![F::zero(); self.num_signals()];
        let mut c = vec![F::zero(); self.num_signals()];

        a[..self.num_inputs]
            .copy_from_slice(&u[num_constraints..num_constraints + self.num_inputs]);

        for (row, u_i) in u.iter().enumerate().take(num_constraints) {
            for (col, coeff) in &self.a.rows[row] {
                a[*col] += *u_i * coeff;
            }
            for (col, coeff) in &self.b.rows[row] {
                b[*col] += *u_i * coeff;
            }
            for (col, coeff) in &self.c.rows[row] {
                c[*col] += *u_i * coeff;
            }
        }

        Some(QapEvaluation {
            a,
            b,
            c,
            zt,
            domain_size: domain.size(),
        })
    }

    /// Coefficients of `h(X) = (A(X)·B(X) - C(X)) / Z(X)` for the assignment `z`.
    ///
    /// The division is done pointwise on the coset `g·H`, where `Z` is the nonzero constant
    /// `g^n - 1`. Returns `domain_size` coefficients; the top one is zero for a satisfying `z`.
    #[tracing::instrument(skip_all, name = "QapConstraints::quotient")]
    pub fn quotient(&self, z: &[F]) -> Option<Vec<F>> {
        let domain = self.domain()?;
        let num_constraints = self.num_constraints();

        let mut a = vec![F::zero(); domain.size()];
        let mut b = vec![F::zero(); domain.size()];
        let mut c = vec![F::zero(); domain.size()];
        a[..num_constraints].copy_from_slice(&self.a.mul_vector(z));
        b[..num_constraints].copy_from_slice(&self.b.mul_vector(z));
        c[..num_constraints].copy_from_slice(&self.c.mul_vector(z));
        a[num_constraints..num_constraints + self.num_inputs]
            .copy_from_slice(&z[..self.num_inputs]);

        let g = F::GENERATOR;
        for evals in [&mut a, &mut b, &mut c] {
            domain.ifft_in_place(evals);
            distribute_powers(evals, g);
            domain.fft_in_place(evals);
        }

        let vanishing_on_coset_inv = domain
            .evaluate_vanishing_polynomial(g)
            .inverse()
            .expect("g^n != 1 for the multiplicative generator");
        let mut h: Vec<F> = a
            .par_iter()
            .zip(b.par_iter())
            .zip(c.par_iter())
            .map(|((a_i, b_i), c_i)| (*a_i * b_i - c_i) * vanishing_on_coset_inv)
            .collect();

        domain.ifft_in_place(&mut h);
        let g_inv = g
            .inverse()
            .expect("generator is nonzero");
        distribute_powers(&mut h, g_inv);
        Some(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::{compile, generate_witness, CircuitDefinition, CompileConfig};
    use ark_bn254::Fr;
    use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
    use ark_ff::Zero;
    use ark_std::{test_rng, UniformRand};

    fn cubic() -> (R1CS<Fr>, Vec<Fr>) {
        let mut circuit = CircuitDefinition::<Fr>::new("cubic");
        let x = circuit.private("x");
        let out = circuit.public("out");
        circuit.assert_equal(x.clone() * x.clone() * x.clone() + x + 5u64, out);
        let r1cs = compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap();
        let witness = generate_witness(&r1cs, &[Fr::from(35u64)], &[Fr::from(3u64)]).unwrap();
        (r1cs, witness.assignment().to_vec())
    }

    #[test]
    fn quotient_satisfies_divisibility_at_random_point() {
        let (r1cs, z) = cubic();
        let qap = QapConstraints::from_r1cs(&r1cs);
        let h = qap.quotient(&z).unwrap();
        assert!(h.last().unwrap().is_zero());

        let tau = Fr::rand(&mut test_rng());
        let eval = qap.evaluate_at(tau).unwrap();
        let dot = |v: &[Fr]| v.iter().zip(&z).map(|(x, y)| *x * y).sum::<Fr>();
        let h_tau = DensePolynomial::from_coefficients_vec(h).evaluate(&tau);
        assert_eq!(dot(&eval.a) * dot(&eval.b) - dot(&eval.c), h_tau * eval.zt);
    }

    #[test]
    fn domain_covers_rows_and_inputs() {
        let (r1cs, _) = cubic();
        let qap = QapConstraints::from_r1cs(&r1cs);
        // 3 rows + 2 instance columns -> 8
        assert_eq!(qap.min_domain_size(), 5);
        assert_eq!(qap.domain().unwrap().size(), 8);
    }
}
