use ark_ec::{pairing::Pairing, CurveGroup, PrimeGroup};
use ark_ff::{Field, PrimeField, Zero};
use ark_std::rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::ptr;
use std::sync::atomic::{compiler_fence, Ordering};

use super::key::{ProvingKey, VerifyingKey};
use super::qap::QapConstraints;
use crate::r1cs::R1CS;
use crate::utils::{errors::SetupError, powers};

/// The secrets of a trusted setup. Whoever holds them can forge proofs, so `setup` takes
/// them by value and they are overwritten with zero when dropped.
pub struct ToxicWaste<F: PrimeField> {
    tau: F,
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    /// Samples five nonzero secrets.
    pub fn sample<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut nonzero = || loop {
            let x = F::rand(rng);
            if !x.is_zero() {
                break x;
            }
        };
        Self {
            tau: nonzero(),
            alpha: nonzero(),
            beta: nonzero(),
            gamma: nonzero(),
            delta: nonzero(),
        }
    }

    /// Deterministic secrets for tests and demos. Anyone who knows the seed can forge proofs.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::sample(&mut ChaCha20Rng::from_seed(seed))
    }
}

impl<F: PrimeField> Drop for ToxicWaste<F> {
    fn drop(&mut self) {
        for secret in [
            &mut self.tau,
            &mut self.alpha,
            &mut self.beta,
            &mut self.gamma,
            &mut self.delta,
        ] {
            // SAFETY: `secret` is a valid, aligned `&mut F`.
            unsafe { ptr::write_volatile(secret, F::zero()) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}

/// Runs the circuit-specific Groth16 setup.
///
/// The QAP polynomials are evaluated once at `τ`; every key element is a fixed generator
/// scaled by a combination of those evaluations and the other secrets.
#[tracing::instrument(skip_all, name = "Groth16::setup")]
pub fn setup<E: Pairing>(
    r1cs: &R1CS<E::ScalarField>,
    toxic_waste: ToxicWaste<E::ScalarField>,
) -> Result<(ProvingKey<E>, VerifyingKey<E>), SetupError> {
    r1cs.validate().map_err(SetupError::MalformedR1CS)?;

    let constraints = QapConstraints::from_r1cs(r1cs);
    let qap = constraints
        .evaluate_at(toxic_waste.tau)
        .ok_or(SetupError::DomainUnavailable(constraints.min_domain_size()))?;
    if qap.zt.is_zero() {
        return Err(SetupError::DegenerateToxicWaste);
    }
    let gamma_inverse = toxic_waste
        .gamma
        .inverse()
        .ok_or(SetupError::DegenerateToxicWaste)?;
    let delta_inverse = toxic_waste
        .delta
        .inverse()
        .ok_or(SetupError::DegenerateToxicWaste)?;

    let num_inputs = r1cs.num_inputs();
    let num_signals = r1cs.num_signals();
    tracing::info!(
        num_constraints = r1cs.num_constraints(),
        num_signals,
        num_inputs,
        domain_size = qap.domain_size,
        "running setup"
    );

    let (alpha, beta) = (toxic_waste.alpha, toxic_waste.beta);
    let combined: Vec<E::ScalarField> = (0..num_signals)
        .into_par_iter()
        .map(|i| beta * qap.a[i] + alpha * qap.b[i] + qap.c[i])
        .collect();
    let gamma_abc: Vec<_> = combined[..num_inputs]
        .iter()
        .map(|x| *x * gamma_inverse)
        .collect();
    let l: Vec<_> = combined[num_inputs..]
        .iter()
        .map(|x| *x * delta_inverse)
        .collect();
    let zt_over_delta = qap.zt * delta_inverse;
    let h: Vec<_> = powers(toxic_waste.tau, qap.domain_size - 1)
        .into_iter()
        .map(|t| t * zt_over_delta)
        .collect();

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    let ((a_query, b_g1_query), (b_g2_query, (h_query, l_query))) = rayon::join(
        || rayon::join(|| scale(g1, &qap.a), || scale(g1, &qap.b)),
        || {
            rayon::join(
                || scale(g2, &qap.b),
                || rayon::join(|| scale(g1, &h), || scale(g1, &l)),
            )
        },
    );
    let gamma_abc_g1 = scale(g1, &gamma_abc);

    let vk = VerifyingKey {
        alpha_g1: (g1 * alpha).into_affine(),
        beta_g2: (g2 * beta).into_affine(),
        gamma_g2: (g2 * toxic_waste.gamma).into_affine(),
        delta_g2: (g2 * toxic_waste.delta).into_affine(),
        gamma_abc_g1,
    };
    let pk = ProvingKey {
        vk: vk.clone(),
        beta_g1: (g1 * beta).into_affine(),
        delta_g1: (g1 * toxic_waste.delta).into_affine(),
        a_query,
        b_g1_query,
        b_g2_query,
        h_query,
        l_query,
        constraints,
    };
    Ok((pk, vk))
}

/// Samples fresh toxic waste from `rng` and runs [`setup`].
pub fn setup_with_rng<E: Pairing, R: RngCore + CryptoRng>(
    r1cs: &R1CS<E::ScalarField>,
    rng: &mut R,
) -> Result<(ProvingKey<E>, VerifyingKey<E>), SetupError> {
    setup(r1cs, ToxicWaste::sample(rng))
}

fn scale<G: CurveGroup>(base: G, scalars: &[G::ScalarField]) -> Vec<G::Affine> {
    let projective: Vec<G> = scalars.par_iter().map(|s| base * s).collect();
    G::normalize_batch(&projective)
}
