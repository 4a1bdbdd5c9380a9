use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use super::qap::QapConstraints;

/// A Groth16 proof: `A ∈ G1, B ∈ G2, C ∈ G1`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G2Affine,
    pub c: E::G1Affine,
}

/// Everything the verifier needs. Its size depends only on the number of public inputs.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey<E: Pairing> {
    pub alpha_g1: E::G1Affine,
    pub beta_g2: E::G2Affine,
    pub gamma_g2: E::G2Affine,
    pub delta_g2: E::G2Affine,
    /// `(β·u_i(τ) + α·v_i(τ) + w_i(τ)) / γ · G1` for every instance column, the constant one first.
    pub gamma_abc_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> VerifyingKey<E> {
    /// Number of public signals, excluding the constant one.
    pub fn num_public(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }
}

/// Verifying key with the pairing-independent terms precomputed.
#[derive(Clone, Debug)]
pub struct PreparedVerifyingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub alpha_g1_beta_g2: PairingOutput<E>,
    pub gamma_g2_neg_pc: E::G2Prepared,
    pub delta_g2_neg_pc: E::G2Prepared,
}

/// Structured reference string for proving. Its size grows with the number of constraints
/// and signals.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub beta_g1: E::G1Affine,
    pub delta_g1: E::G1Affine,
    /// `u_i(τ)·G1` for every column.
    pub a_query: Vec<E::G1Affine>,
    /// `v_i(τ)·G1` for every column.
    pub b_g1_query: Vec<E::G1Affine>,
    /// `v_i(τ)·G2` for every column.
    pub b_g2_query: Vec<E::G2Affine>,
    /// `τ^i·Z(τ)/δ·G1` for `i < domain_size - 1`.
    pub h_query: Vec<E::G1Affine>,
    /// `(β·u_i(τ) + α·v_i(τ) + w_i(τ)) / δ · G1` for every witness-only column.
    pub l_query: Vec<E::G1Affine>,
    pub constraints: QapConstraints<E::ScalarField>,
}

impl<E: Pairing> ProvingKey<E> {
    /// Width of the assignment vector this key proves for.
    pub fn num_signals(&self) -> usize {
        self.a_query.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.vk.gamma_abc_g1.len()
    }
}
