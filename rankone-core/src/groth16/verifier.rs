use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_serialize::Valid;

use super::key::{PreparedVerifyingKey, Proof, VerifyingKey};
use crate::utils::errors::VerifyError;

/// Precomputes `e(α, β)` and the prepared negations of `γ` and `δ`.
pub fn prepare_verifying_key<E: Pairing>(vk: &VerifyingKey<E>) -> PreparedVerifyingKey<E> {
    PreparedVerifyingKey {
        vk: vk.clone(),
        alpha_g1_beta_g2: E::pairing(vk.alpha_g1, vk.beta_g2),
        gamma_g2_neg_pc: (-vk.gamma_g2.into_group()).into_affine().into(),
        delta_g2_neg_pc: (-vk.delta_g2.into_group()).into_affine().into(),
    }
}

/// Checks `e(A, B) = e(α, β) · e(Σ x_i·γ_abc_i, γ) · e(C, δ)`.
///
/// `Ok(false)` means the proof is well formed but does not verify against `public_input`.
pub fn verify<E: Pairing>(
    vk: &VerifyingKey<E>,
    public_input: &[E::ScalarField],
    proof: &Proof<E>,
) -> Result<bool, VerifyError> {
    verify_with_prepared(&prepare_verifying_key(vk), public_input, proof)
}

#[tracing::instrument(skip_all, name = "Groth16::verify")]
pub fn verify_with_prepared<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    public_input: &[E::ScalarField],
    proof: &Proof<E>,
) -> Result<bool, VerifyError> {
    let vk = &pvk.vk;
    if public_input.len() != vk.num_public() || vk.gamma_abc_g1.is_empty() {
        return Err(VerifyError::PublicInputLengthMismatch {
            expected: vk.num_public(),
            got: public_input.len(),
        });
    }
    check_point(&proof.a, "A")?;
    check_point(&proof.b, "B")?;
    check_point(&proof.c, "C")?;

    let prepared_inputs = (vk.gamma_abc_g1[0].into_group()
        + E::G1::msm_unchecked(&vk.gamma_abc_g1[1..], public_input))
    .into_affine();

    let rhs = E::multi_pairing(
        [proof.a, prepared_inputs, proof.c],
        [
            proof.b.into(),
            pvk.gamma_g2_neg_pc.clone(),
            pvk.delta_g2_neg_pc.clone(),
        ],
    );
    let valid = rhs == pvk.alpha_g1_beta_g2;
    tracing::debug!(valid, "pairing check");
    Ok(valid)
}

fn check_point<P: Valid>(point: &P, label: &'static str) -> Result<(), VerifyError> {
    point.check().map_err(|_| {
        tracing::warn!(element = label, "proof point is off the curve or outside the subgroup");
        VerifyError::MalformedProof(label)
    })
}
