use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_std::rand::{CryptoRng, RngCore};
use ark_std::UniformRand;

use super::key::{Proof, ProvingKey};
use crate::r1cs::Witness;
use crate::utils::errors::ProveError;

/// Produces a Groth16 proof that `witness` satisfies the circuit `pk` was generated for.
///
/// `r` and `s` are drawn from `rng`, so two proofs of the same statement differ and neither
/// reveals anything about the private part of the witness.
#[tracing::instrument(skip_all, name = "Groth16::prove")]
pub fn prove<E: Pairing, R: RngCore + CryptoRng>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>, ProveError> {
    let z = witness.assignment();
    if z.len() != pk.num_signals() {
        return Err(ProveError::WitnessLengthMismatch {
            expected: pk.num_signals(),
            got: z.len(),
        });
    }
    check_key_shape(pk)?;

    let h = pk.constraints.quotient(z).ok_or_else(|| {
        ProveError::MalformedKey(format!(
            "no evaluation domain of size {}",
            pk.constraints.min_domain_size()
        ))
    })?;
    if h.len() != pk.h_query.len() + 1 {
        return Err(ProveError::MalformedKey(format!(
            "h query has {} elements but the domain needs {}",
            pk.h_query.len(),
            h.len() - 1
        )));
    }

    let r = E::ScalarField::rand(rng);
    let s = E::ScalarField::rand(rng);
    let num_inputs = pk.num_inputs();

    let (a_acc, (b_g1_acc, b_g2_acc)) = rayon::join(
        || E::G1::msm_unchecked(&pk.a_query, z),
        || {
            rayon::join(
                || E::G1::msm_unchecked(&pk.b_g1_query, z),
                || E::G2::msm_unchecked(&pk.b_g2_query, z),
            )
        },
    );
    let (l_acc, h_acc) = rayon::join(
        || E::G1::msm_unchecked(&pk.l_query, &z[num_inputs..]),
        || E::G1::msm_unchecked(&pk.h_query, &h[..pk.h_query.len()]),
    );

    let g_a = pk.vk.alpha_g1.into_group() + a_acc + pk.delta_g1 * r;
    let g1_b = pk.beta_g1.into_group() + b_g1_acc + pk.delta_g1 * s;
    let g2_b = pk.vk.beta_g2.into_group() + b_g2_acc + pk.vk.delta_g2 * s;
    let g_c = g_a * s + g1_b * r - pk.delta_g1 * (r * s) + l_acc + h_acc;

    let a_c = E::G1::normalize_batch(&[g_a, g_c]);
    Ok(Proof {
        a: a_c[0],
        b: g2_b.into_affine(),
        c: a_c[1],
    })
}

fn check_key_shape<E: Pairing>(pk: &ProvingKey<E>) -> Result<(), ProveError> {
    let num_signals = pk.num_signals();
    let constraints = &pk.constraints;
    if pk.b_g1_query.len() != num_signals || pk.b_g2_query.len() != num_signals {
        return Err(ProveError::MalformedKey(
            "A and B queries have different lengths".to_string(),
        ));
    }
    if pk.num_inputs() != constraints.num_inputs
        || pk.l_query.len() + constraints.num_inputs != num_signals
    {
        return Err(ProveError::MalformedKey(
            "instance and witness queries do not partition the signals".to_string(),
        ));
    }
    for matrix in [&constraints.a, &constraints.b, &constraints.c] {
        if matrix.num_cols != num_signals || matrix.num_rows() != constraints.num_constraints() {
            return Err(ProveError::MalformedKey(
                "constraint matrices do not match the queries".to_string(),
            ));
        }
        if matrix.rows.iter().flatten().any(|(col, _)| *col >= num_signals) {
            return Err(ProveError::MalformedKey(
                "constraint matrix references a column out of range".to_string(),
            ));
        }
    }
    Ok(())
}
