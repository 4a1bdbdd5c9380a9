use std::path::PathBuf;

use ark_bn254::{Bn254, Fr};
use ark_std::rand::SeedableRng;
use common::constants::{PROOF_JSON_FILE, PUBLIC_INPUT_JSON_FILE, VERIFYING_KEY_FILE};
use rankone_core::circuits;
use rankone_core::export::{self, ProofJson, RawEncoding, PROOF_RAW_SIZE};
use rankone_core::groth16::{self, Proof, ToxicWaste, VerifyingKey};
use rankone_core::r1cs::{
    compile, generate_witness, generate_witness_from_assignment, Assignment, CompileConfig,
};
use rankone_core::utils::errors::{CompileError, WitnessError};
use rand_chacha::ChaCha20Rng;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rankone-e2e-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn sum_circuit_end_to_end() {
    let r1cs = compile(
        &circuits::sum::<Fr>(),
        &CompileConfig::reject_unconstrained(),
    )
    .unwrap();
    assert_eq!(r1cs.num_constraints(), 1);
    assert_eq!(r1cs.num_public(), 2);
    assert_eq!(r1cs.num_private(), 1);

    let (pk, vk) = groth16::setup::<Bn254>(&r1cs, ToxicWaste::from_seed([42u8; 32])).unwrap();
    let assignment = Assignment::new().set("A", 1u64).set("B", 2u64).set("Sum", 3u64);
    let witness = generate_witness_from_assignment(&r1cs, &assignment).unwrap();
    let proof = groth16::prove(&pk, &witness, &mut ChaCha20Rng::seed_from_u64(11)).unwrap();

    let public = witness.public_input();
    assert_eq!(public.as_slice(), &[Fr::from(1u64), Fr::from(3u64)]);
    assert!(groth16::verify(&vk, public.as_slice(), &proof).unwrap());
    assert!(!groth16::verify(&vk, &[Fr::from(1u64), Fr::from(4u64)], &proof).unwrap());
}

#[test]
fn inconsistent_sum_has_no_witness() {
    let r1cs = compile(
        &circuits::sum::<Fr>(),
        &CompileConfig::reject_unconstrained(),
    )
    .unwrap();
    let assignment = Assignment::new().set("A", 1u64).set("B", 2u64).set("Sum", 4u64);
    assert_eq!(
        generate_witness_from_assignment(&r1cs, &assignment).unwrap_err(),
        WitnessError::ConstraintViolation {
            row: 0,
            relation: 0
        }
    );
}

#[test]
fn exported_artifacts_verify_after_reload() {
    let dir = scratch_dir("artifacts");
    let r1cs = compile(
        &circuits::sum::<Fr>(),
        &CompileConfig::reject_unconstrained(),
    )
    .unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (pk, vk) = groth16::setup_with_rng::<Bn254, _>(&r1cs, &mut rng).unwrap();
    let witness =
        generate_witness(&r1cs, &[Fr::from(1u64), Fr::from(3u64)], &[Fr::from(2u64)]).unwrap();
    let proof = groth16::prove(&pk, &witness, &mut rng).unwrap();

    export::save(&vk, &dir.join(VERIFYING_KEY_FILE)).unwrap();
    export::save_json(&ProofJson::from(&proof), &dir.join(PROOF_JSON_FILE)).unwrap();
    export::save_json(
        &export::public_input_to_json(witness.public_input().as_slice()),
        &dir.join(PUBLIC_INPUT_JSON_FILE),
    )
    .unwrap();

    let vk: VerifyingKey<Bn254> = export::load(&dir.join(VERIFYING_KEY_FILE)).unwrap();
    let proof_json: ProofJson = export::load_json(&dir.join(PROOF_JSON_FILE)).unwrap();
    let input: Vec<String> = export::load_json(&dir.join(PUBLIC_INPUT_JSON_FILE)).unwrap();
    assert_eq!(input, vec!["1".to_string(), "3".to_string()]);

    let reloaded = Proof::<Bn254>::try_from(&proof_json).unwrap();
    assert_eq!(reloaded, proof);
    assert_eq!(reloaded.to_raw_bytes().len(), PROOF_RAW_SIZE);
    let public = export::public_input_from_json(&input).unwrap();
    assert!(groth16::verify(&vk, &public, &reloaded).unwrap());

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn reloaded_proving_key_still_proves() {
    let r1cs = compile(
        &circuits::cubic::<Fr>(),
        &CompileConfig::reject_unconstrained(),
    )
    .unwrap();
    let (pk, vk) = groth16::setup::<Bn254>(&r1cs, ToxicWaste::from_seed([6u8; 32])).unwrap();
    let pk = groth16::ProvingKey::<Bn254>::from_raw_bytes(&pk.to_raw_bytes()).unwrap();

    let witness = generate_witness(&r1cs, &[Fr::from(35u64)], &[Fr::from(3u64)]).unwrap();
    let proof = groth16::prove(&pk, &witness, &mut ChaCha20Rng::seed_from_u64(11)).unwrap();
    assert!(groth16::verify(&vk, &[Fr::from(35u64)], &proof).unwrap());
}

#[test]
fn square_chain_proves() {
    let rounds = 20;
    let r1cs = compile(
        &circuits::square_chain::<Fr>(rounds),
        &CompileConfig::reject_unconstrained(),
    )
    .unwrap();
    assert_eq!(r1cs.num_constraints(), rounds);
    assert_eq!(r1cs.num_auxiliary(), 0);

    let start = Fr::from(2u64);
    let (intermediate, end) = circuits::square_chain_values(start, rounds);
    let witness = generate_witness(&r1cs, &[start, end], &intermediate).unwrap();

    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (pk, vk) = groth16::setup_with_rng::<Bn254, _>(&r1cs, &mut rng).unwrap();
    let proof = groth16::prove(&pk, &witness, &mut rng).unwrap();
    assert!(groth16::verify(&vk, &[start, end], &proof).unwrap());
    assert!(!groth16::verify(&vk, &[start, end + Fr::from(1u64)], &proof).unwrap());
}

#[test]
fn compilation_is_deterministic() {
    let config = CompileConfig::reject_unconstrained();
    let first = compile(&circuits::cubic::<Fr>(), &config).unwrap();
    let second = compile(&circuits::cubic::<Fr>(), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unconstrained_signal_policy() {
    let mut circuit = circuits::sum::<Fr>();
    circuit.private("unused");
    assert_eq!(
        compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap_err(),
        CompileError::UnconstrainedSignal("unused".to_string())
    );
    let r1cs = compile(&circuit, &CompileConfig::ignore_unconstrained()).unwrap();
    assert_eq!(r1cs.num_private(), 2);
}
