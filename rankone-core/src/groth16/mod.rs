//! Groth16 over a pairing-friendly curve.
//!
//! `setup` turns a compiled [`R1CS`](crate::r1cs::R1CS) into a proving/verifying key pair,
//! `prove` produces a constant-size [`Proof`] for a satisfying witness and `verify` checks it
//! against the public inputs with three pairings.

pub mod key;
pub mod prover;
pub mod qap;
pub mod setup;
pub mod verifier;

pub use key::{PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
pub use prover::prove;
pub use qap::QapConstraints;
pub use setup::{setup, setup_with_rng, ToxicWaste};
pub use verifier::{prepare_verifying_key, verify, verify_with_prepared};
