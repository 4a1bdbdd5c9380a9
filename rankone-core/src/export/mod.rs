//! BN254 projections of keys, proofs and public inputs: raw bytes, decimal JSON, a Solidity
//! verifier and versioned files.

pub mod json;
pub mod persist;
pub mod raw;
pub mod solidity;

pub use json::{public_input_from_json, public_input_to_json, ProofJson};
pub use persist::{load, load_compressed, load_json, save, save_compressed, save_json, Artifact};
pub use raw::{RawEncoding, PROOF_RAW_SIZE};
pub use solidity::export_solidity;
