use strum_macros::{EnumIter, FromRepr};

/// Leading bytes of every persisted key or proof file.
pub const MAGIC: [u8; 4] = *b"R1G6";
pub const FORMAT_VERSION: u16 = 1;
/// `MAGIC ‖ version (u16 BE) ‖ artifact tag (u8)`
pub const HEADER_LEN: usize = MAGIC.len() + 2 + 1;

/// Width of one big-endian field element in every raw encoding.
pub const FIELD_ELEMENT_BYTES: usize = 32;
/// Width of the big-endian element counts that prefix variable-length vectors.
pub const LENGTH_PREFIX_BYTES: usize = 4;

pub const PROVING_KEY_FILE: &str = "test.pk";
pub const VERIFYING_KEY_FILE: &str = "test.vk";
pub const PROOF_FILE: &str = "proof.bin";
pub const PROOF_JSON_FILE: &str = "proof.json";
pub const PUBLIC_INPUT_JSON_FILE: &str = "input.json";
pub const SOLIDITY_VERIFIER_FILE: &str = "verifier.sol";

#[derive(Debug, PartialEq, Eq, Clone, Copy, FromRepr, EnumIter)]
#[repr(u8)]
pub enum ArtifactKind {
    ProvingKey = 1,
    VerifyingKey = 2,
    Proof = 3,
}

impl ArtifactKind {
    pub fn tag(self) -> u8 {
        self as u8
    }
}
