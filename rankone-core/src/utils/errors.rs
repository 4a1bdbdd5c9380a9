use core::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Relation {relation} references undeclared signal `{name}`")]
    UndeclaredSignal { name: String, relation: usize },
    #[error("Signal `{0}` is declared but never constrained")]
    UnconstrainedSignal(String),
    #[error("Signal `{0}` is declared more than once")]
    DuplicateSignal(String),
    #[error("Relation {0} divides by the constant zero")]
    DivisionByZero(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Malformed R1CS: {0}")]
    MalformedR1CS(String),
    #[error("No radix-2 evaluation domain of size {0} exists for this field")]
    DomainUnavailable(usize),
    #[error("Toxic waste is degenerate: a zero secret or τ on the evaluation domain")]
    DegenerateToxicWaste,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("Constraint row {row} (relation {relation}) is not satisfied")]
    ConstraintViolation { row: usize, relation: usize },
    #[error("Auxiliary signal at column {0} cannot be solved: zero denominator")]
    UnresolvableAuxiliary(usize),
    #[error("Invalid {role} input length, expected length {expected} but got {got}")]
    InputLengthMismatch {
        role: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("No value assigned to signal `{0}`")]
    MissingAssignment(String),
    #[error("Assignment column 0 must hold the constant one")]
    ConstantColumnNotOne,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProveError {
    #[error("Invalid witness length, expected length {expected} but got {got}")]
    WitnessLengthMismatch { expected: usize, got: usize },
    #[error("Proving key is inconsistent: {0}")]
    MalformedKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Proof element {0} is not a valid curve point in the prime-order subgroup")]
    MalformedProof(&'static str),
    #[error("Invalid public input length, expected length {expected} but got {got}")]
    PublicInputLengthMismatch { expected: usize, got: usize },
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Serialization(#[from] ark_serialize::SerializationError),
    #[error("Field element is not canonical (not below the modulus)")]
    NonCanonicalFieldElement,
    #[error("Encoded {0} point is off the curve or outside the prime-order subgroup")]
    InvalidPoint(&'static str),
    #[error("Artifact does not start with the expected magic bytes")]
    BadMagic,
    #[error("Unsupported artifact format version {0}")]
    UnsupportedVersion(u16),
    #[error("Unexpected artifact tag, expected {expected} but got {got}")]
    UnexpectedArtifact { expected: u8, got: u8 },
    #[error("`{0}` is not a decimal field element")]
    InvalidDecimal(String),
    #[error("Input truncated: needed {needed} more bytes but {remaining} remain")]
    Truncated { needed: usize, remaining: usize },
    #[error("Trailing bytes after decoding: {0}")]
    TrailingBytes(usize),
}
