pub mod builder;
pub mod circuit;
pub mod key;
pub mod ops;
pub mod witness;

pub use builder::{compile, CompileConfig, UnconstrainedPolicy};
pub use circuit::{CircuitDefinition, Expr, Relation, Signal, SignalRole};
pub use key::{SparseMatrix, R1CS};
pub use witness::{
    generate_witness, generate_witness_from_assignment, Assignment, PublicInput, Witness,
};
