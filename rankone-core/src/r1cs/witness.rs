//! Witness generation: evaluates a compiled circuit on concrete inputs.

use ark_ff::PrimeField;
use std::collections::HashMap;

use super::{
    circuit::SignalRole,
    key::{AuxiliarySolver, R1CS},
};
use crate::utils::{errors::WitnessError, evaluate_sparse_row};

/// The public-signal prefix of an assignment vector, excluding the constant one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicInput<F: PrimeField>(pub Vec<F>);

impl<F: PrimeField> PublicInput<F> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.0
    }
}

impl<F: PrimeField> From<Vec<F>> for PublicInput<F> {
    fn from(values: Vec<F>) -> Self {
        PublicInput(values)
    }
}

/// Full assignment vector `z`, with `z[0] = 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness<F: PrimeField> {
    assignment: Vec<F>,
    num_public: usize,
}

impl<F: PrimeField> Witness<F> {
    pub fn assignment(&self) -> &[F] {
        &self.assignment
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn public_input(&self) -> PublicInput<F> {
        PublicInput(self.assignment[1..=self.num_public].to_vec())
    }

    /// Builds a witness from an assignment the caller computed, e.g. for an R1CS made with
    /// [`R1CS::from_matrices`]. `assignment[0]` must be one; the assignment is then checked
    /// against every row.
    pub fn from_assignment(r1cs: &R1CS<F>, assignment: Vec<F>) -> Result<Self, WitnessError> {
        if assignment.len() != r1cs.num_signals() {
            return Err(WitnessError::InputLengthMismatch {
                role: "full",
                expected: r1cs.num_signals(),
                got: assignment.len(),
            });
        }
        if assignment.first() != Some(&F::one()) {
            return Err(WitnessError::ConstantColumnNotOne);
        }
        check_satisfied(r1cs, &assignment)?;
        Ok(Self {
            assignment,
            num_public: r1cs.num_public(),
        })
    }
}

/// Values keyed by signal name, split into declaration order by [`Assignment::split`].
#[derive(Clone, Debug, Default)]
pub struct Assignment<F: PrimeField> {
    values: HashMap<String, F>,
}

impl<F: PrimeField> Assignment<F> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<F>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// `(public, private)` values in column order.
    pub fn split(&self, r1cs: &R1CS<F>) -> Result<(Vec<F>, Vec<F>), WitnessError> {
        let mut public = Vec::with_capacity(r1cs.num_public());
        let mut private = Vec::with_capacity(r1cs.num_private());
        for column in 1..r1cs.num_inputs() + r1cs.num_private() {
            let name = r1cs.signal_name(column).unwrap_or_default();
            let value = *self
                .values
                .get(name)
                .ok_or_else(|| WitnessError::MissingAssignment(name.to_string()))?;
            match r1cs.signal_role(column) {
                SignalRole::Public => public.push(value),
                _ => private.push(value),
            }
        }
        Ok((public, private))
    }
}

/// Evaluates the circuit on the given inputs and returns the full assignment vector.
///
/// Auxiliary columns are solved in the order fixed at compile time. The complete vector is then
/// checked against every row; an unsatisfied row is reported, never patched.
#[tracing::instrument(skip_all, name = "R1CS::generate_witness")]
pub fn generate_witness<F: PrimeField>(
    r1cs: &R1CS<F>,
    public_inputs: &[F],
    private_inputs: &[F],
) -> Result<Witness<F>, WitnessError> {
    if public_inputs.len() != r1cs.num_public() {
        return Err(WitnessError::InputLengthMismatch {
            role: "public",
            expected: r1cs.num_public(),
            got: public_inputs.len(),
        });
    }
    if private_inputs.len() != r1cs.num_private() {
        return Err(WitnessError::InputLengthMismatch {
            role: "private",
            expected: r1cs.num_private(),
            got: private_inputs.len(),
        });
    }

    let mut z = Vec::with_capacity(r1cs.num_signals());
    z.push(F::one());
    z.extend_from_slice(public_inputs);
    z.extend_from_slice(private_inputs);
    z.resize(r1cs.num_signals(), F::zero());

    for solver in r1cs.solve_order() {
        let value = match solver {
            AuxiliarySolver::Product { a, b, .. } => {
                evaluate_sparse_row(a, &z) * evaluate_sparse_row(b, &z)
            }
            AuxiliarySolver::Quotient {
                target,
                numerator,
                denominator,
            } => {
                let den = evaluate_sparse_row(denominator, &z);
                let den_inv = den
                    .inverse()
                    .ok_or(WitnessError::UnresolvableAuxiliary(*target))?;
                evaluate_sparse_row(numerator, &z) * den_inv
            }
        };
        z[solver.target()] = value;
    }

    check_satisfied(r1cs, &z)?;
    Ok(Witness {
        assignment: z,
        num_public: r1cs.num_public(),
    })
}

/// Convenience wrapper resolving inputs by name.
pub fn generate_witness_from_assignment<F: PrimeField>(
    r1cs: &R1CS<F>,
    assignment: &Assignment<F>,
) -> Result<Witness<F>, WitnessError> {
    let (public, private) = assignment.split(r1cs)?;
    generate_witness(r1cs, &public, &private)
}

fn check_satisfied<F: PrimeField>(r1cs: &R1CS<F>, z: &[F]) -> Result<(), WitnessError> {
    match r1cs.first_unsatisfied_row(z) {
        None => Ok(()),
        Some(row) => {
            let relation = r1cs.relation_of_row(row);
            tracing::debug!(row, relation, "witness does not satisfy constraint");
            Err(WitnessError::ConstraintViolation { row, relation })
        }
    }
}
