//! Lowers a [`CircuitDefinition`] into an [`R1CS`].

use ark_ff::PrimeField;
use std::collections::{HashMap, HashSet};

use super::{
    circuit::{CircuitDefinition, Expr, Relation, SignalRole},
    key::{AuxiliarySolver, SparseMatrix, R1CS},
    ops::LC,
};
use crate::utils::errors::CompileError;

/// What to do with declared inputs that no compiled row touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnconstrainedPolicy {
    Reject,
    Ignore,
}

/// Compile-time options. Has no `Default`; callers always pick the policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileConfig {
    pub unconstrained: UnconstrainedPolicy,
}

impl CompileConfig {
    pub fn new(unconstrained: UnconstrainedPolicy) -> Self {
        Self { unconstrained }
    }

    pub fn reject_unconstrained() -> Self {
        Self::new(UnconstrainedPolicy::Reject)
    }

    pub fn ignore_unconstrained() -> Self {
        Self::new(UnconstrainedPolicy::Ignore)
    }
}

/// Constraints over a single row.
#[derive(Clone, Debug)]
pub struct Constraint<F: PrimeField> {
    pub a: LC<F>,
    pub b: LC<F>,
    pub c: LC<F>,
}

/// Accumulates rows and auxiliary columns while relations are lowered.
pub struct R1CSBuilder<F: PrimeField> {
    columns: HashMap<String, usize>,
    num_inputs: usize,
    constraints: Vec<(Constraint<F>, usize)>,
    solvers: Vec<AuxiliarySolver<F>>,
    relation: usize,
}

impl<F: PrimeField> R1CSBuilder<F> {
    fn new(columns: HashMap<String, usize>, num_inputs: usize) -> Self {
        Self {
            columns,
            num_inputs,
            constraints: vec![],
            solvers: vec![],
            relation: 0,
        }
    }

    fn next_aux_column(&self) -> usize {
        self.num_inputs + self.solvers.len()
    }

    fn push(&mut self, a: LC<F>, b: LC<F>, c: LC<F>) {
        self.constraints
            .push((Constraint { a, b, c }, self.relation));
    }

    fn lookup(&self, name: &str) -> Result<usize, CompileError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UndeclaredSignal {
                name: name.to_string(),
                relation: self.relation,
            })
    }

    /// Columns with a nonzero coefficient in at least one row. Signals that cancel out while
    /// linear combinations are folded are not in this set.
    fn constrained_columns(&self) -> HashSet<usize> {
        self.constraints
            .iter()
            .flat_map(|(row, _)| row.a.columns().chain(row.b.columns()).chain(row.c.columns()))
            .collect()
    }

    /// Folds linear structure into a single LC and allocates an auxiliary column for every
    /// product or quotient of two non-constant combinations.
    fn lower(&mut self, expr: &Expr<F>) -> Result<LC<F>, CompileError> {
        match expr {
            Expr::Signal(name) => Ok(LC::column(self.lookup(name)?)),
            Expr::Constant(value) => Ok(LC::constant(*value)),
            Expr::Add(l, r) => Ok(self.lower(l)? + self.lower(r)?),
            Expr::Sub(l, r) => Ok(self.lower(l)? - self.lower(r)?),
            Expr::Neg(inner) => Ok(-self.lower(inner)?),
            Expr::Mul(l, r) => {
                let a = self.lower(l)?;
                let b = self.lower(r)?;
                Ok(self.lower_product(a, b))
            }
            Expr::Div(l, r) => {
                let numerator = self.lower(l)?;
                let denominator = self.lower(r)?;
                match denominator.as_constant() {
                    Some(d) => match d.inverse() {
                        Some(d_inv) => Ok(numerator.scale(d_inv)),
                        None => Err(CompileError::DivisionByZero(self.relation)),
                    },
                    None => {
                        let target = self.next_aux_column();
                        // t * den = num
                        self.push(LC::column(target), denominator.clone(), numerator.clone());
                        self.solvers.push(AuxiliarySolver::Quotient {
                            target,
                            numerator: numerator.to_row(),
                            denominator: denominator.to_row(),
                        });
                        Ok(LC::column(target))
                    }
                }
            }
        }
    }

    fn lower_product(&mut self, a: LC<F>, b: LC<F>) -> LC<F> {
        if let Some(k) = a.as_constant() {
            return b.scale(k);
        }
        if let Some(k) = b.as_constant() {
            return a.scale(k);
        }
        let target = self.next_aux_column();
        self.push(a.clone(), b.clone(), LC::column(target));
        self.solvers.push(AuxiliarySolver::Product {
            target,
            a: a.to_row(),
            b: b.to_row(),
        });
        LC::column(target)
    }

    /// Lowers the top level of one side of an equality. A product of two non-constant operands
    /// is kept factored so the equality can become a single row without an extra auxiliary.
    fn lower_top(&mut self, expr: &Expr<F>) -> Result<Lowered<F>, CompileError> {
        if let Expr::Mul(l, r) = expr {
            let a = self.lower(l)?;
            let b = self.lower(r)?;
            if a.as_constant().is_none() && b.as_constant().is_none() {
                return Ok(Lowered::Factors(a, b));
            }
            return Ok(Lowered::Linear(self.lower_product(a, b)));
        }
        Ok(Lowered::Linear(self.lower(expr)?))
    }

    fn lower_relation(&mut self, relation: &Relation<F>) -> Result<(), CompileError> {
        match relation {
            Relation::Equal(lhs, rhs) => {
                let lhs = self.lower_top(lhs)?;
                let rhs = self.lower_top(rhs)?;
                match (lhs, rhs) {
                    (Lowered::Factors(a, b), Lowered::Linear(c))
                    | (Lowered::Linear(c), Lowered::Factors(a, b)) => self.push(a, b, c),
                    (Lowered::Factors(a, b), Lowered::Factors(x, y)) => {
                        let c = self.lower_product(x, y);
                        self.push(a, b, c);
                    }
                    (Lowered::Linear(l), Lowered::Linear(r)) => {
                        // (lhs - rhs) * 1 = 0
                        self.push(l - r, LC::constant(F::one()), LC::zero());
                    }
                }
            }
            Relation::Product(a, b, c) => {
                let a = self.lower(a)?;
                let b = self.lower(b)?;
                let c = self.lower(c)?;
                self.push(a, b, c);
            }
        }
        Ok(())
    }
}

enum Lowered<F: PrimeField> {
    Linear(LC<F>),
    Factors(LC<F>, LC<F>),
}

/// Compiles `circuit` into an R1CS.
///
/// Columns: `0` is the constant one, followed by public signals and private signals in
/// declaration order, followed by auxiliary signals in the order the compiler introduces them.
/// Each auxiliary column depends only on columns before it, so the recorded solve order is a
/// valid evaluation order for the witness generator.
#[tracing::instrument(skip_all, name = "R1CSBuilder::compile")]
pub fn compile<F: PrimeField>(
    circuit: &CircuitDefinition<F>,
    config: &CompileConfig,
) -> Result<R1CS<F>, CompileError> {
    let mut columns = HashMap::new();
    let mut signal_names = vec!["one".to_string()];
    for role in [SignalRole::Public, SignalRole::Private] {
        for signal in circuit.signals_with_role(role) {
            if columns
                .insert(signal.name.clone(), signal_names.len())
                .is_some()
            {
                return Err(CompileError::DuplicateSignal(signal.name.clone()));
            }
            signal_names.push(signal.name.clone());
        }
    }
    let num_public = circuit.signals_with_role(SignalRole::Public).count();
    let num_private = circuit.signals_with_role(SignalRole::Private).count();
    let num_inputs = signal_names.len();

    let mut builder = R1CSBuilder::new(columns, num_inputs);
    for (index, relation) in circuit.relations().iter().enumerate() {
        builder.relation = index;
        builder.lower_relation(relation)?;
    }

    let constrained = builder.constrained_columns();
    for column in 1..num_inputs {
        if !constrained.contains(&column) {
            let name = &signal_names[column];
            match config.unconstrained {
                UnconstrainedPolicy::Reject => {
                    return Err(CompileError::UnconstrainedSignal(name.clone()))
                }
                UnconstrainedPolicy::Ignore => {
                    tracing::warn!("signal `{name}` is not constrained by any row")
                }
            }
        }
    }

    for solver in &builder.solvers {
        signal_names.push(format!("aux{}", solver.target() - num_inputs));
    }
    let num_signals = signal_names.len();
    let mut a = SparseMatrix::new(num_signals);
    let mut b = SparseMatrix::new(num_signals);
    let mut c = SparseMatrix::new(num_signals);
    let mut row_relation = Vec::with_capacity(builder.constraints.len());
    for (constraint, relation) in builder.constraints {
        a.rows.push(constraint.a.to_row());
        b.rows.push(constraint.b.to_row());
        c.rows.push(constraint.c.to_row());
        row_relation.push(relation);
    }

    tracing::debug!(
        circuit = circuit.name.as_str(),
        rows = a.num_rows(),
        signals = num_signals,
        auxiliary = builder.solvers.len(),
        "compiled circuit"
    );

    Ok(R1CS::from_compiled(
        a,
        b,
        c,
        num_public,
        num_private,
        signal_names,
        row_relation,
        builder.solvers,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::One;

    fn sum_circuit() -> CircuitDefinition<Fr> {
        let mut circuit = CircuitDefinition::new("sum");
        let a = circuit.public("A");
        let b = circuit.private("B");
        let sum = circuit.public("Sum");
        circuit.assert_equal(a + b, sum);
        circuit
    }

    #[test]
    fn sum_circuit_is_one_linear_row() {
        let r1cs = compile(&sum_circuit(), &CompileConfig::reject_unconstrained()).unwrap();
        assert_eq!(r1cs.num_constraints(), 1);
        assert_eq!(r1cs.num_public(), 2);
        assert_eq!(r1cs.num_private(), 1);
        assert_eq!(r1cs.num_auxiliary(), 0);
        // public signals first, in declaration order, then the private one
        assert_eq!(r1cs.signal_name(1), Some("A"));
        assert_eq!(r1cs.signal_name(2), Some("Sum"));
        assert_eq!(r1cs.signal_name(3), Some("B"));
        assert_eq!(
            r1cs.a().rows[0],
            vec![(1, Fr::one()), (2, -Fr::one()), (3, Fr::one())]
        );
        assert_eq!(r1cs.b().rows[0], vec![(0, Fr::one())]);
        assert!(r1cs.c().rows[0].is_empty());
    }

    #[test]
    fn product_chain_introduces_auxiliaries_in_order() {
        let mut circuit = CircuitDefinition::<Fr>::new("cube");
        let x = circuit.private("x");
        let out = circuit.public("out");
        circuit.assert_equal(x.clone() * x.clone() * x + 5u64, out);
        let r1cs = compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap();

        // x*x -> aux0, aux0*x -> aux1, (aux1 + 5 - out) * 1 = 0
        assert_eq!(r1cs.num_auxiliary(), 2);
        assert_eq!(r1cs.num_constraints(), 3);
        let targets: Vec<_> = r1cs.solve_order().iter().map(|s| s.target()).collect();
        assert_eq!(targets, vec![3, 4]);
        assert_eq!(r1cs.signal_name(4), Some("aux1"));
        assert!(r1cs.validate().is_ok());
    }

    #[test]
    fn top_level_product_equality_needs_no_auxiliary() {
        let mut circuit = CircuitDefinition::<Fr>::new("mul");
        let x = circuit.private("x");
        let y = circuit.private("y");
        let z = circuit.public("z");
        circuit.assert_equal(z, x * y);
        let r1cs = compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap();
        assert_eq!(r1cs.num_auxiliary(), 0);
        assert_eq!(r1cs.num_constraints(), 1);
        assert_eq!(r1cs.c().rows[0], vec![(1, Fr::one())]);
    }

    #[test]
    fn scaling_by_constant_stays_linear() {
        let mut circuit = CircuitDefinition::<Fr>::new("scale");
        let x = circuit.private("x");
        let y = circuit.public("y");
        circuit.assert_equal(Expr::<Fr>::from(3u64) * x / 2u64, y);
        let r1cs = compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap();
        assert_eq!(r1cs.num_auxiliary(), 0);
        assert_eq!(r1cs.num_constraints(), 1);
    }

    #[test]
    fn compilation_is_deterministic() {
        let config = CompileConfig::reject_unconstrained();
        let first = compile(&sum_circuit(), &config).unwrap();
        let second = compile(&sum_circuit(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn undeclared_signal_is_rejected() {
        let mut circuit = CircuitDefinition::<Fr>::new("bad");
        let a = circuit.public("A");
        circuit.assert_equal(a, Expr::signal("ghost"));
        let err = compile(&circuit, &CompileConfig::ignore_unconstrained()).unwrap_err();
        assert_eq!(
            err,
            CompileError::UndeclaredSignal {
                name: "ghost".to_string(),
                relation: 0
            }
        );
    }

    #[test]
    fn unconstrained_policy_is_honoured() {
        let mut circuit = sum_circuit();
        circuit.private("unused");
        assert_eq!(
            compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap_err(),
            CompileError::UnconstrainedSignal("unused".to_string())
        );
        let r1cs = compile(&circuit, &CompileConfig::ignore_unconstrained()).unwrap();
        assert_eq!(r1cs.num_private(), 2);
        assert!(r1cs.a().rows[0].iter().all(|(col, _)| *col != 4));
    }

    #[test]
    fn signals_that_fold_away_are_unconstrained() {
        let folds: [fn(Expr<Fr>) -> Expr<Fr>; 2] = [|b| b * 0u64, |b| b.clone() - b];
        for folded in folds {
            let mut circuit = CircuitDefinition::<Fr>::new("folded");
            let a = circuit.public("A");
            let b = circuit.private("B");
            let sum = circuit.public("Sum");
            circuit.assert_equal(a + folded(b), sum);
            assert_eq!(
                compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap_err(),
                CompileError::UnconstrainedSignal("B".to_string())
            );

            let r1cs = compile(&circuit, &CompileConfig::ignore_unconstrained()).unwrap();
            assert!(r1cs.a().rows[0].iter().all(|(col, _)| *col != 3));
        }
    }

    #[test]
    fn duplicate_and_division_errors() {
        let mut circuit = sum_circuit();
        circuit.public("A");
        assert_eq!(
            compile(&circuit, &CompileConfig::ignore_unconstrained()).unwrap_err(),
            CompileError::DuplicateSignal("A".to_string())
        );

        let mut circuit = CircuitDefinition::<Fr>::new("div0");
        let x = circuit.public("x");
        circuit.assert_equal(x.clone() / 0u64, x);
        assert_eq!(
            compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap_err(),
            CompileError::DivisionByZero(0)
        );
    }
}
