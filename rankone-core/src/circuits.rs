//! Ready-made circuits used by the CLI, the integration tests and the benches.

use ark_ff::PrimeField;

use crate::r1cs::CircuitDefinition;

/// `A + B = Sum` with `A` and `Sum` public and `B` private.
pub fn sum<F: PrimeField>() -> CircuitDefinition<F> {
    let mut circuit = CircuitDefinition::new("sum");
    let a = circuit.public("A");
    let b = circuit.private("B");
    let sum = circuit.public("Sum");
    circuit.assert_equal(a + b, sum);
    circuit
}

/// Proves knowledge of `x` with `x^3 + x + 5 = out`.
pub fn cubic<F: PrimeField>() -> CircuitDefinition<F> {
    let mut circuit = CircuitDefinition::new("cubic");
    let x = circuit.private("x");
    let out = circuit.public("out");
    circuit.assert_equal(x.clone() * x.clone() * x.clone() + x + 5u64, out);
    circuit
}

/// `x_{i+1} = x_i^2 + i` iterated `rounds` times, exposing only the start and the end.
/// Each round is one constraint. `rounds` must be at least one.
pub fn square_chain<F: PrimeField>(rounds: usize) -> CircuitDefinition<F> {
    let mut circuit = CircuitDefinition::new(format!("square-chain-{rounds}"));
    let start = circuit.public("start");
    let mut current = start;
    for i in 0..rounds {
        let next = if i + 1 == rounds {
            circuit.public("end")
        } else {
            circuit.private(format!("x{}", i + 1))
        };
        circuit.assert_equal(current.clone() * current, next.clone() - i as u64);
        current = next;
    }
    circuit
}

/// Private intermediate values of [`square_chain`] for a given start, and the final value.
pub fn square_chain_values<F: PrimeField>(start: F, rounds: usize) -> (Vec<F>, F) {
    let mut values = Vec::with_capacity(rounds);
    let mut current = start;
    for i in 0..rounds {
        current = current * current + F::from(i as u64);
        values.push(current);
    }
    let end = values.pop().unwrap_or(start);
    (values, end)
}
