//! Defines the Linear Combination (LC) object and associated operations.
//! A LinearCombination is a vector of Terms, where each Term is a pair of a column of the
//! assignment vector and a field coefficient. Column 0 is the constant one.

use ark_ff::PrimeField;
use std::ops::{Add, Neg, Sub};

use crate::utils::evaluate_sparse_row;

/// Column of the constant-one signal.
pub const ONE: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term<F: PrimeField>(pub usize, pub F);

/// Linear Combination of terms. Always sorted by column, with no duplicate columns and no
/// zero coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LC<F: PrimeField>(Vec<Term<F>>);

impl<F: PrimeField> LC<F> {
    pub fn new(mut terms: Vec<Term<F>>) -> Self {
        terms.sort_by_key(|term| term.0);
        let mut merged: Vec<Term<F>> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if last.0 == term.0 => last.1 += term.1,
                _ => merged.push(term),
            }
        }
        merged.retain(|term| !term.1.is_zero());
        LC(merged)
    }

    pub fn zero() -> Self {
        LC(vec![])
    }

    pub fn constant(value: F) -> Self {
        LC::new(vec![Term(ONE, value)])
    }

    pub fn column(index: usize) -> Self {
        LC(vec![Term(index, F::one())])
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.0
    }

    /// `Some(c)` if this combination does not depend on any signal other than the constant one.
    pub fn as_constant(&self) -> Option<F> {
        match self.0.as_slice() {
            [] => Some(F::zero()),
            [Term(ONE, c)] => Some(*c),
            _ => None,
        }
    }

    pub fn scale(&self, factor: F) -> Self {
        LC::new(
            self.0
                .iter()
                .map(|Term(col, coeff)| Term(*col, *coeff * factor))
                .collect(),
        )
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|term| term.0)
    }

    pub fn evaluate(&self, z: &[F]) -> F {
        evaluate_sparse_row(&self.to_row(), z)
    }

    /// Sparse matrix row: `(column, coefficient)` pairs.
    pub fn to_row(&self) -> Vec<(usize, F)> {
        self.0.iter().map(|Term(col, coeff)| (*col, *coeff)).collect()
    }
}

impl<F: PrimeField> Add for LC<F> {
    type Output = LC<F>;

    fn add(self, other: LC<F>) -> LC<F> {
        let mut terms = self.0;
        terms.extend(other.0);
        LC::new(terms)
    }
}

impl<F: PrimeField> Neg for LC<F> {
    type Output = LC<F>;

    fn neg(self) -> LC<F> {
        self.scale(-F::one())
    }
}

impl<F: PrimeField> Sub for LC<F> {
    type Output = LC<F>;

    fn sub(self, other: LC<F>) -> LC<F> {
        self + (-other)
    }
}
