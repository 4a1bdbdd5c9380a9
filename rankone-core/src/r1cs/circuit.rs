//! Declarative circuit definitions: named signals and the relations between them.

use ark_ff::PrimeField;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalRole {
    /// Visible to the verifier.
    Public,
    /// Known only to the witness generator and prover.
    Private,
    /// Introduced by the compiler to keep every relation quadratic.
    Auxiliary,
    /// The constant `1`, always at column 0.
    One,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
    pub role: SignalRole,
}

/// Arithmetic expression over named signals and field constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr<F: PrimeField> {
    Signal(String),
    Constant(F),
    Add(Box<Expr<F>>, Box<Expr<F>>),
    Sub(Box<Expr<F>>, Box<Expr<F>>),
    Neg(Box<Expr<F>>),
    Mul(Box<Expr<F>>, Box<Expr<F>>),
    Div(Box<Expr<F>>, Box<Expr<F>>),
}

impl<F: PrimeField> Expr<F> {
    pub fn signal(name: impl Into<String>) -> Self {
        Expr::Signal(name.into())
    }

    pub fn constant(value: impl Into<F>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn one() -> Self {
        Expr::Constant(F::one())
    }

    /// Names of every signal this expression reads, in traversal order.
    pub fn signals(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_signals(&mut out);
        out
    }

    fn collect_signals<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Signal(name) => out.push(name),
            Expr::Constant(_) => {}
            Expr::Neg(inner) => inner.collect_signals(out),
            Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
                l.collect_signals(out);
                r.collect_signals(out);
            }
        }
    }
}

impl<F: PrimeField> From<&str> for Expr<F> {
    fn from(name: &str) -> Self {
        Expr::signal(name)
    }
}

impl<F: PrimeField> From<u64> for Expr<F> {
    fn from(value: u64) -> Self {
        Expr::Constant(F::from(value))
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<F: PrimeField, R: Into<Expr<F>>> $trait<R> for Expr<F> {
            type Output = Expr<F>;

            fn $method(self, rhs: R) -> Expr<F> {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

impl<F: PrimeField> Neg for Expr<F> {
    type Output = Expr<F>;

    fn neg(self) -> Expr<F> {
        Expr::Neg(Box::new(self))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Relation<F: PrimeField> {
    /// `lhs == rhs`
    Equal(Expr<F>, Expr<F>),
    /// `a * b == c`
    Product(Expr<F>, Expr<F>, Expr<F>),
}

impl<F: PrimeField> Relation<F> {
    pub fn signals(&self) -> Vec<&str> {
        match self {
            Relation::Equal(l, r) => [l.signals(), r.signals()].concat(),
            Relation::Product(a, b, c) => [a.signals(), b.signals(), c.signals()].concat(),
        }
    }
}

/// An ordered set of declared signals plus the relations that must hold between them.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitDefinition<F: PrimeField> {
    pub name: String,
    signals: Vec<Signal>,
    relations: Vec<Relation<F>>,
}

impl<F: PrimeField> CircuitDefinition<F> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signals: vec![],
            relations: vec![],
        }
    }

    pub fn public(&mut self, name: impl Into<String>) -> Expr<F> {
        self.declare(name.into(), SignalRole::Public)
    }

    pub fn private(&mut self, name: impl Into<String>) -> Expr<F> {
        self.declare(name.into(), SignalRole::Private)
    }

    fn declare(&mut self, name: String, role: SignalRole) -> Expr<F> {
        self.signals.push(Signal {
            name: name.clone(),
            role,
        });
        Expr::Signal(name)
    }

    pub fn assert_equal(&mut self, lhs: impl Into<Expr<F>>, rhs: impl Into<Expr<F>>) {
        self.relations.push(Relation::Equal(lhs.into(), rhs.into()));
    }

    pub fn assert_product(
        &mut self,
        a: impl Into<Expr<F>>,
        b: impl Into<Expr<F>>,
        c: impl Into<Expr<F>>,
    ) {
        self.relations
            .push(Relation::Product(a.into(), b.into(), c.into()));
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn relations(&self) -> &[Relation<F>] {
        &self.relations
    }

    pub fn signals_with_role(&self, role: SignalRole) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn operators_build_trees() {
        let e: Expr<Fr> = Expr::signal("a") * "b" + Expr::<Fr>::constant(3u64) - "c";
        assert_eq!(e.signals(), vec!["a", "b", "c"]);
        match e {
            Expr::Sub(lhs, rhs) => {
                assert!(matches!(*lhs, Expr::Add(_, _)));
                assert_eq!(*rhs, Expr::signal("c"));
            }
            other => panic!("unexpected tree {other:?}"),
        }
    }

    #[test]
    fn declaration_order_is_kept() {
        let mut circuit = CircuitDefinition::<Fr>::new("order");
        circuit.private("x");
        circuit.public("y");
        circuit.public("z");
        let publics: Vec<_> = circuit
            .signals_with_role(SignalRole::Public)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(publics, vec!["y", "z"]);
        assert_eq!(circuit.signals().len(), 3);
    }
}
