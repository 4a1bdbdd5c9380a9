use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;

use crate::utils::evaluate_sparse_row;

use super::circuit::SignalRole;

/// Sparse representation of a single R1CS matrix: one `(column, coefficient)` list per row.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SparseMatrix<F: PrimeField> {
    pub rows: Vec<Vec<(usize, F)>>,
    pub num_cols: usize,
}

impl<F: PrimeField> SparseMatrix<F> {
    pub fn new(num_cols: usize) -> Self {
        Self {
            rows: vec![],
            num_cols,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// `M·z`, one entry per row.
    pub fn mul_vector(&self, z: &[F]) -> Vec<F> {
        self.rows
            .par_iter()
            .map(|row| evaluate_sparse_row(row, z))
            .collect()
    }
}

/// How the witness generator fills one auxiliary column from columns assigned before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuxiliarySolver<F: PrimeField> {
    /// `z[target] = (a·z) * (b·z)`
    Product {
        target: usize,
        a: Vec<(usize, F)>,
        b: Vec<(usize, F)>,
    },
    /// `z[target] = (numerator·z) / (denominator·z)`
    Quotient {
        target: usize,
        numerator: Vec<(usize, F)>,
        denominator: Vec<(usize, F)>,
    },
}

impl<F: PrimeField> AuxiliarySolver<F> {
    pub fn target(&self) -> usize {
        match self {
            AuxiliarySolver::Product { target, .. } | AuxiliarySolver::Quotient { target, .. } => {
                *target
            }
        }
    }
}

/// Compiled rank-1 constraint system: `(A·z) ∘ (B·z) = (C·z)`.
///
/// Column layout of `z`: the constant one, then public signals, then private signals, then
/// auxiliary signals. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CS<F: PrimeField> {
    a: SparseMatrix<F>,
    b: SparseMatrix<F>,
    c: SparseMatrix<F>,
    num_public: usize,
    num_private: usize,
    num_auxiliary: usize,
    signal_names: Vec<String>,
    /// Index of the circuit relation each row was lowered from.
    row_relation: Vec<usize>,
    /// Topological evaluation order for auxiliary columns.
    solve_order: Vec<AuxiliarySolver<F>>,
}

impl<F: PrimeField> R1CS<F> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_compiled(
        a: SparseMatrix<F>,
        b: SparseMatrix<F>,
        c: SparseMatrix<F>,
        num_public: usize,
        num_private: usize,
        signal_names: Vec<String>,
        row_relation: Vec<usize>,
        solve_order: Vec<AuxiliarySolver<F>>,
    ) -> Self {
        let num_auxiliary = solve_order.len();
        Self {
            a,
            b,
            c,
            num_public,
            num_private,
            num_auxiliary,
            signal_names,
            row_relation,
            solve_order,
        }
    }

    /// Wraps externally produced matrices. No auxiliary solvers are attached, so the witness must
    /// be built by the caller; use [`Self::first_unsatisfied_row`] to check it.
    pub fn from_matrices(
        a: SparseMatrix<F>,
        b: SparseMatrix<F>,
        c: SparseMatrix<F>,
        num_public: usize,
        num_private: usize,
    ) -> Self {
        let num_rows = a.num_rows();
        let num_auxiliary = a.num_cols.saturating_sub(1 + num_public + num_private);
        let signal_names = (0..a.num_cols).map(|i| format!("z{i}")).collect();
        Self {
            a,
            b,
            c,
            num_public,
            num_private,
            num_auxiliary,
            signal_names,
            row_relation: (0..num_rows).collect(),
            solve_order: vec![],
        }
    }

    pub fn a(&self) -> &SparseMatrix<F> {
        &self.a
    }

    pub fn b(&self) -> &SparseMatrix<F> {
        &self.b
    }

    pub fn c(&self) -> &SparseMatrix<F> {
        &self.c
    }

    pub fn num_constraints(&self) -> usize {
        self.a.num_rows()
    }

    /// Width of the assignment vector.
    pub fn num_signals(&self) -> usize {
        1 + self.num_public + self.num_private + self.num_auxiliary
    }

    pub fn num_public(&self) -> usize {
        self.num_public
    }

    pub fn num_private(&self) -> usize {
        self.num_private
    }

    pub fn num_auxiliary(&self) -> usize {
        self.num_auxiliary
    }

    /// Instance columns: the constant one plus every public signal.
    pub fn num_inputs(&self) -> usize {
        1 + self.num_public
    }

    pub fn solve_order(&self) -> &[AuxiliarySolver<F>] {
        &self.solve_order
    }

    pub fn signal_name(&self, column: usize) -> Option<&str> {
        self.signal_names.get(column).map(String::as_str)
    }

    pub fn signal_role(&self, column: usize) -> SignalRole {
        match column {
            0 => SignalRole::One,
            c if c <= self.num_public => SignalRole::Public,
            c if c <= self.num_public + self.num_private => SignalRole::Private,
            _ => SignalRole::Auxiliary,
        }
    }

    pub fn relation_of_row(&self, row: usize) -> usize {
        self.row_relation[row]
    }

    /// Index of the first row with `(A·z)_i * (B·z)_i != (C·z)_i`, if any.
    pub fn first_unsatisfied_row(&self, z: &[F]) -> Option<usize> {
        (0..self.num_constraints()).find(|&i| {
            let a = evaluate_sparse_row(&self.a.rows[i], z);
            let b = evaluate_sparse_row(&self.b.rows[i], z);
            let c = evaluate_sparse_row(&self.c.rows[i], z);
            a * b != c
        })
    }

    /// Structural checks run before setup. Returns a description of the first defect found.
    pub fn validate(&self) -> Result<(), String> {
        let rows = self.a.num_rows();
        if self.b.num_rows() != rows || self.c.num_rows() != rows {
            return Err(format!(
                "matrix row counts differ: A={}, B={}, C={}",
                rows,
                self.b.num_rows(),
                self.c.num_rows()
            ));
        }
        let width = self.num_signals();
        for (label, matrix) in [("A", &self.a), ("B", &self.b), ("C", &self.c)] {
            if matrix.num_cols != width {
                return Err(format!(
                    "matrix {label} has {} columns but the signal layout needs {width}",
                    matrix.num_cols
                ));
            }
            let out_of_range = matrix
                .rows
                .iter()
                .enumerate()
                .find_map(|(i, row)| row.iter().find(|(col, _)| *col >= width).map(|e| (i, e.0)));
            if let Some((row, col)) = out_of_range {
                return Err(format!(
                    "matrix {label} row {row} references column {col} outside width {width}"
                ));
            }
        }
        if rows == 0 {
            return Err("constraint system has no rows".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn one_row(col: usize) -> SparseMatrix<Fr> {
        SparseMatrix {
            rows: vec![vec![(col, Fr::from(1u64))]],
            num_cols: 3,
        }
    }

    #[test]
    fn role_layout() {
        let r1cs = R1CS::from_matrices(one_row(1), one_row(0), one_row(2), 1, 1);
        assert_eq!(r1cs.num_signals(), 3);
        assert_eq!(r1cs.num_inputs(), 2);
        assert_eq!(r1cs.signal_role(0), SignalRole::One);
        assert_eq!(r1cs.signal_role(1), SignalRole::Public);
        assert_eq!(r1cs.signal_role(2), SignalRole::Private);
        assert!(r1cs.validate().is_ok());
    }

    #[test]
    fn satisfaction_check() {
        // z1 * 1 = z2
        let r1cs = R1CS::from_matrices(one_row(1), one_row(0), one_row(2), 1, 1);
        let good = vec![Fr::from(1u64), Fr::from(9u64), Fr::from(9u64)];
        let bad = vec![Fr::from(1u64), Fr::from(9u64), Fr::from(8u64)];
        assert_eq!(r1cs.first_unsatisfied_row(&good), None);
        assert_eq!(r1cs.first_unsatisfied_row(&bad), Some(0));
    }

    #[test]
    fn validate_rejects_out_of_range_column() {
        let r1cs = R1CS::from_matrices(one_row(1), one_row(7), one_row(2), 1, 1);
        let err = r1cs.validate().unwrap_err();
        assert!(err.contains("column 7"), "{err}");
    }
}
