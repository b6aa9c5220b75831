use wicket_core::{Int, Matrix, Relation, VarSign};

use crate::WicketError;

/// User-facing input: `A` (m×n), one sign per column and one relation per row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Problem<T> {
    matrix: Matrix<T>,
    signs: Vec<VarSign>,
    relations: Vec<Relation>,
}

impl<T: Int> Problem<T> {
    /// All columns free, all rows equalities.
    pub fn new(matrix: Matrix<T>) -> Self {
        Self {
            signs: vec![VarSign::default(); matrix.col_count()],
            relations: vec![Relation::default(); matrix.row_count()],
            matrix,
        }
    }

    pub fn with_signs(mut self, signs: Vec<VarSign>) -> Result<Self, WicketError> {
        if signs.len() != self.matrix.col_count() {
            return Err(WicketError::DimensionMismatch {
                what: "sign vector length",
                expected: self.matrix.col_count(),
                found: signs.len(),
            });
        }
        self.signs = signs;
        Ok(self)
    }

    pub fn with_relations(mut self, relations: Vec<Relation>) -> Result<Self, WicketError> {
        if relations.len() != self.matrix.row_count() {
            return Err(WicketError::DimensionMismatch {
                what: "relation vector length",
                expected: self.matrix.row_count(),
                found: relations.len(),
            });
        }
        self.relations = relations;
        Ok(self)
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix<T> {
        &self.matrix
    }

    #[inline]
    pub fn signs(&self) -> &[VarSign] {
        &self.signs
    }

    #[inline]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        self.matrix.col_count()
    }

    /// `{x ≥ 0}` in `n` dimensions with no rows.
    pub fn orthant(n: usize) -> Self {
        Self {
            matrix: Matrix::zeros(0, n),
            signs: vec![VarSign::NonNegative; n],
            relations: Vec::new(),
        }
    }
}
