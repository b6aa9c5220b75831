use wicket_core::linalg;
use wicket_core::num::{self, Int};
use wicket_core::{Col, ConstraintType, IndexSet, Matrix, Relation, VarSign};

use crate::error::OrOverflow;
use crate::{Problem, WicketError};

/// Where a lifted column comes from in the user's variable space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ColumnOrigin {
    Direct(Col),
    Negated(Col),
    /// Negative half `y'` of a circuit column, `x = y − y'`.
    Mirror(Col),
}

impl ColumnOrigin {
    /// Input column the lifted column is copied from.
    fn source(&self) -> Col {
        match *self {
            ColumnOrigin::Direct(c) | ColumnOrigin::Negated(c) | ColumnOrigin::Mirror(c) => c,
        }
    }
}

/// Immutable constraint system seen by the engine.
///
/// Constraint `i < n` is variable `i`, constraint `n + r` is row `r`. A support passed to the
/// queries below is the set of constraints that are *not* tight.
#[derive(Clone, Debug)]
pub struct Cone<T> {
    matrix: Matrix<T>,
    types: Vec<ConstraintType>,
    origins: Vec<ColumnOrigin>,
    original_vars: usize,
}

impl<T: Int> Cone<T> {
    /// Builds the cone directly from a matrix and one type per constraint (columns, then rows).
    pub fn from_parts(matrix: Matrix<T>, types: Vec<ConstraintType>) -> Result<Self, WicketError> {
        let n = matrix.col_count();
        let expected = n + matrix.row_count();
        if types.len() != expected {
            return Err(WicketError::DimensionMismatch {
                what: "constraint type count",
                expected,
                found: types.len(),
            });
        }
        if let Some(index) = types[n..]
            .iter()
            .position(|t| *t == ConstraintType::DoubleBounded)
        {
            return Err(WicketError::InvalidConstraintType {
                index: n + index,
                kind: "DoubleBounded",
            });
        }
        Ok(Self {
            matrix,
            types,
            origins: (0..n).map(ColumnOrigin::Direct).collect(),
            original_vars: n,
        })
    }

    /// Normalises signs and relations: non-positive columns and `<` rows are negated, circuit
    /// columns get a mirror column appended after the original ones.
    pub fn lift(problem: &Problem<T>) -> Result<Self, WicketError> {
        let source = problem.matrix();
        let n = source.col_count();
        let m = source.row_count();

        let mut origins = Vec::with_capacity(n);
        let mut col_types = Vec::with_capacity(n);
        let mut mirrors = Vec::new();
        for (c, sign) in problem.signs().iter().enumerate() {
            match sign {
                VarSign::Free => {
                    origins.push(ColumnOrigin::Direct(c));
                    col_types.push(ConstraintType::Free);
                }
                VarSign::NonNegative => {
                    origins.push(ColumnOrigin::Direct(c));
                    col_types.push(ConstraintType::LowerBound);
                }
                VarSign::NonPositive => {
                    origins.push(ColumnOrigin::Negated(c));
                    col_types.push(ConstraintType::LowerBound);
                }
                VarSign::Circuit => {
                    origins.push(ColumnOrigin::Direct(c));
                    col_types.push(ConstraintType::DoubleBounded);
                    mirrors.push(c);
                }
            }
        }
        for &c in &mirrors {
            origins.push(ColumnOrigin::Mirror(c));
            col_types.push(ConstraintType::DoubleBounded);
        }

        let all_rows: Vec<usize> = (0..m).collect();
        let sources: Vec<usize> = origins.iter().map(ColumnOrigin::source).collect();
        let mut matrix = source.select(&all_rows, &sources);
        for (j, origin) in origins.iter().enumerate() {
            if !matches!(origin, ColumnOrigin::Direct(_)) {
                matrix
                    .negate_column(j)
                    .or_overflow(T::NAME, "lifting the constraint matrix")?;
            }
        }
        for (r, rel) in problem.relations().iter().enumerate() {
            if *rel == Relation::Less {
                matrix
                    .negate_row(r)
                    .or_overflow(T::NAME, "lifting the constraint matrix")?;
            }
        }

        let mut types = col_types;
        types.extend(problem.relations().iter().map(|rel| match rel {
            Relation::Greater | Relation::Less => ConstraintType::LowerBound,
            Relation::Equal => ConstraintType::Equality,
        }));
        Ok(Self {
            matrix,
            types,
            origins,
            original_vars: n,
        })
    }

    /// Lifted variable count.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.matrix.col_count()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.matrix.row_count()
    }

    #[inline]
    pub fn num_cons(&self) -> usize {
        self.types.len()
    }

    /// Variable count of the space generators are projected back to.
    #[inline]
    pub fn original_vars(&self) -> usize {
        self.original_vars
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix<T> {
        &self.matrix
    }

    #[inline]
    pub fn constraint_type(&self, i: usize) -> ConstraintType {
        self.types[i]
    }

    /// Sets the bit of every constraint of type `kind`.
    pub fn constraint_set<S: IndexSet>(&self, kind: ConstraintType, out: &mut S) {
        for (i, t) in self.types.iter().enumerate() {
            if *t == kind {
                out.set(i);
            }
        }
    }

    pub fn slack(&self, generator: &[T], i: usize) -> Result<T, WicketError> {
        let n = self.num_vars();
        if i < n {
            return Ok(generator[i].clone());
        }
        num::dot(self.matrix.row(i - n), generator).or_overflow(T::NAME, "evaluating a slack")
    }

    pub fn slacks(&self, generator: &[T]) -> Result<Vec<T>, WicketError> {
        (0..self.num_cons()).map(|i| self.slack(generator, i)).collect()
    }

    /// Whether the constraints outside `support` cut out a face of dimension `d`.
    ///
    /// Keeps the columns of variables in `support` and the rows not in `support`, and compares
    /// the exact rank of that block against `kept columns − d`.
    pub fn is_d_dimensional_face<S: IndexSet>(&self, support: &S, d: usize) -> Result<bool, WicketError> {
        let n = self.num_vars();
        let cols: Vec<usize> = (0..n).filter(|&j| support.contains(j)).collect();
        if cols.len() < d {
            return Ok(false);
        }
        let rows: Vec<usize> = (0..self.num_rows())
            .filter(|&r| !support.contains(n + r))
            .collect();
        let block = self.matrix.select(&rows, &cols);
        let rank = linalg::rank(&block).or_overflow(T::NAME, "testing face dimension")?;
        Ok(rank + d == cols.len())
    }

    /// Equality rows plus `e_j` for every equality-typed column; its kernel is the ambient space.
    pub fn equality_system(&self) -> Matrix<T> {
        let n = self.num_vars();
        let mut out = Matrix::zeros(0, n);
        for j in 0..n {
            if self.types[j] == ConstraintType::Equality {
                let mut unit = vec![T::zero(); n];
                unit[j] = T::one();
                out.push_row(unit);
            }
        }
        for r in 0..self.num_rows() {
            if self.types[n + r] == ConstraintType::Equality {
                out.push_row(self.matrix.row(r).to_vec());
            }
        }
        out
    }

    /// Maps a lifted vector back to the user's variables.
    pub fn project(&self, generator: &[T]) -> Result<Vec<T>, WicketError> {
        let mut out = vec![T::zero(); self.original_vars];
        for (value, origin) in generator.iter().zip(&self.origins) {
            if value.is_zero() {
                continue;
            }
            let (c, result) = match *origin {
                ColumnOrigin::Direct(c) => (c, out[c].checked_add(value)),
                ColumnOrigin::Negated(c) | ColumnOrigin::Mirror(c) => (c, out[c].checked_sub(value)),
            };
            out[c] = result.or_overflow(T::NAME, "projecting a generator")?;
        }
        Ok(out)
    }
}
