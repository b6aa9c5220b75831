use crate::num::Int;

/// Dense row-major matrix of exact integers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Int> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Returns `None` when `data.len() != rows * cols`.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    /// Returns `None` when the rows have different lengths.
    pub fn from_rows(cols: usize, rows: impl IntoIterator<Item = Vec<T>>) -> Option<Self> {
        let mut out = Self::zeros(0, cols);
        for row in rows {
            if row.len() != cols {
                return None;
            }
            out.push_row(row);
        }
        Some(out)
    }

    #[inline(always)]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        let cols = self.cols;
        &mut self.data[r * cols..(r + 1) * cols]
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> &T {
        &self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: T) {
        let cols = self.cols;
        self.data[r * cols + c] = value;
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        // A zero-column matrix still yields `rows` empty rows.
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn push_row(&mut self, row: Vec<T>) {
        assert_eq!(row.len(), self.cols, "row length mismatch");
        self.data.extend(row);
        self.rows += 1;
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }

    /// Negates column `c` in place; `None` on overflow.
    pub fn negate_column(&mut self, c: usize) -> Option<()> {
        for r in 0..self.rows {
            let v = self.get(r, c).checked_neg()?;
            self.set(r, c, v);
        }
        Some(())
    }

    pub fn negate_row(&mut self, r: usize) -> Option<()> {
        crate::num::negate_in_place(self.row_mut(r))
    }

    /// Copy keeping only `rows` and `cols` (in the given order).
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &r in rows {
            let row = self.row(r);
            data.extend(cols.iter().map(|&c| row[c].clone()));
        }
        Self {
            rows: rows.len(),
            cols: cols.len(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_checks() {
        assert!(Matrix::<i64>::from_flat(2, 2, vec![1, 2, 3]).is_none());
        assert!(Matrix::from_rows(2, [vec![1i64, 2], vec![3]]).is_none());

        let m = Matrix::from_rows(3, [vec![1i64, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.select(&[1], &[2, 0]).to_rows(), vec![vec![6, 4]]);
    }

    #[test]
    fn zero_columns_still_have_rows() {
        let m = Matrix::<i32>::zeros(3, 0);
        assert_eq!(m.rows().count(), 3);
        assert!(m.is_empty());
    }

    #[test]
    fn negation_reports_overflow() {
        let mut m = Matrix::from_rows(2, [vec![i32::MIN, 1]]).unwrap();
        assert!(m.negate_column(1).is_some());
        assert_eq!(m.row(0), &[i32::MIN, -1]);
        assert!(m.negate_column(0).is_none());

        let mut m = Matrix::from_rows(2, [vec![3i64, -4], vec![5, 6]]).unwrap();
        assert!(m.negate_row(1).is_some());
        assert_eq!(m.to_rows(), vec![vec![3, -4], vec![-5, -6]]);
    }
}
