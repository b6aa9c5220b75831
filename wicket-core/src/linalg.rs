//! Fraction-free integer elimination.
//!
//! Rows are combined as `(a/g)·r − (b/g)·p` with `g = gcd(a, b)` and re-made primitive after every
//! step, which keeps entries small without leaving the integers. Every routine returns `None` when
//! a fixed-width backing overflows.

use crate::matrix::Matrix;
use crate::num::{self, Int};

/// Index of the row in `rows[from..]` with the smallest non-zero `|row[col]|`.
fn pick_pivot<T: Int>(rows: &[Vec<T>], from: usize, col: usize) -> Option<Option<usize>> {
    let mut best: Option<(usize, T)> = None;
    for (r, row) in rows.iter().enumerate().skip(from) {
        if row[col].is_zero() {
            continue;
        }
        let abs = row[col].checked_abs()?;
        if best.as_ref().is_none_or(|(_, b)| abs < *b) {
            best = Some((r, abs));
        }
    }
    Some(best.map(|(r, _)| r))
}

/// Clears `target[col]` against `pivot`, keeping the orientation of `target`.
fn eliminate<T: Int>(target: &mut Vec<T>, pivot: &[T], col: usize) -> Option<()> {
    if target[col].is_zero() {
        return Some(());
    }
    let a = pivot[col].checked_abs()?;
    let b = target[col].clone();
    let g = a.checked_gcd(&b)?;
    let fa = a.checked_div_exact(&g)?;
    let mut fb = b.checked_div_exact(&g)?;
    if pivot[col].is_negative() {
        fb = fb.checked_neg()?;
    }
    let mut out = num::combine(&fa, target, &fb, pivot)?;
    debug_assert!(out[col].is_zero());
    num::make_primitive(&mut out)?;
    *target = out;
    Some(())
}

/// Brings `rows` to row echelon form in place, dropping zero rows. Returns the pivot columns.
pub fn echelon<T: Int>(rows: &mut Vec<Vec<T>>) -> Option<Vec<usize>> {
    let cols = rows.first().map_or(0, Vec::len);
    let mut pivots = Vec::new();
    let mut rank = 0;
    for col in 0..cols {
        if rank == rows.len() {
            break;
        }
        let Some(p) = pick_pivot(rows, rank, col)? else {
            continue;
        };
        rows.swap(rank, p);
        let (head, tail) = rows.split_at_mut(rank + 1);
        let pivot = &head[rank];
        for row in tail.iter_mut() {
            eliminate(row, pivot, col)?;
        }
        pivots.push(col);
        rank += 1;
    }
    rows.truncate(rank);
    Some(pivots)
}

/// Integer reduced echelon form: primitive rows, positive pivots, pivot columns zero elsewhere.
///
/// The result depends only on the row space of the input.
pub fn reduced_echelon<T: Int>(mut rows: Vec<Vec<T>>) -> Option<(Vec<Vec<T>>, Vec<usize>)> {
    let pivots = echelon(&mut rows)?;
    for (i, &col) in pivots.iter().enumerate() {
        if rows[i][col].is_negative() {
            num::negate_in_place(&mut rows[i])?;
        }
        num::make_primitive(&mut rows[i])?;
        let pivot = rows[i].clone();
        for (j, row) in rows.iter_mut().enumerate() {
            if j != i {
                eliminate(row, &pivot, col)?;
            }
        }
    }
    Some((rows, pivots))
}

pub fn rank<T: Int>(m: &Matrix<T>) -> Option<usize> {
    if m.is_empty() {
        return Some(0);
    }
    let mut rows = m.to_rows();
    Some(echelon(&mut rows)?.len())
}

/// Primitive integer basis of `{x : m·x = 0}`, one vector per non-pivot column.
pub fn kernel_basis<T: Int>(m: &Matrix<T>) -> Option<Vec<Vec<T>>> {
    let cols = m.col_count();
    let (rows, pivots) = if m.row_count() == 0 {
        (Vec::new(), Vec::new())
    } else {
        reduced_echelon(m.to_rows())?
    };
    let mut is_pivot = vec![false; cols];
    for &p in &pivots {
        is_pivot[p] = true;
    }

    let mut basis = Vec::with_capacity(cols - pivots.len());
    for free in (0..cols).filter(|c| !is_pivot[*c]) {
        let mut scale = T::one();
        for (row, &p) in rows.iter().zip(&pivots) {
            if !row[free].is_zero() {
                scale = num::checked_lcm(&scale, &row[p])?;
            }
        }
        let mut v = vec![T::zero(); cols];
        v[free] = scale.clone();
        for (row, &p) in rows.iter().zip(&pivots) {
            if row[free].is_zero() {
                continue;
            }
            let factor = scale.checked_div_exact(&row[p])?;
            v[p] = row[free].checked_mul(&factor)?.checked_neg()?;
        }
        num::make_primitive(&mut v)?;
        basis.push(v);
    }
    Some(basis)
}

/// Clears `v` at every pivot column of a reduced echelon `basis` using positive multiples of `v`.
pub fn reduce_modulo<T: Int>(v: &mut Vec<T>, basis: &[Vec<T>], pivots: &[usize]) -> Option<()> {
    for (row, &p) in basis.iter().zip(pivots) {
        debug_assert!(row[p].is_positive());
        eliminate(v, row, p)?;
    }
    num::make_primitive(v)
}
