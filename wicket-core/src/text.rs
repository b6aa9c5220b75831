//! Row/column-prefixed matrix text format.
//!
//! ```text
//! 2 3
//! 1 0 -1
//! 0 1  1
//! ```
//!
//! The header gives the row and column counts; entries follow as whitespace-separated tokens.
//! Sign files are `1 n` matrices of sign codes, relation files are `1 m` followed by relation
//! symbols.

use std::fmt::Write as _;

use dashu::integer::IBig;
use thiserror::Error;

use crate::matrix::Matrix;
use crate::num::Int;
use crate::types::{Relation, VarSign};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("missing `rows cols` header")]
    MissingHeader,
    #[error("invalid dimension `{0}`")]
    InvalidDimension(String),
    #[error("entry {index}: `{token}` is not an integer")]
    InvalidEntry { index: usize, token: String },
    #[error("expected {expected} entries, found {found}")]
    EntryCount { expected: usize, found: usize },
    #[error("value {value} does not fit {precision}")]
    PrecisionOverflow { value: String, precision: &'static str },
    #[error("invalid sign code `{0}` (expected -1, 0, 1 or 2)")]
    InvalidSign(String),
    #[error("invalid relation `{0}` (expected <, >, =, <= or >=)")]
    InvalidRelation(String),
    #[error("expected a single row vector, found {0} rows")]
    NotAVector(usize),
}

struct Header<'a> {
    rows: usize,
    cols: usize,
    body: Vec<&'a str>,
}

fn split_header(input: &str) -> Result<Header<'_>, TextError> {
    let mut tokens = input.split_whitespace();
    let mut dim = || -> Result<usize, TextError> {
        let token = tokens.next().ok_or(TextError::MissingHeader)?;
        token
            .parse()
            .map_err(|_| TextError::InvalidDimension(token.to_owned()))
    };
    let rows = dim()?;
    let cols = dim()?;
    let body: Vec<&str> = tokens.collect();
    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| TextError::InvalidDimension(format!("{rows} x {cols}")))?;
    if body.len() != expected {
        return Err(TextError::EntryCount {
            expected,
            found: body.len(),
        });
    }
    Ok(Header { rows, cols, body })
}

fn parse_big(index: usize, token: &str) -> Result<IBig, TextError> {
    let digits = token.strip_prefix('+').unwrap_or(token);
    IBig::from_str_radix(digits, 10).map_err(|_| TextError::InvalidEntry {
        index,
        token: token.to_owned(),
    })
}

fn narrow<T: Int>(value: &IBig) -> Result<T, TextError> {
    T::from_big(value).ok_or_else(|| TextError::PrecisionOverflow {
        value: value.to_string(),
        precision: T::NAME,
    })
}

/// Parses a matrix; values outside the range of `T` are reported, not truncated.
pub fn parse_matrix<T: Int>(input: &str) -> Result<Matrix<T>, TextError> {
    let Header { rows, cols, body } = split_header(input)?;
    let mut data = Vec::with_capacity(body.len());
    for (index, token) in body.into_iter().enumerate() {
        data.push(narrow(&parse_big(index, token)?)?);
    }
    let found = data.len();
    Matrix::from_flat(rows, cols, data).ok_or(TextError::EntryCount {
        expected: rows * cols,
        found,
    })
}

fn vector_body(input: &str) -> Result<Vec<&str>, TextError> {
    let Header { rows, cols, body } = split_header(input)?;
    match (rows, cols) {
        (1, _) | (_, 0) => Ok(body),
        _ => Err(TextError::NotAVector(rows)),
    }
}

pub fn parse_signs(input: &str) -> Result<Vec<VarSign>, TextError> {
    vector_body(input)?
        .into_iter()
        .map(|token| {
            token
                .parse::<i64>()
                .ok()
                .and_then(VarSign::from_code)
                .ok_or_else(|| TextError::InvalidSign(token.to_owned()))
        })
        .collect()
}

pub fn parse_relations(input: &str) -> Result<Vec<Relation>, TextError> {
    vector_body(input)?
        .into_iter()
        .map(|token| {
            token
                .parse::<Relation>()
                .map_err(|_| TextError::InvalidRelation(token.to_owned()))
        })
        .collect()
}

/// Writes `rows` as a `rows.len() cols` matrix, one row per line.
pub fn write_matrix<T: Int>(rows: &[Vec<T>], cols: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", rows.len(), cols);
    for row in rows {
        debug_assert_eq!(row.len(), cols);
        let mut first = true;
        for value in row {
            if !first {
                out.push(' ');
            }
            first = false;
            let _ = write!(out, "{value}");
        }
        out.push('\n');
    }
    out
}

pub fn write_signs(signs: &[VarSign]) -> String {
    let codes: Vec<i64> = signs.iter().map(|s| s.code()).collect();
    write_matrix(&[codes], signs.len())
}

pub fn write_relations(relations: &[Relation]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "1 {}", relations.len());
    let symbols: Vec<&str> = relations.iter().map(|r| r.symbol()).collect();
    out.push_str(&symbols.join(" "));
    out.push('\n');
    out
}
