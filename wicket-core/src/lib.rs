//! Engine-agnostic primitives for exact cone enumeration.
//!
//! This crate exposes the building blocks shared by the `wicket` engine and its tooling:
//! - exact integer arithmetic behind one capability trait (`num`)
//! - fixed- and dynamic-width support sets over constraint indices (`set`)
//! - constraint, sign and relation vocabulary (`types`)
//! - dense row-major matrices and exact elimination (`matrix`, `linalg`)
//! - the row/col-prefixed text format (`text`)

pub mod linalg;
pub mod matrix;
pub mod num;
pub mod set;
pub mod text;
pub mod types;

pub use matrix::Matrix;
pub use num::{Int, Sign};
pub use set::{BitSet, IndexSet, WordSet};
pub use text::TextError;
pub use types::{Col, ConstraintType, Relation, Row, VarSign};
