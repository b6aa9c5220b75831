//! Exact-integer double description enumeration.
//!
//! Given `A`, a sign per column and a relation per row, computes the extreme rays, the circuits
//! (for columns allowed to take both signs) and a basis of the lineality space of the cone, all
//! in canonical integer form.
//!
//! ```
//! use wicket::prelude::*;
//!
//! // x ≥ 0, y ≥ 0, x − y ≥ 0
//! let a = Matrix::from_rows(2, [vec![1i64, -1]]).unwrap();
//! let problem = Problem::new(a)
//!     .with_signs(vec![VarSign::NonNegative; 2])?
//!     .with_relations(vec![Relation::Greater])?;
//! let out = enumerate(&problem, &ConeOptions::default())?;
//! assert_eq!(out.rays(), &[vec![1, 0], vec![1, 1]]);
//! # Ok::<(), WicketError>(())
//! ```

pub mod cone;
pub mod dd;
pub mod error;
pub mod options;
pub mod output;
pub mod prelude;
pub mod problem;

pub use cone::Cone;
pub use dd::{ConstraintOrder, enumerate, enumerate_cone};
pub use error::WicketError;
pub use options::{AdjacencyTest, ConeOptions, ConeOptionsBuilder, Precision};
pub use output::{ConeOutput, ConeStats};
pub use problem::Problem;
