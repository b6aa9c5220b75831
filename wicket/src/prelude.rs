pub use crate::WicketError;
pub use crate::dd::{ConstraintOrder, SelectionRule, enumerate, enumerate_cone};
pub use crate::options::{AdjacencyTest, ConeOptions, ConeOptionsBuilder, Precision};
pub use crate::output::{ConeOutput, ConeStats};
pub use crate::{Cone, Problem};
pub use wicket_core::{ConstraintType, Int, Matrix, Relation, VarSign};
