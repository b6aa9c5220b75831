//! Double description core.
//!
//! Supports are stored in non-tight form: bit `i` is set iff constraint `i` has been processed
//! and the generator's slack on it is non-zero. Equality, free and unprocessed constraints are
//! never set.

mod combine;
mod engine;
mod index;
mod order;
mod pool;
mod state;

pub use engine::{DoubleDescription, enumerate, enumerate_cone};
pub use index::SupportTree;
pub use order::{ConstraintOrder, SelectionRule, SlackCounts};
pub use state::{Partition, RayState};
