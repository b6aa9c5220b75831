use thiserror::Error;
use wicket_core::TextError;

#[derive(Debug, Error)]
pub enum WicketError {
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("arithmetic overflow in {precision} while {context}")]
    Overflow {
        precision: &'static str,
        context: &'static str,
    },
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("constraint {index} cannot have type {kind}")]
    InvalidConstraintType { index: usize, kind: &'static str },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(crate) trait OrOverflow<T> {
    fn or_overflow(self, precision: &'static str, context: &'static str) -> Result<T, WicketError>;
}

impl<T> OrOverflow<T> for Option<T> {
    #[inline(always)]
    fn or_overflow(self, precision: &'static str, context: &'static str) -> Result<T, WicketError> {
        self.ok_or(WicketError::Overflow { precision, context })
    }
}
