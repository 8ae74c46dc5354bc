use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("unknown variable {0}")]
    UnknownVariable(String),
    #[error("constraint {kind} cannot be evaluated over {arity} values")]
    ScopeArity { kind: &'static str, arity: usize },
    #[error("{0}")]
    Custom(String),
}

/// Rejections produced while validating puzzle input, before any CSP is
/// built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("'{0}' is not alphabet uppercase")]
    NotUppercase(String),
    #[error("The length of the sum cannot be greater than the maximum summands length + 1")]
    SumTooLong,
    #[error("The length of the sum cannot be smaller than the minimum summands length")]
    SumTooShort,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
    #[error("{0}")]
    Puzzle(#[from] PuzzleError),
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
