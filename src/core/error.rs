use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

/// Failures raised before a calculation runs.
///
/// Unreachable targets are not errors: solvers report them through their
/// return values (`RateSolution`, `DurationSolution`, `Option`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{0}")]
    InvalidInput(String),
}

impl CalcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }
}
