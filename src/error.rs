use thiserror::Error;

/// Custom error types for the parasurv library.
#[derive(Error, Debug)]
pub enum SurvError {
    /// The family name passed to `fit`/`contrast` does not match a supported distribution.
    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    /// A user-supplied initial-value vector does not have the family's parameter arity.
    #[error("Bad parameter arity: expected {expected}, got {got}")]
    BadParameterArity { expected: usize, got: usize },

    /// An observation time was not strictly positive.
    #[error("Non-positive observation time: {0}")]
    NonPositiveTime(f64),

    /// A status code was neither 0 (censored) nor 1 (event).
    #[error("Bad status code: {0} (expected 0 or 1)")]
    BadStatusCode(u8),

    /// No events were observed; the family's parameters are not identifiable.
    #[error("No events observed in data: at least one status=1 observation is required")]
    NoEvents,

    /// `tau` was <= 0 or exceeded the maximum observed time.
    #[error("Invalid tau: {0} (must be in (0, max observed time])")]
    InvalidTau(f64),

    /// `sig` was outside (0, 1).
    #[error("Invalid significance level: {0} (must be in (0, 1))")]
    InvalidSig(f64),

    /// Adaptive quadrature failed to converge within its subdivision budget.
    /// Invalidates only the functional that requested it.
    #[error("Quadrature failed to converge to tolerance {tol} within {max_subdivisions} subdivisions")]
    QuadratureFailure { tol: f64, max_subdivisions: usize },

    /// Wrapper for errors coming from the ndarray-linalg backend.
    #[error("Linear algebra backend error: {0}")]
    LinalgError(#[from] ndarray_linalg::error::LinalgError),

    /// Dimension mismatch between arrays passed to a free function.
    #[error("Dimension mismatch: {0}")]
    ShapeMismatch(String),
}
