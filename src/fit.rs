use crate::functionals::Functionals;
use crate::registry::Family;
use ndarray::{Array1, Array2};
use std::fmt;

/// The immutable result of fitting one parametric family to one observation set (§3).
#[derive(Debug, Clone)]
pub struct Fit {
    pub family: Family,
    /// θ̂ in the family's native parameterization (§3 table).
    pub theta_hat: Array1<f64>,
    /// Σ̂, the observed-information (or sandwich) covariance, native parameterization.
    pub cov: Array2<f64>,
    /// True if `cov` is the sandwich fallback rather than the inverse observed information.
    pub robust: bool,
    /// True if the iterative estimator satisfied its stopping criteria before `maxit`.
    pub converged: bool,
    pub iterations: usize,
    pub log_likelihood: f64,
    pub n_obs: usize,
    pub n_events: usize,
    pub functionals: Functionals,
    pub sig: f64,
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fit: n={} events={} loglik={:.4} converged={} robust={} mean={:.4} (se={:.4}) median={:.4}",
            self.family.name(),
            self.n_obs,
            self.n_events,
            self.log_likelihood,
            self.converged,
            self.robust,
            self.functionals.mean.estimate,
            self.functionals.mean.se,
            self.functionals.median.estimate,
        )
    }
}
