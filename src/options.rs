use serde::{Deserialize, Serialize};

/// Estimator configuration shared by every `fit`/`contrast` call (the "ambient" configuration
/// surface of SPEC_FULL.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Significance level for confidence intervals and p-values (default 0.05).
    pub sig: f64,
    /// RMST truncation times. Empty means "do not compute RMST".
    pub tau: Vec<f64>,
    /// Optional user-supplied initial values in the native parameterization; overrides
    /// method-of-moments defaults and, for generalized gamma, the outer bracket search.
    pub init: Option<Vec<f64>>,
    /// Convergence tolerance for the iterative estimators (default 1e-6).
    pub eps: f64,
    /// Iteration cap for the Newton-Raphson engine (default 100).
    pub maxit: usize,
    /// Iteration cap for the generalized-gamma outer bracket search over beta (default 10).
    pub outer_maxit: usize,
    /// Raises per-iteration tracing from `debug!` to `info!` when true.
    pub report: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            sig: 0.05,
            tau: Vec::new(),
            init: None,
            eps: 1e-6,
            maxit: 100,
            outer_maxit: 10,
            report: false,
        }
    }
}

impl FitOptions {
    /// Critical z-value for a two-sided `1 - sig` Wald interval / p-value.
    pub fn z_crit(&self) -> f64 {
        use statrs::distribution::{ContinuousCDF, Normal};
        let normal = Normal::new(0.0, 1.0).expect("standard normal is always constructible");
        normal.inverse_cdf(1.0 - self.sig / 2.0)
    }
}
