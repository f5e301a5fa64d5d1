use super::RawEstimate;
use crate::data::Observations;
use crate::likelihood::loglik;
use crate::numerics::{fd_gradient, golden_section_max, newton_raphson};
use crate::options::FitOptions;
use crate::registry::Family;
use ndarray::Array1;
use tracing::{debug, info};

/// Inner 2-D Newton-Raphson over (log α, log λ) at a fixed β, used both by the outer bracket
/// search and for the final joint refinement (§4.2).
fn inner_fit(obs: &Observations, beta: f64, alpha0: f64, lambda0: f64, opts: &FitOptions) -> (f64, f64, f64, usize, bool) {
    let eta0 = Array1::from(vec![alpha0.ln(), lambda0.ln()]);
    let ll = |eta: &Array1<f64>| {
        let theta = Array1::from(vec![eta[0].exp(), beta, eta[1].exp()]);
        loglik(Family::GenGamma, obs, &theta)
    };
    let grad = |eta: &Array1<f64>| fd_gradient(&ll, eta);
    let result = newton_raphson(&ll, &grad, eta0, opts.eps, opts.maxit);
    (result.theta[0].exp(), result.theta[1].exp(), result.loglik, result.iterations, result.converged)
}

/// Outer profile log-likelihood over β: the best attainable log-likelihood once α and λ are
/// optimized out at that β, used to drive the golden-section bracket search (§4.2).
fn outer_profile_loglik(obs: &Observations, beta: f64, alpha0: f64, lambda0: f64, opts: &FitOptions) -> f64 {
    let (_, _, ll, _, _) = inner_fit(obs, beta, alpha0, lambda0, opts);
    ll
}

/// Two-level outer/inner search: golden-section over β in an outer loop, 2-D Newton-Raphson
/// over (α, λ) in an inner loop at each trial β, followed by a final joint 3-D refinement
/// starting from the best (α, β, λ) found (§4.2). If the caller supplies all three initial
/// values, skips straight to the joint refinement.
pub(crate) fn estimate(obs: &Observations, opts: &FitOptions) -> RawEstimate {
    let default_init = Family::GenGamma.default_init(&obs.event_times());
    let (alpha0, beta0, lambda0) = match &opts.init {
        Some(init) => (init[0], init[1], init[2]),
        None => {
            let alpha0 = default_init[0];
            let lambda0 = default_init[2];
            let beta_lo = 0.1;
            let beta_hi = 10.0;
            let obj = |beta: f64| outer_profile_loglik(obs, beta, alpha0, lambda0, opts);
            let beta_star = golden_section_max(obj, beta_lo, beta_hi, 1e-4, opts.outer_maxit);
            (alpha0, beta_star, lambda0)
        }
    };

    let eta0 = Family::GenGamma.to_unconstrained(&Array1::from(vec![alpha0, beta0, lambda0]));
    let ll = |eta: &Array1<f64>| loglik(Family::GenGamma, obs, &Family::GenGamma.to_native(eta));
    let grad = |eta: &Array1<f64>| fd_gradient(&ll, eta);
    let result = newton_raphson(&ll, &grad, eta0, opts.eps, opts.maxit);

    if opts.report {
        info!(iterations = result.iterations, converged = result.converged, "generalized gamma joint fit");
    } else {
        debug!(iterations = result.iterations, converged = result.converged, "generalized gamma joint fit");
    }

    let theta_hat = Family::GenGamma.to_native(&result.theta);
    let log_likelihood = loglik(Family::GenGamma, obs, &theta_hat);
    RawEstimate {
        theta_hat,
        converged: result.converged,
        iterations: result.iterations,
        log_likelihood,
    }
}
