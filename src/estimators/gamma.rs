use super::RawEstimate;
use crate::data::Observations;
use crate::likelihood::loglik;
use crate::numerics::{fd_gradient, newton_raphson};
use crate::options::FitOptions;
use crate::registry::Family;
use ndarray::Array1;
use tracing::{debug, info};

/// Profile rate given shape when uncensored: λ(α) = α·D / Σuᵢ (§4.2).
fn profile_lambda_uncensored(obs: &Observations, alpha: f64) -> f64 {
    let d: f64 = obs.n_events() as f64;
    let t: f64 = obs.times().sum();
    alpha * d / t
}

fn profile_loglik_uncensored(obs: &Observations, alpha: f64) -> f64 {
    let lambda = profile_lambda_uncensored(obs, alpha);
    loglik(Family::Gamma, obs, &Array1::from(vec![alpha, lambda]))
}

/// Method-of-moments initial values unless the caller supplied some, per §4.2.
fn initial_theta(obs: &Observations, opts: &FitOptions) -> Array1<f64> {
    if let Some(init) = &opts.init {
        return Array1::from(init.clone());
    }
    Family::Gamma.default_init(&obs.event_times())
}

pub(crate) fn estimate(obs: &Observations, opts: &FitOptions) -> RawEstimate {
    if obs.is_uncensored() && opts.init.is_none() {
        // Profile over the rate analytically, Newton-Raphson only over shape (1-D).
        let alpha0 = Family::Gamma.default_init(&obs.event_times())[0];
        let eta0 = Array1::from(vec![alpha0.ln()]);
        let ll = |eta: &Array1<f64>| profile_loglik_uncensored(obs, eta[0].exp());
        let grad = |eta: &Array1<f64>| fd_gradient(&ll, eta);

        let result = newton_raphson(&ll, &grad, eta0, opts.eps, opts.maxit);
        if opts.report {
            info!(iterations = result.iterations, converged = result.converged, "gamma (uncensored profile) fit");
        } else {
            debug!(iterations = result.iterations, converged = result.converged, "gamma (uncensored profile) fit");
        }

        let alpha_hat = result.theta[0].exp();
        let lambda_hat = profile_lambda_uncensored(obs, alpha_hat);
        let theta_hat = Array1::from(vec![alpha_hat, lambda_hat]);
        let log_likelihood = loglik(Family::Gamma, obs, &theta_hat);
        return RawEstimate {
            theta_hat,
            converged: result.converged,
            iterations: result.iterations,
            log_likelihood,
        };
    }

    // Censored (or user-supplied init near the optimum): joint 2-D Newton-Raphson.
    let theta0 = initial_theta(obs, opts);
    let eta0 = Family::Gamma.to_unconstrained(&theta0);
    let ll = |eta: &Array1<f64>| loglik(Family::Gamma, obs, &Family::Gamma.to_native(eta));
    let grad = |eta: &Array1<f64>| fd_gradient(&ll, eta);

    let result = newton_raphson(&ll, &grad, eta0, opts.eps, opts.maxit);
    if opts.report {
        info!(iterations = result.iterations, converged = result.converged, "gamma (joint Newton-Raphson) fit");
    } else {
        debug!(iterations = result.iterations, converged = result.converged, "gamma (joint Newton-Raphson) fit");
    }

    let theta_hat = Family::Gamma.to_native(&result.theta);
    let log_likelihood = loglik(Family::Gamma, obs, &theta_hat);
    RawEstimate {
        theta_hat,
        converged: result.converged,
        iterations: result.iterations,
        log_likelihood,
    }
}
