use super::RawEstimate;
use crate::data::Observations;
use crate::likelihood::{loglik, lognormal_score_native};
use crate::numerics::newton_raphson;
use crate::options::FitOptions;
use crate::registry::Family;
use ndarray::Array1;
use tracing::{debug, info};

/// Closed-form sample mean/variance of log(event times), the exact MLE when there is no
/// censoring (§4.2).
fn closed_form(obs: &Observations) -> (f64, f64) {
    let logs: Vec<f64> = obs.event_times().iter().map(|t| t.ln()).collect();
    let n = logs.len() as f64;
    let mu = logs.iter().sum::<f64>() / n;
    let sigma2 = logs.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n;
    (mu, sigma2.sqrt().max(1e-6))
}

/// Newton-Raphson in η = (μ, log σ) driven by the analytic Mills-ratio score (§4.2), converted
/// from the native (μ, σ) gradient by the chain rule dℓ/d(log σ) = σ · dℓ/dσ.
fn newton_fit(obs: &Observations, mu0: f64, sigma0: f64, opts: &FitOptions) -> (f64, f64, usize, bool) {
    let eta0 = Array1::from(vec![mu0, sigma0.ln()]);
    let ll = |eta: &Array1<f64>| {
        let theta = Array1::from(vec![eta[0], eta[1].exp()]);
        loglik(Family::LogNormal, obs, &theta)
    };
    let grad = |eta: &Array1<f64>| {
        let sigma = eta[1].exp();
        let native_score = lognormal_score_native(obs, eta[0], sigma);
        Array1::from(vec![native_score[0], native_score[1] * sigma])
    };
    let result = newton_raphson(&ll, &grad, eta0, opts.eps, opts.maxit);
    (result.theta[0], result.theta[1].exp(), result.iterations, result.converged)
}

pub(crate) fn estimate(obs: &Observations, opts: &FitOptions) -> RawEstimate {
    if obs.is_uncensored() && opts.init.is_none() {
        let (mu, sigma) = closed_form(obs);
        let theta_hat = Array1::from(vec![mu, sigma]);
        let log_likelihood = loglik(Family::LogNormal, obs, &theta_hat);
        if opts.report {
            info!("log-normal (closed form) fit");
        } else {
            debug!("log-normal (closed form) fit");
        }
        return RawEstimate { theta_hat, converged: true, iterations: 0, log_likelihood };
    }

    let (mu0, sigma0) = match &opts.init {
        Some(init) => (init[0], init[1]),
        None => {
            let default_init = Family::LogNormal.default_init(&obs.event_times());
            (default_init[0], default_init[1])
        }
    };

    let (mu_hat, sigma_hat, iterations, converged) = newton_fit(obs, mu0, sigma0, opts);
    if opts.report {
        info!(iterations, converged, "log-normal (Newton-Raphson) fit");
    } else {
        debug!(iterations, converged, "log-normal (Newton-Raphson) fit");
    }

    let theta_hat = Array1::from(vec![mu_hat, sigma_hat]);
    let log_likelihood = loglik(Family::LogNormal, obs, &theta_hat);
    RawEstimate { theta_hat, converged, iterations, log_likelihood }
}
