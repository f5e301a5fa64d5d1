use super::RawEstimate;
use crate::data::Observations;
use crate::likelihood::loglik;
use crate::registry::Family;
use ndarray::Array1;

/// Closed-form MLE λ̂ = D / T (§4.2), exact, no iteration needed.
pub(crate) fn estimate(obs: &Observations) -> RawEstimate {
    let d: f64 = obs.n_events() as f64;
    let t: f64 = obs.times().sum();
    let lambda_hat = d / t;
    let theta_hat = Array1::from(vec![lambda_hat]);
    let log_likelihood = loglik(Family::Exponential, obs, &theta_hat);
    RawEstimate { theta_hat, converged: true, iterations: 0, log_likelihood }
}
