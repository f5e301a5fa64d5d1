//! Observed information in the native parameterization, its positive-definiteness check, and
//! the sandwich-covariance fallback (§4.3).

use crate::data::Observations;
use crate::likelihood::{loglik, obs_loglik};
use crate::numerics::{fd_gradient, fd_jacobian, pseudo_inverse};
use crate::registry::Family;
use ndarray::{Array1, Array2};
use ndarray_linalg::Cholesky;
use ndarray_linalg::UPLO;
use tracing::debug;

/// Observed information J(θ̂), robust-or-not covariance Σ̂, and the flag telling downstream
/// consumers which path produced it.
pub struct InformationResult {
    pub cov: Array2<f64>,
    pub robust: bool,
}

/// Computes J(θ̂) = -∂²ℓ/∂θ∂θᵀ at `theta_hat` directly in the native parameterization (the
/// caller has already converted back from log-space via the θ=exp(η) Jacobian by constructing
/// `loglik_native`'s closure over native θ), attempts a Cholesky factorization as the
/// positive-definiteness test, and falls back to the sandwich covariance if that fails (§4.3).
pub fn compute_covariance(family: Family, obs: &Observations, theta_hat: &Array1<f64>) -> InformationResult {
    let ll_native = |theta: &Array1<f64>| loglik(family, obs, theta);
    let grad_native = |theta: &Array1<f64>| fd_gradient(&ll_native, theta);
    let hessian = fd_jacobian(&grad_native, theta_hat);
    let j = -hessian;

    match j.cholesky(UPLO::Lower) {
        Ok(_) => match invert_spd(&j) {
            Some(cov) => InformationResult { cov, robust: false },
            None => sandwich(family, obs, theta_hat, &j),
        },
        Err(_) => {
            debug!("observed information not positive definite, falling back to sandwich covariance");
            sandwich(family, obs, theta_hat, &j)
        }
    }
}

fn invert_spd(j: &Array2<f64>) -> Option<Array2<f64>> {
    use ndarray_linalg::Inverse;
    j.inv().ok()
}

/// Sandwich covariance Σ̂ = J⁻¹ B J⁻¹, with B the empirical score outer-product and a
/// pseudo-inverse standing in for J⁻¹ when J is singular or not positive definite.
fn sandwich(family: Family, obs: &Observations, theta_hat: &Array1<f64>, j: &Array2<f64>) -> InformationResult {
    let j_inv = pseudo_inverse(j);
    let b = empirical_score_covariance(family, obs, theta_hat);
    let cov = j_inv.dot(&b).dot(&j_inv);
    InformationResult { cov, robust: true }
}

/// B = Σᵢ sᵢ sᵢᵀ, sᵢ the per-observation score at θ̂ in the native parameterization.
fn empirical_score_covariance(family: Family, obs: &Observations, theta_hat: &Array1<f64>) -> Array2<f64> {
    let k = theta_hat.len();
    let mut b = Array2::<f64>::zeros((k, k));
    for (&t, &s) in obs.times().iter().zip(obs.status().iter()) {
        let contrib = |theta: &Array1<f64>| obs_loglik(family, t, s, theta);
        let score_i = fd_gradient(contrib, theta_hat);
        for a in 0..k {
            for c in 0..k {
                b[[a, c]] += score_i[a] * score_i[c];
            }
        }
    }
    b
}
