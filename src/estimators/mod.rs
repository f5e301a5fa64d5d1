//! Per-family MLE routines (§4.2): closed form for exponential and uncensored log-normal,
//! profile + Newton-Raphson for gamma and Weibull, and the two-level outer/inner search for
//! generalized gamma.

mod exponential;
mod gamma;
mod gengamma;
mod lognormal;
mod weibull;

use crate::data::Observations;
use crate::error::SurvError;
use crate::fit::Fit;
use crate::functionals::compute_functionals;
use crate::inference::compute_covariance;
use crate::options::FitOptions;
use crate::registry::Family;
use ndarray::Array1;

/// Outcome of a family-specific estimator before the shared inference/functionals layer runs.
pub(crate) struct RawEstimate {
    pub theta_hat: Array1<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub log_likelihood: f64,
}

/// Validates the shared preconditions (arity of a user-supplied init, at least one event) and
/// the `tau`/`sig` options, common to every family.
fn validate_common(family: Family, obs: &Observations, opts: &FitOptions) -> Result<(), SurvError> {
    if obs.n_events() == 0 {
        return Err(SurvError::NoEvents);
    }
    if let Some(init) = &opts.init {
        if init.len() != family.arity() {
            return Err(SurvError::BadParameterArity { expected: family.arity(), got: init.len() });
        }
    }
    if !(opts.sig > 0.0 && opts.sig < 1.0) {
        return Err(SurvError::InvalidSig(opts.sig));
    }
    let max_t = obs.max_time();
    for &tau in &opts.tau {
        if !(tau > 0.0) || tau > max_t {
            return Err(SurvError::InvalidTau(tau));
        }
    }
    Ok(())
}

/// The single entry point for the "Fitting call" of §6: dispatches to the family-specific
/// estimator, then runs the shared observed-information and functionals layers.
pub fn fit(family: Family, obs: &Observations, opts: &FitOptions) -> Result<Fit, SurvError> {
    validate_common(family, obs, opts)?;

    let raw = match family {
        Family::Exponential => exponential::estimate(obs),
        Family::Gamma => gamma::estimate(obs, opts),
        Family::GenGamma => gengamma::estimate(obs, opts),
        Family::LogNormal => lognormal::estimate(obs, opts),
        Family::Weibull => weibull::estimate(obs, opts),
    };

    let info = compute_covariance(family, obs, &raw.theta_hat);
    let z_crit = opts.z_crit();
    let functionals = compute_functionals(family, &raw.theta_hat, &info.cov, &opts.tau, z_crit);

    Ok(Fit {
        family,
        theta_hat: raw.theta_hat,
        cov: info.cov,
        robust: info.robust,
        converged: raw.converged,
        iterations: raw.iterations,
        log_likelihood: raw.log_likelihood,
        n_obs: obs.len(),
        n_events: obs.n_events(),
        functionals,
        sig: opts.sig,
    })
}

/// Convenience wrapper over `fit` taking a family name string (§6).
pub fn fit_named(family_name: &str, obs: &Observations, opts: &FitOptions) -> Result<Fit, SurvError> {
    let family = Family::parse(family_name)?;
    fit(family, obs, opts)
}
