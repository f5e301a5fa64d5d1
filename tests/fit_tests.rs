use approx::assert_relative_eq;
use parasurv::{fit, Family, FitOptions, Observations, SurvError};

fn uncensored_exponential_sample() -> Vec<f64> {
    // Deterministic stand-in for an exponential(lambda=1) sample: fixed, not drawn at test time,
    // so the expected parameter values below are exact rather than approximate.
    vec![
        0.12, 0.34, 0.56, 0.78, 1.01, 1.23, 1.45, 1.67, 1.89, 2.11, 0.23, 0.45, 0.67, 0.89, 1.11,
        1.33, 1.55, 1.77, 1.99, 2.21,
    ]
}

#[test]
fn exponential_closed_form_matches_d_over_t() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let result = fit(Family::Exponential, &obs, &opts).unwrap();

    let d: f64 = obs.n_events() as f64;
    let t: f64 = times.iter().sum();
    assert_relative_eq!(result.theta_hat[0], d / t, epsilon = 1e-10);
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
    assert!(result.log_likelihood.is_finite());
}

#[test]
fn weibull_recovers_near_unit_shape_on_exponential_data() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let result = fit(Family::Weibull, &obs, &opts).unwrap();

    // Data drawn to look exponential: the Weibull shape should land near 1.
    assert!(result.converged);
    assert!((result.theta_hat[0] - 1.0).abs() < 0.6);
    assert!(result.log_likelihood.is_finite());
}

#[test]
fn gamma_uncensored_profile_matches_joint_fit() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let profiled = fit(Family::Gamma, &obs, &opts).unwrap();

    let mut forced_opts = opts.clone();
    forced_opts.init = Some(vec![profiled.theta_hat[0], profiled.theta_hat[1]]);
    let joint = fit(Family::Gamma, &obs, &forced_opts).unwrap();

    assert!((profiled.theta_hat[0] - joint.theta_hat[0]).abs() < 1e-4);
    assert!((profiled.theta_hat[1] - joint.theta_hat[1]).abs() < 1e-4);
}

#[test]
fn lognormal_uncensored_matches_sample_moments_of_log_times() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let result = fit(Family::LogNormal, &obs, &opts).unwrap();

    let logs: Vec<f64> = times.iter().map(|t| t.ln()).collect();
    let n = logs.len() as f64;
    let mu = logs.iter().sum::<f64>() / n;
    let sigma2 = logs.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n;

    assert!((result.theta_hat[0] - mu).abs() < 1e-10);
    assert!((result.theta_hat[1] - sigma2.sqrt()).abs() < 1e-10);
    assert_eq!(result.iterations, 0);
}

#[test]
fn gengamma_user_init_reproduces_same_optimum_as_outer_search() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let searched = fit(Family::GenGamma, &obs, &opts).unwrap();

    let mut init_opts = opts.clone();
    init_opts.init = Some(searched.theta_hat.to_vec());
    let from_init = fit(Family::GenGamma, &obs, &init_opts).unwrap();

    assert!((searched.log_likelihood - from_init.log_likelihood).abs() < 1e-3);
}

#[test]
fn censored_sample_still_fits_weibull() {
    let times = vec![0.5, 1.2, 2.3, 0.8, 3.1, 1.0, 2.7, 0.4, 1.9, 2.2];
    let status = vec![1u8, 0, 1, 1, 0, 1, 0, 1, 1, 0];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let result = fit(Family::Weibull, &obs, &opts).unwrap();

    assert!(result.log_likelihood.is_finite());
    assert_eq!(result.n_obs, 10);
    assert_eq!(result.n_events, 6);
}

#[test]
fn no_events_is_a_hard_error() {
    let times = vec![1.0, 2.0, 3.0];
    let status = vec![0u8, 0, 0];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let err = fit(Family::Exponential, &obs, &opts).unwrap_err();
    assert!(matches!(err, SurvError::NoEvents));
}

#[test]
fn non_positive_time_is_rejected_at_construction() {
    let err = Observations::new(&[1.0, -0.5, 2.0], &[1, 1, 1]).unwrap_err();
    assert!(matches!(err, SurvError::NonPositiveTime(_)));
}

#[test]
fn bad_status_code_is_rejected_at_construction() {
    let err = Observations::new(&[1.0, 2.0], &[1, 2]).unwrap_err();
    assert!(matches!(err, SurvError::BadStatusCode(2)));
}

#[test]
fn shape_mismatch_on_empty_or_unequal_length() {
    assert!(matches!(
        Observations::new(&[], &[]).unwrap_err(),
        SurvError::ShapeMismatch(_)
    ));
    assert!(matches!(
        Observations::new(&[1.0, 2.0], &[1]).unwrap_err(),
        SurvError::ShapeMismatch(_)
    ));
}

#[test]
fn invalid_tau_is_rejected() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let max_t = times.iter().cloned().fold(f64::MIN, f64::max);

    let mut opts = FitOptions::default();
    opts.tau = vec![max_t + 10.0];
    let err = fit(Family::Exponential, &obs, &opts).unwrap_err();
    assert!(matches!(err, SurvError::InvalidTau(_)));
}

#[test]
fn invalid_sig_is_rejected() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();

    let mut opts = FitOptions::default();
    opts.sig = 1.5;
    let err = fit(Family::Exponential, &obs, &opts).unwrap_err();
    assert!(matches!(err, SurvError::InvalidSig(_)));
}

#[test]
fn bad_parameter_arity_is_rejected() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();

    let mut opts = FitOptions::default();
    opts.init = Some(vec![1.0, 2.0, 3.0]);
    let err = fit(Family::Exponential, &obs, &opts).unwrap_err();
    assert!(matches!(err, SurvError::BadParameterArity { expected: 1, got: 3 }));
}

#[test]
fn unknown_distribution_name_is_rejected() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let err = parasurv::fit_named("log-logistic", &obs, &opts).unwrap_err();
    assert!(matches!(err, SurvError::UnknownDistribution(_)));
}

#[test]
fn fit_display_is_a_single_summary_line() {
    let times = uncensored_exponential_sample();
    let status = vec![1u8; times.len()];
    let obs = Observations::new(&times, &status).unwrap();
    let opts = FitOptions::default();

    let result = fit(Family::Exponential, &obs, &opts).unwrap();
    let rendered = format!("{result}");
    assert!(rendered.contains("exp fit"));
    assert_eq!(rendered.lines().count(), 1);
}

#[test]
fn fit_options_round_trip_through_json() {
    let mut opts = FitOptions::default();
    opts.tau = vec![0.5, 1.0];
    opts.init = Some(vec![1.0, 2.0]);

    let json = serde_json::to_string(&opts).unwrap();
    let restored: FitOptions = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.tau, opts.tau);
    assert_eq!(restored.init, opts.init);
    assert_relative_eq!(restored.sig, opts.sig, epsilon = 1e-12);
}

#[test]
fn fit_options_defaults_fill_in_missing_json_fields() {
    let opts: FitOptions = serde_json::from_str("{}").unwrap();
    assert_relative_eq!(opts.sig, 0.05, epsilon = 1e-12);
    assert_eq!(opts.maxit, 100);
    assert!(opts.tau.is_empty());
}
