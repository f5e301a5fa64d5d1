use crate::error::SurvError;
use ndarray::Array1;

/// Domain a native parameter is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDomain {
    /// (0, ∞), optimized in log-space.
    PositiveReal,
    /// ℝ, optimized directly.
    Real,
}

/// The five supported parametric survival families.
///
/// This is a closed enum rather than a runtime-registered table: the family set is fixed, so an
/// enum with methods is the idiomatic native_params/domain/default_init "registry" for a set this
/// small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Exponential,
    Gamma,
    GenGamma,
    LogNormal,
    Weibull,
}

impl Family {
    /// Parses the external family name used by the fitting/contrast calls (§6).
    pub fn parse(name: &str) -> Result<Family, SurvError> {
        match name {
            "exp" => Ok(Family::Exponential),
            "gamma" => Ok(Family::Gamma),
            "gen-gamma" => Ok(Family::GenGamma),
            "log-normal" => Ok(Family::LogNormal),
            "weibull" => Ok(Family::Weibull),
            other => Err(SurvError::UnknownDistribution(other.to_string())),
        }
    }

    /// Number of native parameters (the arity of θ).
    pub fn arity(&self) -> usize {
        match self {
            Family::Exponential => 1,
            Family::Gamma | Family::Weibull => 2,
            Family::GenGamma => 3,
            Family::LogNormal => 2,
        }
    }

    /// Ordered (symbol, domain) pairs for the native parameterization, per the §3 table.
    pub fn native_params(&self) -> &'static [(&'static str, ParamDomain)] {
        match self {
            Family::Exponential => &[("lambda", ParamDomain::PositiveReal)],
            Family::Gamma => &[
                ("alpha", ParamDomain::PositiveReal),
                ("lambda", ParamDomain::PositiveReal),
            ],
            Family::GenGamma => &[
                ("alpha", ParamDomain::PositiveReal),
                ("beta", ParamDomain::PositiveReal),
                ("lambda", ParamDomain::PositiveReal),
            ],
            Family::LogNormal => &[("mu", ParamDomain::Real), ("sigma", ParamDomain::PositiveReal)],
            Family::Weibull => &[
                ("alpha", ParamDomain::PositiveReal),
                ("lambda", ParamDomain::PositiveReal),
            ],
        }
    }

    /// External name as accepted by `Family::parse`.
    pub fn name(&self) -> &'static str {
        match self {
            Family::Exponential => "exp",
            Family::Gamma => "gamma",
            Family::GenGamma => "gen-gamma",
            Family::LogNormal => "log-normal",
            Family::Weibull => "weibull",
        }
    }

    /// Maps native θ to the unconstrained optimization scale η (log for positive-real
    /// coordinates, identity for real coordinates).
    pub fn to_unconstrained(&self, theta: &Array1<f64>) -> Array1<f64> {
        let domains = self.native_params();
        theta
            .iter()
            .zip(domains.iter())
            .map(|(&v, (_, dom))| match dom {
                ParamDomain::PositiveReal => v.ln(),
                ParamDomain::Real => v,
            })
            .collect()
    }

    /// Inverse of [`Family::to_unconstrained`].
    pub fn to_native(&self, eta: &Array1<f64>) -> Array1<f64> {
        let domains = self.native_params();
        eta.iter()
            .zip(domains.iter())
            .map(|(&v, (_, dom))| match dom {
                ParamDomain::PositiveReal => v.exp(),
                ParamDomain::Real => v,
            })
            .collect()
    }

    /// Default initial values when the caller supplies none, given the observed data.
    /// Uses simple method-of-moments summaries of the observed event times, which is a
    /// reasonable starting point regardless of censoring proportion.
    pub fn default_init(&self, event_times: &[f64]) -> Array1<f64> {
        let n = event_times.len().max(1) as f64;
        let mean = event_times.iter().sum::<f64>() / n;
        let mean = if mean.is_finite() && mean > 0.0 { mean } else { 1.0 };
        let var = if event_times.len() > 1 {
            event_times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n
        } else {
            mean * mean
        };
        let var = if var.is_finite() && var > 0.0 { var } else { mean * mean };

        match self {
            Family::Exponential => Array1::from(vec![1.0 / mean]),
            Family::Gamma => {
                // Method of moments: alpha = mean^2/var, lambda = mean/var.
                let alpha = (mean * mean / var).max(0.1);
                let lambda = (mean / var).max(1e-6);
                Array1::from(vec![alpha, lambda])
            }
            Family::GenGamma => Array1::from(vec![1.0, 1.0, 1.0 / mean]),
            Family::LogNormal => {
                let log_times: Vec<f64> = event_times.iter().map(|t| t.ln()).collect();
                let n = log_times.len().max(1) as f64;
                let mu = log_times.iter().sum::<f64>() / n;
                let sigma2 = if log_times.len() > 1 {
                    log_times.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n
                } else {
                    1.0
                };
                Array1::from(vec![mu, sigma2.sqrt().max(1e-3)])
            }
            Family::Weibull => Array1::from(vec![1.0, 1.0 / mean]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Family; 5] = [
        Family::Exponential,
        Family::Gamma,
        Family::GenGamma,
        Family::LogNormal,
        Family::Weibull,
    ];

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(Family::parse("log-logistic").is_err());
        assert!(Family::parse("").is_err());
    }

    #[test]
    fn test_arity_matches_native_params_len() {
        for family in ALL {
            assert_eq!(family.arity(), family.native_params().len());
        }
    }

    #[test]
    fn test_unconstrained_round_trip_recovers_native_theta() {
        let thetas: [(Family, Vec<f64>); 5] = [
            (Family::Exponential, vec![2.0]),
            (Family::Gamma, vec![2.5, 1.3]),
            (Family::GenGamma, vec![1.8, 0.7, 2.2]),
            (Family::LogNormal, vec![-0.5, 1.1]),
            (Family::Weibull, vec![1.6, 0.9]),
        ];
        for (family, theta) in thetas {
            let theta = Array1::from(theta);
            let eta = family.to_unconstrained(&theta);
            let recovered = family.to_native(&eta);
            for (a, b) in theta.iter().zip(recovered.iter()) {
                assert!((a - b).abs() < 1e-10, "{:?}: {} vs {}", family, a, b);
            }
        }
    }

    #[test]
    fn test_default_init_stays_within_each_coordinates_domain() {
        let event_times = vec![0.5, 1.0, 1.5, 2.0, 2.5];
        for family in ALL {
            let init = family.default_init(&event_times);
            for (&v, (_, dom)) in init.iter().zip(family.native_params().iter()) {
                match dom {
                    ParamDomain::PositiveReal => assert!(v > 0.0, "{:?}: {} not positive", family, v),
                    ParamDomain::Real => assert!(v.is_finite(), "{:?}: {} not finite", family, v),
                }
            }
        }
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for family in ALL {
            assert_eq!(Family::parse(family.name()).unwrap(), family);
        }
    }
}
