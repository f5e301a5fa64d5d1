//! Parametric survival model fitting under right censoring: maximum-likelihood estimation for
//! the exponential, gamma, generalized-gamma, log-normal, and Weibull families, delta-method
//! inference for summary functionals (mean, median, variance, RMST), and a two-sample contrast
//! engine over independent fits.

pub mod contrast;
pub mod data;
pub mod error;
pub mod estimators;
pub mod fit;
pub mod functionals;
pub mod inference;
pub mod likelihood;
mod numerics;
pub mod options;
pub mod registry;
pub mod simulate;

pub use contrast::{contrast, contrast_call, Contrast, ContrastResult, FunctionalContrast};
pub use data::Observations;
pub use error::SurvError;
pub use estimators::{fit, fit_named};
pub use fit::Fit;
pub use functionals::{Functionals, FunctionalResult};
pub use options::FitOptions;
pub use registry::{Family, ParamDomain};
pub use simulate::{sample, SimulatedObs};
