use crate::error::SurvError;
use ndarray::Array1;

/// A finite sequence of (time, status) pairs: the observation set of §3.
///
/// Construction validates structural invariants eagerly (strictly positive times, status codes
/// in {0,1}); the `NoEvents` check belongs to the estimator, not the carrier, since it is an
/// estimation-stage failure mode rather than a structural one.
#[derive(Debug, Clone)]
pub struct Observations {
    times: Array1<f64>,
    status: Array1<u8>,
}

impl Observations {
    /// Builds an observation set from parallel time/status slices.
    ///
    /// # Errors
    /// `NonPositiveTime` if any time is not strictly positive (including NaN/infinite).
    /// `BadStatusCode` if any status is not 0 or 1.
    /// `ShapeMismatch` if the slices have different lengths or are empty.
    pub fn new(times: &[f64], status: &[u8]) -> Result<Observations, SurvError> {
        if times.len() != status.len() {
            return Err(SurvError::ShapeMismatch(format!(
                "times has {} entries, status has {}",
                times.len(),
                status.len()
            )));
        }
        if times.is_empty() {
            return Err(SurvError::ShapeMismatch("observation set must be non-empty".to_string()));
        }
        for &t in times {
            if !(t > 0.0) {
                return Err(SurvError::NonPositiveTime(t));
            }
        }
        for &s in status {
            if s != 0 && s != 1 {
                return Err(SurvError::BadStatusCode(s));
            }
        }
        Ok(Observations {
            times: Array1::from(times.to_vec()),
            status: Array1::from(status.to_vec()),
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn status(&self) -> &Array1<u8> {
        &self.status
    }

    /// Number of observed events (δᵢ=1).
    pub fn n_events(&self) -> usize {
        self.status.iter().filter(|&&s| s == 1).count()
    }

    /// Times for observations with δᵢ=1, used for method-of-moments initial values.
    pub fn event_times(&self) -> Vec<f64> {
        self.times
            .iter()
            .zip(self.status.iter())
            .filter(|(_, &s)| s == 1)
            .map(|(&t, _)| t)
            .collect()
    }

    /// True if every observation is an event (no censoring at all); several families have a
    /// closed-form MLE in this case.
    pub fn is_uncensored(&self) -> bool {
        self.status.iter().all(|&s| s == 1)
    }

    pub fn max_time(&self) -> f64 {
        self.times.iter().cloned().fold(f64::MIN, f64::max)
    }

    /// Splits a combined array plus arm indicator into two independent observation sets, for
    /// the "Contrast call" entry point of §6. `arm` is 1 for the target group, 0 for reference.
    pub fn split_by_arm(
        times: &[f64],
        status: &[u8],
        arm: &[u8],
    ) -> Result<(Observations, Observations), SurvError> {
        if arm.len() != times.len() {
            return Err(SurvError::ShapeMismatch(format!(
                "arm has {} entries, times has {}",
                arm.len(),
                times.len()
            )));
        }
        let mut t1 = Vec::new();
        let mut s1 = Vec::new();
        let mut t0 = Vec::new();
        let mut s0 = Vec::new();
        for ((&t, &s), &a) in times.iter().zip(status.iter()).zip(arm.iter()) {
            match a {
                1 => {
                    t1.push(t);
                    s1.push(s);
                }
                0 => {
                    t0.push(t);
                    s0.push(s);
                }
                other => {
                    return Err(SurvError::ShapeMismatch(format!(
                        "arm indicator must be 0 or 1, got {other}"
                    )))
                }
            }
        }
        Ok((Observations::new(&t1, &s1)?, Observations::new(&t0, &s0)?))
    }
}
