use parasurv::{contrast_call, Family, FitOptions};

fn two_arm_sample() -> (Vec<f64>, Vec<u8>, Vec<u8>) {
    // Arm 1 ("target") drawn to fail faster than arm 0 ("reference").
    let times1 = vec![0.3, 0.6, 0.9, 0.4, 1.1, 0.5, 0.8, 0.7, 1.0, 0.6];
    let times0 = vec![1.5, 2.1, 1.8, 2.6, 1.9, 2.3, 1.7, 2.9, 2.0, 2.4];

    let mut times = times1.clone();
    times.extend(times0.clone());
    let status = vec![1u8; times.len()];
    let arm: Vec<u8> = std::iter::repeat(1u8)
        .take(times1.len())
        .chain(std::iter::repeat(0u8).take(times0.len()))
        .collect();

    (times, status, arm)
}

#[test]
fn target_has_shorter_mean_survival_than_reference() {
    let (times, status, arm) = two_arm_sample();
    let opts = FitOptions::default();

    let result = contrast_call(&times, &status, &arm, Family::Exponential, Family::Exponential, &opts)
        .unwrap();

    assert!(result.mean.diff.estimate < 0.0);
    assert!(result.mean.ratio.estimate < 1.0);
    assert!(result.mean.diff.p_value >= 0.0 && result.mean.diff.p_value <= 1.0);
    assert!(result.mean.ratio.p_value >= 0.0 && result.mean.ratio.p_value <= 1.0);
}

#[test]
fn ratio_ci_brackets_one_when_arms_are_identical() {
    let times1 = vec![0.5, 1.2, 2.3, 0.8, 3.1, 1.0, 2.7, 0.4, 1.9, 2.2];
    let times0 = times1.clone();
    let mut times = times1.clone();
    times.extend(times0);
    let status = vec![1u8; times.len()];
    let arm: Vec<u8> = std::iter::repeat(1u8)
        .take(times1.len())
        .chain(std::iter::repeat(0u8).take(times1.len()))
        .collect();

    let opts = FitOptions::default();
    let result =
        contrast_call(&times, &status, &arm, Family::Exponential, Family::Exponential, &opts).unwrap();

    assert!((result.mean.ratio.estimate - 1.0).abs() < 1e-8);
    assert!(result.mean.ratio.ci_lower <= 1.0 + 1e-6);
    assert!(result.mean.ratio.ci_upper >= 1.0 - 1e-6);
    assert!((result.mean.diff.estimate).abs() < 1e-8);
}

#[test]
fn different_families_per_arm_is_supported() {
    let (times, status, arm) = two_arm_sample();
    let opts = FitOptions::default();

    let result = contrast_call(&times, &status, &arm, Family::Weibull, Family::Exponential, &opts)
        .unwrap();

    assert!(result.target.family == Family::Weibull);
    assert!(result.reference.family == Family::Exponential);
    assert!(result.median.diff.se > 0.0);
}
