//! Shared numerical primitives: finite-difference derivatives, the Newton-Raphson engine used
//! by every iterative estimator, 1-D bracket search, bisection, and adaptive quadrature.
//!
//! See DESIGN.md for why curvature is obtained numerically rather than hand-derived per family.

use ndarray::{Array1, Array2};

/// Step size for a central difference at coordinate value `x`, scaled so that the same relative
/// precision is used near zero and far from it.
fn fd_step(x: f64) -> f64 {
    1e-5 * x.abs().max(1e-3)
}

/// Central-difference gradient of a scalar function at `x`.
pub fn fd_gradient(f: impl Fn(&Array1<f64>) -> f64, x: &Array1<f64>) -> Array1<f64> {
    let k = x.len();
    let mut grad = Array1::zeros(k);
    for i in 0..k {
        let h = fd_step(x[i]);
        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[i] += h;
        xm[i] -= h;
        grad[i] = (f(&xp) - f(&xm)) / (2.0 * h);
    }
    grad
}

/// Central-difference Jacobian of a vector-valued function at `x` (used to turn an analytic or
/// finite-differenced gradient into a Hessian).
pub fn fd_jacobian(g: impl Fn(&Array1<f64>) -> Array1<f64>, x: &Array1<f64>) -> Array2<f64> {
    let k = x.len();
    let mut jac = Array2::zeros((k, k));
    for i in 0..k {
        let h = fd_step(x[i]);
        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[i] += h;
        xm[i] -= h;
        let gp = g(&xp);
        let gm = g(&xm);
        for j in 0..k {
            jac[[j, i]] = (gp[j] - gm[j]) / (2.0 * h);
        }
    }
    // Symmetrize: the true Hessian is symmetric, central differences only approximate that.
    let t = jac.t().to_owned();
    (jac + t) / 2.0
}

/// Outcome of the shared Newton-Raphson engine.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    pub theta: Array1<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub loglik: f64,
}

/// Newton-Raphson maximization of `loglik` in unconstrained coordinates `eta`, using `grad` for
/// the gradient (either analytic or finite-differenced by the caller) and a finite-differenced
/// Jacobian of `grad` for curvature. Damps the step via halving (up to 20 times) if it does not
/// increase the log-likelihood, a standard safeguard far from the optimum.
///
/// Converged when `max|step| < eps` AND the relative change in log-likelihood is below `eps`,
/// or `maxit` is reached (non-convergence is reported via `converged = false`, not an error).
pub fn newton_raphson(
    loglik: impl Fn(&Array1<f64>) -> f64,
    grad: impl Fn(&Array1<f64>) -> Array1<f64>,
    eta0: Array1<f64>,
    eps: f64,
    maxit: usize,
) -> NewtonResult {
    let mut eta = eta0;
    let mut ll = loglik(&eta);
    let mut converged = false;
    let mut iter = 0;

    while iter < maxit {
        let g = grad(&eta);
        let h = fd_jacobian(&grad, &eta);

        let step = match solve_step(&h, &g) {
            Some(s) => s,
            None => {
                // Hessian not usable as a Newton direction; fall back to damped gradient ascent.
                g.clone()
            }
        };

        let mut scale = 1.0;
        let mut accepted = false;
        let mut new_eta = eta.clone();
        let mut new_ll = ll;
        for _ in 0..20 {
            new_eta = &eta + &(&step * scale);
            new_ll = loglik(&new_eta);
            if new_ll.is_finite() && new_ll >= ll - 1e-10 {
                accepted = true;
                break;
            }
            scale *= 0.5;
        }
        if !accepted {
            // Could not find an improving step; stop here and report non-convergence.
            break;
        }

        let max_step = (&new_eta - &eta).iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        let rel_ll_change = (new_ll - ll).abs() / (ll.abs() + 1.0);

        eta = new_eta;
        ll = new_ll;
        iter += 1;

        if max_step < eps && rel_ll_change < eps {
            converged = true;
            break;
        }
    }

    NewtonResult {
        theta: eta,
        converged,
        iterations: iter,
        loglik: ll,
    }
}

/// Solves `H * step = -g` (the Newton step maximizing a concave quadratic approximation).
/// Returns `None` if `H` cannot be used as a descent... ascent direction (singular or not
/// negative-definite enough to make progress), in which case the caller falls back to a
/// gradient step.
fn solve_step(h: &Array2<f64>, g: &Array1<f64>) -> Option<Array1<f64>> {
    use ndarray_linalg::Solve;
    let neg_h = -h;
    neg_h.solve_into(g.clone()).ok()
}

/// 1-D golden-section search for the maximizer of `f` on `[lo, hi]`.
pub fn golden_section_max(f: impl Fn(f64) -> f64, lo: f64, hi: f64, tol: f64, maxit: usize) -> f64 {
    let invphi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut a = lo;
    let mut b = hi;
    let mut c = b - invphi * (b - a);
    let mut d = a + invphi * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..maxit {
        if (b - a).abs() < tol {
            break;
        }
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - invphi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + invphi * (b - a);
            fd = f(d);
        }
    }
    (a + b) / 2.0
}

/// Bisection for a root of `f` on `[lo, hi]`, assuming `f(lo)` and `f(hi)` bracket a sign change.
/// Used for the median of families without a closed form (gamma, generalized gamma).
pub fn bisection(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64, tol: f64, maxit: usize) -> Option<f64> {
    let mut flo = f(lo);
    let fhi = f(hi);
    if flo == 0.0 {
        return Some(lo);
    }
    if fhi == 0.0 {
        return Some(hi);
    }
    if flo.signum() == fhi.signum() {
        return None;
    }
    for _ in 0..maxit {
        let mid = 0.5 * (lo + hi);
        let fmid = f(mid);
        if fmid.abs() < tol || (hi - lo) / 2.0 < tol {
            return Some(mid);
        }
        if fmid.signum() == flo.signum() {
            lo = mid;
            flo = fmid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Adaptive Simpson quadrature of `f` on `[a, b]` to absolute tolerance `tol`, recursing up to
/// `max_depth` times per interval. Returns `None` if the tolerance cannot be attained, which the
/// RMST functional turns into a `QuadratureFailure` that invalidates only that one functional.
pub fn adaptive_simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, tol: f64, max_depth: usize) -> Option<f64> {
    fn simpson(f: &impl Fn(f64) -> f64, a: f64, b: f64, fa: f64, fb: f64, fm: f64) -> f64 {
        (b - a) / 6.0 * (fa + 4.0 * fm + fb)
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        f: &impl Fn(f64) -> f64,
        a: f64,
        b: f64,
        fa: f64,
        fb: f64,
        fm: f64,
        whole: f64,
        tol: f64,
        depth: usize,
    ) -> Option<f64> {
        let m = 0.5 * (a + b);
        let lm = 0.5 * (a + m);
        let rm = 0.5 * (m + b);
        let flm = f(lm);
        let frm = f(rm);
        let left = simpson(f, a, m, fa, fm, flm);
        let right = simpson(f, m, b, fm, fb, frm);
        let delta = left + right - whole;
        if depth == 0 {
            return if delta.abs() < 15.0 * tol {
                Some(left + right + delta / 15.0)
            } else {
                None
            };
        }
        if delta.abs() < 15.0 * tol {
            return Some(left + right + delta / 15.0);
        }
        let l = recurse(f, a, m, fa, fm, flm, left, tol / 2.0, depth - 1)?;
        let r = recurse(f, m, b, fm, fb, frm, right, tol / 2.0, depth - 1)?;
        Some(l + r)
    }

    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = simpson(&f, a, b, fa, fb, fm);
    recurse(&f, a, b, fa, fb, fm, whole, tol, max_depth)
}


/// Moore-Penrose pseudo-inverse via SVD, used for the sandwich covariance when the observed
/// information is not positive definite.
pub fn pseudo_inverse(m: &Array2<f64>) -> Array2<f64> {
    use ndarray_linalg::SVD;
    let (u, s, vt) = m.svd(true, true).expect("SVD of a square real matrix always succeeds");
    let u = u.expect("requested u");
    let vt = vt.expect("requested vt");
    let tol = s.iter().cloned().fold(0.0_f64, f64::max) * (m.nrows().max(m.ncols()) as f64) * f64::EPSILON;
    let mut s_inv = Array2::<f64>::zeros((vt.nrows(), u.ncols()));
    for (i, &sv) in s.iter().enumerate() {
        if sv > tol {
            s_inv[[i, i]] = 1.0 / sv;
        }
    }
    vt.t().dot(&s_inv).dot(&u.t())
}
