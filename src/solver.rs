//! Derivative-free scalar solvers.
//!
//! The equation of state contract only provides point evaluations of the
//! reduced pressure, so every search in this crate is bracketed and
//! derivative-free. All routines carry an explicit evaluation budget;
//! exhausting it is reported as non-convergence, never as an endless loop.

const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1; // (3 - sqrt(5)) / 2
const MAX_QUAD_DEPTH: u32 = 48;

/// Root of `f` in the bracket `[a, b]` via Brent's method.
///
/// Requires a sign change over the bracket; returns [None] if the
/// precondition is violated or the iteration budget is exhausted.
pub(crate) fn brent_root<F: FnMut(f64) -> f64>(
    mut f: F,
    mut a: f64,
    mut b: f64,
    xtol: f64,
    max_iter: usize,
) -> Option<f64> {
    let mut fa = f(a);
    let mut fb = f(b);
    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa.signum() == fb.signum() {
        return None;
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = b - a;
    for _ in 0..max_iter {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * xtol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Some(b);
        }
        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // inverse quadratic interpolation (secant if only two points)
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                q = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                q = (q - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
    }
    None
}

/// Bounded minimization of `f` over `(a, b)` via Brent's method with a
/// golden-section fallback.
///
/// Only interior points are evaluated. Returns the abscissa of the minimum
/// and the function value there, located to an absolute tolerance of `xtol`,
/// or [None] if the evaluation budget is exhausted first.
pub(crate) fn min_bounded<F: FnMut(f64) -> f64>(
    mut f: F,
    (a, b): (f64, f64),
    xtol: f64,
    max_eval: usize,
) -> Option<(f64, f64)> {
    let sqrt_eps = f64::EPSILON.sqrt();
    let (mut a, mut b) = (a, b);
    let mut xf = a + GOLDEN_MEAN * (b - a);
    let mut nfc = xf;
    let mut fulc = xf;
    let mut rat = 0.0_f64;
    let mut e = 0.0_f64;
    let mut fx = f(xf);
    let mut num = 1;
    let mut fnfc = fx;
    let mut ffulc = fx;
    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
    let mut tol2 = 2.0 * tol1;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;
        // try a parabolic fit through the three best points
        if e.abs() > tol1 {
            golden = false;
            let r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let r = e;
            e = rat;
            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    let si = if xm == xf { 1.0 } else { (xm - xf).signum() };
                    rat = tol1 * si;
                }
            } else {
                golden = true;
            }
        }
        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_MEAN * e;
        }
        let si = if rat == 0.0 { 1.0 } else { rat.signum() };
        let x = xf + si * rat.abs().max(tol1);
        let fu = f(x);
        num += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }
        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
        tol2 = 2.0 * tol1;
        if num >= max_eval {
            return None;
        }
    }
    Some((xf, fx))
}

/// Integral of `f` over `[a, b]` via adaptive Simpson quadrature with
/// Richardson extrapolation.
///
/// `tol` is the absolute tolerance of the result. The recursion depth is
/// capped; at the cap the current extrapolated estimate is accepted, so the
/// routine always terminates.
pub(crate) fn integrate<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, tol: f64) -> f64 {
    let m = 0.5 * (a + b);
    let fa = f(a);
    let fm = f(m);
    let fb = f(b);
    let whole = simpson(fa, fm, fb, b - a);
    adaptive(f, (a, m, b), (fa, fm, fb), whole, tol, MAX_QUAD_DEPTH)
}

fn simpson(fa: f64, fm: f64, fb: f64, h: f64) -> f64 {
    h / 6.0 * (fa + 4.0 * fm + fb)
}

fn adaptive<F: Fn(f64) -> f64>(
    f: &F,
    (a, m, b): (f64, f64, f64),
    (fa, fm, fb): (f64, f64, f64),
    whole: f64,
    tol: f64,
    depth: u32,
) -> f64 {
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = simpson(fa, flm, fm, m - a);
    let right = simpson(fm, frm, fb, b - m);
    let delta = left + right - whole;
    if depth == 0 || delta.abs() <= 15.0 * tol {
        return left + right + delta / 15.0;
    }
    adaptive(f, (a, lm, m), (fa, flm, fm), left, 0.5 * tol, depth - 1)
        + adaptive(f, (m, rm, b), (fm, frm, fb), right, 0.5 * tol, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn brent_root_finds_sqrt_two() {
        let root = brent_root(|x| x * x - 2.0, 0.0, 2.0, 2e-12, 100).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn brent_root_requires_sign_change() {
        assert!(brent_root(|x| x * x + 1.0, -1.0, 1.0, 2e-12, 100).is_none());
    }

    #[test]
    fn brent_root_on_wide_bracket() {
        // decaying isotherm tail: 1/x - c over ten orders of magnitude
        let c = 2.5e-4;
        let root = brent_root(|x| x.recip() - c, 1.0, 1e12, 2e-12, 200).unwrap();
        assert_relative_eq!(root, 1.0 / c, max_relative = 1e-10);
    }

    #[test]
    fn min_bounded_finds_quartic_minimum() {
        let (x, fx) = min_bounded(|x| (x - 0.3).powi(4) + 1.0, (-2.0, 2.0), 1e-10, 500).unwrap();
        assert_relative_eq!(x, 0.3, epsilon = 1e-2);
        assert_relative_eq!(fx, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn min_bounded_locates_parabola_vertex() {
        let (x, _) = min_bounded(|x| (x - 1.25) * (x - 1.25), (0.0, 3.0), 1e-10, 500).unwrap();
        assert_relative_eq!(x, 1.25, epsilon = 1e-8);
    }

    #[test]
    fn min_bounded_respects_budget() {
        assert!(min_bounded(|x| x.sin(), (0.0, 7.0), 1e-10, 5).is_none());
    }

    #[test]
    fn integrate_smooth_function() {
        let quarter_pi = integrate(&|x: f64| 1.0 / (1.0 + x * x), 0.0, 1.0, 1e-12);
        assert_relative_eq!(quarter_pi, std::f64::consts::FRAC_PI_4, epsilon = 1e-10);
    }

    #[test]
    fn integrate_slowly_decaying_tail() {
        let val = integrate(&|x: f64| x.recip(), 1.0, 1e6, 1e-10);
        assert_relative_eq!(val, 1e6_f64.ln(), epsilon = 1e-7);
    }
}
