//! Closed-form solution of the heralded (no-click) evolution.
//!
//! Starting from `(c₀, c₁) = (1, 0)`, the conditional amplitudes are
//! ```text
//! c₀(t) = e^{−γₑt/4} [ (γₑ/4g') sinh(g't) + cosh(g't) ]
//! c₁(t) = −i e^{−γₑt/4} (g/g') sinh(g't)
//! ```
//! with `g' = √(γₑ²/16 − g²)`. Everything is evaluated in complex arithmetic,
//! so the same expressions cover both the overdamped (`g'` real) and
//! oscillatory (`g'` imaginary) cases.
//!
//! The damping factor is folded into the exponentials before evaluation,
//! `e^{−γₑt/4} sinh(g't) = (e^{(g'−γₑ/4)t} − e^{(−g'−γₑ/4)t}) / 2`, since
//! `Re g' ≤ γₑ/4` keeps both exponents non-positive and long times with large
//! `γₑ` then never overflow.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ c, params::Params };

// below this |g't|, sinh(g't)/g' is replaced by its Taylor series
const SMALL_ARG: f64 = 1e-4;

/// `e^{−at} cosh(bt)`
fn damped_cosh(b: C64, a: f64, t: f64) -> C64 {
    (((b - a) * t).exp() + ((-b - a) * t).exp()) / 2.0
}

/// `e^{−at} sinh(bt) / b`, continuous through `b = 0`.
fn damped_sinhc(b: C64, a: f64, t: f64) -> C64 {
    let bt = b * t;
    if bt.norm() < SMALL_ARG {
        (-a * t).exp() * t * (1.0 + bt * bt / 6.0)
    } else {
        (((b - a) * t).exp() - ((-b - a) * t).exp()) / (2.0 * b)
    }
}

/// Both amplitudes `(c₀(t), c₁(t))`.
pub fn amplitudes(params: &Params, t: f64) -> (C64, C64) {
    let g = params.g();
    let gp = params.g_prime();
    let a = params.gamma_e / 4.0;
    let sinhc = damped_sinhc(gp, a, t);
    let c0 = a * sinhc + damped_cosh(gp, a, t);
    let c1 = -c!(i g) * sinhc;
    (c0, c1)
}

/// Amplitude of the initial state.
pub fn c0(params: &Params, t: f64) -> C64 { amplitudes(params, t).0 }

/// Amplitude of the state reached by one scattering event.
pub fn c1(params: &Params, t: f64) -> C64 { amplitudes(params, t).1 }

/// Total population `|c₀|² + |c₁|²` remaining in the no-click subspace,
/// i.e. the probability that no photon has been emitted by time `t`.
pub fn population(params: &Params, t: f64) -> f64 {
    let (c0, c1) = amplitudes(params, t);
    c0.norm_sqr() + c1.norm_sqr()
}

/// Weak-coupling (`g ≪ γₑ`) limit of [`population`], `e^{−4g²t/γₑ}`.
pub fn poissonian_population(params: &Params, t: f64) -> f64 {
    if params.gamma_e <= 0.0 { return 1.0; }
    let g = params.g();
    (-4.0 * g * g * t / params.gamma_e).exp()
}

/// Evaluate both amplitudes over an array of times, returning a `2 × N`
/// array whose last index corresponds to time.
pub fn trajectory(params: &Params, time: &nd::Array1<f64>) -> nd::Array2<C64> {
    let mut psi: nd::Array2<C64> = nd::Array2::zeros((2, time.len()));
    let iter = time.iter().zip(psi.axis_iter_mut(nd::Axis(1)));
    for (&t, mut psik) in iter {
        let (c0, c1) = amplitudes(params, t);
        psik[0] = c0;
        psik[1] = c1;
    }
    psi
}

/// `|c₀|² + |c₁|²` at each column of a `2 × N` trajectory.
pub fn populations(psi: &nd::Array2<C64>) -> nd::Array1<f64> {
    psi.axis_iter(nd::Axis(1))
        .map(|psik| psik.iter().map(|a| a.norm_sqr()).sum::<f64>())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn params(g: f64, gamma_e: f64) -> Params {
        Params { g0: g, n_p: 1.0, gamma_e, ..Params::default() }
    }

    #[test]
    fn initial_state() {
        let cases = [
            (0.0, 1e8),
            (1e6, 1e8),
            (2.5e7, 1e8),
            (5e7, 1e8),
            (3.0, 1.0),
        ];
        for (g, gamma_e) in cases {
            let (c0, c1) = amplitudes(&params(g, gamma_e), 0.0);
            assert!((c0 - 1.0).norm() < 1e-15, "c0(0) = {c0} for g = {g}");
            assert!(c1.norm() < 1e-15, "c1(0) = {c1} for g = {g}");
        }
    }

    #[test]
    fn uncoupled_is_static() {
        let p = params(0.0, 1e8);
        for t in [1e-9, 1e-7, 1e-5] {
            let (c0, c1) = amplitudes(&p, t);
            assert!((c0 - 1.0).norm() < 1e-12);
            assert_eq!(c1.norm(), 0.0);
        }
    }

    #[test]
    fn population_decays() {
        for gamma_e in [1e6, 1e7, 1e8] {
            let p = params(1e6, gamma_e);
            let time = nd::Array1::linspace(0.0, 1e-5, 2001);
            let pop = populations(&trajectory(&p, &time));
            assert!(pop[0] <= 1.0 + 1e-12);
            for (a, b) in pop.iter().zip(pop.iter().skip(1)) {
                assert!(b <= &(a + 1e-12), "population grew: {a} -> {b}");
            }
            assert!(pop.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn poissonian_limit() {
        // g/γₑ = 1e-3
        let p = params(1e5, 1e8);
        for t in [1e-6, 1e-4, 1e-3, 5e-3] {
            let exact = population(&p, t);
            let approx = poissonian_population(&p, t);
            assert!(
                (exact / approx - 1.0).abs() < 1e-3,
                "t = {t}: {exact} vs {approx}",
            );
        }
    }

    #[test]
    fn long_times_stay_finite() {
        let p = params(1e6, 1e10);
        let (c0, c1) = amplitudes(&p, 1.0);
        assert!(c0.is_finite() && c1.is_finite());
    }

    #[test]
    fn critical_point_is_continuous() {
        // g = γₑ/4 exactly: g' = 0
        let p = params(2.5e7, 1e8);
        assert_eq!(p.g_prime().norm(), 0.0);
        let nearby_below = params(2.5e7 * (1.0 - 1e-6), 1e8);
        let nearby_above = params(2.5e7 * (1.0 + 1e-6), 1e8);
        for t in [1e-9, 1e-8, 1e-7] {
            let (c0, c1) = amplitudes(&p, t);
            // limit: c₀ = e^{−γt/4}(1 + γt/4), c₁ = −i g t e^{−γt/4}
            let damp = (-2.5e7 * t).exp();
            assert!((c0 - damp * (1.0 + 2.5e7 * t)).norm() < 1e-9);
            assert!((c1 - c!(0.0, -2.5e7 * t * damp)).norm() < 1e-9);
            for q in [&nearby_below, &nearby_above] {
                let (d0, d1) = amplitudes(q, t);
                assert!((c0 - d0).norm() < 1e-5);
                assert!((c1 - d1).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn oscillatory_branch() {
        // γₑ = 0: undamped Rabi-like swap, c₀ = cos(gt), c₁ = −i sin(gt)
        let g = 1e6;
        let p = params(g, 0.0);
        for t in [1e-7, 1e-6, 2e-6] {
            let (c0, c1) = amplitudes(&p, t);
            assert!((c0 - (g * t).cos()).norm() < 1e-9);
            assert!((c1 - c!(0.0, -(g * t).sin())).norm() < 1e-9);
            assert!((population(&p, t) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn trajectory_layout() {
        let p = Params::default();
        let time = nd::Array1::linspace(0.0, 1e-7, 11);
        let psi = trajectory(&p, &time);
        assert_eq!(psi.shape(), &[2, 11]);
        let (c0, c1) = amplitudes(&p, time[7]);
        assert_eq!(psi[[0, 7]], c0);
        assert_eq!(psi[[1, 7]], c1);
    }
}
