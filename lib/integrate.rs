//! Numerical integration of the conditional Schrödinger equation
//! `dψ/dt = −iHψ` by fourth-order Runge-Kutta.
//!
//! The last index of every returned 2D array corresponds to time. Because `H`
//! is non-Hermitian, the norm of the state is the no-click probability and is
//! never renormalized between steps.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ Error, Result },
    hamiltonian::HBuilderHeralded,
    hilbert::ModeState,
};

fn rhs(h: &nd::Array2<C64>, psi: &nd::Array1<C64>) -> nd::Array1<C64> {
    -C64::i() * h.dot(psi)
}

fn array_diff(arr: &nd::Array1<f64>) -> nd::Array1<f64> {
    arr.iter().zip(arr.iter().skip(1))
        .map(|(ak, akp1)| *akp1 - *ak)
        .collect()
}

/// Check that a time grid is non-empty, finite, and strictly increasing.
pub fn check_time_grid(t: &nd::Array1<f64>) -> Result<()> {
    if t.is_empty() {
        return Err(Error::TimeGrid("empty".to_string()));
    }
    if let Some(bad) = t.iter().find(|tk| !tk.is_finite()) {
        return Err(Error::TimeGrid(format!("non-finite time {bad}")));
    }
    let dt = array_diff(t);
    if let Some(k) = dt.iter().position(|dtk| *dtk <= 0.0) {
        return Err(Error::TimeGrid(format!(
            "not strictly increasing at index {}: {} -> {}",
            k, t[k], t[k + 1],
        )));
    }
    Ok(())
}

fn check_dims(psi0: &nd::Array1<C64>, h: &nd::Array2<C64>) -> Result<()> {
    let len = psi0.len();
    let (rows, cols) = h.dim();
    if rows != len || cols != len {
        return Err(Error::DimensionMismatch { rows, cols, len });
    }
    Ok(())
}

fn collect_states(states: Vec<nd::Array1<C64>>, n: usize)
    -> nd::Array2<C64>
{
    let mut psi: nd::Array2<C64> = nd::Array2::zeros((n, states.len()));
    let iter = states.into_iter().zip(psi.axis_iter_mut(nd::Axis(1)));
    for (state, psik) in iter {
        state.move_into(psik);
    }
    psi
}

// fourth-order Runge-Kutta for a time-independent Hamiltonian with reduced
// integration output
fn do_evolve_reduced<X, T>(
    psi0: &nd::Array1<C64>,
    h: &nd::Array2<C64>,
    t: &nd::Array1<f64>,
    x: X,
) -> Vec<T>
where X: Fn(&nd::Array1<C64>) -> T
{
    let dt = array_diff(t);
    let mut psi: nd::Array1<C64> = psi0.clone();
    let mut k1: nd::Array1<C64>;
    let mut k2: nd::Array1<C64>;
    let mut k3: nd::Array1<C64>;
    let mut k4: nd::Array1<C64>;
    let mut x_t: Vec<T> = Vec::with_capacity(t.len());
    x_t.push(x(&psi));
    for &dtk in dt.iter() {
        k1 = rhs(h, &psi);
        k2 = rhs(h, &(&psi + &k1 * (dtk / 2.0)));
        k3 = rhs(h, &(&psi + &k2 * (dtk / 2.0)));
        k4 = rhs(h, &(&psi + &k3 * dtk));
        psi = &psi + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dtk / 6.0);
        x_t.push(x(&psi));
    }
    x_t
}

// fourth-order Runge-Kutta for a time-dependent Hamiltonian given by a
// function, with reduced integration output
fn do_evolve_fn_reduced<H, X, T>(
    psi0: &nd::Array1<C64>,
    h: H,
    t: &nd::Array1<f64>,
    x: X,
) -> Vec<T>
where
    H: Fn(f64) -> nd::Array2<C64>,
    X: Fn(&nd::Array1<C64>) -> T,
{
    let dt = array_diff(t);
    let mut psi: nd::Array1<C64> = psi0.clone();
    let mut hk: nd::Array2<C64>;
    let mut hkp1h: nd::Array2<C64>;
    let mut hkp1: nd::Array2<C64>;
    let mut k1: nd::Array1<C64>;
    let mut k2: nd::Array1<C64>;
    let mut k3: nd::Array1<C64>;
    let mut k4: nd::Array1<C64>;
    let mut x_t: Vec<T> = Vec::with_capacity(t.len());
    x_t.push(x(&psi));
    for (&dtk, &tk) in dt.iter().zip(t) {
        hk = h(tk);
        hkp1h = h(tk + dtk / 2.0);
        hkp1 = h(tk + dtk);
        k1 = rhs(&hk, &psi);
        k2 = rhs(&hkp1h, &(&psi + &k1 * (dtk / 2.0)));
        k3 = rhs(&hkp1h, &(&psi + &k2 * (dtk / 2.0)));
        k4 = rhs(&hkp1, &(&psi + &k3 * dtk));
        psi = &psi + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dtk / 6.0);
        x_t.push(x(&psi));
    }
    x_t
}

/// Integrate for a time-independent Hamiltonian.
///
/// `psi0` is the state at `t[0]`.
pub fn evolve(
    psi0: &nd::Array1<C64>,
    H: &nd::Array2<C64>,
    t: &nd::Array1<f64>,
) -> Result<nd::Array2<C64>>
{
    let states = evolve_reduced(psi0, H, t, |psi| psi.clone())?;
    Ok(collect_states(states, psi0.len()))
}

/// Integrate for a time-independent Hamiltonian, recording only `x(ψ)` at
/// each time.
pub fn evolve_reduced<X, T>(
    psi0: &nd::Array1<C64>,
    H: &nd::Array2<C64>,
    t: &nd::Array1<f64>,
    x: X,
) -> Result<Vec<T>>
where X: Fn(&nd::Array1<C64>) -> T
{
    check_time_grid(t)?;
    check_dims(psi0, H)?;
    tracing::debug!(steps = t.len() - 1, "rk4: time-independent");
    Ok(do_evolve_reduced(psi0, H, t, x))
}

/// Integrate for a time-dependent Hamiltonian given by a function of time.
pub fn evolve_fn<F>(
    psi0: &nd::Array1<C64>,
    H: F,
    t: &nd::Array1<f64>,
) -> Result<nd::Array2<C64>>
where F: Fn(f64) -> nd::Array2<C64>
{
    check_time_grid(t)?;
    check_dims(psi0, &H(t[0]))?;
    tracing::debug!(steps = t.len() - 1, "rk4: time-dependent");
    let states = do_evolve_fn_reduced(psi0, H, t, |psi| psi.clone());
    Ok(collect_states(states, psi0.len()))
}

/// Integrate the system described by `hbuilder`, starting from a single basis
/// state, following the builder's pump envelope.
pub fn evolve_with(
    initial: ModeState,
    hbuilder: &HBuilderHeralded,
    t: &nd::Array1<f64>,
) -> Result<nd::Array2<C64>>
{
    let psi0 = hbuilder.basis().get_vector(&initial)
        .ok_or_else(|| Error::NotInBasis(initial.to_string()))?;
    evolve_fn(&psi0, |tk| hbuilder.build_at(tk), t)
}

// largest |λh| kept by `stable_steps`; RK4's stability region reaches 2.78 on
// the negative real axis
const MAX_STEP_SCALE: f64 = 1.0;

/// Smallest number of equal steps over `[0, t_final]` for which RK4 remains
/// stable with Hamiltonian `H`.
///
/// The spectral radius of `H` is bounded by its largest absolute row sum, and
/// the step is chosen so that this bound times the step size is at most 1.
pub fn stable_steps(H: &nd::Array2<C64>, t_final: f64) -> usize {
    let bound = H.rows().into_iter()
        .map(|row| row.iter().map(|h| h.norm()).sum::<f64>())
        .fold(0.0, f64::max);
    let steps = (bound * t_final / MAX_STEP_SCALE).ceil();
    if steps.is_finite() && steps >= 1.0 { steps as usize } else { 1 }
}

/// Integrate for a time-independent Hamiltonian over `[0, t_final]` with
/// `steps` equal steps, returning the time grid alongside the states.
pub fn evolve_fixed(
    psi0: &nd::Array1<C64>,
    H: &nd::Array2<C64>,
    t_final: f64,
    steps: usize,
) -> Result<(nd::Array1<f64>, nd::Array2<C64>)>
{
    if steps == 0 {
        return Err(Error::invalid("steps", 0.0, "must be non-zero"));
    }
    if !(t_final.is_finite() && t_final > 0.0) {
        return Err(Error::invalid("t_final", t_final, "must be positive"));
    }
    let time: nd::Array1<f64> = nd::Array1::linspace(0.0, t_final, steps + 1);
    let psi = evolve(psi0, H, &time)?;
    Ok((time, psi))
}

/// Largest elementwise distance `|a − b|` between two trajectories.
///
/// Arrays of different shapes are infinitely far apart. If either array holds
/// a NaN, the result is NaN.
pub fn max_deviation(a: &nd::Array2<C64>, b: &nd::Array2<C64>) -> f64 {
    if a.shape() != b.shape() { return f64::INFINITY; }
    a.iter().zip(b)
        .map(|(ak, bk)| (*ak - *bk).norm())
        .try_fold(0.0_f64, |acc, d| (!d.is_nan()).then(|| acc.max(d)))
        .unwrap_or(f64::NAN)
}
