//! Infidelity of the heralded state, `1 − (|c₀|² + |c₁|²)`: the probability
//! that a photon has already leaked out of the no-click subspace.

use ndarray as nd;
use rayon::prelude::*;
use crate::{ amplitude, params::Params };

/// Infidelity after evolving for time `t`.
pub fn infidelity(params: &Params, t: f64) -> f64 {
    1.0 - amplitude::population(params, t)
}

/// Infidelity sampled over pump photon number, at the end of a pulse and at
/// the end of a full pulse + reset cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct InfidelityCurve {
    pub n_p: nd::Array1<f64>,
    /// Evaluated at `t = Δt`.
    pub at_pulse: nd::Array1<f64>,
    /// Evaluated at `t = Δt + t_r`.
    pub at_cycle: nd::Array1<f64>,
}

impl InfidelityCurve {
    /// Take log₁₀ of both infidelities for display.
    pub fn log10(&self) -> Self {
        Self {
            n_p: self.n_p.clone(),
            at_pulse: self.at_pulse.mapv(f64::log10),
            at_cycle: self.at_cycle.mapv(f64::log10),
        }
    }
}

/// Evaluate the infidelity at `Δt` and `Δt + t_r` for each photon number,
/// holding every other parameter fixed.
pub fn infidelity_sweep(params: &Params, n_p: nd::Array1<f64>)
    -> InfidelityCurve
{
    let dt = params.pulse_duration;
    let cycle = params.cycle_time();
    let (at_pulse, at_cycle): (Vec<f64>, Vec<f64>)
        = n_p.to_vec()
        .into_par_iter()
        .map(|n| {
            let p = params.with_photon_number(n);
            (infidelity(&p, dt), infidelity(&p, cycle))
        })
        .unzip();
    InfidelityCurve { n_p, at_pulse: at_pulse.into(), at_cycle: at_cycle.into() }
}
