//! Photon-detection and entanglement-generation rates.
//!
//! In the weak-coupling limit, pump photons scatter into microwave-optical
//! pairs as a Poisson process whose rate is the rate `r₀` at which optical
//! photons leave the cavity through its extrinsic port. A click heralds a
//! pair; interfering the optical outputs of two transducers then heralds a
//! microwave Bell pair.

use std::{ f64::consts::TAU, fmt };
use ndarray as nd;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ Error, Result },
    params::Params,
};

/// Reduced Planck constant (J s).
pub const HBAR: f64 = 1.054_571_817e-34;

/// Speed of light in vacuum (m/s).
pub const C: f64 = 299_792_458.0;

/// Rate of optical photons emitted through the extrinsic port,
/// `r₀ = 4 g₀² ⟨n_p⟩ γₑ / (γₑ + γᵢ)²`.
///
/// Returns zero for a mode with no loss at all.
pub fn detection_rate(g0: f64, n_p: f64, gamma_e: f64, gamma_i: f64) -> f64 {
    let gamma = gamma_e + gamma_i;
    if gamma <= 0.0 { return 0.0; }
    4.0 * g0 * g0 * n_p * gamma_e / (gamma * gamma)
}

/// [`detection_rate`] for a full parameter set.
pub fn detection_rate_for(params: &Params) -> f64 {
    detection_rate(params.g0, params.n_p, params.gamma_e, params.gamma_i)
}

/// Extrinsic loss rate maximizing [`detection_rate`] for a fixed intrinsic
/// loss rate (critical coupling).
pub fn optimal_gamma_e(gamma_i: f64) -> f64 { gamma_i }

/// Heralding scheme used to generate Bell pairs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntanglementModel {
    /// One click from either of two transducers heralds a pair.
    #[default]
    SingleClick,
    /// Two clicks, one per round, herald a pair.
    TwoClick,
}

impl fmt::Display for EntanglementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SingleClick => f.write_str("single-click"),
            Self::TwoClick => f.write_str("two-click"),
        }
    }
}

/// Bell-pair generation rate for detection rate `r0`, pulse duration `dt` and
/// reset time `t_r`.
///
/// - single-click: `r_e = 2 r₀ e^{−r₀Δt} Δt / (Δt + t_r)`
/// - two-click: `r_e = 2 r₀² e^{−r₀Δt} Δt² / (2(Δt + t_r))`
///
/// Purification consumes half of the generated pairs.
pub fn entanglement_rate(
    r0: f64,
    dt: f64,
    t_r: f64,
    model: EntanglementModel,
    purification: bool,
) -> f64
{
    let cycle = dt + t_r;
    if cycle <= 0.0 { return 0.0; }
    let survival = (-r0 * dt).exp();
    let r_e = match model {
        EntanglementModel::SingleClick
            => 2.0 * r0 * survival * dt / cycle,
        EntanglementModel::TwoClick
            => 2.0 * r0 * r0 * survival * dt * dt / (2.0 * cycle),
    };
    if purification { r_e / 2.0 } else { r_e }
}

/// [`entanglement_rate`] for a full parameter set.
pub fn entanglement_rate_for(
    params: &Params,
    model: EntanglementModel,
    purification: bool,
) -> f64
{
    entanglement_rate(
        detection_rate_for(params),
        params.pulse_duration,
        params.reset_time,
        model,
        purification,
    )
}

/// How far the coupling is from the weak-coupling limit where pair generation
/// is Poissonian.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    /// `g/γₑ < 0.01`
    Respecting,
    /// `0.01 ≤ g/γₑ < 0.1`
    BeginningToBreak,
    /// `0.1 ≤ g/γₑ ≤ 0.25`
    Outside,
    /// `g/γₑ > 0.25`: `g'` is imaginary and the populations oscillate.
    Oscillatory,
}

impl Regime {
    pub const RESPECTING_MAX: f64 = 0.01;
    pub const BREAKING_MAX: f64 = 0.1;
    pub const OSCILLATORY_MIN: f64 = 0.25;

    /// Classify a coupling-to-loss ratio `g/γₑ`.
    pub fn classify(ratio: f64) -> Self {
        if ratio < Self::RESPECTING_MAX {
            Self::Respecting
        } else if ratio < Self::BREAKING_MAX {
            Self::BeginningToBreak
        } else if ratio <= Self::OSCILLATORY_MIN {
            Self::Outside
        } else {
            Self::Oscillatory
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::Respecting => "respecting regime",
            Self::BeginningToBreak => "beginning to break",
            Self::Outside => "outside regime",
            Self::Oscillatory => "oscillatory, g' imaginary",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resonantly driven optical pump mode, used to convert pump power into an
/// intracavity photon number.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticalPump {
    /// Pump wavelength (m).
    pub wavelength: f64,
    /// Extrinsic loss rate κₑ of the pump mode (s⁻¹).
    pub kappa_ext: f64,
    /// Total loss rate κ of the pump mode (s⁻¹).
    pub kappa_total: f64,
}

impl Default for OpticalPump {
    fn default() -> Self {
        Self {
            wavelength: 1550e-9,
            kappa_ext: TAU * 10e6,
            kappa_total: TAU * 20e6,
        }
    }
}

impl OpticalPump {
    /// Pump angular frequency `ω_p = 2πc/λ`.
    pub fn omega(&self) -> f64 { TAU * C / self.wavelength }

    /// Intracavity photon number for an incident power `power` (W),
    /// `n_p = 4 κₑ P / (κ² ħ ω_p)`.
    pub fn photon_number(&self, power: f64) -> f64 {
        4.0 * self.kappa_ext * power
            / (self.kappa_total.powi(2) * HBAR * self.omega())
    }

    /// Intracavity photon number for an incident power given in dBm.
    pub fn photon_number_dbm(&self, power_dbm: f64) -> f64 {
        self.photon_number(dbm_to_watts(power_dbm))
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pump.wavelength", self.wavelength),
            ("pump.kappa_ext", self.kappa_ext),
            ("pump.kappa_total", self.kappa_total),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid(name, value, "must be positive"));
            }
        }
        if self.kappa_ext > self.kappa_total {
            return Err(Error::invalid(
                "pump.kappa_ext",
                self.kappa_ext,
                "cannot exceed pump.kappa_total",
            ));
        }
        Ok(())
    }
}

/// Convert a power in dBm to watts.
pub fn dbm_to_watts(power_dbm: f64) -> f64 {
    1e-3 * 10.0_f64.powf(power_dbm / 10.0)
}

/// Rates sampled over a swept parameter `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct RateCurve {
    /// Swept quantity.
    pub x: nd::Array1<f64>,
    /// Detection rate `r₀` at each `x`.
    pub r0: nd::Array1<f64>,
    /// Entanglement rate `r_e` at each `x`.
    pub r_e: nd::Array1<f64>,
}

impl RateCurve {
    /// Evaluate both rates for a parameter set built from each sweep point.
    fn from_params<F>(
        x: nd::Array1<f64>,
        params_at: F,
        model: EntanglementModel,
        purification: bool,
    ) -> Self
    where F: Fn(f64) -> Params + Sync
    {
        let (r0, r_e): (Vec<f64>, Vec<f64>)
            = x.to_vec()
            .into_par_iter()
            .map(|xk| {
                let params = params_at(xk);
                let r0 = detection_rate_for(&params);
                let r_e = entanglement_rate(
                    r0,
                    params.pulse_duration,
                    params.reset_time,
                    model,
                    purification,
                );
                (r0, r_e)
            })
            .unzip();
        Self { x, r0: r0.into(), r_e: r_e.into() }
    }

    /// Sweep the pump photon number.
    pub fn over_photon_number(
        params: &Params,
        n_p: nd::Array1<f64>,
        model: EntanglementModel,
        purification: bool,
    ) -> Self
    {
        let params = *params;
        Self::from_params(
            n_p, |n| params.with_photon_number(n), model, purification)
    }

    /// Sweep the incident pump power, given in dBm, converted to photon number
    /// by `pump`. `x` holds the powers in dBm.
    pub fn over_pump_power(
        params: &Params,
        pump: &OpticalPump,
        power_dbm: nd::Array1<f64>,
        model: EntanglementModel,
        purification: bool,
    ) -> Self
    {
        let params = *params;
        let pump = *pump;
        Self::from_params(
            power_dbm,
            |p| params.with_photon_number(pump.photon_number_dbm(p)),
            model,
            purification,
        )
    }

    /// Sweep the extrinsic loss rate at fixed intrinsic loss rate.
    pub fn over_gamma_e(
        params: &Params,
        gamma_e: nd::Array1<f64>,
        model: EntanglementModel,
        purification: bool,
    ) -> Self
    {
        let params = *params;
        Self::from_params(
            gamma_e, |g| params.with_gamma_e(g), model, purification)
    }

    /// Take log₁₀ of both rates for display; zero rates map to −∞.
    pub fn log10(&self) -> Self {
        Self {
            x: self.x.clone(),
            r0: self.r0.mapv(f64::log10),
            r_e: self.r_e.mapv(f64::log10),
        }
    }

    /// Sweep point with the largest entanglement rate, as `(x, r_e)`.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.x.iter().zip(self.r_e.iter())
            .filter(|(_, r)| !r.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(x, r)| (*x, *r))
    }
}
