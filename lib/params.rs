//! Physical parameters of the transducer and pump.
//!
//! All rates are in s⁻¹ and all times in s.

use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ Error, Result },
    rates::Regime,
};

/// Full parameter set for one evaluation of the protocol.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Single-photon electro-optic coupling rate g₀.
    pub g0: f64,
    /// Mean intracavity pump photon number ⟨n_p⟩.
    pub n_p: f64,
    /// Extrinsic (out-coupling) loss rate γₑ of the optical mode.
    pub gamma_e: f64,
    /// Intrinsic loss rate γᵢ of the optical mode.
    pub gamma_i: f64,
    /// Duration Δt of a single pump pulse.
    pub pulse_duration: f64,
    /// Reset time t_r between pump pulses.
    pub reset_time: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            g0: 1e3,
            n_p: 1e6,
            gamma_e: 1e8,
            gamma_i: 0.0,
            pulse_duration: 1e-7,
            reset_time: 1e-6,
        }
    }
}

impl Params {
    /// Pump-enhanced coupling rate `g = g₀ √n_p`.
    pub fn g(&self) -> f64 { self.g0 * self.n_p.sqrt() }

    /// `g' = √(γₑ²/16 − g²)`, taken on the principal branch so that it is real
    /// and non-negative for `g ≤ γₑ/4` and positive imaginary otherwise.
    pub fn g_prime(&self) -> C64 {
        let g = self.g();
        C64::from(self.gamma_e.powi(2) / 16.0 - g * g).sqrt()
    }

    /// Total loss rate `γₑ + γᵢ` of the optical mode.
    pub fn gamma_total(&self) -> f64 { self.gamma_e + self.gamma_i }

    /// Coupling-to-loss ratio `g/γₑ`; infinite for a lossless mode.
    pub fn coupling_ratio(&self) -> f64 {
        let g = self.g();
        if self.gamma_e > 0.0 {
            g / self.gamma_e
        } else if g > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// Qualitative label for how well the weak-coupling (Poissonian) picture
    /// holds.
    pub fn regime(&self) -> Regime { Regime::classify(self.coupling_ratio()) }

    /// Pulse duration plus reset time.
    pub fn cycle_time(&self) -> f64 { self.pulse_duration + self.reset_time }

    /// Copy of `self` with a different pump photon number.
    pub fn with_photon_number(mut self, n_p: f64) -> Self {
        self.n_p = n_p;
        self
    }

    /// Copy of `self` with a different extrinsic loss rate.
    pub fn with_gamma_e(mut self, gamma_e: f64) -> Self {
        self.gamma_e = gamma_e;
        self
    }

    /// Copy of `self` with a different intrinsic loss rate.
    pub fn with_gamma_i(mut self, gamma_i: f64) -> Self {
        self.gamma_i = gamma_i;
        self
    }

    /// Check that every quantity is finite and non-negative, and that the
    /// pulse has non-zero length.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("g0", self.g0),
            ("n_p", self.n_p),
            ("gamma_e", self.gamma_e),
            ("gamma_i", self.gamma_i),
            ("pulse_duration", self.pulse_duration),
            ("reset_time", self.reset_time),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::invalid(name, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(Error::invalid(name, value, "must be non-negative"));
            }
        }
        if self.pulse_duration == 0.0 {
            return Err(Error::invalid(
                "pulse_duration", self.pulse_duration, "must be positive"));
        }
        Ok(())
    }
}

/// Allowed range of each slider; values outside are clamped.
pub mod ranges {
    /// log₁₀(g₀ / s⁻¹)
    pub const LOG10_G0: (f64, f64) = (0.0, 6.0);
    /// log₁₀(n_p)
    pub const LOG10_N_P: (f64, f64) = (0.0, 10.0);
    /// log₁₀(γₑ / s⁻¹)
    pub const LOG10_GAMMA_E: (f64, f64) = (4.0, 10.0);
    /// Δt (s)
    pub const PULSE_DURATION: (f64, f64) = (1e-9, 1e-5);
    /// γᵢ/γₑ
    pub const LOSS_RATIO: (f64, f64) = (0.0, 10.0);
    /// t_r (s)
    pub const RESET_TIME: (f64, f64) = (0.0, 1e-4);
}

/// User-facing parameterization: couplings, photon numbers, and loss rates on
/// log scales, intrinsic loss as a ratio to the extrinsic loss.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderInputs {
    pub log10_g0: f64,
    pub log10_n_p: f64,
    pub log10_gamma_e: f64,
    pub pulse_duration: f64,
    /// γᵢ/γₑ
    pub loss_ratio: f64,
    pub reset_time: f64,
}

impl Default for SliderInputs {
    fn default() -> Self {
        Self {
            log10_g0: 3.0,
            log10_n_p: 6.0,
            log10_gamma_e: 8.0,
            pulse_duration: 1e-7,
            loss_ratio: 0.0,
            reset_time: 1e-6,
        }
    }
}

fn clamp_to(x: f64, range: (f64, f64)) -> f64 {
    if x.is_nan() { range.0 } else { x.clamp(range.0, range.1) }
}

impl SliderInputs {
    /// Clamp every value into its slider range.
    pub fn clamped(&self) -> Self {
        Self {
            log10_g0: clamp_to(self.log10_g0, ranges::LOG10_G0),
            log10_n_p: clamp_to(self.log10_n_p, ranges::LOG10_N_P),
            log10_gamma_e: clamp_to(self.log10_gamma_e, ranges::LOG10_GAMMA_E),
            pulse_duration:
                clamp_to(self.pulse_duration, ranges::PULSE_DURATION),
            loss_ratio: clamp_to(self.loss_ratio, ranges::LOSS_RATIO),
            reset_time: clamp_to(self.reset_time, ranges::RESET_TIME),
        }
    }
}

impl From<SliderInputs> for Params {
    fn from(sliders: SliderInputs) -> Self {
        let s = sliders.clamped();
        let gamma_e = 10.0_f64.powf(s.log10_gamma_e);
        Self {
            g0: 10.0_f64.powf(s.log10_g0),
            n_p: 10.0_f64.powf(s.log10_n_p),
            gamma_e,
            gamma_i: s.loss_ratio * gamma_e,
            pulse_duration: s.pulse_duration,
            reset_time: s.reset_time,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_couplings() {
        let p = Params::default();
        assert!((p.g() - 1e6).abs() < 1e-6);
        // γₑ/4 = 2.5e7 ≫ g: real branch
        let gp = p.g_prime();
        assert_eq!(gp.im, 0.0);
        assert!((gp.re - (2.5e7_f64.powi(2) - 1e12).sqrt()).abs() < 1e-3);
        assert!((p.coupling_ratio() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn imaginary_branch() {
        let p = Params { gamma_e: 1e6, ..Params::default() };
        // g = 1e6 > γₑ/4
        let gp = p.g_prime();
        assert!(gp.re.abs() < 1e-9);
        assert!((gp.im - (1e12_f64 - 6.25e10).sqrt()).abs() < 1e-3);
        assert_eq!(p.regime(), Regime::Oscillatory);
    }

    #[test]
    fn lossless_ratio() {
        let p = Params { gamma_e: 0.0, ..Params::default() };
        assert!(p.coupling_ratio().is_infinite());
        let p = Params { gamma_e: 0.0, n_p: 0.0, ..Params::default() };
        assert_eq!(p.coupling_ratio(), 0.0);
    }

    #[test]
    fn sliders_convert_and_clamp() {
        let p: Params = SliderInputs::default().into();
        assert!((p.g0 - 1e3).abs() < 1e-9);
        assert!((p.n_p - 1e6).abs() < 1e-6);
        assert!((p.gamma_e - 1e8).abs() < 1e-3);
        assert_eq!(p.gamma_i, 0.0);

        let wild = SliderInputs {
            log10_g0: 12.0,
            loss_ratio: -3.0,
            pulse_duration: f64::NAN,
            ..SliderInputs::default()
        };
        let p: Params = wild.into();
        assert!((p.g0 - 1e6).abs() < 1e-6);
        assert_eq!(p.gamma_i, 0.0);
        assert_eq!(p.pulse_duration, ranges::PULSE_DURATION.0);

        let ratio = SliderInputs { loss_ratio: 1.0, ..SliderInputs::default() };
        let p: Params = ratio.into();
        assert_eq!(p.gamma_i, p.gamma_e);
    }

    #[test]
    fn validation() {
        assert!(Params::default().validate().is_ok());
        let bad = Params { gamma_i: -1.0, ..Params::default() };
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidParam { name: "gamma_i", .. }),
        ));
        let bad = Params { pulse_duration: 0.0, ..Params::default() };
        assert!(bad.validate().is_err());
        let bad = Params { n_p: f64::INFINITY, ..Params::default() };
        assert!(bad.validate().is_err());
    }
}
