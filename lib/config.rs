//! TOML configuration for a full evaluation of the protocol.
//!
//! Every section is optional and falls back to its default, so an empty file
//! reproduces the reference operating point
//! (g₀ = 1 kHz, n_p = 10⁶, γₑ = 100 MHz, γᵢ = 0, Δt = 100 ns, t_r = 1 μs).
//!
//! ```toml
//! interaction = "two_mode_squeezing"
//!
//! [params]
//! g0 = 1e3
//! n_p = 1e6
//! gamma_e = 1e8
//! gamma_i = 0.0
//! pulse_duration = 1e-7
//! reset_time = 1e-6
//!
//! [display]
//! model = "single_click"
//! purification = false
//! log10 = true
//! ```
//!
//! If a `[sliders]` table is present, it takes precedence over `[params]`.

use std::path::{ Path, PathBuf };
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ Error, Result },
    hilbert::Interaction,
    params::{ Params, SliderInputs },
    rates::{ EntanglementModel, OpticalPump },
};

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interaction: Interaction,
    pub params: Params,
    pub sliders: Option<SliderInputs>,
    pub time: TimeConfig,
    pub sweep: SweepConfig,
    pub display: DisplayConfig,
    pub pump: OpticalPump,
    pub output: OutputConfig,
}

/// Time grid shared by the closed-form and integrated trajectories.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// End of the time grid; defaults to the pulse duration.
    pub t_final: Option<f64>,
    /// Number of integration steps.
    pub steps: usize,
}

impl Default for TimeConfig {
    fn default() -> Self { Self { t_final: None, steps: 2000 } }
}

/// Ranges of the swept quantities.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub log10_n_p_min: f64,
    pub log10_n_p_max: f64,
    pub power_dbm_min: f64,
    pub power_dbm_max: f64,
    pub log10_gamma_e_min: f64,
    pub log10_gamma_e_max: f64,
    /// Number of points in every sweep.
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            log10_n_p_min: 0.0,
            log10_n_p_max: 10.0,
            power_dbm_min: -40.0,
            power_dbm_max: 10.0,
            log10_gamma_e_min: 5.0,
            log10_gamma_e_max: 10.0,
            points: 201,
        }
    }
}

/// Toggles controlling how the rate curves are reported.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub model: EntanglementModel,
    /// Halve the entanglement rate to account for purification.
    pub purification: bool,
    /// Report log₁₀ of the rates instead of the rates.
    pub log10: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            model: EntanglementModel::SingleClick,
            purification: false,
            log10: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { dir: PathBuf::from("output") } }
}

impl Config {
    /// Read and validate a configuration file.
    pub fn load<P>(path: P) -> Result<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| {
                Error::ConfigRead { path: path.to_path_buf(), source }
            })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The effective parameter set, preferring slider inputs when present.
    pub fn params(&self) -> Params {
        self.sliders.map(Params::from).unwrap_or(self.params)
    }

    /// End of the trajectory time grid.
    pub fn t_final(&self) -> f64 {
        self.time.t_final.unwrap_or_else(|| self.params().pulse_duration)
    }

    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if let Some(t) = self.time.t_final {
            if !(t.is_finite() && t > 0.0) {
                return Err(Error::invalid("time.t_final", t, "must be positive"));
            }
        }
        if self.time.steps == 0 {
            return Err(Error::invalid(
                "time.steps", self.time.steps as f64, "must be non-zero"));
        }
        let sweep = &self.sweep;
        if sweep.points < 2 {
            return Err(Error::invalid(
                "sweep.points", sweep.points as f64, "must be at least 2"));
        }
        let bounds = [
            ("sweep.log10_n_p_max", sweep.log10_n_p_min, sweep.log10_n_p_max),
            ("sweep.power_dbm_max", sweep.power_dbm_min, sweep.power_dbm_max),
            (
                "sweep.log10_gamma_e_max",
                sweep.log10_gamma_e_min,
                sweep.log10_gamma_e_max,
            ),
        ];
        for (name, lo, hi) in bounds {
            if !(hi > lo) {
                return Err(Error::invalid(name, hi, "must exceed the minimum"));
            }
        }
        self.pump.validate()?;
        Ok(())
    }
}
