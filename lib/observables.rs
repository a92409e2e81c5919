//! Everything computed from one configuration, gathered in one place.

use std::path::Path;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    mkdir,
    write_npz,
    amplitude,
    config::Config,
    error::{ Error, Result },
    hamiltonian::HBuilderHeralded,
    infidelity::{ infidelity_sweep, InfidelityCurve },
    integrate::{ evolve_fixed, max_deviation, stable_steps },
    params::Params,
    rates::{ self, RateCurve, Regime },
    utils::logspace,
};

/// Observables for a single parameter set.
#[derive(Clone, Debug)]
pub struct Observables {
    pub params: Params,
    pub regime: Regime,
    /// Time grid shared by both trajectories; its step count is raised above
    /// the configured one when needed for a stable integration.
    pub time: nd::Array1<f64>,
    /// Closed-form amplitudes, `2 × N`.
    pub psi_exact: nd::Array2<C64>,
    /// Runge-Kutta amplitudes, `2 × N`.
    pub psi_numeric: nd::Array2<C64>,
    /// Largest elementwise distance between the two trajectories.
    pub deviation: f64,
    /// No-click probability along the closed-form trajectory.
    pub population: nd::Array1<f64>,
    /// Weak-coupling approximation to `population`.
    pub poissonian: nd::Array1<f64>,
    /// Detection rate at the operating point.
    pub r0: f64,
    /// Entanglement rate at the operating point.
    pub r_e: f64,
    pub rates_vs_photon_number: RateCurve,
    /// `x` holds pump powers in dBm.
    pub rates_vs_pump_power: RateCurve,
    pub rates_vs_gamma_e: RateCurve,
    /// log₁₀ of the infidelities when `display.log10` is set.
    pub infidelity: InfidelityCurve,
}

impl Observables {
    /// Evaluate every observable for `config`.
    pub fn compute(config: &Config) -> Result<Self> {
        config.validate()?;
        let params = config.params();
        let regime = params.regime();
        tracing::debug!(
            g = params.g(),
            ratio = params.coupling_ratio(),
            %regime,
            "operating point",
        );
        if regime == Regime::Oscillatory {
            tracing::warn!(
                "g/γₑ = {:.3e} is beyond the critical point; g' is imaginary",
                params.coupling_ratio(),
            );
        }

        let basis = config.interaction.basis();
        let [initial, _] = config.interaction.states();
        let psi0 = basis.get_vector(&initial)
            .ok_or_else(|| Error::NotInBasis(initial.to_string()))?;
        let H = HBuilderHeralded::new(&basis, params).build_static();
        let t_final = config.t_final();
        let min_steps = stable_steps(&H, t_final);
        let steps = if config.time.steps < min_steps {
            tracing::warn!(
                "{} steps are unstable over {:.3e} s; using {}",
                config.time.steps, t_final, min_steps,
            );
            min_steps
        } else {
            config.time.steps
        };
        let (time, psi_numeric) = evolve_fixed(&psi0, &H, t_final, steps)?;
        let psi_exact = amplitude::trajectory(&params, &time);
        let deviation = max_deviation(&psi_exact, &psi_numeric);
        if !deviation.is_finite() {
            tracing::warn!("rk4 trajectory diverged from the closed form");
        }
        let population = amplitude::populations(&psi_exact);
        let poissonian
            = time.mapv(|t| amplitude::poissonian_population(&params, t));
        tracing::debug!(deviation, "closed form vs rk4");

        let display = config.display;
        let r0 = rates::detection_rate_for(&params);
        let r_e = rates::entanglement_rate_for(
            &params, display.model, display.purification);

        let sweep = config.sweep;
        let n_p = logspace(sweep.log10_n_p_min, sweep.log10_n_p_max, sweep.points);
        let power_dbm: nd::Array1<f64> = nd::Array1::linspace(
            sweep.power_dbm_min, sweep.power_dbm_max, sweep.points);
        let gamma_e = logspace(
            sweep.log10_gamma_e_min, sweep.log10_gamma_e_max, sweep.points);

        let for_display = |curve: RateCurve| {
            if display.log10 { curve.log10() } else { curve }
        };
        let rates_vs_photon_number = for_display(RateCurve::over_photon_number(
            &params, n_p.clone(), display.model, display.purification));
        let rates_vs_pump_power = for_display(RateCurve::over_pump_power(
            &params, &config.pump, power_dbm, display.model,
            display.purification));
        let rates_vs_gamma_e = for_display(RateCurve::over_gamma_e(
            &params, gamma_e, display.model, display.purification));
        let infidelity = infidelity_sweep(&params, n_p);
        let infidelity
            = if display.log10 { infidelity.log10() } else { infidelity };

        Ok(Self {
            params,
            regime,
            time,
            psi_exact,
            psi_numeric,
            deviation,
            population,
            poissonian,
            r0,
            r_e,
            rates_vs_photon_number,
            rates_vs_pump_power,
            rates_vs_gamma_e,
            infidelity,
        })
    }

    /// Write `trajectory.npz` to `dir`.
    pub fn write_trajectory<P>(&self, dir: P) -> Result<()>
    where P: AsRef<Path>
    {
        let dir = dir.as_ref();
        mkdir!(dir);
        write_npz!(
            dir.join("trajectory.npz"),
            arrays: {
                "time" => &self.time,
                "psi_exact" => &self.psi_exact,
                "psi_numeric" => &self.psi_numeric,
                "population" => &self.population,
                "poissonian" => &self.poissonian,
                "deviation" => &nd::arr0(self.deviation),
                "coupling_ratio" => &nd::arr0(self.params.coupling_ratio()),
            }
        );
        Ok(())
    }

    /// Write `rates.npz` to `dir`.
    pub fn write_rates<P>(&self, dir: P) -> Result<()>
    where P: AsRef<Path>
    {
        let dir = dir.as_ref();
        mkdir!(dir);
        write_npz!(
            dir.join("rates.npz"),
            arrays: {
                "n_p" => &self.rates_vs_photon_number.x,
                "r0_vs_n_p" => &self.rates_vs_photon_number.r0,
                "re_vs_n_p" => &self.rates_vs_photon_number.r_e,
                "power_dbm" => &self.rates_vs_pump_power.x,
                "r0_vs_power" => &self.rates_vs_pump_power.r0,
                "re_vs_power" => &self.rates_vs_pump_power.r_e,
                "gamma_e" => &self.rates_vs_gamma_e.x,
                "r0_vs_gamma_e" => &self.rates_vs_gamma_e.r0,
                "re_vs_gamma_e" => &self.rates_vs_gamma_e.r_e,
                "r0" => &nd::arr0(self.r0),
                "r_e" => &nd::arr0(self.r_e),
            }
        );
        Ok(())
    }

    /// Write `infidelity.npz` to `dir`.
    pub fn write_infidelity<P>(&self, dir: P) -> Result<()>
    where P: AsRef<Path>
    {
        let dir = dir.as_ref();
        mkdir!(dir);
        write_npz!(
            dir.join("infidelity.npz"),
            arrays: {
                "n_p" => &self.infidelity.n_p,
                "at_pulse" => &self.infidelity.at_pulse,
                "at_cycle" => &self.infidelity.at_cycle,
            }
        );
        Ok(())
    }

    /// Write all output files to `dir`.
    pub fn write_npz<P>(&self, dir: P) -> Result<()>
    where P: AsRef<Path>
    {
        let dir = dir.as_ref();
        self.write_trajectory(dir)?;
        self.write_rates(dir)?;
        self.write_infidelity(dir)?;
        Ok(())
    }
}
