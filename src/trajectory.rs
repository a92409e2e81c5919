//! Closed-form and Runge-Kutta trajectories of the no-click state, with their
//! largest deviation and the coupling regime.

use clap::Parser;
use heralded_transducer::{ cli::Cli, Observables };

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let (config, outdir) = cli.load()?;

    let obs = Observables::compute(&config)?;
    let last = obs.population.len() - 1;
    tracing::info!(
        "g/γₑ = {:.3e} ({})",
        obs.params.coupling_ratio(),
        obs.regime,
    );
    tracing::info!(
        "no-click probability at t = {:.3e} s: {:.6} (poissonian {:.6})",
        obs.time[last],
        obs.population[last],
        obs.poissonian[last],
    );
    tracing::info!("max |closed form − rk4| = {:.3e}", obs.deviation);

    obs.write_trajectory(&outdir)?;
    println!("done");
    Ok(())
}
