//! Detection and entanglement rates versus pump photon number, pump power, and
//! extrinsic loss rate.

use clap::Parser;
use heralded_transducer::{ cli::Cli, rates::optimal_gamma_e, Observables };

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let (config, outdir) = cli.load()?;

    let obs = Observables::compute(&config)?;
    tracing::info!(
        "{} model{}",
        config.display.model,
        if config.display.purification { " with purification" } else { "" },
    );
    tracing::info!("r₀ = {:.6e} s⁻¹", obs.r0);
    tracing::info!("r_e = {:.6e} s⁻¹", obs.r_e);
    if let Some((n_p, r_e)) = obs.rates_vs_photon_number.peak() {
        tracing::info!("largest r_e over n_p sweep: {:.3e} at n_p = {:.3e}", r_e, n_p);
    }
    if obs.params.gamma_i > 0.0 {
        tracing::info!(
            "r₀ is largest at γₑ = {:.3e} s⁻¹",
            optimal_gamma_e(obs.params.gamma_i),
        );
    }

    obs.write_rates(&outdir)?;
    println!("done");
    Ok(())
}
