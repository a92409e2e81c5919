//! Infidelity of the heralded state versus pump photon number, at the end of a
//! pulse and after the following reset.

use clap::Parser;
use heralded_transducer::{ cli::Cli, infidelity::infidelity, Observables };

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let (config, outdir) = cli.load()?;

    let obs = Observables::compute(&config)?;
    let params = obs.params;
    tracing::info!(
        "infidelity at n_p = {:.3e}: {:.6e} (Δt), {:.6e} (Δt + t_r)",
        params.n_p,
        infidelity(&params, params.pulse_duration),
        infidelity(&params, params.cycle_time()),
    );

    obs.write_infidelity(&outdir)?;
    println!("done");
    Ok(())
}
