//! Command-line arguments and logging setup shared by the binaries.

use std::path::PathBuf;
use clap::{ ArgAction, Parser };
use tracing_subscriber::EnvFilter;
use crate::{ config::Config, error::Result };

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long, env = "HERALDED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory, overriding `output.dir` in the configuration.
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv); ignored when RUST_LOG is set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log level selected by the `-v` flags.
    pub fn level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Install the global `tracing` subscriber.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level()));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Read the configuration and resolve the output directory.
    pub fn load(&self) -> Result<(Config, PathBuf)> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                tracing::info!("no config file given; using defaults");
                Config::default()
            },
        };
        let outdir = self.outdir.clone()
            .unwrap_or_else(|| config.output.dir.clone());
        Ok((config, outdir))
    }
}
