#![allow(non_snake_case)]

//! Conditional dynamics, detection rates, and infidelities for heralded
//! microwave-optical entanglement generated by a pumped electro-optic
//! transducer.

pub mod utils;
pub mod error;
pub mod hilbert;
pub mod params;
pub mod config;
pub mod amplitude;
pub mod hamiltonian;
pub mod integrate;
pub mod rates;
pub mod infidelity;
pub mod observables;
pub mod cli;

pub use error::{ Error, Result };
pub use params::{ Params, SliderInputs };
pub use config::Config;
pub use observables::Observables;
