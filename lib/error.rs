//! Error type for the fallible edges of the crate: reading configuration,
//! validating time grids and matrix shapes, and writing output files.
//!
//! The physics itself is total; nothing in [`amplitude`][crate::amplitude],
//! [`rates`][crate::rates], or [`infidelity`][crate::infidelity] can fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid value for `{name}`: {value} ({reason})")]
    InvalidParam {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid time grid: {0}")]
    TimeGrid(String),

    #[error("hamiltonian is {rows}×{cols} but the state has length {len}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        len: usize,
    },

    #[error("state {0} is not in the basis")]
    NotInBasis(String),

    #[error("failed to write npz output: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),
}

impl Error {
    pub(crate) fn invalid(
        name: &'static str,
        value: f64,
        reason: &'static str,
    ) -> Self
    {
        Self::InvalidParam { name, value, reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
