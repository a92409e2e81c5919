//! Effective non-Hermitian Hamiltonian of the transducer conditioned on no
//! photon having been detected.
//!
//! In the frame of the pump, and with the basis states at zero energy, the
//! scattering interaction couples the two basis states with strength
//! `g = g₀√n_p` while the state holding an optical photon decays at `γₑ`:
//! ```text
//! H = [ 0    g      ]
//!     [ g   −iγₑ/2  ]
//! ```

use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    c,
    hilbert::{ Basis, BasisState, ModeState },
    params::Params,
};

/// Time dependence of the pump.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PumpEnvelope {
    /// Pump always on.
    #[default]
    Continuous,
    /// Pump on for `0 ≤ t < duration`, off afterward.
    Pulsed { duration: f64 },
}

impl PumpEnvelope {
    /// Fraction of the full pump-enhanced coupling present at time `t`.
    pub fn strength_at(&self, t: f64) -> f64 {
        match *self {
            Self::Continuous => 1.0,
            Self::Pulsed { duration }
                => if (0.0..duration).contains(&t) { 1.0 } else { 0.0 },
        }
    }
}

/// Hamiltonian builder for the heralded two-state system.
#[derive(Clone, Debug)]
pub struct HBuilderHeralded<'a> {
    pub(crate) basis: &'a Basis<ModeState>,
    pub params: Params,
    pub envelope: PumpEnvelope,
}

impl<'a> HBuilderHeralded<'a> {
    /// Create a new `HBuilderHeralded` with a continuous pump.
    pub fn new(basis: &'a Basis<ModeState>, params: Params) -> Self {
        Self { basis, params, envelope: PumpEnvelope::Continuous }
    }

    /// Replace the pump envelope.
    pub fn with_envelope(mut self, envelope: PumpEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Get a reference to the basis.
    pub fn basis(&self) -> &Basis<ModeState> { self.basis }

    // Hamiltonian with coupling strength `g`
    fn gen_with(&self, g: f64) -> nd::Array2<C64> {
        let n = self.basis.len();
        let mut H: nd::Array2<C64> = nd::Array2::zeros((n, n));
        let decay = self.params.gamma_e / 2.0;
        for (k, (s, e)) in self.basis.iter().enumerate() {
            H[[k, k]] = c!(*e, -decay * s.optical_photons() as f64);
        }
        let iter
            = self.basis.keys().enumerate()
            .tuple_combinations();
        for ((i, si), (j, sj)) in iter {
            if !si.couples_to(sj) { continue; }
            H[[i, j]] = c!(g);
            H[[j, i]] = c!(g);
        }
        H
    }

    /// Compute the time-independent Hamiltonian for a continuous pump.
    pub fn build_static(&self) -> nd::Array2<C64> {
        self.gen_with(self.params.g())
    }

    /// Compute the Hamiltonian at time `t`, following the pump envelope.
    pub fn build_at(&self, t: f64) -> nd::Array2<C64> {
        self.gen_with(self.params.g() * self.envelope.strength_at(t))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hilbert::Interaction;

    #[test]
    fn static_matrix() {
        let basis = Interaction::TwoModeSqueezing.basis();
        let params = Params::default();
        let H = HBuilderHeralded::new(&basis, params).build_static();
        let g = params.g();
        let expected = nd::array![
            [c!(0.0), c!(g)],
            [c!(g), c!(0.0, -params.gamma_e / 2.0)],
        ];
        assert_eq!(H, expected);
    }

    #[test]
    fn beam_splitter_has_same_dynamics() {
        let params = Params::default();
        let tms = Interaction::TwoModeSqueezing.basis();
        let bs = Interaction::BeamSplitter.basis();
        assert_eq!(
            HBuilderHeralded::new(&tms, params).build_static(),
            HBuilderHeralded::new(&bs, params).build_static(),
        );
    }

    #[test]
    fn pulsed_envelope() {
        let basis = Interaction::TwoModeSqueezing.basis();
        let params = Params::default();
        let builder = HBuilderHeralded::new(&basis, params)
            .with_envelope(PumpEnvelope::Pulsed { duration: 1e-7 });
        let on = builder.build_at(5e-8);
        let off = builder.build_at(2e-7);
        assert_eq!(on, builder.build_static());
        assert_eq!(off[[0, 1]], c!(0.0));
        assert_eq!(off[[1, 1]], c!(0.0, -params.gamma_e / 2.0));
        assert_eq!(builder.build_at(0.0)[[0, 1]], c!(params.g()));
        assert_eq!(builder.build_at(1e-7)[[0, 1]], c!(0.0));
    }
}
