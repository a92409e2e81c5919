//! Labelled two-mode Fock bases for the transducer.
//!
//! Heralded evolution only ever involves two joint states of the microwave and
//! optical modes: the one the system starts in and the one a single pump
//! scattering event takes it to. Which two depends on the sign of the pump
//! detuning.

use std::{ fmt, hash::Hash, ops::Deref };
use indexmap::IndexMap;
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };
use ndarray as nd;
use serde::{ Deserialize, Serialize };

/// A single basis state.
pub trait BasisState: Clone + Eq + Hash + fmt::Debug {
    /// Return `true` if the pump couples two states.
    ///
    /// This method should be symmetric in its inputs.
    fn couples_to(&self, other: &Self) -> bool;
}

/// Joint Fock state `|m, o⟩` of the microwave (`m`) and optical (`o`) modes,
/// truncated to at most one photon per mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModeState {
    /// `|00⟩`
    Vacuum,
    /// `|11⟩`
    Pair,
    /// `|10⟩`
    Microwave,
    /// `|01⟩`
    Optical,
}
use ModeState::*;

impl ModeState {
    /// Number of photons in the optical mode.
    pub fn optical_photons(&self) -> usize {
        match *self {
            Pair | Optical => 1,
            Vacuum | Microwave => 0,
        }
    }

    /// Ket notation, `|mo⟩`.
    pub fn ket(&self) -> &'static str {
        match *self {
            Vacuum => "|00⟩",
            Pair => "|11⟩",
            Microwave => "|10⟩",
            Optical => "|01⟩",
        }
    }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ket())
    }
}

impl BasisState for ModeState {
    fn couples_to(&self, other: &Self) -> bool {
        matches!(
            (*self, *other),
            (Vacuum, Pair) | (Pair, Vacuum)
                | (Microwave, Optical) | (Optical, Microwave)
        )
    }
}

/// Pump configuration of the transducer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Blue-detuned pump: spontaneous parametric down-conversion creates
    /// microwave-optical photon pairs, `|00⟩ ↔ |11⟩`.
    #[default]
    TwoModeSqueezing,
    /// Red-detuned pump: beam-splitter conversion of a microwave excitation
    /// into an optical one, `|10⟩ ↔ |01⟩`.
    BeamSplitter,
}

impl Interaction {
    /// The initial state and the state reached by one scattering event, in
    /// that order.
    pub fn states(&self) -> [ModeState; 2] {
        match *self {
            Self::TwoModeSqueezing => [Vacuum, Pair],
            Self::BeamSplitter => [Microwave, Optical],
        }
    }

    /// Build the corresponding basis, with all states at zero energy in the
    /// pump frame.
    pub fn basis(&self) -> Basis<ModeState> {
        self.states().into_iter().map(|s| (s, 0.0)).collect()
    }
}

/// A collection of unique [`BasisState`]s with associated energies in units of
/// angular frequency.
///
/// Backed by a single [`IndexMap`], accessible via [`Deref`].
#[derive(Clone, Debug, PartialEq)]
pub struct Basis<S>
where S: Clone + Eq + Hash
{
    energies: IndexMap<S, f64>,
}

impl<S> Deref for Basis<S>
where S: Clone + Eq + Hash
{
    type Target = IndexMap<S, f64>;

    fn deref(&self) -> &Self::Target { &self.energies }
}

impl<S> FromIterator<(S, f64)> for Basis<S>
where S: Clone + Eq + Hash
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (S, f64)>
    {
        Self { energies: iter.into_iter().collect() }
    }
}

impl<S> Basis<S>
where S: Clone + Eq + Hash
{
    /// Get an array representation of a particular basis state.
    ///
    /// The array is sized to match the number of states currently in `self`.
    pub fn get_vector(&self, state: &S) -> Option<nd::Array1<C64>> {
        self.energies.get_index_of(state)
            .map(|k| {
                let n = self.energies.len();
                (0..n).map(|j| if j == k { C64::one() } else { C64::zero() })
                    .collect()
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interaction_bases() {
        let basis = Interaction::TwoModeSqueezing.basis();
        assert_eq!(basis.len(), 2);
        assert_eq!(basis.get_index_of(&Vacuum), Some(0));
        assert_eq!(basis.get_index_of(&Pair), Some(1));
        assert!(Vacuum.couples_to(&Pair));
        assert!(!Vacuum.couples_to(&Optical));

        let basis = Interaction::BeamSplitter.basis();
        assert_eq!(basis.get_index_of(&Microwave), Some(0));
        assert_eq!(basis.get_index_of(&Optical), Some(1));
        assert!(Optical.couples_to(&Microwave));
    }

    #[test]
    fn vectors() {
        let basis = Interaction::TwoModeSqueezing.basis();
        let v = basis.get_vector(&Vacuum).unwrap();
        assert_eq!(v, nd::array![C64::one(), C64::zero()]);
        assert!(basis.get_vector(&Optical).is_none());
        assert!(basis.values().all(|e| *e == 0.0));
    }

    #[test]
    fn kets() {
        assert_eq!(Pair.to_string(), "|11⟩");
        assert_eq!(Microwave.optical_photons(), 0);
        assert_eq!(Pair.optical_photons(), 1);
    }
}
