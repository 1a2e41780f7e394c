//! Core types: unit-tagged quantities, physical constants and phase-space
//! positions

pub mod constants;
pub mod phase_space;
pub mod units;

pub use constants::*;
pub use phase_space::PhaseSpacePosition;
pub use units::*;

/// Cartesian 3-vector in `f64`: Galactocentric positions (kpc), velocities
/// and potential gradients
pub type Vec3 = nalgebra::Vector3<f64>;
