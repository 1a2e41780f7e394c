//! Galactic potential models for orbit integration
//!
//! A [`Potential`] supplies energy and gradient in galactic units. Components
//! are combined in a [`CompositePotential`] and paired with a reference frame
//! in a [`Hamiltonian`], which is what the orbit integrator consumes.

pub mod components;
pub mod composite;
pub mod frame;
pub mod presets;

pub use components::{LongMuraliBar, MiyamotoNagai, Nfw};
pub use composite::CompositePotential;
pub use frame::{Hamiltonian, RotatingFrame};
pub use presets::{get_potential, list_available_potentials, PotentialPreset};

use crate::core_types::{KilometersPerSecond, Kiloparsecs, Vec3, KMS_IN_KPC_PER_MYR};
use std::fmt::Debug;
use thiserror::Error;

/// Errors raised while building potentials
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PotentialError {
    /// Name is not a known preset
    #[error("Unknown potential '{name}'. Available: {available:?}")]
    UnknownPotential {
        /// Requested name
        name: String,
        /// Known preset ids
        available: Vec<String>,
    },
    /// A shape parameter must be finite and positive
    #[error("potential parameter {parameter} must be finite and positive, got {value}")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Rejected value
        value: f64,
    },
}

/// Gravitational potential evaluated at Cartesian positions in kpc
pub trait Potential: Debug + Send + Sync {
    /// Potential energy per unit mass, (kpc/Myr)²
    fn energy(&self, x: &Vec3) -> f64;

    /// Gradient of the potential, kpc/Myr²
    fn gradient(&self, x: &Vec3) -> Vec3;

    /// Gravitational acceleration, kpc/Myr²
    fn acceleration(&self, x: &Vec3) -> Vec3 {
        -self.gradient(x)
    }

    /// Circular velocity in the midplane at cylindrical radius `r`,
    /// measured along the +x axis
    fn circular_velocity(&self, r: Kiloparsecs) -> KilometersPerSecond {
        let x = Vec3::new(r.value(), 0.0, 0.0);
        let radial_force = self.gradient(&x).x;
        let v = (r.value() * radial_force).max(0.0).sqrt();
        KilometersPerSecond::new(v / KMS_IN_KPC_PER_MYR)
    }
}
