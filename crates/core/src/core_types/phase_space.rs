//! Phase-space position: Galactocentric position and velocity of a body.

use crate::core_types::units::{Kiloparsecs, KilometersPerSecond, KpcPerMyr};
use crate::core_types::Vec3;
use serde::{Deserialize, Serialize};

/// Position (kpc) and velocity (km/s) in a Cartesian frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpacePosition {
    /// Cartesian position in kpc
    pub pos: Vec3,
    /// Cartesian velocity in km/s
    pub vel: Vec3,
}

impl PhaseSpacePosition {
    /// Create a phase-space position from raw kpc and km/s components
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self { pos, vel }
    }

    /// Position components as typed distances
    pub fn position(&self) -> [Kiloparsecs; 3] {
        [
            Kiloparsecs::new(self.pos.x),
            Kiloparsecs::new(self.pos.y),
            Kiloparsecs::new(self.pos.z),
        ]
    }

    /// Velocity components as typed km/s
    pub fn velocity(&self) -> [KilometersPerSecond; 3] {
        [
            KilometersPerSecond::new(self.vel.x),
            KilometersPerSecond::new(self.vel.y),
            KilometersPerSecond::new(self.vel.z),
        ]
    }

    /// Velocity components in the kpc/Myr convention
    pub fn velocity_kpc_per_myr(&self) -> [KpcPerMyr; 3] {
        self.velocity().map(KilometersPerSecond::to_kpc_per_myr)
    }

    /// Distance from the frame origin
    pub fn radius(&self) -> Kiloparsecs {
        Kiloparsecs::new(self.pos.norm())
    }

    /// Cylindrical radius in the x-y plane
    pub fn cylindrical_radius(&self) -> Kiloparsecs {
        Kiloparsecs::new(self.pos.x.hypot(self.pos.y))
    }

    /// Total speed
    pub fn speed(&self) -> KilometersPerSecond {
        KilometersPerSecond::new(self.vel.norm())
    }
}
