//! Particle snapshot: positions, velocities and masses at one time

use crate::core_types::{PhaseSpacePosition, Vec3};
use serde::{Deserialize, Serialize};

/// Particle data extracted from a NEMO snapshot.
///
/// Positions are taken to be kpc and velocities km/s; masses are kept in the
/// file's own units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NemoSnapshot {
    /// Particle positions
    pub positions: Vec<Vec3>,
    /// Particle velocities
    pub velocities: Vec<Vec3>,
    /// Particle masses
    pub masses: Vec<f64>,
    /// Snapshot time, if the file records one
    pub time: Option<f64>,
    /// Number of particles
    pub particle_count: usize,
}

impl NemoSnapshot {
    /// Phase-space position of every particle
    pub fn phase_space(&self) -> Vec<PhaseSpacePosition> {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(x, v)| PhaseSpacePosition::new(*x, *v))
            .collect()
    }

    /// Sum of particle masses
    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Mass-weighted mean position and velocity
    pub fn center_of_mass(&self) -> PhaseSpacePosition {
        let total = self.total_mass();
        if total <= 0.0 {
            return PhaseSpacePosition::new(Vec3::zeros(), Vec3::zeros());
        }
        let mut pos = Vec3::zeros();
        let mut vel = Vec3::zeros();
        for ((x, v), m) in self.positions.iter().zip(&self.velocities).zip(&self.masses) {
            pos += x * *m;
            vel += v * *m;
        }
        PhaseSpacePosition::new(pos / total, vel / total)
    }

    /// Copy of the snapshot shifted by a phase-space offset
    pub fn translated(&self, offset: &PhaseSpacePosition) -> Self {
        Self {
            positions: self.positions.iter().map(|x| x + offset.pos).collect(),
            velocities: self.velocities.iter().map(|v| v + offset.vel).collect(),
            ..self.clone()
        }
    }
}
