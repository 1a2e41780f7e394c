//! Cluster record: the name, Galactocentric phase-space position and mass of
//! a cluster, plus its conversion into NEMO units for simulation input.

use crate::cluster::Cluster;
use crate::core_types::units::{KilometersPerSecond, Kiloparsecs, KpcPerMyr, NemoMass, SolarMasses};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named cluster state in astronomical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Display name
    pub name: String,
    /// Galactocentric position
    pub position: [Kiloparsecs; 3],
    /// Galactocentric velocity
    pub velocity: [KilometersPerSecond; 3],
    /// Total mass
    pub mass: SolarMasses,
}

/// Named cluster state in NEMO units (kpc, kpc/Myr, 10¹⁰ Msun)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NemoRecord {
    /// Display name
    pub name: String,
    /// Galactocentric position
    pub position: [Kiloparsecs; 3],
    /// Galactocentric velocity
    pub velocity: [KpcPerMyr; 3],
    /// Total mass
    pub mass: NemoMass,
}

impl ClusterRecord {
    /// Capture the current state of a cluster
    pub fn from_cluster(cluster: &Cluster) -> Self {
        let w = cluster.galactocentric();
        Self {
            name: cluster.name().to_string(),
            position: w.position(),
            velocity: w.velocity(),
            mass: cluster.mass(),
        }
    }

    /// Convert velocities with the fixed km/s → kpc/Myr factor and the mass
    /// into units of 10¹⁰ Msun
    pub fn to_nemo_units(&self) -> NemoRecord {
        NemoRecord {
            name: self.name.clone(),
            position: self.position,
            velocity: self.velocity.map(KilometersPerSecond::to_kpc_per_myr),
            mass: self.mass.to_nemo_mass(),
        }
    }
}

impl fmt::Display for ClusterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.velocity;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  position: ({:.4}, {:.4}, {:.4}) kpc", *x, *y, *z)?;
        writeln!(f, "  velocity: ({:.4}, {:.4}, {:.4}) km/s", *vx, *vy, *vz)?;
        write!(f, "  mass:     {:.4e} Msun", *self.mass)
    }
}

impl fmt::Display for NemoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.velocity;
        writeln!(f, "{} (NEMO units)", self.name)?;
        writeln!(f, "  position: ({:.4}, {:.4}, {:.4}) kpc", *x, *y, *z)?;
        writeln!(f, "  velocity: ({:.4}, {:.4}, {:.4}) kpc/Myr", *vx, *vy, *vz)?;
        write!(f, "  mass:     {:.4e} x 1e10 Msun", *self.mass)
    }
}
