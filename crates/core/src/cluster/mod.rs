//! Globular clusters: observational parameters, Galactocentric state and
//! the unit-converted record printed by the command-line report.

pub mod catalog;
pub mod record;

pub use catalog::{
    get_cluster, list_available_clusters, CatalogError, ClusterCatalog, ClusterConfig,
};
pub use record::{ClusterRecord, NemoRecord};

use crate::coords::{GalactocentricFrame, SkyPosition};
use crate::core_types::units::{Parsecs, SolarMasses};
use crate::core_types::PhaseSpacePosition;
use std::fmt;

/// A globular cluster with its observables and derived Galactocentric state
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    config: ClusterConfig,
    galactocentric: PhaseSpacePosition,
}

impl Cluster {
    /// Build a cluster in the default Galactocentric frame
    pub fn from_config(config: ClusterConfig) -> Self {
        Self::with_frame(config, &GalactocentricFrame::default())
    }

    /// Build a cluster in a custom Galactocentric frame
    pub fn with_frame(config: ClusterConfig, frame: &GalactocentricFrame) -> Self {
        let galactocentric = frame.transform(&config.sky_position());
        Self {
            config,
            galactocentric,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Observational configuration
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Heliocentric observables
    pub fn sky_position(&self) -> SkyPosition {
        self.config.sky_position()
    }

    /// Total mass
    pub fn mass(&self) -> SolarMasses {
        self.config.mass
    }

    /// Plummer scale radius
    pub fn scale_radius(&self) -> Parsecs {
        self.config.scale_radius
    }

    /// Galactocentric phase-space position (kpc, km/s)
    pub fn galactocentric(&self) -> PhaseSpacePosition {
        self.galactocentric
    }

    /// Snapshot of name, position, velocity and mass
    pub fn record(&self) -> ClusterRecord {
        ClusterRecord::from_cluster(self)
    }

    /// Multi-line summary of observables and Galactocentric position
    pub fn info(&self) -> String {
        ClusterInfo(self).to_string()
    }
}

/// Multi-line report behind [`Cluster::info`]
struct ClusterInfo<'a>(&'a Cluster);

impl fmt::Display for ClusterInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.0.config;
        writeln!(f, "Cluster: {}", c.name)?;
        writeln!(f, "Coordinates: RA={}, Dec={}", c.ra, c.dec)?;
        writeln!(f, "Distance: {}", c.distance)?;
        writeln!(f, "Proper motion: μ_α*={}, μ_δ={}", c.pm_ra_cosdec, c.pm_dec)?;
        writeln!(f, "Radial velocity: {}", c.radial_velocity)?;
        writeln!(f, "Mass: {}", c.mass)?;
        if let Some(source) = &c.source {
            writeln!(f, "Source: {source}")?;
        }
        writeln!(f)?;
        writeln!(f, "Galactocentric coordinates:")?;
        let [x, y, z] = self.0.galactocentric.position();
        writeln!(f, "X: {x}")?;
        writeln!(f, "Y: {y}")?;
        write!(f, "Z: {z}")
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "Cluster(name='{}', ra={}, dec={}, distance={:.1} kpc, mass={})",
            c.name,
            c.ra,
            c.dec,
            c.distance.value(),
            c.mass
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_repr_style() {
        let cluster = get_cluster("ngc6569").unwrap();
        assert_eq!(
            cluster.to_string(),
            "Cluster(name='NGC 6569', ra=273.412 deg, dec=-31.827 deg, distance=10.5 kpc, mass=2.3e5 Msun)"
        );
    }

    #[test]
    fn test_info_lists_source_and_coordinates() {
        let info = get_cluster("pal5").unwrap().info();
        assert!(info.starts_with("Cluster: Palomar 5\n"));
        assert!(info.contains("Source: Baumgardt & Vasiliev 2021"));
        assert!(info.contains("Galactocentric coordinates:"));
        assert!(info.lines().last().unwrap().starts_with("Z: "));
    }

    #[test]
    fn test_info_proper_motion_line() {
        let info = get_cluster("pal5").unwrap().info();
        assert!(info
            .lines()
            .any(|line| line == "Proper motion: μ_α*=-2.730 mas/yr, μ_δ=-2.654 mas/yr"));
    }

    #[test]
    fn test_info_omits_missing_source() {
        let mut config = ClusterConfig::pal5();
        config.source = None;
        let info = Cluster::from_config(config).info();
        assert!(!info.contains("Source:"));
    }

    #[test]
    fn test_pal5_lies_above_the_disk() {
        // Pal 5 sits ~16 kpc above the midplane on the far side of the Sun
        let w = get_cluster("pal5").unwrap().galactocentric();
        assert!(w.pos.z > 10.0 && w.pos.z < 20.0, "z = {}", w.pos.z);
        assert!(w.radius().value() > 10.0);
    }
}
