//! Pre-defined observational parameters for globular clusters.
//!
//! Each built-in cluster has a plain constructor. The constructors are
//! collected into an ordered catalog that can be extended from a JSON file
//! at runtime.

use crate::cluster::Cluster;
use crate::coords::SkyPosition;
use crate::core_types::units::{
    Degrees, KilometersPerSecond, Kiloparsecs, MilliarcsecPerYear, Parsecs, SolarMasses, UnitError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while looking up or loading cluster configurations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Name is not present in the catalog
    #[error("Unknown cluster '{name}'. Available: {available:?}")]
    UnknownCluster {
        /// Requested name
        name: String,
        /// Ids present in the catalog, in catalog order
        available: Vec<String>,
    },
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Read {
        /// Path of the catalog file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Catalog file is not valid JSON of the expected shape
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        /// Path of the catalog file
        path: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },
    /// A configured quantity is outside its physical domain
    #[error("invalid configuration for '{id}': {source}")]
    Invalid {
        /// Catalog id of the offending entry
        id: String,
        /// Domain violation
        #[source]
        source: UnitError,
    },
}

/// Observational configuration of one cluster, as stored in a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Display name
    pub name: String,
    /// Right ascension (deg)
    pub ra: Degrees,
    /// Declination (deg)
    pub dec: Degrees,
    /// Heliocentric distance (kpc)
    pub distance: Kiloparsecs,
    /// Proper motion in RA × cos(dec) (mas/yr)
    pub pm_ra_cosdec: MilliarcsecPerYear,
    /// Proper motion in Dec (mas/yr)
    pub pm_dec: MilliarcsecPerYear,
    /// Heliocentric radial velocity (km/s)
    pub radial_velocity: KilometersPerSecond,
    /// Total mass (Msun)
    pub mass: SolarMasses,
    /// Plummer scale radius (pc)
    #[serde(default = "default_scale_radius")]
    pub scale_radius: Parsecs,
    /// Literature reference for the values
    #[serde(default)]
    pub source: Option<String>,
}

fn default_scale_radius() -> Parsecs {
    Parsecs::new(4.0)
}

impl ClusterConfig {
    /// NGC 6569 with the radial velocity modified for velocity dispersion
    pub fn ngc6569() -> Self {
        Self {
            name: "NGC 6569".to_string(),
            ra: Degrees::new(273.412),
            dec: Degrees::new(-31.827),
            distance: Kiloparsecs::new(10.53),
            pm_ra_cosdec: MilliarcsecPerYear::new(-4.125),
            pm_dec: MilliarcsecPerYear::new(-7.354),
            radial_velocity: KilometersPerSecond::new(-49.82),
            mass: SolarMasses::new(2.3e5),
            scale_radius: Parsecs::new(4.0),
            source: Some("Vasiliev et al. 2021, modified RV".to_string()),
        }
    }

    /// Palomar 5
    pub fn pal5() -> Self {
        Self {
            name: "Palomar 5".to_string(),
            ra: Degrees::new(229.019),
            dec: Degrees::new(-0.121),
            distance: Kiloparsecs::new(21.94),
            pm_ra_cosdec: MilliarcsecPerYear::new(-2.730),
            pm_dec: MilliarcsecPerYear::new(-2.654),
            radial_velocity: KilometersPerSecond::new(-58.60),
            mass: SolarMasses::new(1.3e4),
            scale_radius: Parsecs::new(4.0),
            source: Some("Baumgardt & Vasiliev 2021".to_string()),
        }
    }

    /// Palomar 5 with the canonical stream-modelling values
    pub fn pal5_canonical() -> Self {
        Self {
            name: "Palomar 5 (Canonical)".to_string(),
            ra: Degrees::new(229.0),
            dec: Degrees::new(-0.124),
            distance: Kiloparsecs::new(22.9),
            pm_ra_cosdec: MilliarcsecPerYear::new(-2.296),
            pm_dec: MilliarcsecPerYear::new(-2.257),
            radial_velocity: KilometersPerSecond::new(-58.7),
            mass: SolarMasses::new(1.3e4),
            scale_radius: Parsecs::new(4.0),
            source: Some("Odenkirchen+02, Bovy+16, Fritz+15 - canonical values".to_string()),
        }
    }

    /// Reject negative or non-finite distances and masses
    fn validate(&self, id: &str) -> Result<(), CatalogError> {
        let invalid = |source| CatalogError::Invalid {
            id: id.to_string(),
            source,
        };
        Kiloparsecs::try_new(self.distance.value()).map_err(invalid)?;
        SolarMasses::try_new(self.mass.value()).map_err(invalid)?;
        Parsecs::try_new(self.scale_radius.value()).map_err(invalid)?;
        Ok(())
    }

    /// Heliocentric observables of this configuration
    pub fn sky_position(&self) -> SkyPosition {
        SkyPosition {
            ra: self.ra,
            dec: self.dec,
            distance: self.distance,
            pm_ra_cosdec: self.pm_ra_cosdec,
            pm_dec: self.pm_dec,
            radial_velocity: self.radial_velocity,
        }
    }
}

/// Ordered collection of cluster configurations keyed by lowercase id
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCatalog {
    entries: Vec<(String, ClusterConfig)>,
}

impl Default for ClusterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClusterCatalog {
    /// Catalog containing only the built-in presets
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ("ngc6569".to_string(), ClusterConfig::ngc6569()),
                ("pal5".to_string(), ClusterConfig::pal5()),
                ("pal5_canonical".to_string(), ClusterConfig::pal5_canonical()),
            ],
        }
    }

    /// Empty catalog
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in presets with a JSON catalog file merged over them
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        catalog.merge_json_file(path)?;
        Ok(catalog)
    }

    /// Insert or replace an entry. Ids are stored lowercase.
    pub fn insert(&mut self, id: &str, config: ClusterConfig) -> Result<(), CatalogError> {
        let id = id.to_lowercase();
        config.validate(&id)?;
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == id) {
            debug!("Replacing catalog entry '{}'", id);
            slot.1 = config;
        } else {
            self.entries.push((id, config));
        }
        Ok(())
    }

    /// Merge a JSON catalog file (object of id → config) over this catalog
    pub fn merge_json_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, CatalogError> {
        let path_str = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path_str.clone(),
            source,
        })?;
        let parsed: BTreeMap<String, ClusterConfig> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: path_str.clone(),
                source,
            })?;
        let count = self.merge(parsed)?;
        info!("Loaded {} cluster(s) from {}", count, path_str);
        Ok(count)
    }

    /// Merge a JSON catalog (object of id → config) over this catalog.
    /// New ids are appended in sorted order.
    pub fn merge_json_str(&mut self, json: &str) -> Result<usize, CatalogError> {
        let parsed: BTreeMap<String, ClusterConfig> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        self.merge(parsed)
    }

    /// Ids differing only in case collapse to one entry; the last in key
    /// order wins. Returns the number of distinct ids merged.
    fn merge(&mut self, parsed: BTreeMap<String, ClusterConfig>) -> Result<usize, CatalogError> {
        let mut normalised: Vec<(String, ClusterConfig)> = Vec::with_capacity(parsed.len());
        for (id, config) in parsed {
            let id = id.to_lowercase();
            // validate everything first so a bad entry leaves the catalog untouched
            config.validate(&id)?;
            match normalised.iter_mut().find(|(key, _)| *key == id) {
                Some(slot) => slot.1 = config,
                None => normalised.push((id, config)),
            }
        }
        let count = normalised.len();
        for (id, config) in normalised {
            self.insert(&id, config)?;
        }
        Ok(count)
    }

    /// Look up a configuration by id, case-insensitively
    pub fn get(&self, name: &str) -> Result<&ClusterConfig, CatalogError> {
        let id = name.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, config)| config)
            .ok_or_else(|| CatalogError::UnknownCluster {
                name: name.to_string(),
                available: self.ids(),
            })
    }

    /// Build a `Cluster` for the given id
    pub fn cluster(&self, name: &str) -> Result<Cluster, CatalogError> {
        self.get(name).map(|config| Cluster::from_config(config.clone()))
    }

    /// Ids in catalog order
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    /// `(id, display name)` pairs in catalog order
    pub fn list(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(id, config)| (id.clone(), config.name.clone()))
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up a built-in cluster by name (case-insensitive)
pub fn get_cluster(name: &str) -> Result<Cluster, CatalogError> {
    ClusterCatalog::builtin().cluster(name)
}

/// `(id, display name)` pairs of the built-in clusters
pub fn list_available_clusters() -> Vec<(String, String)> {
    ClusterCatalog::builtin().list()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = ClusterCatalog::builtin();
        assert_eq!(catalog.get("PAL5").map(|c| c.name.as_str()).ok(), Some("Palomar 5"));
        assert_eq!(catalog.get("Ngc6569").map(|c| c.distance.value()).ok(), Some(10.53));
    }

    #[test]
    fn test_unknown_cluster_lists_available() {
        let err = get_cluster("omega_cen").unwrap_err();
        match err {
            CatalogError::UnknownCluster { name, available } => {
                assert_eq!(name, "omega_cen");
                assert_eq!(available, vec!["ngc6569", "pal5", "pal5_canonical"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_keeps_catalog_order() {
        let list = list_available_clusters();
        assert_eq!(list[0], ("ngc6569".to_string(), "NGC 6569".to_string()));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_merge_json_adds_and_replaces() {
        let mut catalog = ClusterCatalog::builtin();
        let json = r#"{
            "M5": {
                "name": "Messier 5",
                "ra": 229.638, "dec": 2.081, "distance": 7.48,
                "pm_ra_cosdec": 4.086, "pm_dec": -9.870,
                "radial_velocity": 52.1, "mass": 3.7e5
            },
            "pal5": {
                "name": "Pal 5 (override)",
                "ra": 229.0, "dec": -0.1, "distance": 20.0,
                "pm_ra_cosdec": -2.7, "pm_dec": -2.6,
                "radial_velocity": -58.0, "mass": 1.0e4,
                "scale_radius": 10.0
            }
        }"#;
        let count = catalog.merge_json_str(json).unwrap();
        assert_eq!(count, 2);
        assert_eq!(catalog.len(), 4);

        let m5 = catalog.get("m5").unwrap();
        assert_eq!(m5.scale_radius.value(), 4.0);
        assert!(m5.source.is_none());
        assert_eq!(catalog.get("pal5").unwrap().name, "Pal 5 (override)");
    }

    #[test]
    fn test_merge_counts_ids_case_insensitively() {
        let mut catalog = ClusterCatalog::builtin();
        let json = r#"{
            "PAL5": {"name": "Upper", "ra": 229.0, "dec": -0.1, "distance": 20.0,
                "pm_ra_cosdec": -2.7, "pm_dec": -2.6, "radial_velocity": -58.0, "mass": 1.0e4},
            "pal5": {"name": "Lower", "ra": 229.0, "dec": -0.1, "distance": 20.0,
                "pm_ra_cosdec": -2.7, "pm_dec": -2.6, "radial_velocity": -58.0, "mass": 1.0e4}
        }"#;
        assert_eq!(catalog.merge_json_str(json).unwrap(), 1);
        assert_eq!(catalog.len(), 3);
        // "PAL5" sorts before "pal5"
        assert_eq!(catalog.get("pal5").unwrap().name, "Lower");
    }

    #[test]
    fn test_merge_rejects_negative_mass() {
        let mut catalog = ClusterCatalog::empty();
        let json = r#"{"bad": {"name": "Bad", "ra": 0, "dec": 0, "distance": 1,
            "pm_ra_cosdec": 0, "pm_dec": 0, "radial_velocity": 0, "mass": -1}}"#;
        assert!(matches!(
            catalog.merge_json_str(json),
            Err(CatalogError::Invalid { .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let mut catalog = ClusterCatalog::empty();
        assert!(matches!(
            catalog.merge_json_str("[1, 2, 3]"),
            Err(CatalogError::Parse { .. })
        ));
    }
}
