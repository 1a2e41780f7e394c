//! Globular Cluster Stream Toolkit Core Library
//!
//! Tools for studying the tidal streams of Milky Way globular clusters:
//! cluster catalogs, the ICRS to Galactocentric transform, analytic galactic
//! potentials with orbit integration, a bridge to the NEMO N-body toolbox,
//! and synchronisation of stream-evolution runs for animation.
//!
//! ## Units
//!
//! Quantities carry their unit in the type (`Kiloparsecs`, `KilometersPerSecond`,
//! `SolarMasses`, ...). Conversions to the NEMO convention are explicit:
//! velocities multiply by 1.022684 and masses divide by 10¹⁰.
//!
//! ## Quick start
//!
//! ```no_run
//! use gc_stream_core::{get_cluster, get_potential, integrate_orbit, IntegrationOptions};
//!
//! let cluster = get_cluster("ngc6569")?;
//! println!("{}", cluster.record().to_nemo_units());
//!
//! let potential = get_potential("milky_way_composite")?;
//! let orbit = integrate_orbit(&potential, &cluster.galactocentric(), &IntegrationOptions::default())?;
//! println!("pericenter: {:?}", orbit.pericenter());
//! # Ok::<(), gc_stream_core::Error>(())
//! ```

#![warn(missing_docs)]

// Core types and utilities
pub mod core_types;

// Clusters and coordinates
pub mod cluster;
pub mod coords;

// Dynamics
pub mod ics;
pub mod orbit;
pub mod potential;

// External tools and stream runs
pub mod nemo;
pub mod timeline;

pub mod error;

// Re-export core types
pub use core_types::{PhaseSpacePosition, Vec3};
pub use core_types::{
    Degrees, KilometersPerSecond, Kiloparsecs, KpcPerMyr, Megayears, MilliarcsecPerYear,
    NemoMass, Parsecs, Radians, SolarMasses, UnitError,
};

pub use cluster::{
    get_cluster, list_available_clusters, CatalogError, Cluster, ClusterCatalog, ClusterConfig,
    ClusterRecord, NemoRecord,
};
pub use coords::{GalactocentricFrame, SkyPosition};

pub use ics::{IcsError, PlummerSphere};
pub use orbit::{integrate_orbit, IntegrationOptions, Integrator, Orbit, OrbitError};
pub use potential::{
    get_potential, list_available_potentials, CompositePotential, Hamiltonian, Potential,
    PotentialError, PotentialPreset, RotatingFrame,
};

pub use nemo::{nemo_binary_path, read_nemo, NemoCommand, NemoError, NemoInstall, NemoSnapshot};
pub use timeline::{AnimationConfig, Frame, MasterTimeline, StreamAnimator, StreamRun, TimelineError};

pub use error::{Error, Result};
