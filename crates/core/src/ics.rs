//! Plummer-sphere initial conditions for a cluster
//!
//! Positions and velocities are drawn following Aarseth, Hénon & Wielen
//! (1974), the same scheme NEMO's `mkplummer` uses, but in physical units:
//! kpc, km/s and M☉.
//!
//! References:
//! - Aarseth, S. J., Hénon, M., Wielen, R. (1974). A&A 37, 183
//! - Plummer, H. C. (1911). MNRAS 71, 460

use crate::cluster::Cluster;
use crate::core_types::units::{Kiloparsecs, SolarMasses};
use crate::core_types::{PhaseSpacePosition, Vec3, G_KPC_KMS2};
use crate::nemo::NemoSnapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use thiserror::Error;
use tracing::debug;

/// Largest enclosed-mass fraction sampled; the Plummer profile has
/// infinite extent
const MAX_MASS_FRACTION: f64 = 0.999;

/// Ratio of half-mass radius to scale radius, `1/sqrt(2^(2/3) - 1)`
pub const HALF_MASS_RADIUS_RATIO: f64 = 1.304_766_066_142_725_5;

/// Errors for initial-condition generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IcsError {
    /// Parameter outside its physical range
    #[error("invalid Plummer {parameter}: {value}")]
    InvalidParameter { parameter: &'static str, value: f64 },
    /// Asked for zero particles
    #[error("particle count must be at least 1")]
    NoParticles,
}

/// Plummer sphere of total mass `mass` and scale radius `scale_radius`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlummerSphere {
    mass: SolarMasses,
    scale_radius: Kiloparsecs,
}

impl PlummerSphere {
    /// Sphere with positive finite mass and scale radius
    pub fn new(mass: SolarMasses, scale_radius: Kiloparsecs) -> Result<Self, IcsError> {
        if !(mass.value() > 0.0 && mass.is_finite()) {
            return Err(IcsError::InvalidParameter {
                parameter: "mass",
                value: mass.value(),
            });
        }
        if !(scale_radius.value() > 0.0 && scale_radius.is_finite()) {
            return Err(IcsError::InvalidParameter {
                parameter: "scale radius",
                value: scale_radius.value(),
            });
        }
        Ok(Self { mass, scale_radius })
    }

    /// Sphere matching a cluster's mass and scale radius
    pub fn from_cluster(cluster: &Cluster) -> Result<Self, IcsError> {
        Self::new(cluster.mass(), cluster.scale_radius().to_kiloparsecs())
    }

    /// Total mass
    pub fn mass(&self) -> SolarMasses {
        self.mass
    }

    /// Plummer scale radius `a`
    pub fn scale_radius(&self) -> Kiloparsecs {
        self.scale_radius
    }

    /// Radius enclosing half the mass, `a × 1.3048`
    pub fn half_mass_radius(&self) -> Kiloparsecs {
        Kiloparsecs::new(self.scale_radius.value() * HALF_MASS_RADIUS_RATIO)
    }

    /// Escape speed at radius `r` in km/s
    pub fn escape_speed(&self, r: f64) -> f64 {
        let a = self.scale_radius.value();
        (2.0 * G_KPC_KMS2 * self.mass.value() / a).sqrt() * (1.0 + r * r / (a * a)).powf(-0.25)
    }

    /// Draw `n` equal-mass particles, recentred so the centre of mass is at
    /// rest at the origin. The same seed always gives the same sample.
    pub fn sample(&self, n: usize, seed: u64) -> Result<NemoSnapshot, IcsError> {
        if n == 0 {
            return Err(IcsError::NoParticles);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let a = self.scale_radius.value();

        let mut positions = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        for _ in 0..n {
            let fraction = rng.random_range(f64::EPSILON..MAX_MASS_FRACTION);
            let r = a / (fraction.powf(-2.0 / 3.0) - 1.0).sqrt();
            positions.push(random_direction(&mut rng) * r);

            let q = sample_speed_fraction(&mut rng);
            velocities.push(random_direction(&mut rng) * (q * self.escape_speed(r)));
        }

        let particle_mass = self.mass.value() / n as f64;
        let mut snapshot = NemoSnapshot {
            positions,
            velocities,
            masses: vec![particle_mass; n],
            time: Some(0.0),
            particle_count: n,
        };
        let com = snapshot.center_of_mass();
        snapshot = snapshot.translated(&PhaseSpacePosition::new(-com.pos, -com.vel));

        debug!(
            "Sampled {} Plummer particles (M = {}, a = {}, seed {})",
            n, self.mass, self.scale_radius, seed
        );
        Ok(snapshot)
    }
}

/// Unit vector uniformly distributed on the sphere
fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let cos_theta: f64 = rng.random_range(-1.0..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = rng.random_range(0.0..2.0 * PI);
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Speed as a fraction of the local escape speed, from g(q) = q²(1 - q²)^3.5
/// by rejection under the envelope 0.1
fn sample_speed_fraction<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let q: f64 = rng.random();
        let y: f64 = rng.random_range(0.0..0.1);
        if y < q * q * (1.0 - q * q).powf(3.5) {
            return q;
        }
    }
}
