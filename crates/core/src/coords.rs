//! ICRS to Galactocentric coordinate transformation
//!
//! Converts heliocentric observables (RA, Dec, distance, proper motions and
//! line-of-sight velocity) into a right-handed Galactocentric Cartesian frame
//! with the Sun on the negative x-axis.
//!
//! # Frame construction
//! ```text
//! x_gc = A · x_icrs − H · (d_gc, 0, 0)
//! v_gc = A · v_icrs + v_sun
//! A    = H · Rx(roll₀ − roll) · Ry(−δ_gc) · Rz(α_gc)
//! H    = Ry(−asin(z_sun / d_gc))
//! ```
//!
//! The rotations are passive (they rotate the axes, not the vector), which
//! matches the convention used by common astronomy packages.
//!
//! # References
//! - Gravity Collaboration (2018), A&A 615, L15 (Sun–Galactic-centre distance)
//! - Bennett & Bovy (2019), MNRAS 482, 1417 (solar height above the midplane)
//! - Drimmel & Poggio (2018), RNAAS 2, 210 (solar motion)

use crate::core_types::units::{
    Degrees, KilometersPerSecond, Kiloparsecs, MilliarcsecPerYear, Parsecs, Radians,
};
use crate::core_types::{PhaseSpacePosition, Vec3};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Heliocentric observables of a single object in the ICRS frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension
    pub ra: Degrees,
    /// Declination
    pub dec: Degrees,
    /// Heliocentric distance
    pub distance: Kiloparsecs,
    /// Proper motion in RA, including the cos(dec) factor
    pub pm_ra_cosdec: MilliarcsecPerYear,
    /// Proper motion in Dec
    pub pm_dec: MilliarcsecPerYear,
    /// Heliocentric line-of-sight velocity
    pub radial_velocity: KilometersPerSecond,
}

impl SkyPosition {
    /// Heliocentric Cartesian position in ICRS axes (kpc)
    pub fn icrs_position(&self) -> Vec3 {
        let (sin_ra, cos_ra) = self.ra.to_radians().value().sin_cos();
        let (sin_dec, cos_dec) = self.dec.to_radians().value().sin_cos();
        let d = self.distance.value();
        Vec3::new(d * cos_dec * cos_ra, d * cos_dec * sin_ra, d * sin_dec)
    }

    /// Heliocentric Cartesian velocity in ICRS axes (km/s)
    pub fn icrs_velocity(&self) -> Vec3 {
        let (sin_ra, cos_ra) = self.ra.to_radians().value().sin_cos();
        let (sin_dec, cos_dec) = self.dec.to_radians().value().sin_cos();

        let radial = Vec3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec);
        let east = Vec3::new(-sin_ra, cos_ra, 0.0);
        let north = Vec3::new(-sin_dec * cos_ra, -sin_dec * sin_ra, cos_dec);

        let v_ra = self.pm_ra_cosdec.tangential_velocity(self.distance).value();
        let v_dec = self.pm_dec.tangential_velocity(self.distance).value();

        radial * self.radial_velocity.value() + east * v_ra + north * v_dec
    }
}

/// Passive rotation about the x-axis
fn rotation_x(angle: Radians) -> Matrix3<f64> {
    let (s, c) = angle.value().sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Passive rotation about the y-axis
fn rotation_y(angle: Radians) -> Matrix3<f64> {
    let (s, c) = angle.value().sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Passive rotation about the z-axis
fn rotation_z(angle: Radians) -> Matrix3<f64> {
    let (s, c) = angle.value().sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Parameters defining the Galactocentric frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalactocentricFrame {
    /// ICRS right ascension of the Galactic centre
    pub galcen_ra: Degrees,
    /// ICRS declination of the Galactic centre
    pub galcen_dec: Degrees,
    /// Distance from the Sun to the Galactic centre
    pub galcen_distance: Kiloparsecs,
    /// Height of the Sun above the Galactic midplane
    pub z_sun: Parsecs,
    /// Velocity of the Sun in the Galactocentric frame (km/s)
    pub galcen_v_sun: Vec3,
    /// Additional roll of the frame about the Sun–centre axis
    pub roll: Degrees,
}

impl Default for GalactocentricFrame {
    fn default() -> Self {
        Self::v4_0()
    }
}

impl GalactocentricFrame {
    /// Roll that aligns the frame's x-z plane with the Galactic plane
    pub const ROLL0: Degrees = Degrees::new(58.5986320306);

    /// Current standard parameter set (the "v4.0" defaults)
    pub fn v4_0() -> Self {
        Self {
            galcen_ra: Degrees::new(266.4051),
            galcen_dec: Degrees::new(-28.936175),
            galcen_distance: Kiloparsecs::new(8.122),
            z_sun: Parsecs::new(20.8),
            galcen_v_sun: Vec3::new(12.9, 245.6, 7.78),
            roll: Degrees::new(0.0),
        }
    }

    /// Tilt matrix accounting for the Sun's height above the midplane
    fn tilt(&self) -> Matrix3<f64> {
        let z_d = self.z_sun.to_kiloparsecs().value() / self.galcen_distance.value();
        rotation_y(Radians::new(-z_d.asin()))
    }

    /// Full rotation from ICRS axes to Galactocentric axes
    pub fn rotation(&self) -> Matrix3<f64> {
        let align = rotation_x((Self::ROLL0 - self.roll).to_radians())
            * rotation_y((-self.galcen_dec).to_radians())
            * rotation_z(self.galcen_ra.to_radians());
        self.tilt() * align
    }

    /// Galactocentric position of the Sun (kpc)
    pub fn sun_position(&self) -> Vec3 {
        -(self.tilt() * Vec3::new(self.galcen_distance.value(), 0.0, 0.0))
    }

    /// Transform heliocentric observables into a Galactocentric phase-space position
    pub fn transform(&self, sky: &SkyPosition) -> PhaseSpacePosition {
        let rotation = self.rotation();
        let pos = rotation * sky.icrs_position() + self.sun_position();
        let vel = rotation * sky.icrs_velocity() + self.galcen_v_sun;
        PhaseSpacePosition::new(pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at_rest(ra: f64, dec: f64, distance: f64) -> SkyPosition {
        SkyPosition {
            ra: Degrees::new(ra),
            dec: Degrees::new(dec),
            distance: Kiloparsecs::new(distance),
            pm_ra_cosdec: MilliarcsecPerYear::new(0.0),
            pm_dec: MilliarcsecPerYear::new(0.0),
            radial_velocity: KilometersPerSecond::new(0.0),
        }
    }

    #[test]
    fn test_galactic_centre_maps_to_origin() {
        let frame = GalactocentricFrame::default();
        let gc = at_rest(266.4051, -28.936175, 8.122);
        let w = frame.transform(&gc);
        assert_relative_eq!(w.pos.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sun_position_and_velocity() {
        let frame = GalactocentricFrame::default();
        let sun = frame.transform(&at_rest(0.0, 0.0, 0.0));

        let theta = (0.0208_f64 / 8.122).asin();
        assert_relative_eq!(sun.pos.x, -8.122 * theta.cos(), epsilon = 1e-12);
        assert_relative_eq!(sun.pos.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sun.pos.z, 0.0208, epsilon = 1e-9);
        assert_relative_eq!(sun.vel, frame.galcen_v_sun, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = GalactocentricFrame::default().rotation();
        let identity = r * r.transpose();
        assert_relative_eq!(identity, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_north_galactic_pole_points_up() {
        // NGP in ICRS: RA 192.85948, Dec 27.12825
        let frame = GalactocentricFrame::default();
        let w = frame.transform(&at_rest(192.85948, 27.12825, 1.0));
        let offset = w.pos - frame.sun_position();
        assert!(offset.z > 0.99, "NGP direction should be nearly +z: {offset:?}");
    }

    #[test]
    fn test_radial_velocity_only_changes_speed_along_line_of_sight() {
        let mut sky = at_rest(229.019, -0.121, 21.94);
        sky.radial_velocity = KilometersPerSecond::new(-58.6);
        let v = sky.icrs_velocity();
        assert_relative_eq!(v.norm(), 58.6, epsilon = 1e-9);
        assert!(v.dot(&sky.icrs_position()) < 0.0);
    }

    #[test]
    fn test_proper_motion_is_tangential() {
        let mut sky = at_rest(273.412, -31.827, 10.53);
        sky.pm_ra_cosdec = MilliarcsecPerYear::new(-4.125);
        sky.pm_dec = MilliarcsecPerYear::new(-7.354);
        let v = sky.icrs_velocity();
        assert_relative_eq!(v.dot(&sky.icrs_position()), 0.0, epsilon = 1e-9);
        let expected = 4.740470463 * 10.53 * (4.125_f64.hypot(7.354));
        assert_relative_eq!(v.norm(), expected, max_relative = 1e-12);
    }
}
