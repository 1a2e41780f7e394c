//! Semantic unit types for type-safe astronomical quantity handling
//!
//! This module provides newtype wrappers for physical quantities so that a
//! heliocentric velocity in km/s can never be silently added to a velocity in
//! the NEMO kpc/Myr convention, or a mass in solar masses passed where NEMO
//! mass units (10¹⁰ M☉) are expected.
//!
//! # Design Philosophy
//! - Every quantity wraps an `f64`; astrometric inputs carry more digits than `f32` holds
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Provides explicit conversion methods between related types
//! - Serde support for serialization (transparent, so catalogs stay plain numbers)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Non-negative quantities (distances, masses) expose a fallible `try_new`
//!
//! # Usage
//! ```
//! use gc_stream_core::core_types::units::{KilometersPerSecond, SolarMasses};
//!
//! let v = KilometersPerSecond::new(100.0);
//! assert!((*v.to_kpc_per_myr() - 102.2684).abs() < 1e-9);
//!
//! let m = SolarMasses::new(5.0e5);
//! assert!((*m.to_nemo_mass() - 5.0e-5).abs() < 1e-18);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};
use thiserror::Error;

/// Multiplicative factor from km/s to the kpc/Myr velocity convention used
/// by the NEMO tutorial output.
pub const KMS_TO_KPC_PER_MYR: f64 = 1.022684;

/// Solar masses per NEMO mass unit.
pub const NEMO_MASS_UNIT: f64 = 1.0e10;

/// km/s of tangential velocity per (mas/yr × kpc).
pub const PROPER_MOTION_FACTOR: f64 = 4.740470463;

/// Error raised when a quantity is constructed outside its physical domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Value must be zero or positive
    #[error("{quantity} must be non-negative, got {value}")]
    Negative {
        /// Name of the quantity being constructed
        quantity: &'static str,
        /// The rejected value
        value: f64,
    },
    /// Value must be finite
    #[error("{quantity} must be finite, got {value}")]
    NonFinite {
        /// Name of the quantity being constructed
        quantity: &'static str,
        /// The rejected value
        value: f64,
    },
}

fn check_non_negative(quantity: &'static str, value: f64) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite { quantity, value });
    }
    if value < 0.0 {
        return Err(UnitError::Negative { quantity, value });
    }
    Ok(value)
}

// ============================================================================
// SHARED TRAIT IMPLEMENTATIONS
// ============================================================================

/// Implements ordering, deref, raw conversions and linear arithmetic for a
/// `struct Name(f64)` quantity.
macro_rules! quantity {
    ($name:ident) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(q: $name) -> f64 {
                q.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }
    };
}

// ============================================================================
// ANGLE TYPES
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(f64);

quantity!(Degrees);

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl From<Degrees> for Radians {
    fn from(d: Degrees) -> Radians {
        d.to_radians()
    }
}

impl Neg for Degrees {
    type Output = Degrees;
    fn neg(self) -> Degrees {
        Degrees(-self.0)
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} deg", self.0)
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Radians(f64);

quantity!(Radians);

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Convert to degrees
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    /// Sine of the angle
    #[inline]
    #[must_use]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    /// Cosine of the angle
    #[inline]
    #[must_use]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl From<Radians> for Degrees {
    fn from(r: Radians) -> Degrees {
        r.to_degrees()
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5} rad", self.0)
    }
}

// ============================================================================
// DISTANCE TYPES
// ============================================================================

/// Distance in parsecs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Parsecs(f64);

quantity!(Parsecs);

impl Parsecs {
    /// Create a new distance in parsecs
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Parsecs(value)
    }

    /// Create a distance, rejecting negative or non-finite values
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_non_negative("distance", value).map(Parsecs)
    }

    /// Convert to kiloparsecs
    #[inline]
    #[must_use]
    pub fn to_kiloparsecs(self) -> Kiloparsecs {
        Kiloparsecs(self.0 / 1000.0)
    }
}

impl From<Parsecs> for Kiloparsecs {
    fn from(p: Parsecs) -> Kiloparsecs {
        p.to_kiloparsecs()
    }
}

impl fmt::Display for Parsecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} pc", self.0)
    }
}

/// Distance in kiloparsecs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kiloparsecs(f64);

quantity!(Kiloparsecs);

impl Kiloparsecs {
    /// Create a new distance in kiloparsecs
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Kiloparsecs(value)
    }

    /// Create a distance, rejecting negative or non-finite values
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_non_negative("distance", value).map(Kiloparsecs)
    }

    /// Convert to parsecs
    #[inline]
    #[must_use]
    pub fn to_parsecs(self) -> Parsecs {
        Parsecs(self.0 * 1000.0)
    }
}

impl From<Kiloparsecs> for Parsecs {
    fn from(k: Kiloparsecs) -> Parsecs {
        k.to_parsecs()
    }
}

impl fmt::Display for Kiloparsecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kpc", self.0)
    }
}

// ============================================================================
// VELOCITY TYPES
// ============================================================================

/// Velocity in kilometers per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KilometersPerSecond(f64);

quantity!(KilometersPerSecond);

impl KilometersPerSecond {
    /// Create a new velocity in km/s (any sign)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KilometersPerSecond(value)
    }

    /// Convert to the kpc/Myr convention: `value × 1.022684`.
    /// NaN and infinities carry through with their sign.
    #[inline]
    #[must_use]
    pub fn to_kpc_per_myr(self) -> KpcPerMyr {
        KpcPerMyr(self.0 * KMS_TO_KPC_PER_MYR)
    }
}

impl From<KilometersPerSecond> for KpcPerMyr {
    fn from(v: KilometersPerSecond) -> KpcPerMyr {
        v.to_kpc_per_myr()
    }
}

impl Neg for KilometersPerSecond {
    type Output = KilometersPerSecond;
    fn neg(self) -> KilometersPerSecond {
        KilometersPerSecond(-self.0)
    }
}

impl fmt::Display for KilometersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km/s", self.0)
    }
}

/// Velocity in the NEMO kpc/Myr convention
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KpcPerMyr(f64);

quantity!(KpcPerMyr);

impl KpcPerMyr {
    /// Create a new velocity in kpc/Myr (any sign)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KpcPerMyr(value)
    }

    /// Convert back to km/s
    #[inline]
    #[must_use]
    pub fn to_km_per_s(self) -> KilometersPerSecond {
        KilometersPerSecond(self.0 / KMS_TO_KPC_PER_MYR)
    }
}

impl From<KpcPerMyr> for KilometersPerSecond {
    fn from(v: KpcPerMyr) -> KilometersPerSecond {
        v.to_km_per_s()
    }
}

impl fmt::Display for KpcPerMyr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} kpc/Myr", self.0)
    }
}

/// Proper motion in milliarcseconds per year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MilliarcsecPerYear(f64);

quantity!(MilliarcsecPerYear);

impl MilliarcsecPerYear {
    /// Create a new proper motion (any sign)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MilliarcsecPerYear(value)
    }

    /// Tangential velocity of this proper motion at the given distance
    #[inline]
    #[must_use]
    pub fn tangential_velocity(self, distance: Kiloparsecs) -> KilometersPerSecond {
        KilometersPerSecond(PROPER_MOTION_FACTOR * self.0 * distance.0)
    }
}

impl fmt::Display for MilliarcsecPerYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} mas/yr", self.0)
    }
}

// ============================================================================
// MASS TYPES
// ============================================================================

/// Mass in solar masses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SolarMasses(f64);

quantity!(SolarMasses);

impl SolarMasses {
    /// Create a new mass in solar masses
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        SolarMasses(value)
    }

    /// Create a mass, rejecting negative or non-finite values
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_non_negative("mass", value).map(SolarMasses)
    }

    /// Convert to NEMO mass units: `value / 1e10`.
    /// NaN and infinities carry through unchanged.
    #[inline]
    #[must_use]
    pub fn to_nemo_mass(self) -> NemoMass {
        NemoMass(self.0 / NEMO_MASS_UNIT)
    }
}

impl From<SolarMasses> for NemoMass {
    fn from(m: SolarMasses) -> NemoMass {
        m.to_nemo_mass()
    }
}

impl fmt::Display for SolarMasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1e} Msun", self.0)
    }
}

/// Mass in NEMO units of 10¹⁰ solar masses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct NemoMass(f64);

quantity!(NemoMass);

impl NemoMass {
    /// Create a new mass in NEMO units
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        NemoMass(value)
    }

    /// Convert to solar masses
    #[inline]
    #[must_use]
    pub fn to_solar_masses(self) -> SolarMasses {
        SolarMasses(self.0 * NEMO_MASS_UNIT)
    }
}

impl From<NemoMass> for SolarMasses {
    fn from(m: NemoMass) -> SolarMasses {
        m.to_solar_masses()
    }
}

impl fmt::Display for NemoMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3e} x 1e10 Msun", self.0)
    }
}

// ============================================================================
// TIME TYPES
// ============================================================================

/// Time in megayears
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megayears(f64);

quantity!(Megayears);

impl Megayears {
    /// Create a new time in megayears (may be negative for backward integration)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Megayears(value)
    }
}

impl fmt::Display for Megayears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} Myr", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_velocity_to_kpc_per_myr() {
        let v = KilometersPerSecond::new(100.0);
        assert_relative_eq!(*v.to_kpc_per_myr(), 102.2684, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_velocity_converts_linearly() {
        let v = KilometersPerSecond::new(-58.6);
        assert_relative_eq!(*v.to_kpc_per_myr(), -58.6 * 1.022684, epsilon = 1e-12);
    }

    #[test]
    fn test_kpc_per_myr_round_trip() {
        let v = KpcPerMyr::new(1.022684);
        assert_relative_eq!(*v.to_km_per_s(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_to_nemo_units() {
        let m = SolarMasses::new(5.0e5);
        assert_relative_eq!(*m.to_nemo_mass(), 5.0e-5, max_relative = 1e-12);
        assert_relative_eq!(*NemoMass::new(2.0).to_solar_masses(), 2.0e10);
    }

    #[test]
    fn test_non_finite_values_carry_through_conversion() {
        assert!(KilometersPerSecond::new(f64::NAN).to_kpc_per_myr().is_nan());
        assert_eq!(*KilometersPerSecond::new(f64::INFINITY).to_kpc_per_myr(), f64::INFINITY);
        assert_eq!(
            *KilometersPerSecond::new(f64::NEG_INFINITY).to_kpc_per_myr(),
            f64::NEG_INFINITY
        );

        assert!(SolarMasses::new(f64::NAN).to_nemo_mass().is_nan());
        assert_eq!(*SolarMasses::new(f64::INFINITY).to_nemo_mass(), f64::INFINITY);
        assert_eq!(*SolarMasses::new(f64::NEG_INFINITY).to_nemo_mass(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parsecs_to_kiloparsecs() {
        let pc = Parsecs::new(280.0);
        assert_relative_eq!(*pc.to_kiloparsecs(), 0.28);
    }

    #[test]
    fn test_degrees_to_radians() {
        let d = Degrees::new(180.0);
        assert_relative_eq!(*d.to_radians(), std::f64::consts::PI);
    }

    #[test]
    fn test_proper_motion_tangential_velocity() {
        // 1 mas/yr at 1 kpc is 4.74 km/s
        let pm = MilliarcsecPerYear::new(1.0);
        let v = pm.tangential_velocity(Kiloparsecs::new(1.0));
        assert_relative_eq!(*v, 4.740470463);
    }

    #[test]
    fn test_try_new_rejects_negative_and_nan() {
        assert!(matches!(
            Kiloparsecs::try_new(-1.0),
            Err(UnitError::Negative { .. })
        ));
        assert!(matches!(
            SolarMasses::try_new(f64::NAN),
            Err(UnitError::NonFinite { .. })
        ));
        assert!(SolarMasses::try_new(0.0).is_ok());
    }

    #[test]
    fn test_ordering_handles_nan() {
        let a = Kiloparsecs::new(1.0);
        let nan = Kiloparsecs::new(f64::NAN);
        assert!(a.max(nan).is_nan());
        assert_eq!(a.min(Kiloparsecs::new(2.0)), a);
    }

    #[test]
    fn test_display_suffixes() {
        assert_eq!(KilometersPerSecond::new(-49.82).to_string(), "-49.82 km/s");
        assert_eq!(Kiloparsecs::new(10.53).to_string(), "10.53 kpc");
        assert_eq!(SolarMasses::new(2.3e5).to_string(), "2.3e5 Msun");
    }
}
