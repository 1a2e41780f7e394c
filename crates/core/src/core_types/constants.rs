//! Physical constants in galactic units (kpc, Myr, M☉)

/// Gravitational constant in kpc³ M☉⁻¹ Myr⁻²
pub const G_GALACTIC: f64 = 4.498502151469554e-12;

/// One km/s expressed in physical kpc/Myr.
///
/// Orbit integration uses this factor. It is not the `KMS_TO_KPC_PER_MYR`
/// display convention, which is a thousand times larger.
pub const KMS_IN_KPC_PER_MYR: f64 = 1.0227121650537077e-3;

/// One km/s/kpc expressed in rad/Myr, for pattern speeds
pub const KMS_PER_KPC_IN_PER_MYR: f64 = KMS_IN_KPC_PER_MYR;

/// Gravitational constant in kpc (km/s)² M☉⁻¹
pub const G_KPC_KMS2: f64 = 4.300917270e-6;
