//! Analytic potential components
//!
//! All components work in galactic units: positions in kpc, time in Myr,
//! masses in Msun, so energies come out in (kpc/Myr)² and gradients in
//! kpc/Myr².
//!
//! # References
//! - Miyamoto, M. & Nagai, R. (1975). "Three-dimensional models for the
//!   distribution of mass in galaxies." PASJ 27, 533-543.
//! - Navarro, J.F., Frenk, C.S., White, S.D.M. (1996). "The Structure of Cold
//!   Dark Matter Halos." ApJ 462, 563.
//! - Long, K. & Murali, C. (1992). "Analytical potentials for barred galaxies."
//!   ApJ 397, 44-48.

use crate::core_types::units::{Degrees, Kiloparsecs, Parsecs, SolarMasses};
use crate::core_types::{Vec3, G_GALACTIC};
use crate::potential::{Potential, PotentialError};

fn positive(parameter: &'static str, value: f64) -> Result<f64, PotentialError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PotentialError::InvalidParameter { parameter, value })
    }
}

/// Miyamoto-Nagai flattened disk
///
/// # Formula
/// ```text
/// Φ = −G M / √(R² + (a + √(z² + b²))²)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiyamotoNagai {
    gm: f64,
    a: f64,
    b: f64,
}

impl MiyamotoNagai {
    /// Create a disk of mass `m`, scale length `a` and scale height `b`
    pub fn new(m: SolarMasses, a: Kiloparsecs, b: Parsecs) -> Result<Self, PotentialError> {
        Ok(Self {
            gm: G_GALACTIC * positive("m", m.value())?,
            a: positive("a", a.value())?,
            b: positive("b", b.to_kiloparsecs().value())?,
        })
    }
}

impl Potential for MiyamotoNagai {
    fn energy(&self, x: &Vec3) -> f64 {
        let zeta = x.z.hypot(self.b);
        let r2 = x.x * x.x + x.y * x.y;
        -self.gm / (r2 + (self.a + zeta).powi(2)).sqrt()
    }

    fn gradient(&self, x: &Vec3) -> Vec3 {
        let zeta = x.z.hypot(self.b);
        let r2 = x.x * x.x + x.y * x.y;
        let az = self.a + zeta;
        let denom = (r2 + az * az).powf(1.5);
        let k = self.gm / denom;
        Vec3::new(k * x.x, k * x.y, k * x.z * az / zeta)
    }
}

/// Spherical NFW halo
///
/// # Formula
/// ```text
/// Φ = −G m ln(1 + r/r_s) / r
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nfw {
    gm: f64,
    r_s: f64,
}

impl Nfw {
    /// Create a halo with scale mass `m` and scale radius `r_s`
    pub fn new(m: SolarMasses, r_s: Kiloparsecs) -> Result<Self, PotentialError> {
        Ok(Self {
            gm: G_GALACTIC * positive("m", m.value())?,
            r_s: positive("r_s", r_s.value())?,
        })
    }
}

impl Potential for Nfw {
    fn energy(&self, x: &Vec3) -> f64 {
        let r = x.norm();
        if r < 1e-12 * self.r_s {
            return -self.gm / self.r_s;
        }
        -self.gm * (r / self.r_s).ln_1p() / r
    }

    fn gradient(&self, x: &Vec3) -> Vec3 {
        let r = x.norm();
        if r < 1e-12 * self.r_s {
            return Vec3::zeros();
        }
        let d_phi_dr = self.gm * ((r / self.r_s).ln_1p() / (r * r) - 1.0 / (r * (self.r_s + r)));
        x * (d_phi_dr / r)
    }
}

/// Long & Murali triaxial bar, rotated by `alpha` about the z-axis
///
/// # Formula
/// ```text
/// Φ = (G m / 2a) ln[(x − a + T₋) / (x + a + T₊)]
/// T± = √((a ± x)² + y² + (b + √(c² + z²))²)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongMuraliBar {
    gm: f64,
    a: f64,
    b: f64,
    c: f64,
    sin_alpha: f64,
    cos_alpha: f64,
}

impl LongMuraliBar {
    /// Create a bar of mass `m`, half-length `a`, and softening lengths `b`, `c`
    pub fn new(
        m: SolarMasses,
        a: Kiloparsecs,
        b: Kiloparsecs,
        c: Kiloparsecs,
        alpha: Degrees,
    ) -> Result<Self, PotentialError> {
        let (sin_alpha, cos_alpha) = alpha.to_radians().value().sin_cos();
        Ok(Self {
            gm: G_GALACTIC * positive("m", m.value())?,
            a: positive("a", a.value())?,
            b: positive("b", b.value())?,
            c: positive("c", c.value())?,
            sin_alpha,
            cos_alpha,
        })
    }

    /// Position expressed along the bar's axes
    fn to_bar_frame(&self, x: &Vec3) -> Vec3 {
        Vec3::new(
            x.x * self.cos_alpha + x.y * self.sin_alpha,
            -x.x * self.sin_alpha + x.y * self.cos_alpha,
            x.z,
        )
    }

    /// Vector expressed back in the host frame
    fn from_bar_frame(&self, g: &Vec3) -> Vec3 {
        Vec3::new(
            g.x * self.cos_alpha - g.y * self.sin_alpha,
            g.x * self.sin_alpha + g.y * self.cos_alpha,
            g.z,
        )
    }
}

impl Potential for LongMuraliBar {
    fn energy(&self, x: &Vec3) -> f64 {
        let p = self.to_bar_frame(x);
        let u = self.b + p.z.hypot(self.c);
        let t_minus = ((self.a - p.x).powi(2) + p.y * p.y + u * u).sqrt();
        let t_plus = ((self.a + p.x).powi(2) + p.y * p.y + u * u).sqrt();
        self.gm / (2.0 * self.a) * ((p.x - self.a + t_minus) / (p.x + self.a + t_plus)).ln()
    }

    fn gradient(&self, x: &Vec3) -> Vec3 {
        let p = self.to_bar_frame(x);
        let s = p.z.hypot(self.c);
        let u = self.b + s;
        let t_minus = ((self.a - p.x).powi(2) + p.y * p.y + u * u).sqrt();
        let t_plus = ((self.a + p.x).powi(2) + p.y * p.y + u * u).sqrt();
        let n_minus = p.x - self.a + t_minus;
        let n_plus = p.x + self.a + t_plus;
        let k = self.gm / (2.0 * self.a);

        let dz_u = u * p.z / s;
        let g = Vec3::new(
            k * ((1.0 + (p.x - self.a) / t_minus) / n_minus
                - (1.0 + (p.x + self.a) / t_plus) / n_plus),
            k * (p.y / t_minus / n_minus - p.y / t_plus / n_plus),
            k * (dz_u / t_minus / n_minus - dz_u / t_plus / n_plus),
        );
        self.from_bar_frame(&g)
    }
}
