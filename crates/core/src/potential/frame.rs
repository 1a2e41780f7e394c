//! Reference frames and the Hamiltonian consumed by the orbit integrator

use crate::core_types::{Vec3, KMS_PER_KPC_IN_PER_MYR};
use crate::potential::Potential;

/// Frame rotating at a constant angular velocity about the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingFrame {
    /// Angular velocity vector, rad/Myr
    pub omega: Vec3,
}

impl RotatingFrame {
    /// Frame rotating about +z at the given pattern speed in km/s/kpc
    pub fn from_pattern_speed(km_s_per_kpc: f64) -> Self {
        Self {
            omega: Vec3::new(0.0, 0.0, km_s_per_kpc * KMS_PER_KPC_IN_PER_MYR),
        }
    }

    /// Coriolis plus centrifugal acceleration felt in the frame
    pub fn fictitious_acceleration(&self, x: &Vec3, v: &Vec3) -> Vec3 {
        -2.0 * self.omega.cross(v) - self.omega.cross(&self.omega.cross(x))
    }
}

/// Potential paired with the frame in which orbits are integrated
#[derive(Debug)]
pub struct Hamiltonian {
    potential: Box<dyn Potential>,
    frame: Option<RotatingFrame>,
}

impl Hamiltonian {
    /// Potential in a static (inertial) frame
    pub fn new<P: Potential + 'static>(potential: P) -> Self {
        Self {
            potential: Box::new(potential),
            frame: None,
        }
    }

    /// Potential fixed in a rotating frame
    pub fn rotating<P: Potential + 'static>(potential: P, frame: RotatingFrame) -> Self {
        Self {
            potential: Box::new(potential),
            frame: Some(frame),
        }
    }

    /// The underlying potential
    pub fn potential(&self) -> &dyn Potential {
        self.potential.as_ref()
    }

    /// Rotating frame, if any
    pub fn frame(&self) -> Option<&RotatingFrame> {
        self.frame.as_ref()
    }

    /// Whether velocity-dependent frame terms apply
    pub fn is_rotating(&self) -> bool {
        self.frame.is_some()
    }

    /// Acceleration at position `x` (kpc) with velocity `v` (kpc/Myr)
    pub fn acceleration(&self, x: &Vec3, v: &Vec3) -> Vec3 {
        let gravity = self.potential.acceleration(x);
        match &self.frame {
            Some(frame) => gravity + frame.fictitious_acceleration(x, v),
            None => gravity,
        }
    }

    /// Conserved energy per unit mass: the total energy in a static frame,
    /// the Jacobi integral in a rotating one
    pub fn energy(&self, x: &Vec3, v: &Vec3) -> f64 {
        let kinetic = 0.5 * v.norm_squared();
        let potential = self.potential.energy(x);
        match &self.frame {
            Some(frame) => kinetic + potential - 0.5 * frame.omega.cross(x).norm_squared(),
            None => kinetic + potential,
        }
    }
}
