//! Orbit integration in a galactic potential
//!
//! Two fixed-step schemes are provided:
//! - **Leapfrog** (kick-drift-kick): symplectic, second order, the default for
//!   static potentials
//! - **Runge-Kutta 4**: fourth order, handles the velocity-dependent Coriolis
//!   term of rotating frames
//!
//! Phase-space positions enter and leave in kpc and km/s; internally the
//! integrator works in kpc and kpc/Myr with time in Myr.

use crate::core_types::units::{Kiloparsecs, Megayears};
use crate::core_types::{PhaseSpacePosition, Vec3, KMS_IN_KPC_PER_MYR};
use crate::potential::Hamiltonian;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by orbit integration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    /// Timestep is zero or not finite
    #[error("timestep must be finite and non-zero, got {0}")]
    InvalidTimestep(f64),
    /// Nothing to integrate
    #[error("number of steps must be at least 1")]
    NoSteps,
    /// Initial conditions contain NaN or infinity
    #[error("initial conditions are not finite")]
    NonFiniteInitialConditions,
    /// Sample buffers for this many steps cannot be allocated
    #[error("number of steps {0} is too large")]
    TooManySteps(usize),
}

/// Fixed-step integration scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    /// Kick-drift-kick leapfrog
    #[default]
    Leapfrog,
    /// Classic fourth-order Runge-Kutta
    RungeKutta4,
}

/// Timestep, step count and scheme for an integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationOptions {
    /// Timestep; negative integrates backwards in time
    pub dt: Megayears,
    /// Number of steps
    pub n_steps: usize,
    /// Integration scheme
    pub integrator: Integrator,
    /// Time of the initial conditions
    pub t0: Megayears,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            dt: Megayears::new(0.5),
            n_steps: 2000,
            integrator: Integrator::Leapfrog,
            t0: Megayears::new(0.0),
        }
    }
}

/// Sampled orbit: `n_steps + 1` times with positions (kpc) and velocities (km/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Sample times
    pub times: Vec<Megayears>,
    /// Positions, kpc
    pub positions: Vec<Vec3>,
    /// Velocities, km/s
    pub velocities: Vec<Vec3>,
}

impl Orbit {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the orbit has no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Phase-space position at sample `i`
    pub fn at(&self, i: usize) -> Option<PhaseSpacePosition> {
        Some(PhaseSpacePosition::new(
            *self.positions.get(i)?,
            *self.velocities.get(i)?,
        ))
    }

    /// Final phase-space position
    pub fn last(&self) -> Option<PhaseSpacePosition> {
        self.len().checked_sub(1).and_then(|i| self.at(i))
    }

    /// Conserved energy (kpc/Myr)² at every sample
    pub fn energy(&self, hamiltonian: &Hamiltonian) -> Vec<f64> {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(x, v)| hamiltonian.energy(x, &(v * KMS_IN_KPC_PER_MYR)))
            .collect()
    }

    /// Smallest Galactocentric radius reached
    pub fn pericenter(&self) -> Option<Kiloparsecs> {
        self.positions
            .iter()
            .map(|x| Kiloparsecs::new(x.norm()))
            .min()
    }

    /// Largest Galactocentric radius reached
    pub fn apocenter(&self) -> Option<Kiloparsecs> {
        self.positions
            .iter()
            .map(|x| Kiloparsecs::new(x.norm()))
            .max()
    }

    /// Largest distance from the midplane
    pub fn zmax(&self) -> Option<Kiloparsecs> {
        self.positions
            .iter()
            .map(|x| Kiloparsecs::new(x.z.abs()))
            .max()
    }
}

fn leapfrog_step(h: &Hamiltonian, x: &mut Vec3, v: &mut Vec3, dt: f64) {
    let zero = Vec3::zeros();
    let half_kick = h.acceleration(x, &zero) * (0.5 * dt);
    *v += half_kick;
    *x += *v * dt;
    *v += h.acceleration(x, &zero) * (0.5 * dt);
}

fn rk4_step(h: &Hamiltonian, x: &mut Vec3, v: &mut Vec3, dt: f64) {
    let k1x = *v;
    let k1v = h.acceleration(x, v);

    let x2 = *x + k1x * (0.5 * dt);
    let v2 = *v + k1v * (0.5 * dt);
    let k2x = v2;
    let k2v = h.acceleration(&x2, &v2);

    let x3 = *x + k2x * (0.5 * dt);
    let v3 = *v + k2v * (0.5 * dt);
    let k3x = v3;
    let k3v = h.acceleration(&x3, &v3);

    let x4 = *x + k3x * dt;
    let v4 = *v + k3v * dt;
    let k4x = v4;
    let k4v = h.acceleration(&x4, &v4);

    *x += (k1x + k2x * 2.0 + k3x * 2.0 + k4x) * (dt / 6.0);
    *v += (k1v + k2v * 2.0 + k3v * 2.0 + k4v) * (dt / 6.0);
}

/// Integrate an orbit from `w0` (kpc, km/s) in the given Hamiltonian
pub fn integrate_orbit(
    hamiltonian: &Hamiltonian,
    w0: &PhaseSpacePosition,
    options: &IntegrationOptions,
) -> Result<Orbit, OrbitError> {
    let dt = options.dt.value();
    if dt == 0.0 || !dt.is_finite() {
        return Err(OrbitError::InvalidTimestep(dt));
    }
    if options.n_steps == 0 {
        return Err(OrbitError::NoSteps);
    }
    if !(w0.pos.iter().chain(w0.vel.iter()).all(|c| c.is_finite())) {
        return Err(OrbitError::NonFiniteInitialConditions);
    }

    let integrator = match options.integrator {
        Integrator::Leapfrog if hamiltonian.is_rotating() => {
            warn!("Leapfrog cannot handle velocity-dependent frame forces, using RK4");
            Integrator::RungeKutta4
        }
        other => other,
    };
    debug!(
        "Integrating orbit: {} steps of {} Myr with {:?}",
        options.n_steps, dt, integrator
    );

    let too_many = || OrbitError::TooManySteps(options.n_steps);
    let capacity = options.n_steps.checked_add(1).ok_or_else(too_many)?;
    let mut times = Vec::new();
    let mut positions = Vec::new();
    let mut velocities = Vec::new();
    times
        .try_reserve_exact(capacity)
        .and_then(|()| positions.try_reserve_exact(capacity))
        .and_then(|()| velocities.try_reserve_exact(capacity))
        .map_err(|_| too_many())?;

    let mut x = w0.pos;
    let mut v = w0.vel * KMS_IN_KPC_PER_MYR;
    let t0 = options.t0.value();

    times.push(options.t0);
    positions.push(x);
    velocities.push(w0.vel);

    for step in 1..=options.n_steps {
        match integrator {
            Integrator::Leapfrog => leapfrog_step(hamiltonian, &mut x, &mut v, dt),
            Integrator::RungeKutta4 => rk4_step(hamiltonian, &mut x, &mut v, dt),
        }
        times.push(Megayears::new(t0 + step as f64 * dt));
        positions.push(x);
        velocities.push(v / KMS_IN_KPC_PER_MYR);
    }

    Ok(Orbit {
        times,
        positions,
        velocities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::SolarMasses;
    use crate::potential::{get_potential, Nfw, Potential};
    use approx::assert_relative_eq;

    fn halo() -> Nfw {
        Nfw::new(SolarMasses::new(6e11), Kiloparsecs::new(20.0)).unwrap()
    }

    fn circular_start(potential: &dyn Potential, r: f64) -> PhaseSpacePosition {
        let vc = potential.circular_velocity(Kiloparsecs::new(r));
        PhaseSpacePosition::new(Vec3::new(r, 0.0, 0.0), Vec3::new(0.0, vc.value(), 0.0))
    }

    #[test]
    fn test_circular_orbit_keeps_radius() {
        let halo = halo();
        let w0 = circular_start(&halo, 10.0);
        let h = Hamiltonian::new(halo);
        let options = IntegrationOptions {
            dt: Megayears::new(0.5),
            n_steps: 1000,
            ..IntegrationOptions::default()
        };
        let orbit = integrate_orbit(&h, &w0, &options).unwrap();
        assert_eq!(orbit.len(), 1001);
        assert_relative_eq!(orbit.pericenter().unwrap().value(), 10.0, max_relative = 1e-3);
        assert_relative_eq!(orbit.apocenter().unwrap().value(), 10.0, max_relative = 1e-3);
        assert_relative_eq!(orbit.times[1000].value(), 500.0);
    }

    #[test]
    fn test_leapfrog_conserves_energy() {
        let h = get_potential("gala_example").unwrap();
        let w0 = PhaseSpacePosition::new(Vec3::new(10.0, 0.0, 2.0), Vec3::new(0.0, 150.0, 50.0));
        let options = IntegrationOptions {
            dt: Megayears::new(0.2),
            n_steps: 5000,
            ..IntegrationOptions::default()
        };
        let orbit = integrate_orbit(&h, &w0, &options).unwrap();
        let energy = orbit.energy(&h);
        let e0 = energy[0];
        let drift = energy.iter().map(|e| ((e - e0) / e0).abs()).fold(0.0, f64::max);
        assert!(drift < 1e-3, "relative energy drift {drift}");
    }

    #[test]
    fn test_rk4_conserves_jacobi_energy_in_rotating_frame() {
        let h = get_potential("milky_way_barred").unwrap();
        let w0 = PhaseSpacePosition::new(Vec3::new(8.0, 0.0, 0.5), Vec3::new(0.0, 200.0, 10.0));
        let options = IntegrationOptions {
            dt: Megayears::new(0.1),
            n_steps: 5000,
            integrator: Integrator::RungeKutta4,
            t0: Megayears::new(0.0),
        };
        let orbit = integrate_orbit(&h, &w0, &options).unwrap();
        let energy = orbit.energy(&h);
        let e0 = energy[0];
        let drift = energy.iter().map(|e| ((e - e0) / e0).abs()).fold(0.0, f64::max);
        assert!(drift < 1e-4, "relative Jacobi drift {drift}");
    }

    #[test]
    fn test_backward_integration_returns_to_start() {
        let halo = halo();
        let w0 = PhaseSpacePosition::new(Vec3::new(12.0, 1.0, 3.0), Vec3::new(-20.0, 180.0, 40.0));
        let h = Hamiltonian::new(halo);
        let forward = integrate_orbit(
            &h,
            &w0,
            &IntegrationOptions {
                dt: Megayears::new(0.5),
                n_steps: 400,
                ..IntegrationOptions::default()
            },
        )
        .unwrap();
        let end = forward.last().unwrap();
        let back = integrate_orbit(
            &h,
            &end,
            &IntegrationOptions {
                dt: Megayears::new(-0.5),
                n_steps: 400,
                t0: Megayears::new(200.0),
                ..IntegrationOptions::default()
            },
        )
        .unwrap();
        let start = back.last().unwrap();
        assert_relative_eq!(start.pos, w0.pos, epsilon = 1e-8);
        assert_relative_eq!(start.vel, w0.vel, epsilon = 1e-6);
        assert_relative_eq!(back.times[400].value(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_options() {
        let h = Hamiltonian::new(halo());
        let w0 = PhaseSpacePosition::new(Vec3::new(8.0, 0.0, 0.0), Vec3::zeros());
        let zero_dt = IntegrationOptions {
            dt: Megayears::new(0.0),
            ..IntegrationOptions::default()
        };
        assert_eq!(
            integrate_orbit(&h, &w0, &zero_dt).unwrap_err(),
            OrbitError::InvalidTimestep(0.0)
        );
        let no_steps = IntegrationOptions {
            n_steps: 0,
            ..IntegrationOptions::default()
        };
        assert_eq!(integrate_orbit(&h, &w0, &no_steps).unwrap_err(), OrbitError::NoSteps);

        for n_steps in [usize::MAX, usize::MAX / 2] {
            let huge = IntegrationOptions {
                n_steps,
                ..IntegrationOptions::default()
            };
            assert_eq!(
                integrate_orbit(&h, &w0, &huge).unwrap_err(),
                OrbitError::TooManySteps(n_steps)
            );
        }

        let bad = PhaseSpacePosition::new(Vec3::new(f64::NAN, 0.0, 0.0), Vec3::zeros());
        assert_eq!(
            integrate_orbit(&h, &bad, &IntegrationOptions::default()).unwrap_err(),
            OrbitError::NonFiniteInitialConditions
        );
    }

    #[test]
    fn test_velocity_units_round_trip() {
        let h = Hamiltonian::new(halo());
        let w0 = PhaseSpacePosition::new(Vec3::new(50.0, 0.0, 0.0), Vec3::new(0.0, 100.0, 0.0));
        let orbit = integrate_orbit(
            &h,
            &w0,
            &IntegrationOptions {
                dt: Megayears::new(0.01),
                n_steps: 1,
                ..IntegrationOptions::default()
            },
        )
        .unwrap();
        // after 0.01 Myr the particle moves ~100 km/s × 0.01 Myr ≈ 1.02e-3 kpc
        let moved = orbit.positions[1].y;
        assert_relative_eq!(moved, 100.0 * KMS_IN_KPC_PER_MYR * 0.01, max_relative = 1e-6);
        assert_relative_eq!(orbit.velocities[1].y, 100.0, max_relative = 1e-4);
    }
}
