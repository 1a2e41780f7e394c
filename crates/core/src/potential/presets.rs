//! Pre-defined Milky Way potential configurations

use crate::core_types::units::{Degrees, Kiloparsecs, Parsecs, SolarMasses};
use crate::potential::{
    CompositePotential, Hamiltonian, LongMuraliBar, MiyamotoNagai, Nfw, PotentialError,
    RotatingFrame,
};

/// Pattern speed of the Galactic bar, km/s/kpc
pub const BAR_PATTERN_SPEED: f64 = 42.0;

/// Named potential configuration
#[derive(Debug, Clone, Copy)]
pub struct PotentialPreset {
    /// Lookup id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Whether orbits are integrated in a rotating frame
    pub rotating: bool,
    /// Where the parameters come from
    pub source: &'static str,
    factory: fn() -> Result<Hamiltonian, PotentialError>,
}

impl PotentialPreset {
    /// Construct the Hamiltonian for this preset
    pub fn build(&self) -> Result<Hamiltonian, PotentialError> {
        (self.factory)()
    }
}

/// Standard 3-component Milky Way: bar, disk and halo
pub fn milky_way_composite() -> Result<CompositePotential, PotentialError> {
    Ok(CompositePotential::new()
        .with(
            "bar",
            LongMuraliBar::new(
                SolarMasses::new(2e10),
                Kiloparsecs::new(4.0),
                Kiloparsecs::new(0.5),
                Kiloparsecs::new(0.5),
                Degrees::new(25.0),
            )?,
        )
        .with(
            "disk",
            MiyamotoNagai::new(
                SolarMasses::new(5e10),
                Kiloparsecs::new(3.0),
                Parsecs::new(280.0),
            )?,
        )
        .with(
            "halo",
            Nfw::new(SolarMasses::new(6e11), Kiloparsecs::new(20.0))?,
        ))
}

/// Simple 2-component Milky Way: disk and halo
pub fn gala_example() -> Result<CompositePotential, PotentialError> {
    Ok(CompositePotential::new()
        .with(
            "disk",
            MiyamotoNagai::new(
                SolarMasses::new(6e10),
                Kiloparsecs::new(3.5),
                Parsecs::new(280.0),
            )?,
        )
        .with(
            "halo",
            Nfw::new(SolarMasses::new(7e11), Kiloparsecs::new(15.0))?,
        ))
}

fn build_gala_example() -> Result<Hamiltonian, PotentialError> {
    gala_example().map(Hamiltonian::new)
}

fn build_milky_way_composite() -> Result<Hamiltonian, PotentialError> {
    milky_way_composite().map(Hamiltonian::new)
}

fn build_milky_way_barred() -> Result<Hamiltonian, PotentialError> {
    let frame = RotatingFrame::from_pattern_speed(BAR_PATTERN_SPEED);
    milky_way_composite().map(|p| Hamiltonian::rotating(p, frame))
}

const PRESETS: [PotentialPreset; 3] = [
    PotentialPreset {
        id: "gala_example",
        name: "Gala Example",
        description: "Simple 2-component MW (disk + halo)",
        rotating: false,
        source: "Standard Gala documentation example",
        factory: build_gala_example,
    },
    PotentialPreset {
        id: "milky_way_composite",
        name: "Milky Way Composite",
        description: "3-component MW (bar + disk + halo)",
        rotating: false,
        source: "Standard galactic components",
        factory: build_milky_way_composite,
    },
    PotentialPreset {
        id: "milky_way_barred",
        name: "Milky Way Barred",
        description: "3-component MW with rotating bar frame",
        rotating: true,
        source: "Composite potential + 42 km/s/kpc bar rotation",
        factory: build_milky_way_barred,
    },
];

/// All presets in declaration order
pub fn list_available_potentials() -> &'static [PotentialPreset] {
    &PRESETS
}

/// Build a preset Hamiltonian by id (case-insensitive)
pub fn get_potential(name: &str) -> Result<Hamiltonian, PotentialError> {
    let id = name.to_lowercase();
    PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .ok_or_else(|| PotentialError::UnknownPotential {
            name: name.to_string(),
            available: PRESETS.iter().map(|p| p.id.to_string()).collect(),
        })?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::Potential;

    #[test]
    fn test_all_presets_build() {
        for preset in list_available_potentials() {
            let h = preset.build().unwrap();
            assert_eq!(h.is_rotating(), preset.rotating, "{}", preset.id);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(get_potential("Milky_Way_Barred").unwrap().is_rotating());
    }

    #[test]
    fn test_unknown_potential() {
        let err = get_potential("plummer").unwrap_err();
        assert_eq!(
            err,
            PotentialError::UnknownPotential {
                name: "plummer".to_string(),
                available: vec![
                    "gala_example".to_string(),
                    "milky_way_composite".to_string(),
                    "milky_way_barred".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_solar_circle_velocity_is_realistic() {
        for potential in [gala_example().unwrap(), milky_way_composite().unwrap()] {
            let vc = potential.circular_velocity(Kiloparsecs::new(8.122)).value();
            assert!(vc > 180.0 && vc < 280.0, "v_c = {vc}");
        }
    }

    #[test]
    fn test_composite_has_three_named_components() {
        let mw = milky_way_composite().unwrap();
        assert_eq!(mw.names(), vec!["bar", "disk", "halo"]);
    }
}
