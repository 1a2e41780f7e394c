//! Named sum of potential components

use crate::core_types::Vec3;
use crate::potential::Potential;

/// Ordered, named collection of potentials evaluated as their sum
#[derive(Debug, Default)]
pub struct CompositePotential {
    components: Vec<(String, Box<dyn Potential>)>,
}

impl CompositePotential {
    /// Empty composite (zero potential)
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component; a component with the same name is replaced in place
    pub fn insert<P: Potential + 'static>(&mut self, name: &str, potential: P) {
        let boxed: Box<dyn Potential> = Box::new(potential);
        if let Some(slot) = self.components.iter_mut().find(|(key, _)| key == name) {
            slot.1 = boxed;
        } else {
            self.components.push((name.to_string(), boxed));
        }
    }

    /// Builder-style insert
    pub fn with<P: Potential + 'static>(mut self, name: &str, potential: P) -> Self {
        self.insert(name, potential);
        self
    }

    /// Component by name
    pub fn get(&self, name: &str) -> Option<&dyn Potential> {
        self.components
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, p)| p.as_ref())
    }

    /// Component names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there are no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Potential for CompositePotential {
    fn energy(&self, x: &Vec3) -> f64 {
        self.components.iter().map(|(_, p)| p.energy(x)).sum()
    }

    fn gradient(&self, x: &Vec3) -> Vec3 {
        self.components
            .iter()
            .fold(Vec3::zeros(), |acc, (_, p)| acc + p.gradient(x))
    }
}
