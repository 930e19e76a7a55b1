//! The parameter set: the validated plant table shared by every model built during a sweep.
use crate::plant::{InitialCondition, Plant, PlantID};
use crate::units::Power;
use anyhow::{Context, Result, ensure};
use std::collections::HashSet;

/// Read-only plant data for a fleet.
///
/// The position of a plant in the set is its index (`0..n`) in the formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    plants: Vec<Plant>,
}

impl ParameterSet {
    /// Create a new [`ParameterSet`], validating every plant.
    ///
    /// # Arguments
    ///
    /// * `plants` - Plant data, in index order
    pub fn new(plants: Vec<Plant>) -> Result<Self> {
        ensure!(!plants.is_empty(), "At least one plant must be provided");

        let mut ids = HashSet::new();
        for plant in &plants {
            ensure!(
                ids.insert(plant.id.clone()),
                "Duplicate plant ID '{}'",
                plant.id
            );
            plant.validate()?;
        }

        Ok(Self { plants })
    }

    /// The plants in index order
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Iterate over plant indices and plants
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Plant)> {
        self.plants.iter().enumerate()
    }

    /// Number of plants in the fleet
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    /// Always false, as a parameter set cannot be empty
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Get the index of the plant with the given ID
    pub fn index_of(&self, id: &PlantID) -> Result<usize> {
        self.plants
            .iter()
            .position(|plant| &plant.id == id)
            .with_context(|| format!("Unknown plant ID '{id}'"))
    }

    /// Resolved initial conditions for each plant, in index order
    pub fn initial_conditions(&self) -> Vec<InitialCondition> {
        self.plants.iter().map(Plant::initial_condition).collect()
    }

    /// Sum of all plants' maximum outputs
    pub fn total_capacity(&self) -> Power {
        self.plants.iter().map(|plant| plant.max_output).sum()
    }
}
