//! Habitat registry and the regulator system
//!
//! Habitats live outside the ECS world so the physiology system can lend a
//! colonist's habitat out as life support while it mutates the colonist.

use std::collections::BTreeMap;

use solvital_logic::dose::RadiationStatus;
use solvital_logic::life_support::AtmosphereHazard;
use solvital_logic::PhysiologyConfig;

use crate::components::{Habitat, HabitatId, HabitatKind};

#[derive(Debug, Clone, Default)]
pub struct HabitatRegistry {
    habitats: BTreeMap<HabitatId, Habitat>,
    next_id: u32,
}

impl HabitatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a habitat with default atmosphere for its kind.
    pub fn add(&mut self, name: impl Into<String>, kind: HabitatKind) -> HabitatId {
        let id = HabitatId(self.next_id);
        self.next_id += 1;
        self.habitats.insert(id, Habitat::new(id, name, kind));
        id
    }

    /// Register a prepared habitat. Its ID is reassigned.
    pub fn insert(&mut self, mut habitat: Habitat) -> HabitatId {
        let id = HabitatId(self.next_id);
        self.next_id += 1;
        habitat.id = id;
        self.habitats.insert(id, habitat);
        id
    }

    pub fn get(&self, id: HabitatId) -> Option<&Habitat> {
        self.habitats.get(&id)
    }

    pub fn get_mut(&mut self, id: HabitatId) -> Option<&mut Habitat> {
        self.habitats.get_mut(&id)
    }

    pub fn remove(&mut self, id: HabitatId) -> Option<Habitat> {
        self.habitats.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habitat> {
        self.habitats.values()
    }

    pub fn set_radiation(&mut self, id: HabitatId, status: RadiationStatus) -> bool {
        match self.habitats.get_mut(&id) {
            Some(h) => {
                h.radiation = status;
                true
            }
            None => false,
        }
    }

    /// Habitats at `Danger` or worse
    pub fn hazardous(&self, config: &PhysiologyConfig) -> Vec<HabitatId> {
        self.habitats
            .values()
            .filter(|h| h.hazard(config) == AtmosphereHazard::Danger)
            .map(|h| h.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.habitats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habitats.is_empty()
    }

    pub fn clear(&mut self) {
        self.habitats.clear();
    }
}

/// Run every habitat's air regulator for `elapsed` millisols.
pub fn habitat_system(habitats: &mut HabitatRegistry, elapsed: f64) {
    for habitat in habitats.habitats.values_mut() {
        habitat.atmosphere.regulate(elapsed);
    }
}
