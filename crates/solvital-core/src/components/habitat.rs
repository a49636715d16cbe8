//! Habitats: settlements, vehicles and suits colonists breathe from.

use serde::{Deserialize, Serialize};
use solvital_logic::dose::{RadiationStatus, Shielding};
use solvital_logic::life_support::{AtmosphereHazard, HabitatAtmosphere};
use solvital_logic::{LifeSupport, PhysiologyConfig};

use super::HabitatId;

/// Kind of pressurised volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitatKind {
    Settlement,
    Vehicle,
    Suit,
}

impl HabitatKind {
    pub fn shielding(&self) -> Shielding {
        match self {
            HabitatKind::Settlement => Shielding::Settlement,
            HabitatKind::Vehicle => Shielding::Vehicle,
            HabitatKind::Suit => Shielding::Outside,
        }
    }
}

/// A life-support provider with a name and a radiation environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habitat {
    pub id: HabitatId,
    pub name: String,
    pub kind: HabitatKind,
    pub atmosphere: HabitatAtmosphere,
    /// Radiation events currently affecting this location
    pub radiation: RadiationStatus,
    /// Total oxygen handed out since creation [kg]
    pub oxygen_supplied: f64,
}

impl Habitat {
    pub fn new(id: HabitatId, name: impl Into<String>, kind: HabitatKind) -> Self {
        let atmosphere = match kind {
            HabitatKind::Settlement => HabitatAtmosphere::default(),
            HabitatKind::Vehicle => HabitatAtmosphere {
                oxygen_kg: 60.0,
                oxygen_capacity: 60.0,
                ..HabitatAtmosphere::default()
            },
            HabitatKind::Suit => HabitatAtmosphere::sealed(1.0),
        };
        Self {
            id,
            name: name.into(),
            kind,
            atmosphere,
            radiation: RadiationStatus {
                baseline: true,
                ..RadiationStatus::default()
            },
            oxygen_supplied: 0.0,
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: HabitatAtmosphere) -> Self {
        self.atmosphere = atmosphere;
        self
    }

    pub fn hazard(&self, config: &PhysiologyConfig) -> AtmosphereHazard {
        self.atmosphere.assess(config)
    }
}

impl LifeSupport for Habitat {
    fn provide_oxygen(&mut self, amount: f64) -> f64 {
        let given = self.atmosphere.provide_oxygen(amount);
        self.oxygen_supplied += given;
        given
    }

    fn air_pressure(&self) -> f64 {
        self.atmosphere.air_pressure()
    }

    fn temperature(&self) -> f64 {
        self.atmosphere.temperature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shielding_by_kind() {
        assert_eq!(HabitatKind::Settlement.shielding(), Shielding::Settlement);
        assert_eq!(HabitatKind::Vehicle.shielding(), Shielding::Vehicle);
        assert_eq!(HabitatKind::Suit.shielding(), Shielding::Outside);
    }

    #[test]
    fn test_habitat_tracks_oxygen_supplied() {
        let mut hab = Habitat::new(HabitatId(1), "Base", HabitatKind::Settlement);
        let given = hab.provide_oxygen(0.5);
        assert_eq!(given, 0.5);
        assert_eq!(hab.oxygen_supplied, 0.5);
        assert!((hab.atmosphere.oxygen_kg - 499.5).abs() < 1e-9);
    }

    #[test]
    fn test_suit_runs_dry() {
        let mut suit = Habitat::new(HabitatId(2), "Suit", HabitatKind::Suit);
        assert_eq!(suit.provide_oxygen(0.6), 0.6);
        assert!((suit.provide_oxygen(0.6) - 0.4).abs() < 1e-9);
        assert_eq!(suit.provide_oxygen(0.6), 0.0);
    }
}
