//! Components shared by every occupant kind.

use serde::{Deserialize, Serialize};

/// What kind of thing an entity is. Only people breathe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Person,
    Robot,
    Equipment,
}

impl Occupant {
    /// Whether this occupant draws on a habitat's life support.
    pub fn consumes_life_support(&self) -> bool {
        matches!(self, Occupant::Person)
    }
}

/// Order in which an entity was registered with the engine.
/// Colonists tick in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegistrationOrder(pub u64);

/// Identifies a habitat in the engine's habitat registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HabitatId(pub u32);

/// The habitat an occupant is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Containment {
    pub habitat: HabitatId,
}

/// Display name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    /// A single-word name, used for robots and equipment.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            given: name.into(),
            family: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.family.is_empty() {
            self.given.clone()
        } else {
            format!("{} {}", self.given, self.family)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_people_breathe() {
        assert!(Occupant::Person.consumes_life_support());
        assert!(!Occupant::Robot.consumes_life_support());
        assert!(!Occupant::Equipment.consumes_life_support());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(Name::new("Ada", "Okafor").full_name(), "Ada Okafor");
        assert_eq!(Name::single("RX-7").full_name(), "RX-7");
    }

    #[test]
    fn test_registration_order_sorts() {
        let mut orders = vec![RegistrationOrder(3), RegistrationOrder(1), RegistrationOrder(2)];
        orders.sort();
        assert_eq!(
            orders,
            vec![RegistrationOrder(1), RegistrationOrder(2), RegistrationOrder(3)]
        );
    }
}
