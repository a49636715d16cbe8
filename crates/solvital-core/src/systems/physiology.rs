//! Physiology system - ticks every colonist's health record
//!
//! Colonists tick one at a time in registration order. Each one borrows
//! its habitat as life support for the duration of its own tick.

use hecs::{Entity, World};
use solvital_logic::{ClockPulse, LifeSupport};

use super::{BurialQueue, HabitatRegistry, HealthEventLog};
use crate::components::{Activity, Containment, Name, Occupant, Physiology, RegistrationOrder};

/// What one physiology pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysiologySummary {
    pub ticked: usize,
    pub events: usize,
    pub deaths: usize,
}

/// Life-support consumers with a health record, in registration order.
pub fn colonists_in_order(world: &World) -> Vec<Entity> {
    let mut colonists: Vec<(Entity, RegistrationOrder)> = world
        .query::<(&Occupant, &RegistrationOrder)>()
        .with::<&Physiology>()
        .iter()
        .filter(|(_, (occupant, _))| occupant.consumes_life_support())
        .map(|(entity, (_, order))| (entity, *order))
        .collect();
    colonists.sort_by_key(|(_, order)| *order);
    colonists.into_iter().map(|(entity, _)| entity).collect()
}

/// Advance every living colonist by one pulse.
pub fn physiology_system(
    world: &mut World,
    habitats: &mut HabitatRegistry,
    pulse: &ClockPulse,
    log: &mut HealthEventLog,
    burials: &mut BurialQueue,
) -> PhysiologySummary {
    let mut summary = PhysiologySummary::default();

    for entity in colonists_in_order(world) {
        let activity = world
            .get::<&Activity>(entity)
            .map(|a| *a)
            .unwrap_or_default();
        let containment = world.get::<&Containment>(entity).ok().map(|c| *c);
        let name = world
            .get::<&Name>(entity)
            .map(|n| n.full_name())
            .unwrap_or_default();

        let Ok(mut physiology) = world.get::<&mut Physiology>(entity) else {
            continue;
        };
        if physiology.is_dead() {
            continue;
        }

        let provider = match containment.and_then(|c| habitats.get_mut(c.habitat)) {
            Some(habitat) => Some(habitat as &mut dyn LifeSupport),
            None => None,
        };
        let report = physiology.advance(pulse, activity.state(), provider);
        let death = if report.died {
            physiology.death_record().cloned()
        } else {
            None
        };
        drop(physiology);

        summary.ticked += 1;
        summary.events += report.events.len();
        for event in report.events {
            log::debug!("{name}: {event:?}");
            log.record(entity, name.as_str(), pulse, event);
        }
        if let Some(record) = death {
            summary.deaths += 1;
            burials.enqueue(entity, name, record);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::HabitatKind;
    use solvital_logic::{
        AgentHealthRecord, BodyProfile, ComplaintKind, HealthEvent, NaturalAttributes,
        PhysiologyContext,
    };

    fn spawn(world: &mut World, order: u64, habitat: Option<Containment>) -> Entity {
        let record = AgentHealthRecord::new(
            &PhysiologyContext::standard(),
            BodyProfile::default(),
            NaturalAttributes::default(),
            order,
        );
        let entity = world.spawn((
            Occupant::Person,
            RegistrationOrder(order),
            Name::new("Colonist", order.to_string()),
            Activity::Working,
            Physiology(record),
        ));
        if let Some(c) = habitat {
            let _ = world.insert_one(entity, c);
        }
        entity
    }

    #[test]
    fn test_colonists_tick_in_registration_order() {
        let mut world = World::new();
        let third = spawn(&mut world, 30, None);
        let first = spawn(&mut world, 10, None);
        let second = spawn(&mut world, 20, None);
        world.spawn((Occupant::Robot, RegistrationOrder(5), Name::single("RX")));

        assert_eq!(colonists_in_order(&world), vec![first, second, third]);
    }

    #[test]
    fn test_missing_habitat_suffocates() {
        let mut world = World::new();
        let mut habitats = HabitatRegistry::new();
        let mut log = HealthEventLog::new();
        let mut burials = BurialQueue::new();
        let who = spawn(&mut world, 1, None);

        let summary = physiology_system(
            &mut world,
            &mut habitats,
            &ClockPulse::at(1, 10.0, 1.0),
            &mut log,
            &mut burials,
        );
        assert_eq!(summary.ticked, 1);
        assert!(log
            .for_colonist(who)
            .any(|e| e.event == HealthEvent::ComplaintOpened(ComplaintKind::Suffocation)));
    }

    #[test]
    fn test_habitat_supplies_oxygen() {
        let mut world = World::new();
        let mut habitats = HabitatRegistry::new();
        let base = habitats.add("Base", HabitatKind::Settlement);
        let mut log = HealthEventLog::new();
        let mut burials = BurialQueue::new();
        let who = spawn(&mut world, 1, Some(Containment { habitat: base }));

        physiology_system(
            &mut world,
            &mut habitats,
            &ClockPulse::at(1, 10.0, 1.0),
            &mut log,
            &mut burials,
        );
        assert!(habitats.get(base).unwrap().oxygen_supplied > 0.0);
        let phys = world.get::<&Physiology>(who).unwrap();
        assert!(phys.complaints().get(ComplaintKind::Suffocation).is_none());
    }
}
