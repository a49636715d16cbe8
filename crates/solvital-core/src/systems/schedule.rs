//! Schedule system - keeps work shifts and sleep habits in step

use hecs::World;

use super::colonists_in_order;
use crate::components::{Physiology, Shift};

/// Sols between shift reviews
pub const SHIFT_REVIEW_SOLS: u32 = 3;

/// Move each living colonist to the shift that best avoids their sleep
/// habit. Returns how many shifts changed.
pub fn shift_preference_system(world: &mut World) -> usize {
    let mut changes = Vec::new();

    for entity in colonists_in_order(world) {
        let Ok(physiology) = world.get::<&Physiology>(entity) else {
            continue;
        };
        if physiology.is_dead() {
            continue;
        }
        let wanted = Shift::avoiding(physiology.preferred_sleep_hours());
        let current = world.get::<&Shift>(entity).ok().map(|s| *s);
        if current != Some(wanted) {
            changes.push((entity, wanted));
        }
    }

    for (entity, shift) in &changes {
        if world.insert_one(*entity, *shift).is_err() {
            log::warn!("Shift change for a despawned colonist");
        }
    }
    changes.len()
}

/// Reinforce each living colonist's habit of sleeping after their shift.
/// Runs once a sol. Returns how many colonists were adapted.
pub fn shift_sleep_system(world: &mut World) -> usize {
    let mut adapted = 0;
    for (_, (physiology, shift)) in world.query_mut::<(&mut Physiology, &Shift)>() {
        if physiology.is_dead() {
            continue;
        }
        physiology.adapt_sleep_to_shift(shift.window().1, false);
        adapted += 1;
    }
    adapted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Name, Occupant, RegistrationOrder};
    use solvital_logic::{AgentHealthRecord, BodyProfile, NaturalAttributes, PhysiologyContext};

    #[test]
    fn test_assigns_a_shift() {
        let mut world = World::new();
        let record = AgentHealthRecord::new(
            &PhysiologyContext::standard(),
            BodyProfile::default(),
            NaturalAttributes::default(),
            3,
        );
        let wanted = Shift::avoiding(record.preferred_sleep_hours());
        let who = world.spawn((
            Occupant::Person,
            RegistrationOrder(0),
            Name::single("Ada"),
            Physiology(record),
        ));

        assert_eq!(shift_preference_system(&mut world), 1);
        assert_eq!(*world.get::<&Shift>(who).unwrap(), wanted);
        // Nothing to change the second time
        assert_eq!(shift_preference_system(&mut world), 0);
    }

    #[test]
    fn test_sleep_follows_shift() {
        let mut world = World::new();
        let record = || {
            AgentHealthRecord::new(
                &PhysiologyContext::standard(),
                BodyProfile::default(),
                NaturalAttributes::default(),
                5,
            )
        };
        let day = world.spawn((Physiology(record()), Shift::A));
        let night = world.spawn((Physiology(record()), Shift::C));
        // No shift, no adaptation
        world.spawn((Physiology(record()),));

        for _ in 0..3 {
            assert_eq!(shift_sleep_system(&mut world), 2);
        }
        let hours = |e| world.get::<&Physiology>(e).unwrap().preferred_sleep_hours().0;
        // Shift A ends at 333, shift C wraps past midnight
        assert!((300..450).contains(&hours(day)));
        assert!(hours(night) < 100);
    }
}
