//! Colony-level scenarios: health records ticked through the ECS systems.

use hecs::{Entity, World};
use solvital_core::components::{
    Activity, Containment, HabitatKind, Name, Occupant, Physiology, RegistrationOrder,
};
use solvital_core::systems::{physiology_system, BurialQueue, HabitatRegistry, HealthEventLog};
use solvital_logic::{
    AgentHealthRecord, BodyProfile, HealthEvent, MarsClock, NaturalAttributes, PhysiologyContext,
    VitalSigns,
};

struct Colony {
    world: World,
    habitats: HabitatRegistry,
    log: HealthEventLog,
    burials: BurialQueue,
    clock: MarsClock,
}

impl Colony {
    fn new() -> Self {
        Self {
            world: World::new(),
            habitats: HabitatRegistry::new(),
            log: HealthEventLog::new(),
            burials: BurialQueue::new(),
            clock: MarsClock::default(),
        }
    }

    fn tick(&mut self, elapsed: f64) {
        let pulse = self.clock.advance(elapsed);
        physiology_system(
            &mut self.world,
            &mut self.habitats,
            &pulse,
            &mut self.log,
            &mut self.burials,
        );
    }
}

fn colonist(colony: &mut Colony, record: AgentHealthRecord, habitat: &str) -> Entity {
    let habitat = colony.habitats.add(habitat, HabitatKind::Settlement);
    colony.world.spawn((
        Occupant::Person,
        RegistrationOrder(0),
        Name::new("Ada", "Okafor"),
        Activity::Working,
        Containment { habitat },
        Physiology(record),
    ))
}

#[test]
fn full_sol_of_work_accrues_needs_and_opens_nothing() {
    let mut colony = Colony::new();
    let record = AgentHealthRecord::new(
        &PhysiologyContext::standard(),
        BodyProfile {
            mass_kg: 82.0,
            height_cm: 181.0,
            age_years: 41.0,
        },
        NaturalAttributes::default(),
        1,
    )
    .with_vitals(VitalSigns {
        thirst: 0.0,
        hunger: 0.0,
        fatigue: 0.0,
        energy: 2_500.0,
        ..VitalSigns::default()
    });
    let who = colonist(&mut colony, record, "Base");

    for _ in 0..1_000 {
        colony.tick(1.0);
    }

    let physiology = colony.world.get::<&Physiology>(who).unwrap();
    let bmd = physiology.tracker().body_mass_deviation();
    let expected = 1_000.0 * bmd;
    let v = physiology.vitals();
    assert!((v.thirst - expected).abs() < 1e-6, "thirst {}", v.thirst);
    assert!((v.hunger - expected).abs() < 1e-6, "hunger {}", v.hunger);
    assert!((v.fatigue - expected).abs() < 1e-6, "fatigue {}", v.fatigue);

    // Every onset is still ahead
    assert!(v.thirst < physiology.tracker().dehydration_onset());
    assert!(v.hunger < physiology.tracker().starvation_onset());
    let flags = physiology.flags();
    assert!(!flags.dehydrated && !flags.starving && !flags.collapsed && !flags.stressed_out);

    assert!(physiology.is_alive());
    assert_eq!(physiology.complaints().active().count(), 0);
    assert!(!colony
        .log
        .iter()
        .any(|e| matches!(e.event, HealthEvent::ComplaintOpened(_))));
    assert_eq!(physiology.tracker().ticks(), 1_000);
}

#[test]
fn stranded_colonist_is_queued_for_burial_once() {
    let mut colony = Colony::new();
    let record = AgentHealthRecord::new(
        &PhysiologyContext::standard(),
        BodyProfile::default(),
        NaturalAttributes::default(),
        2,
    );
    let who = colonist(&mut colony, record, "Base");
    // Move them outside: no containment, no life support
    colony.world.remove_one::<Containment>(who).unwrap();

    for _ in 0..400 {
        colony.tick(1.0);
    }

    assert_eq!(colony.burials.len(), 1);
    assert_eq!(colony.burials.oldest().unwrap().entity, who);
    assert!(colony
        .log
        .for_colonist(who)
        .any(|e| matches!(e.event, HealthEvent::Death { .. })));
}
