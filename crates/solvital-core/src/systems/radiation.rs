//! Radiation system - samples each colonist's dose from where they are

use hecs::World;
use rand::Rng;
use solvital_logic::dose::sample_exposure;

use super::{colonists_in_order, HabitatRegistry};
use crate::components::{Activity, Containment, Physiology};

/// Sample exposure for every living colonist over `elapsed` millisols.
/// Returns how many colonists picked up a dose.
pub fn radiation_system(
    world: &mut World,
    habitats: &HabitatRegistry,
    elapsed: f64,
    rng: &mut impl Rng,
) -> usize {
    let mut exposed = 0;

    for entity in colonists_in_order(world) {
        let Some(habitat) = world
            .get::<&Containment>(entity)
            .ok()
            .and_then(|c| habitats.get(c.habitat))
        else {
            continue;
        };
        let activity = world
            .get::<&Activity>(entity)
            .map(|a| *a)
            .unwrap_or_default();
        let shielding = activity
            .shielding_override()
            .unwrap_or_else(|| habitat.kind.shielding());

        let Ok(mut physiology) = world.get::<&mut Physiology>(entity) else {
            continue;
        };
        if physiology.is_dead() {
            continue;
        }
        if let Some(exposure) = sample_exposure(habitat.radiation, shielding, elapsed, rng) {
            if exposure.amount > 0.0 {
                physiology.expose(exposure.region, exposure.amount);
                exposed += 1;
            }
        }
    }

    exposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{HabitatKind, Name, Occupant, RegistrationOrder};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use solvital_logic::dose::{BodyRegion, DoseWindow, RadiationStatus};
    use solvital_logic::{AgentHealthRecord, BodyProfile, NaturalAttributes, PhysiologyContext};

    fn colonist(world: &mut World, containment: Containment, activity: Activity) -> hecs::Entity {
        world.spawn((
            Occupant::Person,
            RegistrationOrder(1),
            Name::single("Ada"),
            activity,
            containment,
            Physiology(AgentHealthRecord::new(
                &PhysiologyContext::standard(),
                BodyProfile::default(),
                NaturalAttributes::default(),
                1,
            )),
        ))
    }

    fn total_dose(world: &World, who: hecs::Entity) -> f64 {
        let phys = world.get::<&Physiology>(who).unwrap();
        [BodyRegion::BloodFormingOrgans, BodyRegion::Ocular, BodyRegion::Skin]
            .iter()
            .map(|r| phys.dose().dose(*r, DoseWindow::Career))
            .sum()
    }

    #[test]
    fn test_quiet_sky_gives_no_dose() {
        let mut world = World::new();
        let mut habitats = HabitatRegistry::new();
        let base = habitats.add("Base", HabitatKind::Settlement);
        habitats.set_radiation(base, RadiationStatus::default());
        let who = colonist(&mut world, Containment { habitat: base }, Activity::Working);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(radiation_system(&mut world, &habitats, 50.0, &mut rng), 0);
        assert_eq!(total_dose(&world, who), 0.0);
    }

    #[test]
    fn test_solar_event_reaches_inside() {
        let mut world = World::new();
        let mut habitats = HabitatRegistry::new();
        let base = habitats.add("Base", HabitatKind::Settlement);
        habitats.set_radiation(
            base,
            RadiationStatus {
                sep: true,
                ..RadiationStatus::default()
            },
        );
        let who = colonist(&mut world, Containment { habitat: base }, Activity::Resting);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            radiation_system(&mut world, &habitats, 50.0, &mut rng);
        }
        assert!(total_dose(&world, who) > 0.0);
    }
}
