//! Property-based tests for the health record.
//!
//! Verifies that vitals, performance and dose totals stay inside their
//! documented ranges for arbitrary starting states and tick sequences.

use proptest::prelude::*;
use solvital_logic::constants::vital_limits::*;
use solvital_logic::dose::{BodyRegion, DoseLedger, DoseWindow};
use solvital_logic::performance::recompute;
use solvital_logic::{
    ActivityState, AgentHealthRecord, BodyProfile, ClockPulse, HabitatAtmosphere,
    NaturalAttributes, PhysiologyContext, VitalSigns,
};

// ============================================================================
// Strategies
// ============================================================================

fn arb_vitals() -> impl Strategy<Value = VitalSigns> {
    (
        0.0f64..=3_000.0,
        0.0f64..=30_000.0,
        0.0f64..=30_000.0,
        0.0f64..=100.0,
        100.0f64..=20_000.0,
    )
        .prop_map(|(thirst, hunger, fatigue, stress, energy)| VitalSigns {
            thirst,
            hunger,
            fatigue,
            stress,
            energy,
            performance: 1.0,
        })
}

fn arb_profile() -> impl Strategy<Value = BodyProfile> {
    (40.0f64..=120.0, 150.0f64..=200.0, 20.0f64..=65.0).prop_map(
        |(mass_kg, height_cm, age_years)| BodyProfile {
            mass_kg,
            height_cm,
            age_years,
        },
    )
}

fn arb_activity() -> impl Strategy<Value = ActivityState> {
    prop_oneof![
        Just(ActivityState::Active),
        Just(ActivityState::Resting),
        Just(ActivityState::Sleeping),
    ]
}

fn arb_region() -> impl Strategy<Value = BodyRegion> {
    prop_oneof![
        Just(BodyRegion::BloodFormingOrgans),
        Just(BodyRegion::Ocular),
        Just(BodyRegion::Skin),
    ]
}

fn assert_in_range(v: &VitalSigns, max_energy: f64) {
    assert!((0.0..=MAX_THIRST).contains(&v.thirst), "thirst {}", v.thirst);
    assert!((0.0..=MAX_HUNGER).contains(&v.hunger), "hunger {}", v.hunger);
    assert!((0.0..=MAX_FATIGUE).contains(&v.fatigue), "fatigue {}", v.fatigue);
    assert!((0.0..=MAX_STRESS).contains(&v.stress), "stress {}", v.stress);
    assert!(
        (MIN_ENERGY..=max_energy).contains(&v.energy),
        "energy {}",
        v.energy
    );
    assert!((0.0..=1.0).contains(&v.performance), "performance {}", v.performance);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn vitals_stay_in_range(
        vitals in arb_vitals(),
        profile in arb_profile(),
        seed in any::<u64>(),
        ticks in prop::collection::vec((-5.0f64..=200.0, arb_activity(), 0.0f64..=0.3), 1..60),
    ) {
        let mut rec = AgentHealthRecord::new(
            &PhysiologyContext::standard(),
            profile,
            NaturalAttributes::default(),
            seed,
        )
        .with_vitals(vitals);
        let mut hab = HabitatAtmosphere::default();

        for (i, (elapsed, activity, food)) in ticks.into_iter().enumerate() {
            rec.eat(food);
            rec.add_stress(food * 100.0);
            let pulse = ClockPulse::at(1 + i as u32 / 10, (i % 10) as f64 * 100.0, elapsed);
            rec.advance(&pulse, activity, Some(&mut hab));
            assert_in_range(rec.vitals(), rec.tracker().max_energy());
        }
    }

    #[test]
    fn needs_never_fall_while_awake_and_unfed(
        vitals in arb_vitals(),
        seed in any::<u64>(),
        ticks in prop::collection::vec((0.0f64..=50.0, prop::bool::ANY), 1..40),
    ) {
        let mut rec = AgentHealthRecord::new(
            &PhysiologyContext::standard(),
            BodyProfile::default(),
            NaturalAttributes::default(),
            seed,
        )
        .with_vitals(vitals);
        let mut hab = HabitatAtmosphere::default();

        for (i, (elapsed, resting)) in ticks.into_iter().enumerate() {
            let before = *rec.vitals();
            let activity = if resting { ActivityState::Resting } else { ActivityState::Active };
            rec.advance(&ClockPulse::at(1, i as f64, elapsed), activity, Some(&mut hab));
            if rec.is_dead() {
                break;
            }
            let after = rec.vitals();
            prop_assert!(after.thirst >= before.thirst);
            prop_assert!(after.hunger >= before.hunger);
            prop_assert!(after.fatigue >= before.fatigue);
        }
    }

    #[test]
    fn performance_is_bounded(vitals in arb_vitals()) {
        let p = recompute(&vitals, None);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn dose_windows_are_nested(
        doses in prop::collection::vec((arb_region(), 0.0f64..=50.0, 0u32..=40), 1..50),
    ) {
        let mut ledger = DoseLedger::new();
        let mut sol = 1;
        for (region, amount, gap) in doses {
            sol += gap;
            ledger.check_and_carry_over(sol);
            ledger.add_dose(region, amount);
            for r in [BodyRegion::BloodFormingOrgans, BodyRegion::Ocular, BodyRegion::Skin] {
                let thirty = ledger.dose(r, DoseWindow::ThirtySol);
                let annual = ledger.dose(r, DoseWindow::Annual);
                let career = ledger.dose(r, DoseWindow::Career);
                prop_assert!(thirty >= 0.0);
                prop_assert!(thirty <= annual + 1e-9);
                prop_assert!(annual <= career + 1e-9);
            }
        }
    }
}
