//! SolVital Headless Simulation Harness
//!
//! Validates colonist physiology and the colony engine end to end.
//! Runs entirely in-process: no rendering, no persistence.
//!
//! Usage:
//!   cargo run -p solvital-simtest
//!   cargo run -p solvital-simtest -- --verbose

use std::collections::BTreeSet;

use serde::Deserialize;
use solvital_core::prelude::*;
use solvital_logic::complaints::ComplaintState;
use solvital_logic::constants::vital_limits;
use solvital_logic::dose::{BodyRegion, DoseLedger, DoseWindow};
use solvital_logic::{
    ActivityState, AgentHealthRecord, BodyProfile, ClockPulse, ComplaintCatalog, ComplaintKind,
    HabitatAtmosphere, HealthEvent, LifeSupport, MarsClock, NaturalAttributes, PhysiologyConfig,
    PhysiologyContext, VitalSigns,
};

// ── Data files (same JSON the engine loads) ─────────────────────────────
const PHYSIOLOGY_JSON: &str = include_str!("../../../data/physiology.json");
const CATALOG_JSON: &str = include_str!("../../../data/complaint_catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    complaints: Vec<RawComplaint>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawComplaint {
    kind: String,
    seriousness: u8,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

/// Oxygen tanks that have run dry.
struct DryTank;

impl LifeSupport for DryTank {
    fn provide_oxygen(&mut self, _amount: f64) -> f64 {
        0.0
    }

    fn air_pressure(&self) -> f64 {
        34.0
    }

    fn temperature(&self) -> f64 {
        21.0
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== SolVital Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Data files
    let context = validate_data_files(&mut results);

    // 2. Scenario A: undisturbed accrual
    results.extend(scenario_accrual(&context));

    // 3. Scenario B: dry oxygen supply
    results.extend(scenario_dry_tank(&context));

    // 4. Scenario C: dose window expiry
    results.extend(scenario_dose_expiry());

    // 5. Scenario D: fatal complaint freezes the record
    results.extend(scenario_fatal(&context));

    // 6. Colony soak
    results.extend(colony_soak(&context, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn colonist(ctx: &PhysiologyContext, seed: u64) -> AgentHealthRecord {
    AgentHealthRecord::new(
        ctx,
        BodyProfile {
            mass_kg: 78.0,
            height_cm: 176.0,
            age_years: 35.0,
        },
        NaturalAttributes::default(),
        seed,
    )
}

// ── 1. Data Files ───────────────────────────────────────────────────────

fn validate_data_files(results: &mut Vec<TestResult>) -> PhysiologyContext {
    println!("--- Data Files ---");

    match serde_json::from_str::<CatalogFile>(CATALOG_JSON) {
        Ok(file) => {
            let kinds: BTreeSet<&str> = file.complaints.iter().map(|c| c.kind.as_str()).collect();
            results.push(TestResult::new(
                "catalog_kinds_unique",
                kinds.len() == file.complaints.len(),
                format!("{} rows, {} kinds", file.complaints.len(), kinds.len()),
            ));
        }
        Err(e) => results.push(TestResult::new(
            "catalog_parse",
            false,
            format!("JSON parse error: {}", e),
        )),
    }

    match PhysiologyContext::from_json(PHYSIOLOGY_JSON, CATALOG_JSON) {
        Ok(ctx) => {
            results.push(TestResult::new(
                "catalog_matches_builtin",
                *ctx.catalog == ComplaintCatalog::standard(),
                format!("{} complaints", ctx.catalog.len()),
            ));
            results.push(TestResult::new(
                "config_matches_defaults",
                *ctx.config == PhysiologyConfig::default(),
                format!(
                    "check every {} ticks, starvation after {} sols",
                    ctx.config.condition_check_interval, ctx.config.starvation_start_sols
                ),
            ));
            ctx
        }
        Err(e) => {
            results.push(TestResult::new(
                "data_load",
                false,
                format!("load error: {}", e),
            ));
            PhysiologyContext::standard()
        }
    }
}

// ── 2. Scenario A ───────────────────────────────────────────────────────

fn scenario_accrual(ctx: &PhysiologyContext) -> Vec<TestResult> {
    println!("--- Scenario A: accrual ---");
    let mut results = Vec::new();

    // No random ailments: only the threshold-raised complaints remain
    let mut catalog = (*ctx.catalog).clone();
    let sampled: Vec<ComplaintKind> = catalog
        .iter()
        .map(|d| d.kind)
        .filter(|k| !k.is_environmental())
        .collect();
    for kind in sampled {
        catalog = catalog.without(kind);
    }
    let quiet = PhysiologyContext::new((*ctx.config).clone(), catalog);

    let mut rec = colonist(&quiet, 1).with_vitals(VitalSigns {
        thirst: 0.0,
        hunger: 0.0,
        fatigue: 0.0,
        energy: 2_500.0,
        ..VitalSigns::default()
    });
    let bmd = rec.tracker().body_mass_deviation();
    let mut hab = HabitatAtmosphere::default();
    let report = rec.advance(
        &ClockPulse::at(1, 0.0, 1_000.0),
        ActivityState::Active,
        Some(&mut hab),
    );

    let v = *rec.vitals();
    let expected = 1_000.0 * bmd;
    let accrued = (v.thirst - expected).abs() < 1e-9
        && (v.hunger - expected).abs() < 1e-9
        && (v.fatigue - expected).abs() < 1e-9;
    results.push(TestResult::new(
        "accrual_by_body_mass",
        accrued,
        format!(
            "expected {:.2}, got thirst {:.2} hunger {:.2} fatigue {:.2}",
            expected, v.thirst, v.hunger, v.fatigue
        ),
    ));

    let opened = report
        .events
        .iter()
        .filter(|e| matches!(e, HealthEvent::ComplaintOpened(_)))
        .count();
    results.push(TestResult::new(
        "accrual_opens_nothing",
        opened == 0 && rec.complaints().active().count() == 0,
        format!("{} complaints opened", opened),
    ));
    results
}

// ── 3. Scenario B ───────────────────────────────────────────────────────

fn scenario_dry_tank(ctx: &PhysiologyContext) -> Vec<TestResult> {
    println!("--- Scenario B: dry oxygen supply ---");
    let mut results = Vec::new();

    let mut rec = colonist(ctx, 2);
    let mut tank = DryTank;
    let mut opened_on = None;
    let mut active_through = 0;

    for tick in 1..=3u32 {
        let report = rec.advance(
            &ClockPulse::at(1, tick as f64, 1.0),
            ActivityState::Active,
            Some(&mut tank),
        );
        if report
            .events
            .contains(&HealthEvent::ComplaintOpened(ComplaintKind::Suffocation))
            && opened_on.is_none()
        {
            opened_on = Some(tick);
        }
        let active = rec
            .complaints()
            .get(ComplaintKind::Suffocation)
            .map(|c| c.state == ComplaintState::Active)
            .unwrap_or(false);
        if active {
            active_through = tick;
        }
    }

    results.push(TestResult::new(
        "suffocation_opens_on_tick_1",
        opened_on == Some(1),
        format!("opened on {:?}", opened_on),
    ));
    results.push(TestResult::new(
        "suffocation_active_through_tick_3",
        active_through == 3 && rec.is_alive(),
        format!("active through tick {}", active_through),
    ));
    results
}

// ── 4. Scenario C ───────────────────────────────────────────────────────

fn scenario_dose_expiry() -> Vec<TestResult> {
    println!("--- Scenario C: dose window expiry ---");
    let mut results = Vec::new();

    let mut ledger = DoseLedger::new();
    ledger.check_and_carry_over(10);
    ledger.add_dose(BodyRegion::BloodFormingOrgans, 5.0);

    for sol in 11..=40 {
        ledger.check_and_carry_over(sol);
    }
    let before = ledger.dose(BodyRegion::BloodFormingOrgans, DoseWindow::ThirtySol);
    ledger.check_and_carry_over(41);
    let thirty = ledger.dose(BodyRegion::BloodFormingOrgans, DoseWindow::ThirtySol);
    let annual = ledger.dose(BodyRegion::BloodFormingOrgans, DoseWindow::Annual);

    results.push(TestResult::new(
        "dose_held_through_sol_40",
        before == 5.0,
        format!("30-sol dose on sol 40: {}", before),
    ));
    results.push(TestResult::new(
        "dose_expires_on_sol_41",
        thirty == 0.0 && annual == 5.0,
        format!("30-sol {}, annual {}", thirty, annual),
    ));
    results
}

// ── 5. Scenario D ───────────────────────────────────────────────────────

fn scenario_fatal(ctx: &PhysiologyContext) -> Vec<TestResult> {
    println!("--- Scenario D: fatal complaint ---");
    let mut results = Vec::new();

    let mut rec = colonist(ctx, 3);
    rec.set_location("Rover Bravo");
    let mut tank = DryTank;
    let mut clock = MarsClock::default();
    let mut died_at = None;
    for tick in 0..1_000 {
        let pulse = clock.advance(1.0);
        if rec.advance(&pulse, ActivityState::Active, Some(&mut tank)).died {
            died_at = Some(tick);
            break;
        }
    }
    results.push(TestResult::new(
        "sustained_suffocation_kills",
        died_at.is_some() && rec.is_dead(),
        format!("died after {:?} ticks", died_at),
    ));

    let frozen = *rec.vitals();
    let zeroed = frozen.thirst == 0.0
        && frozen.hunger == 0.0
        && frozen.fatigue == 0.0
        && frozen.stress == 0.0
        && frozen.performance == 0.0;
    results.push(TestResult::new(
        "death_zeroes_vitals",
        zeroed,
        format!("{:?}", frozen),
    ));

    let mut hab = HabitatAtmosphere::default();
    let mut quiet = true;
    for _ in 0..50 {
        let pulse = clock.advance(10.0);
        rec.eat(1.0);
        rec.drink(1.0);
        let report = rec.advance(&pulse, ActivityState::Active, Some(&mut hab));
        quiet &= report.events.is_empty() && !report.died;
    }
    results.push(TestResult::new(
        "dead_record_is_frozen",
        quiet && *rec.vitals() == frozen,
        format!(
            "location {:?}",
            rec.death_record().and_then(|d| d.location.clone())
        ),
    ));
    results
}

// ── 6. Colony Soak ──────────────────────────────────────────────────────

fn run_colony(ctx: &PhysiologyContext, seed: u64, sols: u32) -> (SimulationEngine, Vec<String>) {
    let mut engine = SimulationEngine::new(SimulationContext::new(ctx.clone(), seed));
    let base = engine.habitats.add("Schiaparelli Base", HabitatKind::Settlement);
    let rover = engine.habitats.add("Rover Alpha", HabitatKind::Vehicle);
    let mut colonists = Vec::new();
    for i in 0..24 {
        let home = if i % 6 == 0 { rover } else { base };
        colonists.push(engine.spawn_random_colonist(Name::new("Colonist", i.to_string()), Some(home)));
    }
    engine.spawn_robot(Name::single("Loader"), Some(base));
    engine.init();

    let mut problems = Vec::new();
    for _ in 0..sols {
        for step in 0..100 {
            // Night from 700 to 1000 msol
            let night = step >= 70;
            for &who in &colonists {
                let activity = if night { Activity::Sleeping } else { Activity::Working };
                engine.set_activity(who, activity);
                if step % 25 == 0 {
                    engine.feed(who, 0.2);
                    engine.give_water(who, 1.0);
                }
            }
            engine.update(10.0);
        }
        for &who in &colonists {
            let Ok(phys) = engine.world.get::<&Physiology>(who) else {
                continue;
            };
            let v = phys.vitals();
            let in_range = (0.0..=vital_limits::MAX_THIRST).contains(&v.thirst)
                && (0.0..=vital_limits::MAX_HUNGER).contains(&v.hunger)
                && (0.0..=vital_limits::MAX_FATIGUE).contains(&v.fatigue)
                && (0.0..=vital_limits::MAX_STRESS).contains(&v.stress)
                && (0.0..=1.0).contains(&v.performance);
            if !in_range {
                problems.push(format!("colonist {:?} out of range: {:?}", who, v));
            }
        }
    }
    (engine, problems)
}

fn colony_soak(ctx: &PhysiologyContext, verbose: bool) -> Vec<TestResult> {
    println!("--- Colony soak ---");
    let mut results = Vec::new();
    let sols = 10;

    let (mut engine, problems) = run_colony(ctx, 2_024, sols);
    results.push(TestResult::new(
        "soak_vitals_in_range",
        problems.is_empty(),
        problems
            .first()
            .cloned()
            .unwrap_or_else(|| format!("{} sols, {} colonists", sols, engine.colonist_count())),
    ));
    results.push(TestResult::new(
        "soak_clock_advanced",
        engine.clock().sol() == 1 + sols,
        format!("sol {}", engine.clock().sol()),
    ));

    let accounted = engine.living_count() + engine.burials.len() == 24;
    results.push(TestResult::new(
        "soak_dead_wait_for_burial",
        accounted,
        format!(
            "{} living, {} awaiting burial",
            engine.living_count(),
            engine.burials.len()
        ),
    ));
    results.push(TestResult::new(
        "soak_robot_untouched",
        engine.robot_count() == 1,
        format!("{} robots", engine.robot_count()),
    ));

    let census = engine.census();
    results.push(TestResult::new(
        "soak_census_in_range",
        census.living == engine.living_count()
            && (0.0..=5.0).contains(&census.mean_fitness)
            && (0.0..=1.0).contains(&census.mean_health)
            && census.mean_sleep >= 0.0,
        format!(
            "{} living, {} unfit, fitness {:.2}, health {:.2}, sleep {:.1} msol/sol",
            census.living, census.unfit, census.mean_fitness, census.mean_health, census.mean_sleep
        ),
    ));

    let interrupting = engine
        .health_log
        .iter()
        .filter(|e| e.interrupt().is_some())
        .count();
    let pending = engine.health_log.pending_interrupts().len();
    results.push(TestResult::new(
        "soak_interrupts_follow_retention",
        pending <= interrupting,
        format!("{} pending, {} interrupting events retained", pending, interrupting),
    ));

    if verbose {
        let opened = engine
            .health_log
            .iter()
            .filter(|e| matches!(e.event, HealthEvent::ComplaintOpened(_)))
            .count();
        println!(
            "  {} events in log, {} complaints opened, {} interrupts pending",
            engine.health_log.len(),
            opened,
            pending
        );
        if let Some(worst) = &census.worst_event {
            println!(
                "  worst event: {} on sol {}: {:?} (severity {})",
                worst.name,
                worst.sol,
                worst.event,
                worst.severity()
            );
        }
        if let Some(body) = engine.burials.oldest() {
            println!("  longest awaiting burial: {}", body.name);
        }
        for id in &census.hazardous_habitats {
            println!("  hazardous habitat: {:?}", id);
        }
    }

    let (replay, _) = run_colony(ctx, 2_024, sols);
    let snapshot = |e: &SimulationEngine| -> Vec<(u64, u64)> {
        let mut rows: Vec<(u64, u64)> = e
            .world
            .query::<(&RegistrationOrder, &Physiology)>()
            .iter()
            .map(|(_, (order, phys))| (order.0, phys.vitals().hunger.to_bits()))
            .collect();
        rows.sort();
        rows
    };
    results.push(TestResult::new(
        "soak_is_deterministic",
        snapshot(&engine) == snapshot(&replay),
        "same seed, same colony".into(),
    ));

    let waiting = engine.burials.len();
    let oldest = engine.burials.oldest().map(|b| b.entity);
    let buried = engine.bury_oldest();
    results.push(TestResult::new(
        "burial_takes_longest_waiting",
        match oldest {
            Some(entity) => buried.is_some() && !engine.world.contains(entity),
            None => buried.is_none(),
        },
        format!("{} bodies waiting before burial", waiting),
    ));

    let report = engine.teardown();
    results.push(TestResult::new(
        "teardown_clears_world",
        engine.world.is_empty() && !engine.is_running(),
        format!(
            "{} living at shutdown, {} unburied",
            report.living,
            report.unburied.len()
        ),
    ));
    results
}
