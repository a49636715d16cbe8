//! The per-colonist health record and its tick.
//!
//! [`AgentHealthRecord::advance`] runs the physiology in a fixed order:
//!
//! 1. life support (breathe, check pressure and temperature)
//! 2. vital signs (accrue needs, drain energy, relieve stress)
//! 3. condition checks, every few ticks
//! 4. complaints (progress, escalate, cure, roll random ailments)
//! 5. circadian rhythm
//! 6. dose ledger
//! 7. performance
//! 8. mortality
//!
//! A dead record ignores every mutation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::ComplaintKind;
use crate::circadian::{CircadianRegulator, HormoneLevels};
use crate::clock::ClockPulse;
use crate::complaints::ComplaintRegistry;
use crate::context::PhysiologyContext;
use crate::dose::{BodyRegion, DoseLedger};
use crate::events::{Diagnostic, HealthEvent};
use crate::life_support::{LifeSupport, LifeSupportChecker, ShortfallReport};
use crate::mortality::{DeathCause, DeathRecord};
use crate::performance;
use crate::vitals::{
    ActivityState, BodyProfile, ConditionRequest, NaturalAttributes, VitalFlags, VitalSigns,
    VitalsTracker,
};

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<HealthEvent>,
    pub performance: f64,
    pub shortfall: ShortfallReport,
    /// The colonist died during this tick.
    pub died: bool,
}

/// Complete physiological state of one colonist.
#[derive(Debug, Clone)]
pub struct AgentHealthRecord {
    vitals: VitalsTracker,
    complaints: ComplaintRegistry,
    circadian: CircadianRegulator,
    dose: DoseLedger,
    life_support: LifeSupportChecker,
    rng: ChaCha8Rng,
    location: Option<String>,
    /// Mission sol of the latest pulse.
    sol: u32,
    last_activity: ActivityState,
    dose_pending: bool,
    death: Option<DeathRecord>,
    events: Vec<HealthEvent>,
}

impl AgentHealthRecord {
    /// A fresh record. `seed` drives every random draw this colonist makes.
    pub fn new(
        ctx: &PhysiologyContext,
        profile: BodyProfile,
        attributes: NaturalAttributes,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let vitals = VitalsTracker::new(&ctx.config, profile, attributes, &mut rng);
        let circadian = CircadianRegulator::new(HormoneLevels::randomized(&mut rng));
        // Limit draws come from a side stream so the main sequence is the
        // same whatever the attributes.
        let mut limit_rng = ChaCha8Rng::seed_from_u64(seed);
        limit_rng.set_stream(1);
        let dose = DoseLedger::for_attributes(&attributes, &mut limit_rng);
        Self {
            vitals,
            complaints: ComplaintRegistry::new(ctx.catalog.clone()),
            circadian,
            dose,
            life_support: LifeSupportChecker::new(&ctx.config),
            rng,
            location: None,
            sol: 1,
            last_activity: ActivityState::Active,
            dose_pending: false,
            death: None,
            events: Vec::new(),
        }
    }

    /// Start from the given vitals (clamped into range).
    pub fn with_vitals(mut self, vitals: VitalSigns) -> Self {
        self.vitals.set_vitals(vitals);
        self
    }

    /// Start from vitals drawn from this colonist's generator.
    pub fn with_random_vitals(mut self) -> Self {
        let vitals = VitalSigns::randomized(&mut self.rng);
        self.vitals.set_vitals(vitals);
        self
    }

    /// Seed the dose ledger with radiation picked up before arrival.
    pub fn with_dose_history(mut self) -> Self {
        let attributes = *self.vitals.attributes();
        self.dose = DoseLedger::with_history(&attributes, &mut self.rng);
        self
    }

    /// Pin the starvation and dehydration onsets [millisols].
    pub fn with_onsets(mut self, starvation: f64, dehydration: f64) -> Self {
        self.vitals.set_onsets(starvation, dehydration);
        self
    }

    /// Nudge the sleep habit toward the hours after a work shift ending at
    /// `shift_end` [millisols]. No effect once dead.
    pub fn adapt_sleep_to_shift(&mut self, shift_end: u32, settling_in: bool) {
        if self.is_alive() {
            self.circadian.adapt_to_shift(shift_end, settling_in);
        }
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        if self.is_alive() {
            self.location = Some(location.into());
        }
    }

    /// Run one tick. `provider` is the life support the colonist is
    /// breathing from; `None` means they have none.
    pub fn advance(
        &mut self,
        pulse: &ClockPulse,
        activity: ActivityState,
        provider: Option<&mut dyn LifeSupport>,
    ) -> TickReport {
        if self.is_dead() {
            return TickReport::default();
        }

        self.sol = pulse.mission_sol;
        let mut elapsed = pulse.elapsed;
        if elapsed.is_nan() || elapsed < 0.0 {
            log::warn!("Negative time delta {elapsed}; clamping to zero");
            self.events
                .push(HealthEvent::Diagnostic(Diagnostic::NegativeElapsed(elapsed)));
            elapsed = 0.0;
        }
        let resting = activity != ActivityState::Active;

        // Life support
        if provider.is_none() && elapsed > 0.0 {
            log::debug!("No life support for {:?}", self.location);
            self.events
                .push(HealthEvent::Diagnostic(Diagnostic::MissingLifeSupport));
        }
        let shortfall = self
            .life_support
            .check_tick(elapsed, resting, provider, &mut self.complaints);

        // Vital signs
        let evaluate = elapsed > 0.0 && self.vitals.advance(elapsed, activity);
        if pulse.new_sol {
            let appetite = self.circadian.hormones().appetite_modifier();
            self.vitals.update_personal_max_energy(appetite);
        }

        // Condition checks
        let mut fatal: Option<ComplaintKind> = None;
        if evaluate {
            let requests = self.vitals.evaluate(self.dose.is_sick(), &mut self.rng);
            for request in requests {
                match request {
                    ConditionRequest::Open(kind) => {
                        self.complaints.open(kind);
                    }
                    ConditionRequest::Recover(kind) => {
                        self.complaints.start_recovery(kind);
                    }
                    ConditionRequest::Fatal(kind) => {
                        self.complaints.open(kind);
                        self.complaints.mark_fatal(kind);
                        fatal = self.more_serious(fatal, Some(kind));
                    }
                }
            }
        }

        // Complaints
        let outcome = self
            .complaints
            .advance(elapsed, self.vitals.vitals().performance);
        for kind in &outcome.cured {
            self.vitals.clear_flag_for(*kind);
        }
        fatal = self.more_serious(fatal, outcome.fatal);
        if elapsed > 0.0 && activity != ActivityState::Sleeping {
            self.complaints.check_random_ailments(elapsed, &mut self.rng);
        }

        // Circadian rhythm
        self.circadian.advance(pulse, activity);
        let millisol = pulse.millisol_int();
        if activity == ActivityState::Sleeping && elapsed > 0.0 {
            self.circadian.record_sleep(elapsed);
            self.circadian.update_sleep_cycle(millisol, true);
        } else if self.last_activity == ActivityState::Sleeping {
            self.circadian.update_sleep_cycle(millisol, false);
        }
        self.last_activity = activity;

        // Dose ledger
        if pulse.new_sol || self.dose_pending {
            self.dose.check_and_carry_over(pulse.mission_sol);
            self.dose_pending = false;
        }

        // Performance
        let p = performance::recompute(self.vitals.vitals(), self.complaints.most_serious());
        self.vitals.set_performance(p);

        self.events.extend(self.complaints.take_events());

        // Mortality
        let died = match fatal {
            Some(kind) => self.die(DeathCause::Complaint(kind), pulse),
            None => false,
        };

        TickReport {
            events: std::mem::take(&mut self.events),
            performance: self.vitals.vitals().performance,
            shortfall,
            died,
        }
    }

    fn more_serious(
        &self,
        a: Option<ComplaintKind>,
        b: Option<ComplaintKind>,
    ) -> Option<ComplaintKind> {
        let seriousness = |k: ComplaintKind| {
            self.complaints
                .catalog()
                .get(k)
                .map_or(0, |d| d.seriousness)
        };
        match (a, b) {
            (Some(a), Some(b)) => Some(if seriousness(b) > seriousness(a) { b } else { a }),
            (a, b) => a.or(b),
        }
    }

    fn die(&mut self, cause: DeathCause, pulse: &ClockPulse) -> bool {
        if self.is_dead() {
            return false;
        }
        let most_serious = self.complaints.most_serious().map(|c| c.kind());
        let record = DeathRecord::new(cause, pulse, self.location.clone(), most_serious);
        log::info!(
            "Colonist died of {} on sol {} at {:.0} msol{}",
            cause,
            pulse.mission_sol,
            pulse.millisol,
            self.location
                .as_deref()
                .map(|l| format!(" in {l}"))
                .unwrap_or_default()
        );
        self.vitals.freeze();
        self.events.push(HealthEvent::Death { cause });
        self.events.push(HealthEvent::ExaminationQueued);
        self.death = Some(record);
        true
    }

    /// Kill the colonist now. Returns the death events, or nothing if they
    /// were already dead.
    pub fn declare_dead(&mut self, cause: DeathCause, pulse: &ClockPulse) -> Vec<HealthEvent> {
        if self.die(cause, pulse) {
            std::mem::take(&mut self.events)
        } else {
            Vec::new()
        }
    }

    /// Eat `food_kg` of food. Returns the kJ absorbed.
    pub fn eat(&mut self, food_kg: f64) -> f64 {
        if self.is_dead() {
            return 0.0;
        }
        let kj = self.vitals.eat(food_kg);
        self.circadian.eat_food(kj);
        kj
    }

    pub fn drink(&mut self, water_kg: f64) {
        if self.is_alive() {
            self.vitals.drink(water_kg);
        }
    }

    pub fn exercise(&mut self, time: f64) {
        if self.is_alive() {
            self.vitals.exercise(time);
            self.circadian.record_exercise(time);
        }
    }

    pub fn add_stress(&mut self, amount: f64) {
        if self.is_alive() {
            self.vitals.add_stress(amount);
        }
    }

    /// Record a radiation dose. It is reported with the next tick.
    pub fn expose(&mut self, region: BodyRegion, amount: f64) {
        if self.is_dead() {
            return;
        }
        self.dose.check_and_carry_over(self.sol);
        if self.dose.add_dose(region, amount) {
            if amount > 0.0 {
                self.events
                    .push(HealthEvent::RadiationExposure { region, amount });
                self.dose_pending = true;
            }
        } else {
            self.events
                .push(HealthEvent::Diagnostic(Diagnostic::InvalidDose(amount)));
        }
    }

    /// Medical treatment: start recovery of an active complaint.
    pub fn treat(&mut self, kind: ComplaintKind) -> bool {
        self.is_alive() && self.complaints.start_recovery(kind)
    }

    /// Mark the body as examined. Returns false if alive or already done.
    pub fn mark_examined(&mut self) -> bool {
        match &mut self.death {
            Some(record) if !record.examined => {
                record.examined = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn is_dead(&self) -> bool {
        self.death.is_some()
    }

    pub fn death_record(&self) -> Option<&DeathRecord> {
        self.death.as_ref()
    }

    pub fn vitals(&self) -> &VitalSigns {
        self.vitals.vitals()
    }

    pub fn tracker(&self) -> &VitalsTracker {
        &self.vitals
    }

    pub fn flags(&self) -> &VitalFlags {
        self.vitals.flags()
    }

    pub fn complaints(&self) -> &ComplaintRegistry {
        &self.complaints
    }

    pub fn circadian(&self) -> &CircadianRegulator {
        &self.circadian
    }

    pub fn dose(&self) -> &DoseLedger {
        &self.dose
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn performance(&self) -> f64 {
        self.vitals.vitals().performance
    }

    /// Start [millisols] of the two most preferred sleep buckets.
    pub fn preferred_sleep_hours(&self) -> (u32, u32) {
        self.circadian.preferred_hours()
    }

    pub fn fitness_level(&self) -> u8 {
        performance::fitness_level(self.vitals(), self.complaints.has_serious())
    }

    pub fn health_score(&self) -> f64 {
        performance::health_score(self.vitals())
    }

    /// True when fitness is below `min_level` or the colonist is dead.
    pub fn is_unfit(&self, min_level: u8) -> bool {
        self.is_dead()
            || performance::is_unfit_by_level(self.vitals(), self.complaints.has_serious(), min_level)
    }

    /// Mean sleep [millisols] over the logged sols.
    pub fn average_sleep(&self) -> f64 {
        self.circadian.average_sleep()
    }
}
