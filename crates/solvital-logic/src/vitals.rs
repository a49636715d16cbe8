//! Vital signs: accrual of thirst, hunger and fatigue, caloric energy,
//! stress, musculature, and the periodic threshold checks that open or
//! recover condition complaints.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::ComplaintKind;
use crate::config::PhysiologyConfig;
use crate::constants::energy::{
    DRAIN_BANDS, FOOD_COMPOSITION_RATIO, INTAKE_BANDS, STANDARD_DAILY_INTAKE,
};
use crate::constants::thresholds;
use crate::constants::vital_limits::{
    MAX_FATIGUE, MAX_HUNGER, MAX_MUSCLE, MAX_STRESS, MAX_THIRST, MIN_ENERGY,
};

/// What the colonist's body is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivityState {
    #[default]
    Active,
    Resting,
    Sleeping,
}

/// Current vital signs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Millisols since last drink, [0, 7000].
    pub thirst: f64,
    /// Millisols since last meal, [0, 40000].
    pub hunger: f64,
    /// Millisols since last sleep, [0, 40000].
    pub fatigue: f64,
    /// Percent, [0, 100].
    pub stress: f64,
    /// Caloric energy [kJ], [100, 2 × personal max].
    pub energy: f64,
    /// Overall performance, [0, 1].
    pub performance: f64,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self {
            thirst: 0.0,
            hunger: 0.0,
            fatigue: 0.0,
            stress: 0.0,
            energy: STANDARD_DAILY_INTAKE,
            performance: 1.0,
        }
    }
}

impl VitalSigns {
    /// Starting vitals spread the way a crew looks after landing.
    pub fn randomized(rng: &mut impl Rng) -> Self {
        Self {
            thirst: rng.gen_range(0.0..100.0),
            hunger: rng.gen_range(0.0..200.0),
            fatigue: rng.gen_range(0.0..200.0),
            stress: rng.gen_range(0.0..20.0),
            energy: rng.gen_range(8_000.0..11_000.0),
            performance: 1.0,
        }
    }

    fn clamp_into(&mut self, max_energy: f64) {
        self.thirst = clamp_or(self.thirst, 0.0, MAX_THIRST);
        self.hunger = clamp_or(self.hunger, 0.0, MAX_HUNGER);
        self.fatigue = clamp_or(self.fatigue, 0.0, MAX_FATIGUE);
        self.stress = clamp_or(self.stress, 0.0, MAX_STRESS);
        self.energy = clamp_or(self.energy, MIN_ENERGY, max_energy);
        self.performance = clamp_or(self.performance, 0.0, 1.0);
    }
}

/// Clamp, mapping NaN to the lower bound.
fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Musculoskeletal indices, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Musculature {
    pub pain_tolerance: f64,
    pub health: f64,
    pub soreness: f64,
}

impl Default for Musculature {
    fn default() -> Self {
        Self {
            pain_tolerance: 50.0,
            health: 50.0,
            soreness: 0.0,
        }
    }
}

impl Musculature {
    /// Exercise builds muscle and tolerance at the cost of soreness.
    pub fn exercise(&mut self, time: f64) {
        self.health = (self.health + time / 20.0).min(MAX_MUSCLE);
        self.pain_tolerance = (self.pain_tolerance + time / 50.0).min(MAX_MUSCLE);
        self.soreness = (self.soreness + time / 10.0).min(MAX_MUSCLE);
    }

    /// Disuse slowly wastes muscle; soreness fades.
    pub fn atrophy(&mut self, time: f64) {
        self.health = (self.health - time / 400.0).max(0.0);
        self.pain_tolerance = (self.pain_tolerance - time / 800.0).max(0.0);
        self.soreness = (self.soreness - time / 20.0).max(0.0);
    }

    /// Scales how strongly stress is felt, in [1, 1.5].
    pub fn pain_factor(&self) -> f64 {
        1.0 + self.pain_tolerance / 200.0
    }
}

/// Condition flags maintained by the threshold checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalFlags {
    pub thirsty: bool,
    pub starving: bool,
    pub dehydrated: bool,
    pub stressed_out: bool,
    pub collapsed: bool,
    pub radiation_poisoned: bool,
}

/// Physical build of a colonist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub mass_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
}

impl Default for BodyProfile {
    fn default() -> Self {
        let config = PhysiologyConfig::default();
        Self {
            mass_kg: config.average_mass,
            height_cm: config.average_height,
            age_years: 35.0,
        }
    }
}

impl BodyProfile {
    /// Multiplier on need accrual relative to the average body.
    pub fn body_mass_deviation(&self, config: &PhysiologyConfig) -> f64 {
        let ratio = (self.mass_kg / config.average_mass) * (self.height_cm / config.average_height);
        if ratio.is_finite() && ratio > 0.0 {
            ratio.sqrt()
        } else {
            1.0
        }
    }
}

/// Innate attributes that shape breakdown and collapse odds, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalAttributes {
    pub endurance: u8,
    pub strength: u8,
    pub resilience: u8,
    pub emotional_stability: u8,
}

impl Default for NaturalAttributes {
    fn default() -> Self {
        Self {
            endurance: 50,
            strength: 50,
            resilience: 50,
            emotional_stability: 50,
        }
    }
}

impl NaturalAttributes {
    pub fn randomized(rng: &mut impl Rng) -> Self {
        Self {
            endurance: rng.gen_range(20..=80),
            strength: rng.gen_range(20..=80),
            resilience: rng.gen_range(20..=80),
            emotional_stability: rng.gen_range(20..=80),
        }
    }
}

/// Outcome of a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionRequest {
    Open(ComplaintKind),
    Recover(ComplaintKind),
    Fatal(ComplaintKind),
}

/// Vital signs of one colonist and the rules that move them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsTracker {
    vitals: VitalSigns,
    muscles: Musculature,
    flags: VitalFlags,
    profile: BodyProfile,
    attributes: NaturalAttributes,
    body_mass_deviation: f64,
    personal_max_energy: f64,
    starvation_onset: f64,
    dehydration_onset: f64,
    check_interval: u32,
    ticks: u64,
    stress_breakdown_threshold: f64,
    fatigue_collapse_threshold: f64,
    sleep_fatigue_recovery: f64,
    food_consumption: f64,
    water_consumption: f64,
    average_mass: f64,
}

impl VitalsTracker {
    pub fn new(
        config: &PhysiologyConfig,
        profile: BodyProfile,
        attributes: NaturalAttributes,
        rng: &mut impl Rng,
    ) -> Self {
        let spread = config.onset_variation;
        let mut jitter = |base: f64| {
            if spread > 0.0 {
                base * (1.0 + rng.gen_range(-spread..=spread))
            } else {
                base
            }
        };
        let starvation_onset = jitter(config.starvation_onset());
        let dehydration_onset = jitter(config.dehydration_onset());

        let mut tracker = Self {
            vitals: VitalSigns::default(),
            muscles: Musculature::default(),
            flags: VitalFlags::default(),
            profile,
            attributes,
            body_mass_deviation: profile.body_mass_deviation(config),
            personal_max_energy: STANDARD_DAILY_INTAKE,
            starvation_onset,
            dehydration_onset,
            check_interval: config.condition_check_interval.max(1),
            ticks: 0,
            stress_breakdown_threshold: config.stress_breakdown_threshold,
            fatigue_collapse_threshold: config.fatigue_collapse_threshold,
            sleep_fatigue_recovery: config.sleep_fatigue_recovery,
            food_consumption: config.food_consumption,
            water_consumption: config.water_consumption,
            average_mass: config.average_mass,
        };
        tracker.update_personal_max_energy(0.0);
        tracker
    }

    /// Replace the vitals, clamping each into range.
    pub fn set_vitals(&mut self, mut vitals: VitalSigns) {
        vitals.clamp_into(self.max_energy());
        self.vitals = vitals;
        self.flags.thirsty = self.vitals.thirst > thresholds::THIRST;
    }

    /// Pin the onset thresholds, bypassing the per-colonist spread.
    /// A non-finite value leaves that onset unchanged.
    pub fn set_onsets(&mut self, starvation: f64, dehydration: f64) {
        if starvation.is_finite() {
            self.starvation_onset = starvation.clamp(0.0, MAX_HUNGER);
        } else {
            log::warn!("Ignoring non-finite starvation onset {starvation}");
        }
        if dehydration.is_finite() {
            self.dehydration_onset = dehydration.clamp(0.0, MAX_THIRST);
        } else {
            log::warn!("Ignoring non-finite dehydration onset {dehydration}");
        }
    }

    /// Accrue needs for `elapsed` millisols. Returns true when this tick is
    /// due for a condition evaluation.
    pub fn advance(&mut self, elapsed: f64, activity: ActivityState) -> bool {
        self.ticks += 1;
        let rate = elapsed * self.body_mass_deviation;
        let v = &mut self.vitals;

        match activity {
            ActivityState::Active => {
                v.thirst += rate;
                v.hunger += rate;
                v.fatigue += rate;
            }
            ActivityState::Resting => {
                v.thirst += rate / 2.0;
                v.hunger += rate / 2.0;
                v.fatigue += rate / 2.0;
            }
            ActivityState::Sleeping => {
                v.thirst += rate / 2.0;
                v.hunger += rate / 2.0;
                v.fatigue -= elapsed * self.sleep_fatigue_recovery;
            }
        }

        self.drain_energy(elapsed);

        let relief = match activity {
            ActivityState::Active => 1.0,
            ActivityState::Resting | ActivityState::Sleeping => 2.0,
        };
        self.reduce_stress(elapsed / 10.0 * relief);
        if activity == ActivityState::Resting {
            self.muscles.atrophy(elapsed);
        }

        let max_energy = self.max_energy();
        self.vitals.clamp_into(max_energy);
        self.flags.thirsty = self.vitals.thirst > thresholds::THIRST;

        self.ticks % self.check_interval as u64 == 0
    }

    fn drain_energy(&mut self, elapsed: f64) {
        let base = elapsed * STANDARD_DAILY_INTAKE / 1_000.0;
        let factor = DRAIN_BANDS
            .iter()
            .find(|(upper, _)| self.vitals.energy < *upper)
            .map_or(0.7, |(_, f)| *f);
        self.vitals.energy = (self.vitals.energy - base * factor).max(MIN_ENERGY);
    }

    /// Eat `food_kg` of food. Returns the kJ absorbed.
    pub fn eat(&mut self, food_kg: f64) -> f64 {
        if food_kg.is_nan() || food_kg <= 0.0 {
            return 0.0;
        }
        let appetite = self.personal_max_energy / STANDARD_DAILY_INTAKE;
        let factor = INTAKE_BANDS
            .iter()
            .find(|(lower, _)| self.vitals.energy > *lower)
            .map_or(1.1, |(_, f)| *f);
        let gained = food_kg * FOOD_COMPOSITION_RATIO * appetite * factor;
        self.vitals.energy = (self.vitals.energy + gained).clamp(MIN_ENERGY, self.max_energy());

        let relief = food_kg / self.food_consumption * 1_000.0;
        self.vitals.hunger = (self.vitals.hunger - relief)
            .max(0.0)
            .min(thresholds::HUNGER_CEILING_UPON_EATING);
        gained
    }

    /// Drink `water_kg` of water.
    pub fn drink(&mut self, water_kg: f64) {
        if water_kg.is_nan() || water_kg <= 0.0 {
            return;
        }
        let relief = water_kg / self.water_consumption * 1_000.0;
        self.vitals.thirst = (self.vitals.thirst - relief)
            .max(0.0)
            .min(thresholds::THIRST_CEILING_UPON_DRINKING);
        self.flags.thirsty = self.vitals.thirst > thresholds::THIRST;
    }

    /// Exercise for `time` millisols: builds muscle, costs water and rest.
    pub fn exercise(&mut self, time: f64) {
        let t = time.max(0.0);
        self.muscles.exercise(t);
        self.vitals.thirst = (self.vitals.thirst + t / 5.0).min(MAX_THIRST);
        self.vitals.fatigue = (self.vitals.fatigue + t / 2.0).min(MAX_FATIGUE);
        self.flags.thirsty = self.vitals.thirst > thresholds::THIRST;
    }

    pub fn add_stress(&mut self, amount: f64) {
        let delta = amount.max(0.0) / self.muscles.pain_factor();
        self.vitals.stress = (self.vitals.stress + delta).clamp(0.0, MAX_STRESS);
    }

    pub fn reduce_stress(&mut self, amount: f64) {
        let delta = amount.max(0.0) * self.muscles.pain_factor();
        self.vitals.stress = (self.vitals.stress - delta).clamp(0.0, MAX_STRESS);
    }

    /// Recompute the personal energy ceiling from age, build and appetite
    /// hormones. Runs once per sol.
    pub fn update_personal_max_energy(&mut self, hormonal_modifier: f64) {
        let age_factor = (70.0 - self.profile.age_years) / 70.0;
        let mass_factor = (self.profile.mass_kg - self.average_mass) / self.average_mass;
        let raw = (age_factor + mass_factor + hormonal_modifier).clamp(0.0, 1.0);
        self.personal_max_energy = STANDARD_DAILY_INTAKE * (0.75 + raw / 2.0);
        let max_energy = self.max_energy();
        self.vitals.energy = self.vitals.energy.min(max_energy);
    }

    /// Run the threshold checks. `radiation_sick` comes from the dose
    /// ledger.
    pub fn evaluate(&mut self, radiation_sick: bool, rng: &mut impl Rng) -> Vec<ConditionRequest> {
        let mut requests = Vec::new();
        self.check_starvation(&mut requests);
        self.check_dehydration(&mut requests);
        self.check_stress(rng, &mut requests);
        self.check_fatigue(rng, &mut requests);
        self.check_radiation(radiation_sick, &mut requests);
        requests
    }

    fn check_starvation(&mut self, out: &mut Vec<ConditionRequest>) {
        let v = &self.vitals;
        if !self.flags.starving {
            if v.hunger >= self.starvation_onset && v.energy < thresholds::STARVATION_ENERGY {
                self.flags.starving = true;
                out.push(ConditionRequest::Open(ComplaintKind::Starvation));
            }
        } else if v.hunger >= MAX_HUNGER {
            out.push(ConditionRequest::Fatal(ComplaintKind::Starvation));
        } else if v.hunger < thresholds::STARVATION_RECOVERY_HUNGER
            && v.energy > thresholds::STARVATION_RECOVERY_ENERGY
        {
            self.flags.starving = false;
            out.push(ConditionRequest::Recover(ComplaintKind::Starvation));
        }
    }

    fn check_dehydration(&mut self, out: &mut Vec<ConditionRequest>) {
        let thirst = self.vitals.thirst;
        if !self.flags.dehydrated {
            if thirst >= self.dehydration_onset {
                self.flags.dehydrated = true;
                out.push(ConditionRequest::Open(ComplaintKind::Dehydration));
            }
        } else if thirst >= MAX_THIRST {
            out.push(ConditionRequest::Fatal(ComplaintKind::Dehydration));
        } else if thirst < thresholds::DEHYDRATION_RECOVERY_THIRST {
            self.flags.dehydrated = false;
            out.push(ConditionRequest::Recover(ComplaintKind::Dehydration));
        }
    }

    fn check_stress(&mut self, rng: &mut impl Rng, out: &mut Vec<ConditionRequest>) {
        let threshold = self.stress_breakdown_threshold;
        let stress = self.vitals.stress;
        if !self.flags.stressed_out {
            if stress >= threshold {
                let severity =
                    ((stress - threshold) / (MAX_STRESS - threshold).max(1.0)).clamp(0.0, 1.0);
                let a = &self.attributes;
                let chance =
                    breakdown_chance(severity, a.resilience as u16 + a.emotional_stability as u16);
                if rng.gen::<f64>() < chance {
                    self.flags.stressed_out = true;
                    out.push(ConditionRequest::Open(ComplaintKind::PanicAttack));
                }
            }
        } else if stress < threshold {
            self.flags.stressed_out = false;
            out.push(ConditionRequest::Recover(ComplaintKind::PanicAttack));
        }
    }

    fn check_fatigue(&mut self, rng: &mut impl Rng, out: &mut Vec<ConditionRequest>) {
        let threshold = self.fatigue_collapse_threshold;
        let fatigue = self.vitals.fatigue;
        if !self.flags.collapsed {
            if fatigue >= threshold {
                let severity = ((fatigue - threshold) / threshold.max(1.0)).clamp(0.0, 1.0);
                let a = &self.attributes;
                let chance = breakdown_chance(severity, a.endurance as u16 + a.strength as u16);
                if rng.gen::<f64>() < chance {
                    self.flags.collapsed = true;
                    out.push(ConditionRequest::Open(ComplaintKind::HighFatigueCollapse));
                }
            }
        } else if fatigue < thresholds::COLLAPSE_RECOVERY_FATIGUE {
            self.flags.collapsed = false;
            out.push(ConditionRequest::Recover(ComplaintKind::HighFatigueCollapse));
        }
    }

    fn check_radiation(&mut self, sick: bool, out: &mut Vec<ConditionRequest>) {
        if sick && !self.flags.radiation_poisoned {
            self.flags.radiation_poisoned = true;
            out.push(ConditionRequest::Open(ComplaintKind::RadiationSickness));
        } else if !sick && self.flags.radiation_poisoned {
            self.flags.radiation_poisoned = false;
            out.push(ConditionRequest::Recover(ComplaintKind::RadiationSickness));
        }
    }

    /// Clear the flag tied to a complaint once it is gone.
    pub fn clear_flag_for(&mut self, kind: ComplaintKind) {
        match kind {
            ComplaintKind::Starvation => self.flags.starving = false,
            ComplaintKind::Dehydration => self.flags.dehydrated = false,
            ComplaintKind::PanicAttack => self.flags.stressed_out = false,
            ComplaintKind::HighFatigueCollapse => self.flags.collapsed = false,
            ComplaintKind::RadiationSickness => self.flags.radiation_poisoned = false,
            _ => {}
        }
    }

    /// Zero every vital at death. Energy rests at its floor.
    pub fn freeze(&mut self) {
        self.vitals = VitalSigns {
            thirst: 0.0,
            hunger: 0.0,
            fatigue: 0.0,
            stress: 0.0,
            energy: MIN_ENERGY,
            performance: 0.0,
        };
        self.flags = VitalFlags::default();
    }

    pub fn set_performance(&mut self, performance: f64) {
        self.vitals.performance = clamp_or(performance, 0.0, 1.0);
    }

    pub fn vitals(&self) -> &VitalSigns {
        &self.vitals
    }

    pub fn muscles(&self) -> &Musculature {
        &self.muscles
    }

    pub fn flags(&self) -> &VitalFlags {
        &self.flags
    }

    pub fn attributes(&self) -> &NaturalAttributes {
        &self.attributes
    }

    pub fn profile(&self) -> &BodyProfile {
        &self.profile
    }

    pub fn body_mass_deviation(&self) -> f64 {
        self.body_mass_deviation
    }

    pub fn personal_max_energy(&self) -> f64 {
        self.personal_max_energy
    }

    /// Upper bound on stored energy.
    pub fn max_energy(&self) -> f64 {
        2.0 * self.personal_max_energy
    }

    pub fn starvation_onset(&self) -> f64 {
        self.starvation_onset
    }

    pub fn dehydration_onset(&self) -> f64 {
        self.dehydration_onset
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Odds of a stress breakdown or fatigue collapse at a given severity.
/// A sturdy colonist (attribute sum 200) halves the odds; a frail one
/// (sum 0) raises them by half.
pub fn breakdown_chance(severity: f64, attribute_sum: u16) -> f64 {
    let sturdiness = 1.5 - attribute_sum as f64 / 200.0;
    ((0.25 + 0.75 * severity) * sturdiness).clamp(0.0, 1.0)
}
