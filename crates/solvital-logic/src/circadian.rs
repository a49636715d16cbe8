//! Circadian rhythm: appetite hormones, learned sleep habit, and rolling
//! logs of sleep and exercise.
//!
//! Leptin (satiety) and ghrelin (hunger) both live in [0, 1000]. Being
//! awake drains leptin and raises ghrelin; sleeping and eating do the
//! reverse. The sleep habit is a 20-bucket histogram over the sol that is
//! reinforced whenever the colonist sleeps and decays every sol.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::ClockPulse;
use crate::vitals::ActivityState;

pub const HORMONE_MAX: f64 = 1_000.0;
/// Buckets in the sleep habit histogram.
pub const SLEEP_BUCKETS: usize = 20;
/// Width of one bucket [millisols].
pub const BUCKET_WIDTH: u32 = 50;
/// Saturation level of a single bucket.
pub const MAX_SLEEP_WEIGHT: f64 = 1_000.0;
/// Sols retained in the sleep and exercise logs.
pub const LOG_SOLS: usize = 7;

/// Weight added at the center bucket, then ±1, then ±2.
const REINFORCEMENT: [f64; 3] = [10.0, 5.0, 2.0];
const SATURATION_RESCALE: f64 = 0.5;
const DAILY_DECAY: f64 = 0.9;

// Hormone drift per millisol
const LEPTIN_AWAKE: f64 = -0.25;
const GHRELIN_AWAKE: f64 = 0.25;
const LEPTIN_ASLEEP: f64 = 0.5;
const GHRELIN_ASLEEP: f64 = -0.5;
/// Hormone shift per kJ eaten.
const MEAL_HORMONE_SHIFT: f64 = 0.1;
/// Ghrelin gained per millisol of exercise.
const EXERCISE_GHRELIN: f64 = 0.2;

/// Appetite hormone levels with the colonist's personal thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HormoneLevels {
    pub leptin: f64,
    pub ghrelin: f64,
    pub leptin_threshold: f64,
    pub ghrelin_threshold: f64,
}

impl Default for HormoneLevels {
    fn default() -> Self {
        Self {
            leptin: 500.0,
            ghrelin: 500.0,
            leptin_threshold: 400.0,
            ghrelin_threshold: 600.0,
        }
    }
}

impl HormoneLevels {
    /// Levels with personal thresholds spread around the defaults.
    pub fn randomized(rng: &mut impl Rng) -> Self {
        Self {
            leptin_threshold: 400.0 + rng.gen_range(-50.0..=50.0),
            ghrelin_threshold: 600.0 + rng.gen_range(-50.0..=50.0),
            ..Self::default()
        }
    }

    fn shift(&mut self, leptin: f64, ghrelin: f64) {
        self.leptin = (self.leptin + leptin).clamp(0.0, HORMONE_MAX);
        self.ghrelin = (self.ghrelin + ghrelin).clamp(0.0, HORMONE_MAX);
    }

    /// Hormonal pull toward eating; positive when hungry.
    pub fn appetite_modifier(&self) -> f64 {
        (self.ghrelin - self.leptin) / 200.0
    }

    /// Ghrelin above and leptin below the personal thresholds.
    pub fn is_hungry(&self) -> bool {
        self.ghrelin > self.ghrelin_threshold && self.leptin < self.leptin_threshold
    }
}

/// Learned preference for sleeping at each time of sol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPreferenceMap {
    weights: [f64; SLEEP_BUCKETS],
}

impl Default for SleepPreferenceMap {
    fn default() -> Self {
        Self {
            weights: [0.0; SLEEP_BUCKETS],
        }
    }
}

impl SleepPreferenceMap {
    /// Bucket containing `millisol`.
    pub fn bucket_of(millisol: u32) -> usize {
        (millisol / BUCKET_WIDTH) as usize % SLEEP_BUCKETS
    }

    pub fn weight(&self, bucket: usize) -> f64 {
        self.weights[bucket % SLEEP_BUCKETS]
    }

    /// Reinforce (`sleeping`) or discourage the bucket at `millisol` and its
    /// neighbours, wrapping around the sol.
    pub fn update(&mut self, millisol: u32, sleeping: bool) {
        let center = Self::bucket_of(millisol);
        let sign = if sleeping { 1.0 } else { -1.0 };
        for (distance, amount) in REINFORCEMENT.iter().enumerate() {
            let below = (center + SLEEP_BUCKETS - distance) % SLEEP_BUCKETS;
            let above = (center + distance) % SLEEP_BUCKETS;
            self.bump(below, sign * amount);
            if above != below {
                self.bump(above, sign * amount);
            }
        }
    }

    fn bump(&mut self, bucket: usize, amount: f64) {
        let w = &mut self.weights[bucket];
        *w = (*w + amount).clamp(0.0, MAX_SLEEP_WEIGHT);
    }

    /// Daily decay. A saturated map is halved before the regular decay.
    pub fn inflate(&mut self) {
        if self.weights.iter().any(|w| *w >= MAX_SLEEP_WEIGHT) {
            for w in &mut self.weights {
                *w *= SATURATION_RESCALE;
            }
        }
        for w in &mut self.weights {
            *w *= DAILY_DECAY;
        }
    }

    /// Start [millisols] of the two most preferred buckets. Ties go to the
    /// earliest bucket; the second never repeats the first.
    pub fn preferred_hours(&self) -> (u32, u32) {
        let first = self.best_bucket(None);
        let second = self.best_bucket(Some(first));
        (
            first as u32 * BUCKET_WIDTH,
            second as u32 * BUCKET_WIDTH,
        )
    }

    fn best_bucket(&self, exclude: Option<usize>) -> usize {
        let mut best: Option<usize> = None;
        for (i, w) in self.weights.iter().enumerate() {
            if Some(i) == exclude {
                continue;
            }
            match best {
                Some(b) if *w <= self.weights[b] => {}
                _ => best = Some(i),
            }
        }
        best.unwrap_or(0)
    }
}

/// Per-sol total in a rolling log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub sol: u32,
    pub millisols: f64,
}

/// Hormones, sleep habit, and activity history of one colonist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircadianRegulator {
    hormones: HormoneLevels,
    sleep_map: SleepPreferenceMap,
    sleep_log: VecDeque<DailyTotal>,
    exercise_log: VecDeque<DailyTotal>,
    today: u32,
    sleep_today: f64,
    exercise_today: f64,
}

impl Default for CircadianRegulator {
    fn default() -> Self {
        Self::new(HormoneLevels::default())
    }
}

impl CircadianRegulator {
    pub fn new(hormones: HormoneLevels) -> Self {
        Self {
            hormones,
            sleep_map: SleepPreferenceMap::default(),
            sleep_log: VecDeque::with_capacity(LOG_SOLS),
            exercise_log: VecDeque::with_capacity(LOG_SOLS),
            today: 1,
            sleep_today: 0.0,
            exercise_today: 0.0,
        }
    }

    /// Drift hormones for this tick and roll the daily state over on a new
    /// sol.
    pub fn advance(&mut self, pulse: &ClockPulse, activity: ActivityState) {
        if pulse.new_sol {
            self.close_day(pulse.mission_sol);
            self.inflate_sleep_habit();
        }
        let t = pulse.elapsed.max(0.0);
        match activity {
            ActivityState::Sleeping => self.hormones.shift(LEPTIN_ASLEEP * t, GHRELIN_ASLEEP * t),
            ActivityState::Active | ActivityState::Resting => {
                self.hormones.shift(LEPTIN_AWAKE * t, GHRELIN_AWAKE * t)
            }
        }
    }

    fn close_day(&mut self, new_sol: u32) {
        push_capped(
            &mut self.sleep_log,
            DailyTotal {
                sol: self.today,
                millisols: self.sleep_today,
            },
        );
        push_capped(
            &mut self.exercise_log,
            DailyTotal {
                sol: self.today,
                millisols: self.exercise_today,
            },
        );
        self.today = new_sol;
        self.sleep_today = 0.0;
        self.exercise_today = 0.0;
    }

    /// Log `amount` millisols of sleep for today.
    pub fn record_sleep(&mut self, amount: f64) {
        self.sleep_today += amount.max(0.0);
    }

    /// Log `amount` millisols of exercise for today. Exercise makes hungry.
    pub fn record_exercise(&mut self, amount: f64) {
        let t = amount.max(0.0);
        self.exercise_today += t;
        self.hormones.shift(0.0, EXERCISE_GHRELIN * t);
    }

    /// A meal of `kj` kilojoules raises leptin and lowers ghrelin.
    pub fn eat_food(&mut self, kj: f64) {
        let shift = kj.max(0.0) * MEAL_HORMONE_SHIFT;
        self.hormones.shift(shift, -shift);
    }

    pub fn update_sleep_cycle(&mut self, millisol: u32, sleeping: bool) {
        self.sleep_map.update(millisol, sleeping);
    }

    /// Pull the sleep habit toward the hours after a work shift ending at
    /// `shift_end` [millisols]. A colonist `settling_in` to the shift also
    /// has the hours leading up to its end discouraged.
    pub fn adapt_to_shift(&mut self, shift_end: u32, settling_in: bool) {
        let steps = if settling_in { 15 } else { 5 };
        for i in 1..=steps {
            if settling_in {
                let before = (shift_end + 1_000 - (20 * i) % 1_000) % 1_000;
                self.sleep_map.update(before, false);
            }
            let after = (shift_end + 10 * i) % 1_000;
            self.sleep_map.update(after, true);
        }
    }

    pub fn inflate_sleep_habit(&mut self) {
        self.sleep_map.inflate();
    }

    pub fn preferred_hours(&self) -> (u32, u32) {
        self.sleep_map.preferred_hours()
    }

    pub fn hormones(&self) -> &HormoneLevels {
        &self.hormones
    }

    pub fn sleep_map(&self) -> &SleepPreferenceMap {
        &self.sleep_map
    }

    pub fn sleep_log(&self) -> impl Iterator<Item = &DailyTotal> {
        self.sleep_log.iter()
    }

    pub fn exercise_log(&self) -> impl Iterator<Item = &DailyTotal> {
        self.exercise_log.iter()
    }

    pub fn sleep_today(&self) -> f64 {
        self.sleep_today
    }

    /// Mean sleep per logged sol.
    pub fn average_sleep(&self) -> f64 {
        if self.sleep_log.is_empty() {
            return 0.0;
        }
        self.sleep_log.iter().map(|d| d.millisols).sum::<f64>() / self.sleep_log.len() as f64
    }
}

fn push_capped(log: &mut VecDeque<DailyTotal>, entry: DailyTotal) {
    if log.len() == LOG_SOLS {
        log.pop_front();
    }
    log.push_back(entry);
}
