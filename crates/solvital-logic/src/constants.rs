//! Physiology constants: vital bounds, thresholds, modifiers.
//!
//! Needs (thirst, hunger, fatigue) are measured in millisols of deprivation,
//! energy in kJ, stress in percent. Both the ECS engine and the headless
//! simtest read these.

pub mod vital_limits {
    pub const MAX_THIRST: f64 = 7_000.0;
    pub const MAX_HUNGER: f64 = 40_000.0;
    pub const MAX_FATIGUE: f64 = 40_000.0;
    pub const MAX_STRESS: f64 = 100.0;
    /// Floor of caloric energy [kJ]; metabolism never drains below this.
    pub const MIN_ENERGY: f64 = 100.0;
    /// Upper bound of each musculoskeletal index.
    pub const MAX_MUSCLE: f64 = 100.0;
}

pub mod thresholds {
    /// Thirst above this sets the `thirsty` flag.
    pub const THIRST: f64 = 150.0;
    pub const HUNGER: f64 = 250.0;
    pub const FATIGUE: f64 = 750.0;
    /// Starvation needs hunger past onset *and* energy below this [kJ].
    pub const STARVATION_ENERGY: f64 = 120.0;
    pub const STARVATION_RECOVERY_HUNGER: f64 = 500.0;
    pub const STARVATION_RECOVERY_ENERGY: f64 = 800.0;
    pub const DEHYDRATION_RECOVERY_THIRST: f64 = 300.0;
    pub const COLLAPSE_RECOVERY_FATIGUE: f64 = 750.0;
    /// Hunger is capped here right after a meal.
    pub const HUNGER_CEILING_UPON_EATING: f64 = 750.0;
    /// Thirst is capped here right after a drink.
    pub const THIRST_CEILING_UPON_DRINKING: f64 = 500.0;
    /// Complaints at or above this seriousness count as serious.
    pub const SERIOUS_COMPLAINT: u8 = 50;
}

pub mod energy {
    /// Average maximum daily energy intake [kJ].
    pub const STANDARD_DAILY_INTAKE: f64 = 10_100.0;
    /// kJ per kg of food. A 0.155 kg meal carries ~2525 kJ.
    pub const FOOD_COMPOSITION_RATIO: f64 = 16_290.323;
    /// Energy bands [kJ] and drain multipliers, lowest band first.
    pub const DRAIN_BANDS: [(f64, f64); 11] = [
        (500.0, 0.20),
        (1_000.0, 0.25),
        (3_000.0, 0.30),
        (5_000.0, 0.35),
        (7_000.0, 0.40),
        (9_000.0, 0.45),
        (11_000.0, 0.50),
        (13_000.0, 0.55),
        (15_000.0, 0.60),
        (17_000.0, 0.65),
        (f64::INFINITY, 0.70),
    ];
    /// Energy bands [kJ] and intake multipliers, highest band first.
    /// A well-fed body absorbs less of each meal.
    pub const INTAKE_BANDS: [(f64, f64); 13] = [
        (19_000.0, 0.035),
        (17_000.0, 0.06),
        (15_000.0, 0.15),
        (13_000.0, 0.20),
        (11_000.0, 0.25),
        (9_000.0, 0.30),
        (7_000.0, 0.45),
        (5_000.0, 0.55),
        (4_000.0, 0.65),
        (3_000.0, 0.75),
        (2_525.0, 0.85),
        (1_262.5, 0.95),
        (0.0, 1.10),
    ];
}

pub mod performance {
    pub const THIRST_MODIFIER: f64 = 0.000_15;
    pub const HUNGER_MODIFIER: f64 = 0.000_1;
    pub const FATIGUE_MODIFIER: f64 = 0.000_5;
    pub const STRESS_MODIFIER: f64 = 0.005;
    pub const ENERGY_MODIFIER: f64 = 0.000_1;

    pub const THIRST_BANDS: (f64, f64) = (250.0, 400.0);
    pub const HUNGER_BANDS: (f64, f64) = (800.0, 1_200.0);
    pub const FATIGUE_BANDS: (f64, f64) = (800.0, 1_400.0);
    pub const STRESS_BANDS: (f64, f64) = (70.0, 90.0);

    /// Energy above this [kJ] improves performance.
    pub const ENERGY_BONUS_ABOVE: f64 = 2_000.0;
    /// Energy below this [kJ] hurts performance.
    pub const ENERGY_PENALTY_BELOW: f64 = 400.0;
}

pub mod time {
    pub const MILLISOLS_PER_SOL: f64 = 1_000.0;
    /// Window [millisols] over which a catalog probability applies once.
    pub const RANDOM_AILMENT_WINDOW: f64 = 100_000.0;
}
