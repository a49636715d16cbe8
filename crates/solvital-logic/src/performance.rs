//! Performance rating and fitness scores derived from vitals and the most
//! serious complaint.

use crate::complaints::ComplaintInstance;
use crate::constants::performance::*;
use crate::vitals::VitalSigns;

/// Penalty for a need past its two thresholds.
fn band_penalty(value: f64, (low, high): (f64, f64), modifier: f64) -> f64 {
    let mut penalty = 0.0;
    if value > low {
        penalty += (value - low) * modifier / 4.0;
    }
    if value > high {
        penalty += (value - high) * modifier / 2.0;
    }
    penalty
}

/// Performance in [0, 1]. Starts from the most serious complaint's factor
/// (1.0 when healthy), subtracts need penalties, adjusts for energy, and
/// clamps once at the end.
pub fn recompute(vitals: &VitalSigns, most_serious: Option<&ComplaintInstance>) -> f64 {
    let mut p = most_serious.map_or(1.0, |c| c.performance_factor());

    p -= band_penalty(vitals.thirst, THIRST_BANDS, THIRST_MODIFIER);
    p -= band_penalty(vitals.hunger, HUNGER_BANDS, HUNGER_MODIFIER);
    p -= band_penalty(vitals.fatigue, FATIGUE_BANDS, FATIGUE_MODIFIER);
    p -= band_penalty(vitals.stress, STRESS_BANDS, STRESS_MODIFIER);

    if vitals.energy > ENERGY_BONUS_ABOVE {
        p += (vitals.energy - ENERGY_BONUS_ABOVE) * ENERGY_MODIFIER / 8.0;
    } else if vitals.energy < ENERGY_PENALTY_BELOW {
        p -= 400_000.0 / vitals.energy.max(1.0) * ENERGY_MODIFIER / 4.0;
    }

    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Fitness level 0 (incapacitated) to 5 (fully fit).
pub fn fitness_level(vitals: &VitalSigns, has_serious_complaint: bool) -> u8 {
    if has_serious_complaint {
        return 0;
    }
    let worst_need = (vitals.hunger / 1_000.0)
        .max(vitals.thirst / 500.0)
        .max(vitals.fatigue / 1_000.0)
        .max(vitals.stress / 50.0);
    match worst_need {
        n if n < 0.5 => 5,
        n if n < 1.0 => 4,
        n if n < 1.5 => 3,
        n if n < 2.0 => 2,
        _ => 1,
    }
}

/// Composite health in [0, 1], weighing performance against stress and
/// fatigue.
pub fn health_score(vitals: &VitalSigns) -> f64 {
    let stress = vitals.stress / 100.0;
    let fatigue = (vitals.fatigue / 2_000.0).min(1.0);
    (vitals.performance * 0.6 + (1.0 - stress) * 0.2 + (1.0 - fatigue) * 0.2).clamp(0.0, 1.0)
}

/// Below `min_level`, the colonist should not take on demanding work.
pub fn is_unfit_by_level(vitals: &VitalSigns, has_serious_complaint: bool, min_level: u8) -> bool {
    fitness_level(vitals, has_serious_complaint) < min_level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComplaintCatalog, ComplaintKind};

    fn rested() -> VitalSigns {
        VitalSigns {
            energy: 2_000.0,
            ..VitalSigns::default()
        }
    }

    #[test]
    fn healthy_colonist_performs_fully() {
        assert_eq!(recompute(&rested(), None), 1.0);
    }

    #[test]
    fn energy_bonus_is_clamped() {
        let v = VitalSigns {
            energy: 20_000.0,
            ..VitalSigns::default()
        };
        assert_eq!(recompute(&v, None), 1.0);
    }

    #[test]
    fn thirst_penalty_two_bands() {
        let v = VitalSigns {
            thirst: 500.0,
            ..rested()
        };
        let expected = 1.0 - (250.0 * THIRST_MODIFIER / 4.0 + 100.0 * THIRST_MODIFIER / 2.0);
        assert!((recompute(&v, None) - expected).abs() < 1e-12);
    }

    #[test]
    fn low_energy_hurts() {
        let v = VitalSigns {
            energy: 200.0,
            ..VitalSigns::default()
        };
        assert!((recompute(&v, None) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn complaint_sets_the_ceiling() {
        let def = *ComplaintCatalog::standard().get(ComplaintKind::Flu).unwrap();
        let flu = ComplaintInstance::new(def);
        assert!((recompute(&rested(), Some(&flu)) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn exhaustion_floors_at_zero() {
        let v = VitalSigns {
            fatigue: 40_000.0,
            stress: 100.0,
            ..rested()
        };
        assert_eq!(recompute(&v, None), 0.0);
    }

    #[test]
    fn fitness_levels() {
        assert_eq!(fitness_level(&rested(), false), 5);
        assert_eq!(fitness_level(&rested(), true), 0);
        let tired = VitalSigns {
            fatigue: 1_700.0,
            ..rested()
        };
        assert_eq!(fitness_level(&tired, false), 2);
        assert!(is_unfit_by_level(&tired, false, 3));
    }

    #[test]
    fn health_score_range() {
        let s = health_score(&rested());
        assert!((s - 1.0).abs() < 1e-12);
        let worn = VitalSigns {
            performance: 0.0,
            stress: 100.0,
            fatigue: 4_000.0,
            ..VitalSigns::default()
        };
        assert_eq!(health_score(&worn), 0.0);
    }
}
