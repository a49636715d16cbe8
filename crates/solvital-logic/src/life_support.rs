//! Life-support interface and the per-tick breathing check.
//!
//! A colonist draws oxygen from whatever contains them (a settlement, a
//! rover, an EVA suit) through the [`LifeSupport`] trait, and reads the
//! air pressure and temperature there. Any shortfall opens the matching
//! complaint; a satisfied check puts that complaint into recovery.
//!
//! [`HabitatAtmosphere`] is the stock provider: a pressurised volume with
//! an oxygen store and a regulator that refills it and steers the
//! temperature toward a setpoint.

use serde::{Deserialize, Serialize};

use crate::catalog::ComplaintKind;
use crate::complaints::ComplaintRegistry;
use crate::config::PhysiologyConfig;

/// Anything a colonist can breathe from.
pub trait LifeSupport {
    /// Withdraw up to `amount` kg of oxygen. Returns what was delivered.
    fn provide_oxygen(&mut self, amount: f64) -> f64;
    /// Current air pressure [kPa].
    fn air_pressure(&self) -> f64;
    /// Current temperature [°C].
    fn temperature(&self) -> f64;
}

/// Whether a reading must stay above or below its requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Minimum,
    Maximum,
}

/// True when `actual` violates `required`. A NaN reading always counts as
/// a shortfall.
pub fn is_shortfall(actual: f64, required: f64, bound: BoundKind) -> bool {
    if actual.is_nan() {
        return true;
    }
    match bound {
        BoundKind::Minimum => actual < required,
        BoundKind::Maximum => actual > required,
    }
}

/// Result of one breathing check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortfallReport {
    pub oxygen_requested: f64,
    pub oxygen_received: f64,
    pub oxygen: bool,
    pub pressure: bool,
    pub cold: bool,
    pub heat: bool,
    /// No provider was available this tick.
    pub no_provider: bool,
}

impl ShortfallReport {
    pub fn any(&self) -> bool {
        self.oxygen || self.pressure || self.cold || self.heat
    }

    /// Each life-support complaint paired with whether it is short.
    pub fn complaints(&self) -> [(ComplaintKind, bool); 4] {
        [
            (ComplaintKind::Suffocation, self.oxygen),
            (ComplaintKind::Decompression, self.pressure),
            (ComplaintKind::Freezing, self.cold),
            (ComplaintKind::HeatStroke, self.heat),
        ]
    }
}

/// Per-colonist breathing requirements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeSupportChecker {
    o2_nominal: f64,
    o2_resting: f64,
    o2_minimum_fraction: f64,
    min_air_pressure: f64,
    min_temperature: f64,
    max_temperature: f64,
}

impl LifeSupportChecker {
    pub fn new(config: &PhysiologyConfig) -> Self {
        Self {
            o2_nominal: config.o2_consumption_nominal,
            o2_resting: config.o2_consumption_resting,
            o2_minimum_fraction: config.o2_minimum_fraction,
            min_air_pressure: config.min_air_pressure,
            min_temperature: config.min_temperature,
            max_temperature: config.max_temperature,
        }
    }

    /// Oxygen needed over `elapsed` millisols [kg].
    pub fn oxygen_demand(&self, elapsed: f64, resting: bool) -> f64 {
        let per_sol = if resting { self.o2_resting } else { self.o2_nominal };
        per_sol * elapsed / 1_000.0
    }

    /// Breathe for `elapsed` millisols and update the complaints that
    /// depend on life support. Zero elapsed time checks nothing.
    pub fn check_tick(
        &self,
        elapsed: f64,
        resting: bool,
        provider: Option<&mut dyn LifeSupport>,
        registry: &mut ComplaintRegistry,
    ) -> ShortfallReport {
        if elapsed <= 0.0 {
            return ShortfallReport::default();
        }

        let report = match provider {
            Some(ls) => {
                let requested = self.oxygen_demand(elapsed, resting);
                let received = ls.provide_oxygen(requested);
                let pressure = ls.air_pressure();
                let temperature = ls.temperature();
                ShortfallReport {
                    oxygen_requested: requested,
                    oxygen_received: received,
                    oxygen: is_shortfall(
                        received,
                        requested * self.o2_minimum_fraction,
                        BoundKind::Minimum,
                    ),
                    pressure: is_shortfall(pressure, self.min_air_pressure, BoundKind::Minimum),
                    cold: is_shortfall(temperature, self.min_temperature, BoundKind::Minimum),
                    heat: is_shortfall(temperature, self.max_temperature, BoundKind::Maximum),
                    no_provider: false,
                }
            }
            None => ShortfallReport {
                oxygen_requested: self.oxygen_demand(elapsed, resting),
                oxygen: true,
                pressure: true,
                no_provider: true,
                ..ShortfallReport::default()
            },
        };

        for (kind, short) in report.complaints() {
            if short {
                registry.open(kind);
            } else {
                registry.start_recovery(kind);
            }
        }
        report
    }
}

/// Rough danger level of an atmosphere, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtmosphereHazard {
    Safe,
    Warning,
    Danger,
}

/// Oxygen regenerated per sol by an active regulator [kg].
pub const REGULATOR_O2_PER_SOL: f64 = 20.0;
/// Degrees per sol the regulator moves the temperature toward its target.
pub const REGULATOR_TEMP_PER_SOL: f64 = 40.0;

/// A pressurised volume with an oxygen store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitatAtmosphere {
    /// Stored oxygen [kg].
    pub oxygen_kg: f64,
    /// Oxygen store capacity [kg].
    pub oxygen_capacity: f64,
    /// Air pressure [kPa].
    pub pressure: f64,
    /// Temperature [°C].
    pub temperature: f64,
    /// Temperature the regulator aims for [°C].
    pub target_temperature: f64,
    /// Regulator online.
    pub regulated: bool,
}

impl Default for HabitatAtmosphere {
    fn default() -> Self {
        Self {
            oxygen_kg: 500.0,
            oxygen_capacity: 500.0,
            pressure: 34.0,
            temperature: 22.0,
            target_temperature: 22.0,
            regulated: true,
        }
    }
}

impl HabitatAtmosphere {
    /// An unpowered, sealed volume with a fixed amount of air.
    pub fn sealed(oxygen_kg: f64) -> Self {
        Self {
            oxygen_kg,
            oxygen_capacity: oxygen_kg,
            regulated: false,
            ..Self::default()
        }
    }

    /// Run the regulator for `elapsed` millisols.
    pub fn regulate(&mut self, elapsed: f64) {
        if !self.regulated || elapsed <= 0.0 {
            return;
        }
        let sols = elapsed / 1_000.0;
        self.oxygen_kg = (self.oxygen_kg + REGULATOR_O2_PER_SOL * sols).min(self.oxygen_capacity);

        let diff = self.target_temperature - self.temperature;
        let step = REGULATOR_TEMP_PER_SOL * sols;
        if diff.abs() <= step {
            self.temperature = self.target_temperature;
        } else {
            self.temperature += diff.signum() * step;
        }
    }

    /// Hazard against the survivable bounds in `config`.
    pub fn assess(&self, config: &PhysiologyConfig) -> AtmosphereHazard {
        if self.pressure < config.min_air_pressure
            || self.temperature < config.min_temperature
            || self.temperature > config.max_temperature
            || self.oxygen_kg <= 0.0
        {
            AtmosphereHazard::Danger
        } else if self.pressure < config.min_air_pressure * 1.2
            || self.temperature < config.min_temperature + 5.0
            || self.temperature > config.max_temperature - 5.0
            || self.oxygen_kg < self.oxygen_capacity * 0.1
        {
            AtmosphereHazard::Warning
        } else {
            AtmosphereHazard::Safe
        }
    }
}

impl LifeSupport for HabitatAtmosphere {
    fn provide_oxygen(&mut self, amount: f64) -> f64 {
        let delivered = amount.max(0.0).min(self.oxygen_kg.max(0.0));
        self.oxygen_kg -= delivered;
        delivered
    }

    fn air_pressure(&self) -> f64 {
        self.pressure
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComplaintCatalog;
    use crate::complaints::ComplaintState;
    use std::sync::Arc;

    fn setup() -> (LifeSupportChecker, ComplaintRegistry) {
        (
            LifeSupportChecker::new(&PhysiologyConfig::default()),
            ComplaintRegistry::new(Arc::new(ComplaintCatalog::standard())),
        )
    }

    #[test]
    fn bounds() {
        assert!(is_shortfall(1.0, 2.0, BoundKind::Minimum));
        assert!(!is_shortfall(2.0, 2.0, BoundKind::Minimum));
        assert!(is_shortfall(3.0, 2.0, BoundKind::Maximum));
        assert!(is_shortfall(f64::NAN, 2.0, BoundKind::Maximum));
    }

    #[test]
    fn healthy_habitat_has_no_shortfall() {
        let (checker, mut reg) = setup();
        let mut hab = HabitatAtmosphere::default();
        let report = checker.check_tick(1.0, false, Some(&mut hab), &mut reg);
        assert!(!report.any());
        assert!((report.oxygen_received - 0.00084).abs() < 1e-12);
        assert!(reg.active().next().is_none());
    }

    #[test]
    fn empty_store_suffocates() {
        let (checker, mut reg) = setup();
        let mut hab = HabitatAtmosphere::sealed(0.0);
        let report = checker.check_tick(1.0, false, Some(&mut hab), &mut reg);
        assert!(report.oxygen);
        assert!(reg.is_active(ComplaintKind::Suffocation));
    }

    #[test]
    fn half_delivery_is_enough() {
        let (checker, mut reg) = setup();
        let demand = checker.oxygen_demand(10.0, false);
        let mut hab = HabitatAtmosphere::sealed(demand * 0.5);
        let report = checker.check_tick(10.0, false, Some(&mut hab), &mut reg);
        assert!(!report.oxygen);
    }

    #[test]
    fn missing_provider_counts_as_vacuum() {
        let (checker, mut reg) = setup();
        let report = checker.check_tick(1.0, false, None, &mut reg);
        assert!(report.no_provider);
        assert!(reg.is_active(ComplaintKind::Suffocation));
        assert!(reg.is_active(ComplaintKind::Decompression));
    }

    #[test]
    fn restored_supply_starts_recovery() {
        let (checker, mut reg) = setup();
        let mut hab = HabitatAtmosphere {
            temperature: -20.0,
            ..HabitatAtmosphere::default()
        };
        checker.check_tick(1.0, false, Some(&mut hab), &mut reg);
        assert!(reg.is_active(ComplaintKind::Freezing));
        hab.temperature = 20.0;
        checker.check_tick(1.0, false, Some(&mut hab), &mut reg);
        assert_eq!(
            reg.get(ComplaintKind::Freezing).unwrap().state,
            ComplaintState::Recovering
        );
    }

    #[test]
    fn zero_elapsed_checks_nothing() {
        let (checker, mut reg) = setup();
        let report = checker.check_tick(0.0, false, None, &mut reg);
        assert_eq!(report, ShortfallReport::default());
        assert!(reg.active().next().is_none());
    }

    #[test]
    fn resting_breathes_less() {
        let (checker, _) = setup();
        assert!(checker.oxygen_demand(10.0, true) < checker.oxygen_demand(10.0, false));
    }

    #[test]
    fn regulator_refills_and_warms() {
        let mut hab = HabitatAtmosphere {
            oxygen_kg: 100.0,
            temperature: 10.0,
            ..HabitatAtmosphere::default()
        };
        hab.regulate(100.0);
        assert!(hab.oxygen_kg > 100.0);
        assert!(hab.temperature > 10.0 && hab.temperature <= 22.0);
        let mut sealed = HabitatAtmosphere::sealed(5.0);
        sealed.regulate(100.0);
        assert_eq!(sealed.oxygen_kg, 5.0);
    }

    #[test]
    fn hazard_levels() {
        let config = PhysiologyConfig::default();
        assert_eq!(HabitatAtmosphere::default().assess(&config), AtmosphereHazard::Safe);
        let thin = HabitatAtmosphere {
            pressure: 10.0,
            ..HabitatAtmosphere::default()
        };
        assert_eq!(thin.assess(&config), AtmosphereHazard::Danger);
    }
}
