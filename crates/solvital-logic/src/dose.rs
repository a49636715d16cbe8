//! Radiation dose ledger.
//!
//! Cumulative dose is tracked per body region over three windows: a sliding
//! 30-sol window, a sliding annual (360-sol) window and the whole career.
//! Every exposure is appended to a log; once a logged exposure ages out of
//! a window its amount is subtracted from that window again. Career totals
//! never expire.
//!
//! Exposure sampling ([`sample_exposure`]) models the three radiation
//! sources reported by a habitat and the shielding the colonist sits
//! behind.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vitals::NaturalAttributes;

/// Body region receiving a dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    BloodFormingOrgans,
    Ocular,
    Skin,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 3] = [
        BodyRegion::BloodFormingOrgans,
        BodyRegion::Ocular,
        BodyRegion::Skin,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Accumulation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseWindow {
    ThirtySol,
    Annual,
    Career,
}

impl DoseWindow {
    pub const ALL: [DoseWindow; 3] = [DoseWindow::ThirtySol, DoseWindow::Annual, DoseWindow::Career];

    /// Age in sols at which an exposure drops out of this window.
    pub fn expiry_sols(self) -> Option<u32> {
        match self {
            DoseWindow::ThirtySol => Some(31),
            DoseWindow::Annual => Some(361),
            DoseWindow::Career => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Dose equivalent limits [mSv], indexed `[region][window]`.
pub const DOSE_LIMITS: [[f64; 3]; 3] = [
    [250.0, 1_000.0, 1_500.0],
    [500.0, 2_000.0, 3_000.0],
    [1_000.0, 4_000.0, 6_000.0],
];

/// Divisors applied to the attribute offset, indexed `[region][window]`.
/// Tougher regions and longer windows move further.
const LIMIT_OFFSET_DIVISORS: [[f64; 3]; 3] = [
    [10.0, 5.0, 2.5],
    [5.0, 2.5, 1.0],
    [2.5, 1.0, 0.4],
];

/// One logged exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub sol: u32,
    pub region: BodyRegion,
    pub amount: f64,
}

/// Per-colonist cumulative dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseLedger {
    /// Cumulative dose [mSv], indexed `[region][window]`.
    doses: [[f64; 3]; 3],
    limits: [[f64; 3]; 3],
    /// Exposures still inside the annual window, oldest first.
    log: VecDeque<DoseEvent>,
    /// Log entries before this index have left the 30-sol window.
    thirty_cursor: usize,
    /// Log entries before this index have left the annual window.
    annual_cursor: usize,
    current_sol: u32,
    sick: bool,
}

impl Default for DoseLedger {
    fn default() -> Self {
        Self {
            doses: [[0.0; 3]; 3],
            limits: DOSE_LIMITS,
            log: VecDeque::new(),
            thirty_cursor: 0,
            annual_cursor: 0,
            current_sol: 1,
            sick: false,
        }
    }
}

impl DoseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ledger whose limits are shifted by the colonist's build.
    /// Strength plus endurance above 100 raises every limit by a random
    /// share of the surplus; a deficit lowers them the same way.
    pub fn for_attributes(attributes: &NaturalAttributes, rng: &mut impl Rng) -> Self {
        let mut ledger = Self::default();
        let span = f64::from(attributes.strength) + f64::from(attributes.endurance) - 100.0;
        let offset = if span > 0.0 {
            rng.gen_range(0.0..span)
        } else if span < 0.0 {
            -rng.gen_range(0.0..-span)
        } else {
            0.0
        };
        for region in BodyRegion::ALL {
            for window in DoseWindow::ALL {
                let divisor = LIMIT_OFFSET_DIVISORS[region.index()][window.index()];
                ledger.limits[region.index()][window.index()] += offset / divisor;
            }
        }
        ledger
    }

    /// Attribute-shifted ledger seeded with dose picked up before arrival.
    /// The seeded amounts are not in the log and never expire.
    pub fn with_history(attributes: &NaturalAttributes, rng: &mut impl Rng) -> Self {
        let mut ledger = Self::for_attributes(attributes, rng);
        let spreads = [(10.0, 30.0, 40.0), (5.0, 15.0, 20.0), (20.0, 50.0, 70.0)];
        for region in BodyRegion::ALL {
            let (a, b, c) = spreads[region.index()];
            let thirty = rng.gen_range(0.0..a);
            let annual = thirty + rng.gen_range(0.0..b);
            let career = annual + rng.gen_range(0.0..c);
            ledger.doses[region.index()] = [thirty, annual, career];
        }
        ledger
    }

    /// Record an exposure on the current sol. Adds to all three windows.
    /// Returns false and changes nothing for a negative or non-finite amount.
    pub fn add_dose(&mut self, region: BodyRegion, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            log::warn!("Ignoring invalid radiation dose {amount} to {region:?}");
            return false;
        }
        if amount == 0.0 {
            return true;
        }
        for w in DoseWindow::ALL {
            self.doses[region.index()][w.index()] += amount;
        }
        self.log.push_back(DoseEvent {
            sol: self.current_sol,
            region,
            amount,
        });
        true
    }

    /// Expire exposures that have aged out of the rolling windows as of
    /// `now_sol`, then re-evaluate sickness. Returns the new sickness flag.
    pub fn check_and_carry_over(&mut self, now_sol: u32) -> bool {
        self.current_sol = self.current_sol.max(now_sol);
        let now = self.current_sol;

        while let Some(event) = self.log.get(self.thirty_cursor) {
            if now.saturating_sub(event.sol) < 31 {
                break;
            }
            self.subtract(event.region, DoseWindow::ThirtySol, event.amount);
            self.thirty_cursor += 1;
        }
        while let Some(event) = self.log.get(self.annual_cursor) {
            if now.saturating_sub(event.sol) < 361 {
                break;
            }
            self.subtract(event.region, DoseWindow::Annual, event.amount);
            self.annual_cursor += 1;
        }
        // Drop entries that have left every rolling window.
        let drained = self.annual_cursor.min(self.thirty_cursor);
        self.log.drain(..drained);
        self.annual_cursor -= drained;
        self.thirty_cursor -= drained;

        self.sick = self.exceeds_limits();
        self.sick
    }

    fn subtract(&mut self, region: BodyRegion, window: DoseWindow, amount: f64) {
        let cell = &mut self.doses[region.index()][window.index()];
        *cell = (*cell - amount).max(0.0);
    }

    fn exceeds_limits(&self) -> bool {
        BodyRegion::ALL.iter().any(|r| {
            DoseWindow::ALL
                .iter()
                .any(|w| self.doses[r.index()][w.index()] > self.limits[r.index()][w.index()])
        })
    }

    pub fn dose(&self, region: BodyRegion, window: DoseWindow) -> f64 {
        self.doses[region.index()][window.index()]
    }

    pub fn limit(&self, region: BodyRegion, window: DoseWindow) -> f64 {
        self.limits[region.index()][window.index()]
    }

    /// True when any region exceeded any window limit at the last check.
    pub fn is_sick(&self) -> bool {
        self.sick
    }

    /// Exposures still counted in a rolling window.
    pub fn pending_events(&self) -> usize {
        self.log.len()
    }
}

/// Radiation source reported by a habitat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadiationSource {
    /// Background surface radiation.
    Baseline,
    /// Galactic cosmic rays.
    Gcr,
    /// Solar energetic particle event.
    Sep,
}

/// What stands between a colonist and the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shielding {
    Settlement,
    Vehicle,
    Outside,
}

impl Shielding {
    /// Fraction of incoming radiation that gets through.
    pub fn transmission(self) -> f64 {
        match self {
            Shielding::Settlement => 0.25,
            Shielding::Vehicle => 0.5,
            Shielding::Outside => 1.0,
        }
    }
}

/// Radiation events active at a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiationStatus {
    pub baseline: bool,
    pub gcr: bool,
    pub sep: bool,
}

/// Millisols between exposure samples.
pub const RADIATION_CHECK_INTERVAL: f64 = 50.0;
const BASELINE_RAD_PER_SOL: f64 = 0.1;
const GCR_RAD_PER_SOL: f64 = 0.64;
const GCR_RAD_SWING: f64 = 0.12;
const SEP_RAD_PER_SOL: f64 = 0.21;
const SEP_SWING_FACTOR: f64 = 1_000.0;

/// A sampled exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exposure {
    pub source: RadiationSource,
    pub region: BodyRegion,
    pub amount: f64,
}

/// Sample the dose picked up over `elapsed` millisols. Only a solar
/// particle event penetrates habitat or vehicle walls; outside, the
/// strongest active source wins.
pub fn sample_exposure(
    status: RadiationStatus,
    shielding: Shielding,
    elapsed: f64,
    rng: &mut impl Rng,
) -> Option<Exposure> {
    if elapsed <= 0.0 {
        return None;
    }
    let region = match rng.gen_range(0..=10) {
        0 => BodyRegion::Ocular,
        1..=3 => BodyRegion::BloodFormingOrgans,
        _ => BodyRegion::Skin,
    };
    let sols = elapsed / 1_000.0;
    let transmission = shielding.transmission();

    let sep = if status.sep {
        let shield = rng.gen_range(0.0..=transmission);
        let mean = shield * SEP_SWING_FACTOR * SEP_RAD_PER_SOL * sols;
        mean * rng.gen_range(0.9..=1.1)
    } else {
        0.0
    };

    let candidates = if shielding == Shielding::Outside {
        let baseline = if status.baseline {
            let base = BASELINE_RAD_PER_SOL * sols;
            base + rng.gen_range(-base / 3.0..=base / 3.0)
        } else {
            0.0
        };
        let gcr = if status.gcr {
            let base = GCR_RAD_PER_SOL * sols;
            let swing = GCR_RAD_SWING * sols;
            base + rng.gen_range(-swing..=swing)
        } else {
            0.0
        };
        vec![
            (RadiationSource::Sep, sep),
            (RadiationSource::Gcr, gcr),
            (RadiationSource::Baseline, baseline),
        ]
    } else {
        vec![(RadiationSource::Sep, sep)]
    };

    candidates
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(source, amount)| Exposure {
            source,
            region,
            amount,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn dose_adds_to_all_windows() {
        let mut ledger = DoseLedger::new();
        assert!(ledger.add_dose(BodyRegion::Skin, 12.0));
        for w in DoseWindow::ALL {
            assert_eq!(ledger.dose(BodyRegion::Skin, w), 12.0);
        }
        assert_eq!(ledger.dose(BodyRegion::Ocular, DoseWindow::Career), 0.0);
    }

    #[test]
    fn thirty_sol_window_expires_at_age_31() {
        let mut ledger = DoseLedger::new();
        ledger.check_and_carry_over(10);
        ledger.add_dose(BodyRegion::Ocular, 5.0);

        ledger.check_and_carry_over(40);
        assert_eq!(ledger.dose(BodyRegion::Ocular, DoseWindow::ThirtySol), 5.0);

        ledger.check_and_carry_over(41);
        assert_eq!(ledger.dose(BodyRegion::Ocular, DoseWindow::ThirtySol), 0.0);
        assert_eq!(ledger.dose(BodyRegion::Ocular, DoseWindow::Annual), 5.0);
        assert_eq!(ledger.dose(BodyRegion::Ocular, DoseWindow::Career), 5.0);
    }

    #[test]
    fn annual_window_expires_and_log_drains() {
        let mut ledger = DoseLedger::new();
        ledger.check_and_carry_over(5);
        ledger.add_dose(BodyRegion::Skin, 3.0);
        ledger.check_and_carry_over(365);
        assert_eq!(ledger.dose(BodyRegion::Skin, DoseWindow::Annual), 3.0);
        ledger.check_and_carry_over(366);
        assert_eq!(ledger.dose(BodyRegion::Skin, DoseWindow::Annual), 0.0);
        assert_eq!(ledger.dose(BodyRegion::Skin, DoseWindow::Career), 3.0);
        assert_eq!(ledger.pending_events(), 0);
    }

    #[test]
    fn skipped_sols_still_expire() {
        let mut ledger = DoseLedger::new();
        ledger.check_and_carry_over(1);
        ledger.add_dose(BodyRegion::BloodFormingOrgans, 1.0);
        ledger.check_and_carry_over(2);
        ledger.add_dose(BodyRegion::BloodFormingOrgans, 2.0);
        ledger.check_and_carry_over(100);
        assert_eq!(
            ledger.dose(BodyRegion::BloodFormingOrgans, DoseWindow::ThirtySol),
            0.0
        );
        assert_eq!(
            ledger.dose(BodyRegion::BloodFormingOrgans, DoseWindow::Annual),
            3.0
        );
    }

    #[test]
    fn invalid_dose_rejected() {
        let mut ledger = DoseLedger::new();
        assert!(!ledger.add_dose(BodyRegion::Skin, -1.0));
        assert!(!ledger.add_dose(BodyRegion::Skin, f64::NAN));
        assert_eq!(ledger.dose(BodyRegion::Skin, DoseWindow::Career), 0.0);
    }

    #[test]
    fn sickness_follows_limits() {
        let mut ledger = DoseLedger::new();
        ledger.add_dose(BodyRegion::BloodFormingOrgans, 251.0);
        assert!(ledger.check_and_carry_over(1));
        ledger.check_and_carry_over(32);
        assert!(!ledger.is_sick());
    }

    #[test]
    fn seeded_history_is_ordered_by_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ledger = DoseLedger::with_history(&NaturalAttributes::default(), &mut rng);
        for r in BodyRegion::ALL {
            assert!(ledger.dose(r, DoseWindow::ThirtySol) <= ledger.dose(r, DoseWindow::Annual));
            assert!(ledger.dose(r, DoseWindow::Annual) <= ledger.dose(r, DoseWindow::Career));
        }
    }

    #[test]
    fn average_build_keeps_standard_limits() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ledger = DoseLedger::for_attributes(&NaturalAttributes::default(), &mut rng);
        for r in BodyRegion::ALL {
            for w in DoseWindow::ALL {
                assert_eq!(ledger.limit(r, w), DOSE_LIMITS[r.index()][w.index()]);
            }
        }
    }

    #[test]
    fn sturdier_colonist_tolerates_more() {
        let sturdy = NaturalAttributes {
            strength: 95,
            endurance: 90,
            ..NaturalAttributes::default()
        };
        let frail = NaturalAttributes {
            strength: 20,
            endurance: 25,
            ..NaturalAttributes::default()
        };
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let strong = DoseLedger::for_attributes(&sturdy, &mut rng);
            let weak = DoseLedger::for_attributes(&frail, &mut rng);
            for r in BodyRegion::ALL {
                for w in DoseWindow::ALL {
                    let standard = DOSE_LIMITS[r.index()][w.index()];
                    assert!(strong.limit(r, w) >= standard);
                    assert!(weak.limit(r, w) <= standard);
                    assert!(weak.limit(r, w) > 0.0);
                }
            }
            // Skin career moves the most: up to 2.5x the surplus
            let skin = strong.limit(BodyRegion::Skin, DoseWindow::Career);
            assert!(skin < 6_000.0 + 85.0 * 2.5);
        }
    }

    #[test]
    fn raised_limit_delays_sickness() {
        let sturdy = NaturalAttributes {
            strength: 100,
            endurance: 100,
            ..NaturalAttributes::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ledger = DoseLedger::for_attributes(&sturdy, &mut rng);
        let limit = ledger.limit(BodyRegion::BloodFormingOrgans, DoseWindow::ThirtySol);
        assert!(limit > 250.0);
        ledger.add_dose(BodyRegion::BloodFormingOrgans, 250.0);
        assert!(!ledger.check_and_carry_over(1));
        ledger.add_dose(BodyRegion::BloodFormingOrgans, limit - 249.0);
        assert!(ledger.check_and_carry_over(1));
    }

    #[test]
    fn walls_block_everything_but_sep() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let status = RadiationStatus {
            baseline: true,
            gcr: true,
            sep: false,
        };
        for _ in 0..50 {
            assert!(sample_exposure(status, Shielding::Settlement, 50.0, &mut rng).is_none());
        }
        let outside = sample_exposure(status, Shielding::Outside, 50.0, &mut rng);
        assert!(outside.is_some_and(|e| e.amount > 0.0));
    }

    #[test]
    fn no_exposure_without_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let status = RadiationStatus {
            baseline: true,
            gcr: true,
            sep: true,
        };
        assert!(sample_exposure(status, Shielding::Outside, 0.0, &mut rng).is_none());
    }
}
