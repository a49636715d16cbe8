//! Complaint catalog: the static table of every illness, injury and
//! environmental condition a colonist can suffer.
//!
//! The catalog is read-only after load and shared by all agents. Ordering
//! is significant: random ailment sampling walks the table front to back,
//! so two runs with the same seed open the same complaints.

use serde::{Deserialize, Serialize};

use crate::config::LoadError;

/// Every complaint known to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintKind {
    // Raised by threshold checks
    Starvation,
    Dehydration,
    Suffocation,
    Decompression,
    Freezing,
    HeatStroke,
    RadiationSickness,
    PanicAttack,
    HighFatigueCollapse,
    // Sampled at random
    Cold,
    Flu,
    Fever,
    FoodPoisoning,
    Laceration,
    PulledMuscle,
    BrokenBone,
    MinorBurns,
    Appendicitis,
    RupturedAppendix,
    Meningitis,
    HeartAttack,
}

impl ComplaintKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Starvation => "Starvation",
            Self::Dehydration => "Dehydration",
            Self::Suffocation => "Suffocation",
            Self::Decompression => "Decompression",
            Self::Freezing => "Freezing",
            Self::HeatStroke => "Heat Stroke",
            Self::RadiationSickness => "Radiation Sickness",
            Self::PanicAttack => "Panic Attack",
            Self::HighFatigueCollapse => "High Fatigue Collapse",
            Self::Cold => "Cold",
            Self::Flu => "Flu",
            Self::Fever => "Fever",
            Self::FoodPoisoning => "Food Poisoning",
            Self::Laceration => "Laceration",
            Self::PulledMuscle => "Pulled Muscle",
            Self::BrokenBone => "Broken Bone",
            Self::MinorBurns => "Minor Burns",
            Self::Appendicitis => "Appendicitis",
            Self::RupturedAppendix => "Ruptured Appendix",
            Self::Meningitis => "Meningitis",
            Self::HeartAttack => "Heart Attack",
        }
    }

    /// Complaints opened by a threshold check rather than random sampling.
    pub fn is_environmental(self) -> bool {
        matches!(
            self,
            Self::Starvation
                | Self::Dehydration
                | Self::Suffocation
                | Self::Decompression
                | Self::Freezing
                | Self::HeatStroke
                | Self::RadiationSickness
                | Self::PanicAttack
                | Self::HighFatigueCollapse
        )
    }
}

impl std::fmt::Display for ComplaintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a complaint resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// Millisols spent in the recovering state before the complaint is cured.
    pub period: f64,
    /// Starts recovering on its own once it has run its course.
    pub self_recovering: bool,
}

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplaintDef {
    pub kind: ComplaintKind,
    /// 1..=100. Higher is worse.
    pub seriousness: u8,
    /// Percent chance per [`RANDOM_AILMENT_WINDOW`] millisols. Zero for
    /// complaints that are never sampled.
    ///
    /// [`RANDOM_AILMENT_WINDOW`]: crate::constants::time::RANDOM_AILMENT_WINDOW
    #[serde(default)]
    pub probability: f64,
    /// Performance [%] while the complaint is active.
    pub performance_percent: f64,
    pub recovery: RecoveryPolicy,
    /// Millisols active before the complaint worsens. `None` means it never
    /// degrades.
    #[serde(default)]
    pub degrade_period: Option<f64>,
    /// Complaint this one escalates into once degraded.
    #[serde(default)]
    pub next_phase: Option<ComplaintKind>,
}

impl ComplaintDef {
    /// Performance factor while fully active, in [0, 1].
    pub fn active_factor(&self) -> f64 {
        (self.performance_percent / 100.0).clamp(0.0, 1.0)
    }

    /// Performance at or below which a degraded terminal complaint kills.
    pub fn lethal_performance(&self) -> f64 {
        self.seriousness as f64 / 100.0 * 0.5
    }

    pub fn is_serious(&self) -> bool {
        self.seriousness >= crate::constants::thresholds::SERIOUS_COMPLAINT
    }
}

/// Catalog validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} listed more than once")]
    Duplicate(ComplaintKind),
    #[error("{0} seriousness {1} outside 1..=100")]
    InvalidSeriousness(ComplaintKind, u8),
    #[error("{0} performance {1} outside 0..=100")]
    InvalidPerformance(ComplaintKind, f64),
    #[error("{0} probability {1} is negative")]
    NegativeProbability(ComplaintKind, f64),
    #[error("{0} escalates to {1}, which is not in the catalog")]
    MissingNextPhase(ComplaintKind, ComplaintKind),
    #[error("{0} has a negative period")]
    NegativePeriod(ComplaintKind),
}

/// Ordered, read-only complaint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintCatalog {
    complaints: Vec<ComplaintDef>,
}

impl ComplaintCatalog {
    /// Build a catalog, rejecting inconsistent rows.
    pub fn new(complaints: Vec<ComplaintDef>) -> Result<Self, Vec<CatalogError>> {
        let catalog = Self { complaints };
        let errors = catalog.validate();
        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(errors)
        }
    }

    /// Parse a JSON catalog of the form `{ "complaints": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: Self = serde_json::from_str(json)?;
        Self::new(raw.complaints).map_err(LoadError::Catalog)
    }

    pub fn get(&self, kind: ComplaintKind) -> Option<&ComplaintDef> {
        self.complaints.iter().find(|d| d.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplaintDef> {
        self.complaints.iter()
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }

    /// Copy of this catalog without `kind`. Used to model partial data sets.
    pub fn without(&self, kind: ComplaintKind) -> Self {
        Self {
            complaints: self
                .complaints
                .iter()
                .filter(|d| d.kind != kind && d.next_phase != Some(kind))
                .copied()
                .collect(),
        }
    }

    fn validate(&self) -> Vec<CatalogError> {
        let mut errors = Vec::new();
        let mut seen = std::collections::BTreeSet::new();

        for def in &self.complaints {
            if !seen.insert(def.kind) {
                errors.push(CatalogError::Duplicate(def.kind));
            }
            if !(1..=100).contains(&def.seriousness) {
                errors.push(CatalogError::InvalidSeriousness(def.kind, def.seriousness));
            }
            if !(0.0..=100.0).contains(&def.performance_percent) {
                errors.push(CatalogError::InvalidPerformance(
                    def.kind,
                    def.performance_percent,
                ));
            }
            if def.probability < 0.0 {
                errors.push(CatalogError::NegativeProbability(def.kind, def.probability));
            }
            if def.recovery.period < 0.0 || def.degrade_period.is_some_and(|p| p < 0.0) {
                errors.push(CatalogError::NegativePeriod(def.kind));
            }
        }
        for def in &self.complaints {
            if let Some(next) = def.next_phase {
                if !seen.contains(&next) {
                    errors.push(CatalogError::MissingNextPhase(def.kind, next));
                }
            }
        }

        errors
    }

    /// Built-in catalog used when no data file is supplied.
    pub fn standard() -> Self {
        use ComplaintKind::*;

        #[allow(clippy::too_many_arguments)]
        fn row(
            kind: ComplaintKind,
            seriousness: u8,
            probability: f64,
            performance_percent: f64,
            recovery_period: f64,
            self_recovering: bool,
            degrade_period: Option<f64>,
            next_phase: Option<ComplaintKind>,
        ) -> ComplaintDef {
            ComplaintDef {
                kind,
                seriousness,
                probability,
                performance_percent,
                recovery: RecoveryPolicy {
                    period: recovery_period,
                    self_recovering,
                },
                degrade_period,
                next_phase,
            }
        }

        Self {
            complaints: vec![
                row(Starvation, 70, 0.0, 40.0, 3_000.0, false, None, None),
                row(Dehydration, 70, 0.0, 40.0, 1_000.0, false, None, None),
                row(Suffocation, 90, 0.0, 10.0, 100.0, false, Some(200.0), None),
                row(Decompression, 90, 0.0, 20.0, 200.0, false, Some(300.0), None),
                row(Freezing, 60, 0.0, 50.0, 500.0, false, Some(2_000.0), None),
                row(HeatStroke, 60, 0.0, 50.0, 500.0, false, Some(2_000.0), None),
                row(RadiationSickness, 60, 0.0, 60.0, 10_000.0, false, None, None),
                row(PanicAttack, 40, 0.0, 60.0, 300.0, false, None, None),
                row(HighFatigueCollapse, 50, 0.0, 20.0, 500.0, false, None, None),
                row(Cold, 10, 15.0, 90.0, 3_000.0, true, None, None),
                row(Flu, 15, 8.0, 70.0, 5_000.0, true, None, None),
                row(Fever, 20, 5.0, 70.0, 2_000.0, true, None, None),
                row(FoodPoisoning, 25, 4.0, 60.0, 2_000.0, true, None, None),
                row(Laceration, 20, 5.0, 80.0, 2_000.0, true, None, None),
                row(PulledMuscle, 15, 6.0, 80.0, 3_000.0, true, None, None),
                row(BrokenBone, 40, 2.0, 40.0, 20_000.0, true, None, None),
                row(MinorBurns, 10, 4.0, 90.0, 1_500.0, true, None, None),
                row(
                    Appendicitis,
                    50,
                    1.0,
                    40.0,
                    5_000.0,
                    false,
                    Some(2_000.0),
                    Some(RupturedAppendix),
                ),
                row(RupturedAppendix, 80, 0.0, 10.0, 10_000.0, false, Some(3_000.0), None),
                row(Meningitis, 70, 0.5, 30.0, 10_000.0, false, Some(5_000.0), None),
                row(HeartAttack, 90, 0.5, 5.0, 5_000.0, false, Some(200.0), None),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = ComplaintCatalog::standard();
        assert!(catalog.validate().is_empty());
        assert_eq!(catalog.len(), 21);
    }

    #[test]
    fn environmental_complaints_are_never_sampled() {
        for def in ComplaintCatalog::standard().iter() {
            if def.kind.is_environmental() {
                assert_eq!(def.probability, 0.0, "{} has a sampling chance", def.kind);
            }
        }
    }

    #[test]
    fn get_by_kind() {
        let catalog = ComplaintCatalog::standard();
        let def = catalog.get(ComplaintKind::Appendicitis).unwrap();
        assert_eq!(def.next_phase, Some(ComplaintKind::RupturedAppendix));
        assert!(def.is_serious());
    }

    #[test]
    fn without_drops_kind_and_referrers() {
        let catalog = ComplaintCatalog::standard().without(ComplaintKind::RupturedAppendix);
        assert!(catalog.get(ComplaintKind::RupturedAppendix).is_none());
        assert!(catalog.get(ComplaintKind::Appendicitis).is_none());
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn duplicate_rows_rejected() {
        let cold = *ComplaintCatalog::standard().get(ComplaintKind::Cold).unwrap();
        let errors = ComplaintCatalog::new(vec![cold, cold]).unwrap_err();
        assert_eq!(errors, vec![CatalogError::Duplicate(ComplaintKind::Cold)]);
    }

    #[test]
    fn dangling_next_phase_rejected() {
        let appendicitis = *ComplaintCatalog::standard()
            .get(ComplaintKind::Appendicitis)
            .unwrap();
        let errors = ComplaintCatalog::new(vec![appendicitis]).unwrap_err();
        assert!(errors.contains(&CatalogError::MissingNextPhase(
            ComplaintKind::Appendicitis,
            ComplaintKind::RupturedAppendix
        )));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let catalog = ComplaintCatalog::standard();
        let json = serde_json::to_string(&catalog).unwrap();
        let loaded = ComplaintCatalog::from_json(&json).unwrap();
        let kinds: Vec<_> = loaded.iter().map(|d| d.kind).collect();
        let expected: Vec<_> = catalog.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn lethal_performance_scales_with_seriousness() {
        let catalog = ComplaintCatalog::standard();
        let heart = catalog.get(ComplaintKind::HeartAttack).unwrap();
        let cold = catalog.get(ComplaintKind::Cold).unwrap();
        assert!(heart.lethal_performance() > cold.lethal_performance());
    }
}
