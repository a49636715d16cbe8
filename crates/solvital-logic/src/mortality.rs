//! Death records.
//!
//! Once a colonist dies their physiology is frozen and a [`DeathRecord`] is
//! kept for the examination and burial queue.

use serde::{Deserialize, Serialize};

use crate::catalog::ComplaintKind;
use crate::clock::ClockPulse;

/// Why a colonist died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// A complaint reached its lethal stage.
    Complaint(ComplaintKind),
    /// Death was forced from outside the physiology model.
    Triggered,
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeathCause::Complaint(kind) => write!(f, "{kind}"),
            DeathCause::Triggered => f.write_str("Unspecified"),
        }
    }
}

/// Immutable summary written at time of death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub cause: DeathCause,
    pub mission_sol: u32,
    pub millisol: f64,
    /// Where the body lies, if the caller knew.
    pub location: Option<String>,
    pub last_words: String,
    /// The most serious complaint at the moment of death.
    pub most_serious: Option<ComplaintKind>,
    /// Set once the body has been examined.
    pub examined: bool,
}

impl DeathRecord {
    pub fn new(
        cause: DeathCause,
        pulse: &ClockPulse,
        location: Option<String>,
        most_serious: Option<ComplaintKind>,
    ) -> Self {
        Self {
            cause,
            mission_sol: pulse.mission_sol,
            millisol: pulse.millisol,
            location,
            last_words: last_words(cause).to_string(),
            most_serious,
            examined: false,
        }
    }
}

/// A line for the obituary.
pub fn last_words(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::Complaint(ComplaintKind::Starvation) => "I'm so hungry...",
        DeathCause::Complaint(ComplaintKind::Dehydration) => "Water... please...",
        DeathCause::Complaint(ComplaintKind::Suffocation)
        | DeathCause::Complaint(ComplaintKind::Decompression) => "I can't breathe...",
        DeathCause::Complaint(ComplaintKind::Freezing) => "So cold...",
        DeathCause::Complaint(ComplaintKind::HeatStroke) => "It's burning up in here...",
        DeathCause::Complaint(ComplaintKind::HeartAttack) => "My chest...",
        DeathCause::Complaint(_) => "Tell them I tried.",
        DeathCause::Triggered => "...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_captures_time_and_cause() {
        let pulse = ClockPulse::at(12, 431.0, 1.0);
        let record = DeathRecord::new(
            DeathCause::Complaint(ComplaintKind::Suffocation),
            &pulse,
            Some("Lander Hab".into()),
            Some(ComplaintKind::Suffocation),
        );
        assert_eq!(record.mission_sol, 12);
        assert_eq!(record.millisol, 431.0);
        assert_eq!(record.last_words, "I can't breathe...");
        assert!(!record.examined);
    }

    #[test]
    fn cause_display() {
        assert_eq!(
            DeathCause::Complaint(ComplaintKind::HeatStroke).to_string(),
            "Heat Stroke"
        );
        assert_eq!(DeathCause::Triggered.to_string(), "Unspecified");
    }
}
