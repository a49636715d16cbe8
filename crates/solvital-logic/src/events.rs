//! Health events emitted by an agent's physiology each tick.
//!
//! The record never calls out to a global event bus; it collects
//! [`HealthEvent`]s and hands them to the caller in the tick report.

use serde::{Deserialize, Serialize};

use crate::catalog::ComplaintKind;
use crate::dose::BodyRegion;
use crate::mortality::DeathCause;

/// Something happened to a colonist's health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HealthEvent {
    /// A new complaint became active
    ComplaintOpened(ComplaintKind),
    /// An active complaint started to recover
    RecoveryStarted(ComplaintKind),
    /// A complaint finished recovering
    ComplaintCured(ComplaintKind),
    /// A degraded complaint turned into a worse one
    ComplaintEscalated {
        from: ComplaintKind,
        to: ComplaintKind,
    },
    /// A complaint reached its lethal stage
    ComplaintFatal(ComplaintKind),
    /// Radiation dose was recorded
    RadiationExposure { region: BodyRegion, amount: f64 },
    /// The colonist died
    Death { cause: DeathCause },
    /// The body is waiting for a medical examination
    ExaminationQueued,
    /// Bad input or missing data; the simulation kept going
    Diagnostic(Diagnostic),
}

/// Recoverable problem reported instead of aborting the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The clock delivered a negative delta, clamped to zero.
    NegativeElapsed(f64),
    /// A complaint was requested that the catalog does not define.
    UnknownComplaint(ComplaintKind),
    /// A life-support consumer had no provider this tick.
    MissingLifeSupport,
    /// A dose amount was negative or not a number.
    InvalidDose(f64),
}

impl HealthEvent {
    /// Severity for display (1-5, 5 being critical).
    pub fn severity(&self) -> u8 {
        match self {
            HealthEvent::Death { .. } | HealthEvent::ComplaintFatal(_) => 5,
            HealthEvent::ComplaintEscalated { .. } => 4,
            HealthEvent::ComplaintOpened(_) | HealthEvent::RadiationExposure { .. } => 3,
            HealthEvent::ExaminationQueued | HealthEvent::Diagnostic(_) => 2,
            HealthEvent::RecoveryStarted(_) | HealthEvent::ComplaintCured(_) => 1,
        }
    }

    /// The complaint this event is about, if any.
    pub fn complaint(&self) -> Option<ComplaintKind> {
        match self {
            HealthEvent::ComplaintOpened(k)
            | HealthEvent::RecoveryStarted(k)
            | HealthEvent::ComplaintCured(k)
            | HealthEvent::ComplaintFatal(k) => Some(*k),
            HealthEvent::ComplaintEscalated { to, .. } => Some(*to),
            HealthEvent::Death {
                cause: DeathCause::Complaint(k),
            } => Some(*k),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_is_most_severe() {
        let death = HealthEvent::Death {
            cause: DeathCause::Triggered,
        };
        let cured = HealthEvent::ComplaintCured(ComplaintKind::Cold);
        assert!(death.severity() > cured.severity());
    }

    #[test]
    fn escalation_refers_to_new_phase() {
        let e = HealthEvent::ComplaintEscalated {
            from: ComplaintKind::Appendicitis,
            to: ComplaintKind::RupturedAppendix,
        };
        assert_eq!(e.complaint(), Some(ComplaintKind::RupturedAppendix));
    }

    #[test]
    fn diagnostics_have_no_complaint() {
        let e = HealthEvent::Diagnostic(Diagnostic::NegativeElapsed(-4.0));
        assert_eq!(e.complaint(), None);
    }
}
