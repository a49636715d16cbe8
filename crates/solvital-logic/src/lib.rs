//! Pure colonist physiology for SolVital.
//!
//! This crate models one colonist's body: vital signs, complaints,
//! radiation dose, circadian rhythm, life-support dependence and death.
//! It knows nothing about the ECS engine; functions take plain data and
//! return results, so every rule is unit-testable on its own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Complaint kinds and the static complaint table |
//! | [`circadian`] | Leptin/ghrelin, sleep habit histogram, sleep and exercise logs |
//! | [`clock`] | Mars clock and the per-tick pulse |
//! | [`complaints`] | Complaint state machine and per-colonist registry |
//! | [`condition`] | The health record and its fixed-order tick |
//! | [`config`] | Physiology config, validation, JSON loading |
//! | [`constants`] | Vital bounds, thresholds, performance modifiers |
//! | [`context`] | Shared config and catalog handed to every record |
//! | [`dose`] | Radiation dose windows and exposure sampling |
//! | [`events`] | Health events and diagnostics |
//! | [`life_support`] | Life-support trait, breathing check, habitat atmosphere |
//! | [`mortality`] | Death causes and records |
//! | [`performance`] | Performance, fitness level, health score |
//! | [`vitals`] | Need accrual, energy, stress, threshold checks |

pub mod catalog;
pub mod circadian;
pub mod clock;
pub mod complaints;
pub mod condition;
pub mod config;
pub mod constants;
pub mod context;
pub mod dose;
pub mod events;
pub mod life_support;
pub mod mortality;
pub mod performance;
pub mod vitals;

pub use catalog::{ComplaintCatalog, ComplaintDef, ComplaintKind};
pub use clock::{ClockPulse, MarsClock};
pub use complaints::{ComplaintRegistry, ComplaintState};
pub use condition::{AgentHealthRecord, TickReport};
pub use config::{LoadError, PhysiologyConfig};
pub use context::PhysiologyContext;
pub use events::{Diagnostic, HealthEvent};
pub use life_support::{HabitatAtmosphere, LifeSupport};
pub use mortality::{DeathCause, DeathRecord};
pub use vitals::{ActivityState, BodyProfile, NaturalAttributes, VitalSigns};
