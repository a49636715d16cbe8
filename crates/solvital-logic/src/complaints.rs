//! Per-colonist complaint registry and the complaint state machine.
//!
//! Each active complaint moves through
//!
//! ```text
//! Active ──(recovery requested / self-recovers)──▶ Recovering ──(period elapsed)──▶ Cured
//!   │
//!   └──(degraded past its period, lethal)──▶ Fatal
//! ```
//!
//! A degraded complaint with a next phase escalates into that phase instead
//! of turning fatal. At most one instance of each kind is active at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{ComplaintCatalog, ComplaintDef, ComplaintKind};
use crate::constants::time::RANDOM_AILMENT_WINDOW;
use crate::events::{Diagnostic, HealthEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintState {
    Active,
    Recovering,
    Cured,
    Fatal,
}

/// A complaint a colonist is currently suffering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintInstance {
    pub def: ComplaintDef,
    pub state: ComplaintState,
    /// Millisols spent active.
    pub active_time: f64,
    /// Millisols spent recovering.
    pub recovery_time: f64,
}

/// What one tick did to an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Progress {
    Unchanged,
    RecoveryStarted,
    Cured,
    Escalate(ComplaintKind),
    Fatal,
}

impl ComplaintInstance {
    pub fn new(def: ComplaintDef) -> Self {
        Self {
            def,
            state: ComplaintState::Active,
            active_time: 0.0,
            recovery_time: 0.0,
        }
    }

    pub fn kind(&self) -> ComplaintKind {
        self.def.kind
    }

    /// Performance factor in [0, 1]. Recovering complaints fade linearly
    /// back toward full performance.
    pub fn performance_factor(&self) -> f64 {
        let active = self.def.active_factor();
        match self.state {
            ComplaintState::Active => active,
            ComplaintState::Recovering => {
                let progress = if self.def.recovery.period > 0.0 {
                    (self.recovery_time / self.def.recovery.period).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                active + (1.0 - active) * progress
            }
            ComplaintState::Cured => 1.0,
            ComplaintState::Fatal => 0.0,
        }
    }

    fn progress(&mut self, elapsed: f64, performance: f64) -> Progress {
        match self.state {
            ComplaintState::Active => {
                self.active_time += elapsed;
                match self.def.degrade_period {
                    Some(period) if self.active_time >= period => {
                        if let Some(next) = self.def.next_phase {
                            Progress::Escalate(next)
                        } else if performance <= self.def.lethal_performance() {
                            self.state = ComplaintState::Fatal;
                            Progress::Fatal
                        } else {
                            Progress::Unchanged
                        }
                    }
                    _ => {
                        // Self-recovering complaints run their course over
                        // one recovery period before they start to fade.
                        if self.def.recovery.self_recovering
                            && self.active_time >= self.def.recovery.period
                        {
                            self.state = ComplaintState::Recovering;
                            Progress::RecoveryStarted
                        } else {
                            Progress::Unchanged
                        }
                    }
                }
            }
            ComplaintState::Recovering => {
                self.recovery_time += elapsed;
                if self.recovery_time >= self.def.recovery.period {
                    self.state = ComplaintState::Cured;
                    Progress::Cured
                } else {
                    Progress::Unchanged
                }
            }
            ComplaintState::Cured | ComplaintState::Fatal => Progress::Unchanged,
        }
    }
}

/// A complaint that has been cured, for the medical history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuredComplaint {
    pub kind: ComplaintKind,
    /// Total millisols from onset to cure.
    pub duration: f64,
}

/// Result of [`ComplaintRegistry::advance`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryOutcome {
    pub cured: Vec<ComplaintKind>,
    /// The most serious complaint that turned fatal this tick.
    pub fatal: Option<ComplaintKind>,
}

/// All complaints of one colonist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRegistry {
    #[serde(skip, default = "default_catalog")]
    catalog: Arc<ComplaintCatalog>,
    /// Active instances in the order they were opened.
    active: Vec<ComplaintInstance>,
    most_serious: Option<ComplaintKind>,
    /// How often each complaint was ever opened.
    health_log: BTreeMap<ComplaintKind, u32>,
    history: Vec<CuredComplaint>,
    #[serde(skip)]
    events: Vec<HealthEvent>,
}

fn default_catalog() -> Arc<ComplaintCatalog> {
    Arc::new(ComplaintCatalog::standard())
}

impl ComplaintRegistry {
    pub fn new(catalog: Arc<ComplaintCatalog>) -> Self {
        Self {
            catalog,
            active: Vec::new(),
            most_serious: None,
            health_log: BTreeMap::new(),
            history: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Open a complaint. Returns false if it is already active or the
    /// catalog does not define it.
    pub fn open(&mut self, kind: ComplaintKind) -> bool {
        if self.is_active(kind) {
            return false;
        }
        let Some(def) = self.catalog.get(kind).copied() else {
            log::warn!("Complaint {kind} is not in the catalog; ignoring");
            self.events
                .push(HealthEvent::Diagnostic(Diagnostic::UnknownComplaint(kind)));
            return false;
        };

        *self.health_log.entry(kind).or_insert(0) += 1;
        self.active.push(ComplaintInstance::new(def));
        self.events.push(HealthEvent::ComplaintOpened(kind));

        let replaces = match self.most_serious.and_then(|k| self.get(k)) {
            Some(current) => def.seriousness > current.def.seriousness,
            None => true,
        };
        if replaces {
            self.most_serious = Some(kind);
        }
        true
    }

    /// Move an active complaint into recovery. Returns false if it was not
    /// active.
    pub fn start_recovery(&mut self, kind: ComplaintKind) -> bool {
        match self.active.iter_mut().find(|c| c.kind() == kind) {
            Some(c) if c.state == ComplaintState::Active => {
                c.state = ComplaintState::Recovering;
                self.events.push(HealthEvent::RecoveryStarted(kind));
                true
            }
            _ => false,
        }
    }

    /// Cure a complaint immediately. Returns false if it was not present or
    /// already fatal.
    pub fn cure(&mut self, kind: ComplaintKind) -> bool {
        let Some(pos) = self.active.iter().position(|c| c.kind() == kind) else {
            return false;
        };
        if self.active[pos].state == ComplaintState::Fatal {
            return false;
        }
        self.remove_cured(pos);
        self.refresh_most_serious();
        true
    }

    /// Force an active complaint into the fatal state.
    pub fn mark_fatal(&mut self, kind: ComplaintKind) -> bool {
        match self.active.iter_mut().find(|c| c.kind() == kind) {
            Some(c) if c.state != ComplaintState::Fatal => {
                c.state = ComplaintState::Fatal;
                self.events.push(HealthEvent::ComplaintFatal(kind));
                true
            }
            _ => false,
        }
    }

    /// Progress every complaint by `elapsed` millisols at the colonist's
    /// current `performance`.
    pub fn advance(&mut self, elapsed: f64, performance: f64) -> RegistryOutcome {
        let mut outcome = RegistryOutcome::default();
        if elapsed <= 0.0 {
            return outcome;
        }

        let mut cured = Vec::new();
        let mut escalations = Vec::new();
        let mut fatal: Option<ComplaintDef> = None;

        for (i, instance) in self.active.iter_mut().enumerate() {
            match instance.progress(elapsed, performance) {
                Progress::Unchanged => {}
                Progress::RecoveryStarted => {
                    self.events.push(HealthEvent::RecoveryStarted(instance.kind()));
                }
                Progress::Cured => cured.push(i),
                Progress::Escalate(next) => escalations.push((i, next)),
                Progress::Fatal => {
                    self.events.push(HealthEvent::ComplaintFatal(instance.kind()));
                    if fatal.map_or(true, |f| instance.def.seriousness > f.seriousness) {
                        fatal = Some(instance.def);
                    }
                }
            }
        }

        // Remove back to front so indices stay valid.
        let mut removals: Vec<(usize, Option<ComplaintKind>)> = cured
            .into_iter()
            .map(|i| (i, None))
            .chain(escalations.into_iter().map(|(i, n)| (i, Some(n))))
            .collect();
        removals.sort_by(|a, b| b.0.cmp(&a.0));

        let mut next_phases = Vec::new();
        for (i, next) in removals {
            match next {
                None => {
                    outcome.cured.push(self.active[i].kind());
                    self.remove_cured(i);
                }
                Some(next) => {
                    let from = self.active.remove(i).kind();
                    self.events
                        .push(HealthEvent::ComplaintEscalated { from, to: next });
                    next_phases.push(next);
                }
            }
        }
        outcome.cured.reverse();

        self.refresh_most_serious();
        for next in next_phases.into_iter().rev() {
            self.open(next);
        }

        outcome.fatal = fatal.map(|d| d.kind);
        outcome
    }

    /// Roll for spontaneous illness over `elapsed` millisols. Each catalog
    /// entry with a positive probability that is not already active gets one
    /// roll, in catalog order. Returns the kinds opened.
    pub fn check_random_ailments(&mut self, elapsed: f64, rng: &mut impl Rng) -> Vec<ComplaintKind> {
        let mut opened = Vec::new();
        if elapsed <= 0.0 {
            return opened;
        }
        let time_modifier = elapsed / RANDOM_AILMENT_WINDOW;
        let catalog = Arc::clone(&self.catalog);
        for def in catalog.iter() {
            if def.probability <= 0.0 || def.kind.is_environmental() || self.is_active(def.kind) {
                continue;
            }
            let roll: f64 = rng.gen_range(0.0..100.0);
            if roll < def.probability * time_modifier && self.open(def.kind) {
                log::debug!("Random ailment: {}", def.kind);
                opened.push(def.kind);
            }
        }
        opened
    }

    fn remove_cured(&mut self, index: usize) {
        let instance = self.active.remove(index);
        let kind = instance.kind();
        self.history.push(CuredComplaint {
            kind,
            duration: instance.active_time + instance.recovery_time,
        });
        self.events.push(HealthEvent::ComplaintCured(kind));
    }

    /// Full rescan; earlier-opened complaints win ties.
    fn refresh_most_serious(&mut self) {
        let mut best: Option<&ComplaintInstance> = None;
        for c in &self.active {
            if best.map_or(true, |b| c.def.seriousness > b.def.seriousness) {
                best = Some(c);
            }
        }
        self.most_serious = best.map(|c| c.kind());
    }

    pub fn is_active(&self, kind: ComplaintKind) -> bool {
        self.active.iter().any(|c| c.kind() == kind)
    }

    pub fn get(&self, kind: ComplaintKind) -> Option<&ComplaintInstance> {
        self.active.iter().find(|c| c.kind() == kind)
    }

    pub fn most_serious(&self) -> Option<&ComplaintInstance> {
        self.most_serious.and_then(|k| self.get(k))
    }

    pub fn active(&self) -> impl Iterator<Item = &ComplaintInstance> {
        self.active.iter()
    }

    pub fn has_serious(&self) -> bool {
        self.active.iter().any(|c| c.def.is_serious())
    }

    /// Number of times `kind` was ever opened.
    pub fn frequency(&self, kind: ComplaintKind) -> u32 {
        self.health_log.get(&kind).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[CuredComplaint] {
        &self.history
    }

    pub fn catalog(&self) -> &ComplaintCatalog {
        &self.catalog
    }

    /// Take the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<HealthEvent> {
        std::mem::take(&mut self.events)
    }
}
