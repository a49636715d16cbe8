//! Burial queue - the dead wait here until someone retrieves the body
//!
//! A colonist who dies stays in the world with a frozen health record.
//! The entity is only despawned when [`BurialQueue::bury`] is called.

use std::collections::VecDeque;

use hecs::{Entity, World};
use solvital_logic::DeathRecord;

/// A body waiting for burial
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBurial {
    pub entity: Entity,
    pub name: String,
    pub record: DeathRecord,
}

#[derive(Debug, Clone, Default)]
pub struct BurialQueue {
    pending: VecDeque<PendingBurial>,
    buried: Vec<PendingBurial>,
}

impl BurialQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a body. A second request for the same entity is ignored.
    pub fn enqueue(&mut self, entity: Entity, name: impl Into<String>, record: DeathRecord) -> bool {
        if self.is_pending(entity) {
            return false;
        }
        self.pending.push_back(PendingBurial {
            entity,
            name: name.into(),
            record,
        });
        true
    }

    pub fn is_pending(&self, entity: Entity) -> bool {
        self.pending.iter().any(|p| p.entity == entity)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingBurial> {
        self.pending.iter()
    }

    /// Longest-waiting body
    pub fn oldest(&self) -> Option<&PendingBurial> {
        self.pending.front()
    }

    /// Bury a queued body: despawn it and move it to the graveyard.
    pub fn bury(&mut self, world: &mut World, entity: Entity) -> Option<DeathRecord> {
        let index = self.pending.iter().position(|p| p.entity == entity)?;
        let burial = self.pending.remove(index)?;
        if world.despawn(entity).is_err() {
            log::warn!("Buried {} but the entity was already gone", burial.name);
        }
        log::info!("{} buried (died sol {})", burial.name, burial.record.mission_sol);
        let record = burial.record.clone();
        self.buried.push(burial);
        Some(record)
    }

    /// Everyone buried so far, in burial order
    pub fn graveyard(&self) -> &[PendingBurial] {
        &self.buried
    }

    /// Drop every pending body, returning them.
    pub fn drain(&mut self) -> Vec<PendingBurial> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solvital_logic::{ClockPulse, DeathCause};

    fn record() -> DeathRecord {
        DeathRecord::new(DeathCause::Triggered, &ClockPulse::at(4, 10.0, 0.0), None, None)
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut world = World::new();
        let body = world.spawn(());
        let mut queue = BurialQueue::new();
        assert!(queue.enqueue(body, "Ada", record()));
        assert!(!queue.enqueue(body, "Ada", record()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_bury_despawns() {
        let mut world = World::new();
        let body = world.spawn(());
        let mut queue = BurialQueue::new();
        queue.enqueue(body, "Ada", record());

        let rec = queue.bury(&mut world, body).unwrap();
        assert_eq!(rec.mission_sol, 4);
        assert!(!world.contains(body));
        assert!(queue.is_empty());
        assert_eq!(queue.graveyard().len(), 1);
        assert!(queue.bury(&mut world, body).is_none());
    }

    #[test]
    fn test_bury_unknown_entity() {
        let mut world = World::new();
        let alive = world.spawn(());
        let mut queue = BurialQueue::new();
        assert!(queue.bury(&mut world, alive).is_none());
        assert!(world.contains(alive));
    }
}
