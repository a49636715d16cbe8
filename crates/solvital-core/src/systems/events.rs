//! Health event log - collects what happened to every colonist
//!
//! Each health record hands back the events of its tick. The physiology
//! system stamps them with who, when and where and files them here, where
//! task schedulers can pick up interruptions and the UI can read history.

use hecs::Entity;
use solvital_logic::{ClockPulse, ComplaintKind, HealthEvent};

/// What a colonist should drop their current task for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskInterrupt {
    Eat,
    Drink,
    Sleep,
    SeekTreatment,
    /// Get out of a failing habitat
    Evacuate,
}

impl TaskInterrupt {
    /// The interruption a health event calls for, if any.
    pub fn for_event(event: &HealthEvent) -> Option<Self> {
        match event {
            HealthEvent::ComplaintOpened(kind) => Some(match kind {
                ComplaintKind::Starvation => TaskInterrupt::Eat,
                ComplaintKind::Dehydration => TaskInterrupt::Drink,
                ComplaintKind::HighFatigueCollapse => TaskInterrupt::Sleep,
                ComplaintKind::Suffocation
                | ComplaintKind::Decompression
                | ComplaintKind::Freezing
                | ComplaintKind::HeatStroke => TaskInterrupt::Evacuate,
                _ => TaskInterrupt::SeekTreatment,
            }),
            HealthEvent::ComplaintEscalated { .. } => Some(TaskInterrupt::SeekTreatment),
            _ => None,
        }
    }
}

/// A health event stamped with its colonist and time
#[derive(Debug, Clone, PartialEq)]
pub struct ColonyEvent {
    /// Unique event ID
    pub id: u32,
    pub colonist: Entity,
    /// Colonist name at the time of the event
    pub name: String,
    pub sol: u32,
    pub millisol: f64,
    pub event: HealthEvent,
}

impl ColonyEvent {
    /// How severe is this event? (1-5, 5 being critical)
    pub fn severity(&self) -> u8 {
        self.event.severity()
    }

    pub fn interrupt(&self) -> Option<TaskInterrupt> {
        TaskInterrupt::for_event(&self.event)
    }
}

/// An interruption waiting for the task scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueuedInterrupt {
    colonist: Entity,
    interrupt: TaskInterrupt,
    sol: u32,
}

/// Sols of history kept by default
pub const DEFAULT_RETENTION_SOLS: u32 = 7;

/// Every health event in the colony, oldest first
#[derive(Debug, Clone)]
pub struct HealthEventLog {
    events: Vec<ColonyEvent>,
    interrupts: Vec<QueuedInterrupt>,
    next_id: u32,
    retention_sols: u32,
}

impl Default for HealthEventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthEventLog {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION_SOLS)
    }

    pub fn with_retention(retention_sols: u32) -> Self {
        Self {
            events: Vec::new(),
            interrupts: Vec::new(),
            next_id: 0,
            retention_sols,
        }
    }

    /// File an event and queue its interruption. Returns the event ID.
    pub fn record(
        &mut self,
        colonist: Entity,
        name: impl Into<String>,
        pulse: &ClockPulse,
        event: HealthEvent,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        if let Some(interrupt) = TaskInterrupt::for_event(&event) {
            self.interrupts.push(QueuedInterrupt {
                colonist,
                interrupt,
                sol: pulse.mission_sol,
            });
        }
        self.events.push(ColonyEvent {
            id,
            colonist,
            name: name.into(),
            sol: pulse.mission_sol,
            millisol: pulse.millisol,
            event,
        });
        id
    }

    pub fn get(&self, id: u32) -> Option<&ColonyEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColonyEvent> {
        self.events.iter()
    }

    /// Events after `id`, oldest first
    pub fn since(&self, id: u32) -> impl Iterator<Item = &ColonyEvent> {
        self.events.iter().filter(move |e| e.id > id)
    }

    pub fn for_colonist(&self, colonist: Entity) -> impl Iterator<Item = &ColonyEvent> {
        self.events.iter().filter(move |e| e.colonist == colonist)
    }

    /// Most severe event still in the log; the latest wins a tie.
    pub fn highest_priority(&self) -> Option<&ColonyEvent> {
        self.events.iter().max_by_key(|e| (e.severity(), e.id))
    }

    /// Hand pending interruptions to the task scheduler.
    pub fn take_interrupts(&mut self) -> Vec<(Entity, TaskInterrupt)> {
        self.interrupts
            .drain(..)
            .map(|q| (q.colonist, q.interrupt))
            .collect()
    }

    /// Interruptions not yet taken, oldest first
    pub fn pending_interrupts(&self) -> impl ExactSizeIterator<Item = (Entity, TaskInterrupt)> + '_ {
        self.interrupts.iter().map(|q| (q.colonist, q.interrupt))
    }

    /// Drop events and untaken interruptions older than the retention
    /// window. Returns how many events went.
    pub fn prune(&mut self, now_sol: u32) -> usize {
        let before = self.events.len();
        let keep_from = now_sol.saturating_sub(self.retention_sols);
        self.events.retain(|e| e.sol >= keep_from);
        self.interrupts.retain(|q| q.sol >= keep_from);
        before - self.events.len()
    }

    /// Forget everything, keeping the ID counter.
    pub fn clear(&mut self) {
        self.events.clear();
        self.interrupts.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
