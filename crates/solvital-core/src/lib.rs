//! SolVital Core - Colony Physiology Engine
//!
//! An ECS-based simulation of a Mars colony whose colonists breathe,
//! eat, sleep, fall ill and die according to `solvital-logic`.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Colonists, robots, equipment
//! - **Components**: Pure data attached to entities (Occupant, Containment, Physiology, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Habitats are kept in a [`systems::HabitatRegistry`] beside the world so
//! each colonist can borrow theirs as life support during its tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use solvital_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimulationContext::standard(7));
//! let base = engine.habitats.add("Schiaparelli Base", HabitatKind::Settlement);
//! engine.spawn_random_colonist(Name::new("Ada", "Okafor"), Some(base));
//! engine.init();
//!
//! // One millisol per update
//! for _ in 0..1_000 {
//!     engine.update(1.0);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{ColonyCensus, SimulationContext, SimulationEngine, TickSummary};
    pub use crate::systems::{HealthEventLog, TaskInterrupt};
}
