//! Systems - logic that operates on components

mod burial;
mod events;
mod habitat;
mod physiology;
mod radiation;
mod schedule;

pub use burial::*;
pub use events::*;
pub use habitat::*;
pub use physiology::*;
pub use radiation::*;
pub use schedule::*;
