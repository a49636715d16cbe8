//! Component definitions for the colony ECS.
//!
//! Components are plain data attached to entities.
//! Behavior lives in systems.

mod colonist;
mod common;
mod habitat;

pub use colonist::*;
pub use common::*;
pub use habitat::*;
