//! Colonist components: activity, physiology, work shift.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use solvital_logic::dose::Shielding;
use solvital_logic::{ActivityState, AgentHealthRecord};

/// What a colonist is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Working,
    Resting,
    Sleeping,
    /// Extravehicular activity, in a suit outside any walls
    Eva,
}

impl Activity {
    /// The physiological load this activity puts on the body.
    pub fn state(&self) -> ActivityState {
        match self {
            Activity::Working | Activity::Eva => ActivityState::Active,
            Activity::Resting => ActivityState::Resting,
            Activity::Sleeping => ActivityState::Sleeping,
        }
    }

    /// Radiation shielding, if the activity overrides the habitat's.
    pub fn shielding_override(&self) -> Option<Shielding> {
        match self {
            Activity::Eva => Some(Shielding::Outside),
            _ => None,
        }
    }
}

/// A colonist's complete health record
#[derive(Debug, Clone)]
pub struct Physiology(pub AgentHealthRecord);

impl Deref for Physiology {
    type Target = AgentHealthRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Physiology {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Work shift, as a third of the sol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shift {
    /// 0-333 msol
    #[default]
    A,
    /// 333-666 msol
    B,
    /// 666-1000 msol
    C,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::A, Shift::B, Shift::C];

    /// Millisol range `[start, end)` covered by this shift.
    pub fn window(&self) -> (u32, u32) {
        match self {
            Shift::A => (0, 333),
            Shift::B => (333, 666),
            Shift::C => (666, 1_000),
        }
    }

    /// Returns true if this shift is on duty at `millisol`
    pub fn is_active(&self, millisol: f64) -> bool {
        let (start, end) = self.window();
        let m = millisol.rem_euclid(1_000.0);
        m >= start as f64 && m < end as f64
    }

    /// The shift that overlaps the fewest preferred sleep times. Ties go
    /// to the earliest shift.
    pub fn avoiding(preferred_sleep: (u32, u32)) -> Shift {
        let (first, second) = preferred_sleep;
        Shift::ALL
            .into_iter()
            .min_by_key(|shift| {
                [first, second]
                    .iter()
                    .filter(|&&m| shift.is_active(m as f64))
                    .count()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_states() {
        assert_eq!(Activity::Working.state(), ActivityState::Active);
        assert_eq!(Activity::Eva.state(), ActivityState::Active);
        assert_eq!(Activity::Resting.state(), ActivityState::Resting);
        assert_eq!(Activity::Sleeping.state(), ActivityState::Sleeping);
        assert_eq!(Activity::Eva.shielding_override(), Some(Shielding::Outside));
        assert_eq!(Activity::Sleeping.shielding_override(), None);
    }

    #[test]
    fn test_shift_windows_cover_the_sol() {
        for m in [0.0, 100.0, 332.9, 333.0, 665.9, 666.0, 999.9] {
            let active = Shift::ALL.iter().filter(|s| s.is_active(m)).count();
            assert_eq!(active, 1, "millisol {m}");
        }
        assert!(Shift::C.is_active(1_500.0 + 200.0));
    }

    #[test]
    fn test_shift_avoids_sleep() {
        // Sleeps early in the sol: A is out
        assert_eq!(Shift::avoiding((50, 100)), Shift::B);
        // Sleeps in A and B: C is the only clear one
        assert_eq!(Shift::avoiding((100, 400)), Shift::C);
        // Sleeps late: A is clear and comes first
        assert_eq!(Shift::avoiding((700, 900)), Shift::A);
    }
}
