//! Mars clock and per-tick pulse.
//!
//! The global clock is a collaborator; this module only models the signal
//! it hands to every agent: elapsed millisols, the mission sol, the time of
//! sol, and whether this tick crossed into a new sol.

use serde::{Deserialize, Serialize};

use crate::constants::time::MILLISOLS_PER_SOL;

/// Time signal delivered to each agent once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockPulse {
    /// Millisols elapsed since the previous tick. May arrive negative from a
    /// misbehaving caller; consumers clamp it.
    pub elapsed: f64,
    /// Mission sol, starting at 1.
    pub mission_sol: u32,
    /// Time of sol [0, 1000).
    pub millisol: f64,
    /// True on the first tick of a new sol.
    pub new_sol: bool,
}

impl ClockPulse {
    /// A pulse at an explicit point in time, not crossing a sol boundary.
    pub fn at(mission_sol: u32, millisol: f64, elapsed: f64) -> Self {
        Self {
            elapsed,
            mission_sol,
            millisol,
            new_sol: false,
        }
    }

    /// Whole millisol of the current sol.
    pub fn millisol_int(&self) -> u32 {
        self.millisol as u32
    }
}

/// Minimal sol/millisol clock used by the engine and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarsClock {
    sol: u32,
    millisol: f64,
}

impl Default for MarsClock {
    fn default() -> Self {
        Self {
            sol: 1,
            millisol: 0.0,
        }
    }
}

impl MarsClock {
    pub fn new(sol: u32, millisol: f64) -> Self {
        Self {
            sol: sol.max(1),
            millisol: millisol.clamp(0.0, MILLISOLS_PER_SOL - f64::EPSILON),
        }
    }

    /// Advance by `elapsed` millisols and return the pulse for this tick.
    /// Negative input does not move the clock but is passed through so the
    /// agents can report it.
    pub fn advance(&mut self, elapsed: f64) -> ClockPulse {
        let step = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        let start_sol = self.sol;
        let mut msol = self.millisol + step;
        while msol >= MILLISOLS_PER_SOL {
            msol -= MILLISOLS_PER_SOL;
            self.sol += 1;
        }
        self.millisol = msol;

        ClockPulse {
            elapsed,
            mission_sol: self.sol,
            millisol: self.millisol,
            new_sol: self.sol != start_sol,
        }
    }

    pub fn sol(&self) -> u32 {
        self.sol
    }

    pub fn millisol(&self) -> f64 {
        self.millisol
    }

    /// Total millisols since mission start.
    pub fn total_millisols(&self) -> f64 {
        (self.sol - 1) as f64 * MILLISOLS_PER_SOL + self.millisol
    }
}
