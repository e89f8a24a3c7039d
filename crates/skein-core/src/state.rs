//! Per-agent lifecycle flags implemented as a fixed-width bitset.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of lifecycle flags for one agent, packed into a byte.
///
/// The simulation core consults only [`AgentState::DEAD`]: dead agents
/// are skipped by every pipeline stage and never appear as neighbours.
/// The remaining flags are carried for external systems (combat,
/// metabolism, reproduction) and are never read or written by the core.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AgentState(u8);

impl AgentState {
    /// The agent's slot is dead and may be recycled. Set only by
    /// external systems, never by the core.
    pub const DEAD: AgentState = AgentState(1 << 0);
    /// The agent is fleeing a threat.
    pub const FLEEING: AgentState = AgentState(1 << 1);
    /// The agent is hunting prey.
    pub const HUNTING: AgentState = AgentState(1 << 2);
    /// The agent is reproducing.
    pub const REPRODUCING: AgentState = AgentState(1 << 3);
    /// The agent is foraging.
    pub const FORAGING: AgentState = AgentState(1 << 4);
    /// The agent is injured.
    pub const INJURED: AgentState = AgentState(1 << 5);
    /// The agent is exhausted.
    pub const EXHAUSTED: AgentState = AgentState(1 << 6);
    /// Reserved for future use.
    pub const RESERVED: AgentState = AgentState(1 << 7);

    /// The empty flag set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Check whether every flag in `other` is set in `self`.
    pub fn contains(self, other: AgentState) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set every flag in `other`.
    pub fn insert(&mut self, other: AgentState) {
        self.0 |= other.0;
    }

    /// Clear every flag in `other`.
    pub fn remove(&mut self, other: AgentState) {
        self.0 &= !other.0;
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Shorthand for `contains(AgentState::DEAD)` — the one flag the
    /// core's hot loops test.
    #[inline]
    pub fn is_dead(self) -> bool {
        self.0 & Self::DEAD.0 != 0
    }

    /// The raw flag byte.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Rebuild a flag set from a raw byte.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

impl BitOr for AgentState {
    type Output = AgentState;

    fn bitor(self, rhs: AgentState) -> AgentState {
        AgentState(self.0 | rhs.0)
    }
}

impl BitOrAssign for AgentState {
    fn bitor_assign(&mut self, rhs: AgentState) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentState({:#010b})", self.0)
    }
}
