//! Per-tick pipeline stages for Skein simulations.
//!
//! Each tick runs three stages over the agent columns, in a fixed
//! order:
//!
//! 1. [`SenseStage`] — scan the 3×3 grid neighbourhood of every live
//!    agent and accumulate neighbour aggregates into [`SenseBuffers`].
//! 2. [`BehaviorStage`] — turn the aggregates into a steering force
//!    under a per-agent force budget.
//! 3. [`IntegrateStage`] — apply force to velocity, velocity to
//!    position, then the world boundary policy.
//!
//! Stages hold their parameters and operate on plain column slices;
//! they own no agent state and allocate nothing while running. Within
//! a stage, agents are processed in ascending id order — part of the
//! engine's determinism contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod integrate;
pub mod sense;

pub use behavior::{BehaviorMode, BehaviorStage, RuleKind, SteeringParams};
pub use integrate::IntegrateStage;
pub use sense::{SenseBuffers, SenseStage};

/// Threshold below which a vector magnitude is treated as zero.
pub const EPS_MAGNITUDE: f32 = 1e-3;

/// Guard against division by near-zero magnitudes.
pub const EPS_DIVISION: f32 = 1e-4;
