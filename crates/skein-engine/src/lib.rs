//! World orchestrator for Skein simulations.
//!
//! [`World`] owns everything one simulation instance needs — the
//! seeded PRNG, the agent columns, the spatial grid, the aggregate
//! buffers, and the three pipeline stages — and sequences them each
//! [`tick()`](World::tick):
//!
//! 1. zero the force columns,
//! 2. rebuild the grid from current positions,
//! 3. sense (neighbour aggregation),
//! 4. behaviour (steering forces),
//! 5. integrate (velocity, position, boundary),
//!
//! then advance the tick counter and simulated time. Construction
//! validates the [`WorldConfig`] once; the tick path is infallible,
//! allocation-free, and deterministic for a fixed seed.
//!
//! [`ParallelWorlds`] runs several independent worlds on scoped
//! threads for callers that want single-host batching.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod hash;
pub mod metrics;
pub mod parallel;
pub mod world;

pub use config::{ConfigError, WorldConfig};
pub use metrics::TickMetrics;
pub use parallel::{ParallelError, ParallelWorlds, WorldRunReport};
pub use world::{World, WorldStats};
