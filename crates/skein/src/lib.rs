//! Skein: a high-performance 2D agent swarm simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Skein sub-crates. For most users, adding `skein` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use skein::prelude::*;
//!
//! // A seeded flock on a 1000x1000 toroidal world.
//! let mut world = World::new(WorldConfig {
//!     seed: 42,
//!     ..WorldConfig::peaceful_flocks()
//! })
//! .unwrap();
//!
//! for _ in 0..200 {
//!     world.add_random_agent(0);
//! }
//! for _ in 0..60 {
//!     world.tick();
//! }
//!
//! assert_eq!(world.tick_id(), TickId(60));
//! let max_speed = world.config().max_speed;
//! for i in 0..world.count() {
//!     let speed = (world.vx()[i].powi(2) + world.vy()[i].powi(2)).sqrt();
//!     assert!(speed <= max_speed * 1.00001);
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skein-core` | IDs, state flags, genome, boundary mode |
//! | [`rng`] | `skein-rng` | The deterministic sample stream |
//! | [`store`] | `skein-store` | Agent column storage |
//! | [`grid`] | `skein-grid` | Cell-list spatial index |
//! | [`stages`] | `skein-stages` | Sense, behaviour, and integrate stages |
//! | [`engine`] | `skein-engine` | World orchestrator and parallel runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`skein-core`).
pub use skein_core as types;

/// Deterministic seeded sampling (`skein-rng`).
pub use skein_rng as rng;

/// Agent column storage (`skein-store`).
pub use skein_store as store;

/// Cell-list spatial index (`skein-grid`).
pub use skein_grid as grid;

/// Per-tick pipeline stages (`skein-stages`).
pub use skein_stages as stages;

/// World orchestrator and parallel runner (`skein-engine`).
pub use skein_engine as engine;

/// Common imports for typical Skein usage.
///
/// ```rust
/// use skein::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use skein_core::{AgentId, AgentState, BoundaryMode, Genome, TickId};

    // Sampling
    pub use skein_rng::SimRng;

    // Storage and spatial index
    pub use skein_grid::{GridStats, UniformGrid};
    pub use skein_store::AgentStore;

    // Stages
    pub use skein_stages::{BehaviorMode, SenseBuffers};

    // Engine
    pub use skein_engine::{
        ConfigError, ParallelWorlds, TickMetrics, World, WorldConfig, WorldStats,
    };
}
