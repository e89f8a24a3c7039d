//! Core types for the Skein swarm simulation engine.
//!
//! This is the leaf crate with zero dependencies. It defines the
//! fundamental vocabulary shared by the rest of the workspace: agent
//! and tick identifiers, the per-agent state flag set, the immutable
//! genome, and the world boundary policy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod genome;
pub mod id;
pub mod state;

// Re-export core types at crate root for convenience.
pub use boundary::BoundaryMode;
pub use genome::Genome;
pub use id::{AgentId, TickId};
pub use state::AgentState;
