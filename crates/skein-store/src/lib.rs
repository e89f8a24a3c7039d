//! Structure-of-arrays agent storage for Skein simulations.
//!
//! [`AgentStore`] owns one parallel column per agent attribute —
//! position, velocity, force, state flags, group tag, genome — indexed
//! by dense agent id. The column layout keeps the per-tick stages
//! streaming over contiguous memory instead of hopping between agent
//! structs.
//!
//! Columns always have identical length. Growth happens only inside
//! [`AgentStore::add`] and reallocates every column in lockstep;
//! nothing else in the workspace resizes agent storage.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod store;

pub use store::{AgentStore, ColumnsMut};
