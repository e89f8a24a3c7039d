//! Cell-list spatial index for Skein simulations.
//!
//! A [`UniformGrid`] buckets agents into square cells sized to the
//! sense radius, so a 3×3 cell neighbourhood is exactly the candidate
//! set for a radius query. The grid is rebuilt every tick from the
//! position columns and performs no allocation after construction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;

pub use error::GridError;
pub use grid::{GridStats, UniformGrid};
