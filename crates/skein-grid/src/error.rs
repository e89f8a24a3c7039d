//! Error types for grid construction.

use std::fmt;

/// Errors arising from uniform grid construction.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Cell size is not finite and positive.
    InvalidCellSize {
        /// The offending value.
        value: f32,
    },
    /// A world dimension is not finite and positive.
    InvalidDimension {
        /// Which axis (`"width"` or `"height"`).
        name: &'static str,
        /// The offending value.
        value: f32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { value } => {
                write!(f, "cell size must be finite and positive, got {value}")
            }
            Self::InvalidDimension { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
        }
    }
}

impl std::error::Error for GridError {}
