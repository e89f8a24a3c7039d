//! World configuration, validation, and error types.
//!
//! [`WorldConfig`] is the single input to [`World::new`](crate::World::new).
//! [`validate()`](WorldConfig::validate) checks every structural
//! invariant up front so the tick path never has to.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use skein_core::BoundaryMode;
use skein_grid::GridError;
use skein_stages::BehaviorMode;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`WorldConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A world dimension is not finite and positive.
    InvalidDimension {
        /// Which axis (`"width"` or `"height"`).
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// The initial column capacity is zero.
    ZeroCapacity,
    /// A radius is not finite and positive.
    InvalidRadius {
        /// Which radius (`"sense_radius"` or `"separation_radius"`).
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// Friction is outside `(0, 1]`.
    InvalidFriction {
        /// The offending value.
        value: f32,
    },
    /// The timestep is not finite and positive.
    InvalidTimestep {
        /// The offending value.
        value: f32,
    },
    /// A speed, force, weight, or boost parameter failed validation.
    InvalidParameter {
        /// The parameter name.
        name: &'static str,
        /// What went wrong.
        reason: String,
    },
    /// Grid construction failed.
    Grid(GridError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::ZeroCapacity => write!(f, "initial_capacity must be at least 1"),
            Self::InvalidRadius { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidFriction { value } => {
                write!(f, "friction must be in (0, 1], got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid {name}: {reason}")
            }
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation world.
///
/// The grid cell size is always the sense radius, giving the 3×3
/// query exactly the coverage a radius-R neighbourhood needs.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// World rectangle width in world units.
    pub width: f32,
    /// World rectangle height in world units.
    pub height: f32,
    /// Initial column length; columns grow on demand.
    pub initial_capacity: usize,
    /// Boundary policy applied after each position advance.
    pub boundary: BoundaryMode,
    /// Cruise speed used when spawning random agents.
    pub target_speed: f32,
    /// Hard per-agent speed cap.
    pub max_speed: f32,
    /// Per-agent per-tick steering budget.
    pub max_force: f32,
    /// Multiplicative velocity decay each tick, in `(0, 1]`.
    pub friction: f32,
    /// Neighbour interaction radius; also the grid cell size.
    pub sense_radius: f32,
    /// Radius inside which the separation rule is active.
    pub separation_radius: f32,
    /// Weight on the separation rule.
    pub separation_weight: f32,
    /// Weight on the alignment rule.
    pub alignment_weight: f32,
    /// Weight on the cohesion rule.
    pub cohesion_weight: f32,
    /// Neighbour count above which separation is boosted.
    pub separation_crowding_threshold: u32,
    /// Separation multiplier at full crowding.
    pub separation_crowding_boost: f32,
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// PRNG seed.
    pub seed: u64,
    /// Behaviour formulation; [`BehaviorMode::Steering`] unless a
    /// caller opts into the legacy raw forces.
    pub behavior_mode: BehaviorMode,
    /// Pass-through options for external systems (`BaseDrain`,
    /// `AttackDamage`, …). Stored in insertion order; the core never
    /// reads them.
    pub extra: IndexMap<String, f64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            initial_capacity: 256,
            boundary: BoundaryMode::Wrap,
            target_speed: 30.0,
            max_speed: 50.0,
            max_force: 10.0,
            friction: 0.98,
            sense_radius: 25.0,
            separation_radius: 12.5,
            separation_weight: 1.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_crowding_threshold: 8,
            separation_crowding_boost: 2.0,
            dt: 1.0 / 60.0,
            seed: 0,
            behavior_mode: BehaviorMode::Steering,
            extra: IndexMap::new(),
        }
    }
}

impl WorldConfig {
    /// The "peaceful flocks" preset: balanced steering weights tuned
    /// for smooth visual flocking.
    pub fn peaceful_flocks() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 0.8,
            ..Self::default()
        }
    }

    /// Validate all structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant. A config that passes
    /// cannot fail world construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                name: "width",
                value: self.width,
            });
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                name: "height",
                value: self.height,
            });
        }
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.sense_radius.is_finite() || self.sense_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius {
                name: "sense_radius",
                value: self.sense_radius,
            });
        }
        if !self.separation_radius.is_finite() || self.separation_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius {
                name: "separation_radius",
                value: self.separation_radius,
            });
        }
        if !self.friction.is_finite() || self.friction <= 0.0 || self.friction > 1.0 {
            return Err(ConfigError::InvalidFriction {
                value: self.friction,
            });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep { value: self.dt });
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_speed",
                reason: format!("must be finite and positive, got {}", self.max_speed),
            });
        }
        if !self.target_speed.is_finite() || self.target_speed < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "target_speed",
                reason: format!("must be finite and non-negative, got {}", self.target_speed),
            });
        }
        if !self.max_force.is_finite() || self.max_force < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_force",
                reason: format!("must be finite and non-negative, got {}", self.max_force),
            });
        }
        for (name, value) in [
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if !self.separation_crowding_boost.is_finite() || self.separation_crowding_boost < 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "separation_crowding_boost",
                reason: format!(
                    "must be finite and at least 1.0, got {}",
                    self.separation_crowding_boost
                ),
            });
        }
        Ok(())
    }
}
