//! World boundary policy.

/// How the integrate stage resolves positions that leave the world
/// rectangle.
///
/// This is a world-level policy, applied uniformly to both axes after
/// each position advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// Toroidal world: positions wrap to the opposite side, velocity
    /// is untouched.
    Wrap,
    /// Positions reflect off the wall and the offending velocity
    /// component is negated.
    Reflect,
    /// Positions clip to the wall and the offending velocity component
    /// drops to zero.
    Clamp,
}
