//! Per-tick performance metrics.

/// Timing and memory data for a single tick.
///
/// All durations are in microseconds, measured around each pipeline
/// stage. The world records these after every `tick()`; consumers read
/// them from the return value or from
/// [`World::last_metrics`](crate::World::last_metrics).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent rebuilding the spatial grid.
    pub grid_us: u64,
    /// Time spent in the sense stage.
    pub sense_us: u64,
    /// Time spent in the behaviour stage.
    pub behavior_us: u64,
    /// Time spent in the integrate stage.
    pub integrate_us: u64,
    /// Combined footprint of columns, grid arrays, and aggregate
    /// buffers after the tick, in bytes.
    pub memory_bytes: usize,
}
