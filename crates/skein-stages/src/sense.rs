//! Neighbour aggregation over the spatial grid.

use skein_core::AgentState;
use skein_grid::UniformGrid;

/// Per-agent neighbour aggregates, rewritten every tick.
///
/// Parallel columns indexed by agent id, like the agent store itself.
/// The world grows these in lockstep with the other columns; the
/// sense stage only zeroes and fills the live prefix.
#[derive(Debug, Clone)]
pub struct SenseBuffers {
    /// Neighbours within the sense radius.
    pub neighbor_count: Vec<u32>,
    /// Accumulated `1/d`-weighted repulsion, x component.
    pub separation_x: Vec<f32>,
    /// Accumulated `1/d`-weighted repulsion, y component.
    pub separation_y: Vec<f32>,
    /// Sum of neighbour velocity x.
    pub alignment_vx: Vec<f32>,
    /// Sum of neighbour velocity y.
    pub alignment_vy: Vec<f32>,
    /// Sum of neighbour position x.
    pub cohesion_x: Vec<f32>,
    /// Sum of neighbour position y.
    pub cohesion_y: Vec<f32>,
}

impl SenseBuffers {
    /// Allocate aggregate columns for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            neighbor_count: vec![0; capacity],
            separation_x: vec![0.0; capacity],
            separation_y: vec![0.0; capacity],
            alignment_vx: vec![0.0; capacity],
            alignment_vy: vec![0.0; capacity],
            cohesion_x: vec![0.0; capacity],
            cohesion_y: vec![0.0; capacity],
        }
    }

    /// Current column length.
    pub fn capacity(&self) -> usize {
        self.neighbor_count.len()
    }

    /// Extend all aggregate columns to `capacity`. No-op if already
    /// large enough; called in lockstep with agent column growth.
    pub fn grow(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            self.neighbor_count.resize(capacity, 0);
            self.separation_x.resize(capacity, 0.0);
            self.separation_y.resize(capacity, 0.0);
            self.alignment_vx.resize(capacity, 0.0);
            self.alignment_vy.resize(capacity, 0.0);
            self.cohesion_x.resize(capacity, 0.0);
            self.cohesion_y.resize(capacity, 0.0);
        }
    }

    /// Memory footprint of the aggregate columns in bytes.
    pub fn memory_bytes(&self) -> usize {
        let cap = self.capacity();
        cap * std::mem::size_of::<u32>() + cap * 6 * std::mem::size_of::<f32>()
    }

    /// Zero the first `count` entries of every aggregate column.
    fn reset(&mut self, count: usize) {
        self.neighbor_count[..count].fill(0);
        self.separation_x[..count].fill(0.0);
        self.separation_y[..count].fill(0.0);
        self.alignment_vx[..count].fill(0.0);
        self.alignment_vy[..count].fill(0.0);
        self.cohesion_x[..count].fill(0.0);
        self.cohesion_y[..count].fill(0.0);
    }
}

/// The neighbour aggregation stage.
///
/// For every live agent, walks the 3×3 cell neighbourhood the grid
/// hands back, filters candidates by the true sense radius, and
/// accumulates counts, velocity sums, position sums, and the weighted
/// separation vector. An agent is never its own neighbour; dead
/// agents neither query nor appear in anyone's aggregates.
#[derive(Debug, Clone)]
pub struct SenseStage {
    sense_radius_sq: f32,
    separation_radius: f32,
}

impl SenseStage {
    /// Create a sense stage for the given radii.
    ///
    /// The radii are validated by the world configuration before they
    /// get here.
    pub fn new(sense_radius: f32, separation_radius: f32) -> Self {
        Self {
            sense_radius_sq: sense_radius * sense_radius,
            separation_radius,
        }
    }

    /// Accumulate aggregates for all agents into `out`.
    ///
    /// Reads the tick-start positions, velocities, and states; writes
    /// only into `out`. Zero allocations.
    ///
    /// # Panics
    ///
    /// Panics if the column slices disagree on length or `out` is too
    /// short — both programmer errors caught at the slice boundary.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        grid: &UniformGrid,
        x: &[f32],
        y: &[f32],
        vx: &[f32],
        vy: &[f32],
        state: &[AgentState],
        out: &mut SenseBuffers,
    ) {
        let n = x.len();
        debug_assert_eq!(n, y.len());
        debug_assert_eq!(n, vx.len());
        debug_assert_eq!(n, vy.len());
        debug_assert_eq!(n, state.len());
        out.reset(n);

        let rsep = self.separation_radius;
        for i in 0..n {
            if state[i].is_dead() {
                continue;
            }
            let (xi, yi) = (x[i], y[i]);

            let mut count = 0u32;
            let mut sep_x = 0.0f32;
            let mut sep_y = 0.0f32;
            let mut sum_vx = 0.0f32;
            let mut sum_vy = 0.0f32;
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;

            grid.query_3x3(xi, yi, |j| {
                if j == i || state[j].is_dead() {
                    return;
                }
                let dx = x[j] - xi;
                let dy = y[j] - yi;
                let d_sq = dx * dx + dy * dy;
                if d_sq > self.sense_radius_sq {
                    return;
                }

                count += 1;
                sum_vx += vx[j];
                sum_vy += vy[j];
                sum_x += x[j];
                sum_y += y[j];

                if d_sq > 0.0 {
                    let d = d_sq.sqrt();
                    let strength = (1.0 - d / rsep).max(0.0);
                    if strength > 0.0 {
                        // Outward direction, 1/d weighted with linear
                        // falloff inside the separation radius.
                        let scale = strength / (d * d);
                        sep_x -= dx * scale;
                        sep_y -= dy * scale;
                    }
                }
            });

            out.neighbor_count[i] = count;
            out.separation_x[i] = sep_x;
            out.separation_y[i] = sep_y;
            out.alignment_vx[i] = sum_vx;
            out.alignment_vy[i] = sum_vy;
            out.cohesion_x[i] = sum_x;
            out.cohesion_y[i] = sum_y;
        }
    }
}
