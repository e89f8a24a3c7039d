//! The world orchestrator.

use std::time::Instant;

use indexmap::IndexMap;
use skein_core::{AgentId, AgentState, Genome, TickId};
use skein_grid::{GridStats, UniformGrid};
use skein_rng::SimRng;
use skein_stages::{BehaviorStage, IntegrateStage, SenseBuffers, SenseStage, SteeringParams};
use skein_store::AgentStore;

use crate::config::{ConfigError, WorldConfig};
use crate::hash::StateHasher;
use crate::metrics::TickMetrics;

// ── WorldStats ──────────────────────────────────────────────────

/// Census and occupancy snapshot, computed off the hot path.
#[derive(Debug, Clone)]
pub struct WorldStats {
    /// Total agents ever added (live and dead).
    pub total_agents: usize,
    /// Agents without the dead flag.
    pub live_agents: usize,
    /// Live agents per group tag, keyed in first-seen order.
    pub population_by_group: IndexMap<u8, usize>,
    /// Spatial occupancy from the last grid rebuild.
    pub grid: GridStats,
}

// ── World ───────────────────────────────────────────────────────

/// A single simulation world: owns the PRNG, the agent columns, the
/// spatial grid, the aggregate buffers, and the three pipeline stages.
///
/// Worlds never share mutable state; a caller may run several on
/// separate threads. `tick()` is synchronous and non-reentrant, and
/// performs no allocation — capacity moves only on
/// [`add_agent`](World::add_agent).
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    rng: SimRng,
    store: AgentStore,
    grid: UniformGrid,
    buffers: SenseBuffers,
    sense: SenseStage,
    behavior: BehaviorStage,
    integrate: IntegrateStage,
    tick: TickId,
    time: f64,
    last_metrics: TickMetrics,
}

impl World {
    /// Construct a world from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails; a valid config
    /// cannot fail construction.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        // Cell size equal to the sense radius makes the 3x3 query
        // exactly cover a radius-R neighbourhood.
        let grid = UniformGrid::new(
            config.sense_radius,
            config.width,
            config.height,
            config.initial_capacity,
        )?;

        let sense = SenseStage::new(config.sense_radius, config.separation_radius);
        let behavior = BehaviorStage::new(
            SteeringParams {
                max_speed: config.max_speed,
                max_force: config.max_force,
                separation_weight: config.separation_weight,
                alignment_weight: config.alignment_weight,
                cohesion_weight: config.cohesion_weight,
                crowding_threshold: config.separation_crowding_threshold,
                crowding_boost: config.separation_crowding_boost,
            },
            config.behavior_mode,
        );
        let integrate = IntegrateStage::new(
            config.dt,
            config.friction,
            config.max_speed,
            config.boundary,
            config.width,
            config.height,
        );

        Ok(Self {
            rng: SimRng::new(config.seed),
            store: AgentStore::with_capacity(config.initial_capacity),
            buffers: SenseBuffers::with_capacity(config.initial_capacity),
            grid,
            sense,
            behavior,
            integrate,
            tick: TickId(0),
            time: 0.0,
            last_metrics: TickMetrics::default(),
            config,
        })
    }

    /// Advance the simulation one timestep.
    ///
    /// Zeroes the force columns, rebuilds the grid from current
    /// positions, then runs sense, behaviour, and integrate in order.
    /// Infallible: per-tick numerical degeneracies are absorbed by the
    /// stages and construction-time validation covers everything else.
    pub fn tick(&mut self) -> TickMetrics {
        let tick_start = Instant::now();
        let count = self.store.count();

        self.store.zero_forces();

        let grid_start = Instant::now();
        self.grid.rebuild(self.store.x(), self.store.y(), count);
        let grid_us = grid_start.elapsed().as_micros() as u64;

        let sense_start = Instant::now();
        self.sense.run(
            &self.grid,
            self.store.x(),
            self.store.y(),
            self.store.vx(),
            self.store.vy(),
            self.store.states(),
            &mut self.buffers,
        );
        let sense_us = sense_start.elapsed().as_micros() as u64;

        let behavior_start = Instant::now();
        {
            let cols = self.store.columns_mut();
            self.behavior.run(
                &self.buffers,
                cols.x,
                cols.y,
                cols.vx,
                cols.vy,
                cols.state,
                cols.fx,
                cols.fy,
            );
        }
        let behavior_us = behavior_start.elapsed().as_micros() as u64;

        let integrate_start = Instant::now();
        {
            let cols = self.store.columns_mut();
            self.integrate
                .run(cols.fx, cols.fy, cols.state, cols.x, cols.y, cols.vx, cols.vy);
        }
        let integrate_us = integrate_start.elapsed().as_micros() as u64;

        self.tick = TickId(self.tick.0 + 1);
        self.time += self.config.dt as f64;

        let metrics = TickMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            grid_us,
            sense_us,
            behavior_us,
            integrate_us,
            memory_bytes: self.store.memory_bytes()
                + self.grid.memory_bytes()
                + self.buffers.memory_bytes(),
        };
        self.last_metrics = metrics.clone();
        metrics
    }

    /// Add an agent with explicit position, velocity, group, and
    /// genome. Returns the new id — always the pre-call count.
    ///
    /// Grows the columns, the grid link array, and the aggregate
    /// buffers in lockstep when at capacity; any outstanding column
    /// views are invalidated by the borrow rules before this can run.
    pub fn add_agent(
        &mut self,
        pos: (f32, f32),
        vel: (f32, f32),
        group: u8,
        genome: Genome,
    ) -> AgentId {
        debug_assert!(genome.validate().is_ok());
        let id = self.store.add(pos, vel, group, genome);
        let capacity = self.store.capacity();
        self.grid.grow(capacity);
        self.buffers.grow(capacity);
        id
    }

    /// Add an agent sampled from the world's PRNG: uniform position,
    /// a random heading at the configured target speed, and a genome
    /// drawn from the trait ranges.
    ///
    /// Consumes a fixed number of PRNG draws regardless of world
    /// state, so spawn sequences replay exactly.
    pub fn add_random_agent(&mut self, group: u8) -> AgentId {
        let x = self.rng.next_f32_range(0.0, self.config.width);
        let y = self.rng.next_f32_range(0.0, self.config.height);
        let (hx, hy) = self.rng.next_unit_vector();
        let vel = (hx * self.config.target_speed, hy * self.config.target_speed);

        let (flo, fhi) = Genome::FACTOR_RANGE;
        let (alo, ahi) = Genome::AGGRESSION_RANGE;
        let genome = Genome {
            speed_factor: self.rng.next_f32_range(flo, fhi),
            sense_factor: self.rng.next_f32_range(flo, fhi),
            aggression: self.rng.next_f32_range(alo, ahi),
            color_idx: self.rng.next_index(Genome::PALETTE_SIZE as usize) as u8,
        };
        self.add_agent((x, y), vel, group, genome)
    }

    /// Number of agents.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Returns `true` if the world holds no agents.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Current tick id.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Simulated time in seconds (`tick · dt`).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The configuration this world was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &TickMetrics {
        &self.last_metrics
    }

    /// Position x column.
    pub fn x(&self) -> &[f32] {
        self.store.x()
    }

    /// Position y column.
    pub fn y(&self) -> &[f32] {
        self.store.y()
    }

    /// Velocity x column.
    pub fn vx(&self) -> &[f32] {
        self.store.vx()
    }

    /// Velocity y column.
    pub fn vy(&self) -> &[f32] {
        self.store.vy()
    }

    /// Force x column, as left by the last behaviour run.
    pub fn fx(&self) -> &[f32] {
        self.store.fx()
    }

    /// Force y column, as left by the last behaviour run.
    pub fn fy(&self) -> &[f32] {
        self.store.fy()
    }

    /// State flag column.
    pub fn states(&self) -> &[AgentState] {
        self.store.states()
    }

    /// State flag column, mutable — the hook external systems use to
    /// mark agents dead or flag behaviours. The core never writes it.
    pub fn states_mut(&mut self) -> &mut [AgentState] {
        self.store.states_mut()
    }

    /// Group tag column.
    pub fn groups(&self) -> &[u8] {
        self.store.groups()
    }

    /// Genome column.
    pub fn genomes(&self) -> &[Genome] {
        self.store.genomes()
    }

    /// Force columns, mutable — for auxiliary force systems that add
    /// onto steering output between `tick()` calls.
    pub fn forces_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        self.store.forces_mut()
    }

    /// Per-agent neighbour counts from the last sense run.
    pub fn neighbor_counts(&self) -> &[u32] {
        &self.buffers.neighbor_count[..self.store.count()]
    }

    /// The full aggregate buffers from the last sense run.
    pub fn aggregates(&self) -> &SenseBuffers {
        &self.buffers
    }

    /// Occupancy statistics from the last grid rebuild.
    pub fn grid_stats(&self) -> GridStats {
        self.grid.stats(self.store.count())
    }

    /// Census plus grid occupancy. Off the hot path.
    pub fn stats(&self) -> WorldStats {
        let mut live = 0usize;
        let mut by_group: IndexMap<u8, usize> = IndexMap::new();
        for (state, &group) in self.store.states().iter().zip(self.store.groups()) {
            if state.is_dead() {
                continue;
            }
            live += 1;
            *by_group.entry(group).or_insert(0) += 1;
        }
        WorldStats {
            total_agents: self.store.count(),
            live_agents: live,
            population_by_group: by_group,
            grid: self.grid_stats(),
        }
    }

    /// FNV-1a hash over all column contents plus the agent count and
    /// tick id. Two worlds with equal hashes at every tick are, for
    /// practical purposes, bit-identical.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = StateHasher::new();
        hasher.scalar_u64(self.store.count() as u64);
        hasher.scalar_u64(self.tick.0);
        hasher.f32_column(self.store.x());
        hasher.f32_column(self.store.y());
        hasher.f32_column(self.store.vx());
        hasher.f32_column(self.store.vy());
        hasher.f32_column(self.store.fx());
        hasher.f32_column(self.store.fy());
        let state_bits: Vec<u8> = self.store.states().iter().map(|s| s.bits()).collect();
        hasher.u8_column(&state_bits);
        hasher.u8_column(self.store.groups());
        hasher.genome_column(self.store.genomes());
        hasher.finish()
    }
}
