//! Multi-world parallel runner.
//!
//! A [`World`] is single-threaded, but worlds share no mutable state,
//! so a caller may advance many of them at once — one thread per
//! world. [`ParallelWorlds`] owns N worlds and runs them in lockstep
//! batches, collecting per-world reports over a channel.

use std::fmt;
use std::thread;

use crossbeam_channel::unbounded;
use skein_core::TickId;

use crate::config::{ConfigError, WorldConfig};
use crate::metrics::TickMetrics;
use crate::world::World;

// ── Error type ──────────────────────────────────────────────────

/// Error from batched construction, annotated with the failing world.
#[derive(Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// No world configs were supplied.
    NoWorlds,
    /// A world failed to construct.
    Config {
        /// Index of the failing config (0-based).
        world_index: usize,
        /// The underlying configuration error.
        error: ConfigError,
    },
}

impl fmt::Display for ParallelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorlds => write!(f, "at least one world config is required"),
            Self::Config { world_index, error } => {
                write!(f, "world {world_index}: {error}")
            }
        }
    }
}

impl std::error::Error for ParallelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config { error, .. } => Some(error),
            Self::NoWorlds => None,
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────

/// Outcome of one world's batch of ticks.
#[derive(Debug, Clone)]
pub struct WorldRunReport {
    /// Which world (0-based, matching construction order).
    pub world_index: usize,
    /// Ticks advanced in this batch.
    pub ticks_run: u64,
    /// The world's tick id after the batch.
    pub final_tick: TickId,
    /// State hash after the batch.
    pub state_hash: u64,
    /// Metrics from the batch's final tick.
    pub metrics: TickMetrics,
}

// ── ParallelWorlds ──────────────────────────────────────────────

/// Owner of N independent worlds, advanced in parallel.
///
/// Each call to [`run_ticks`](ParallelWorlds::run_ticks) spawns one
/// scoped thread per world, advances every world the same number of
/// ticks, and returns reports in world order. Between batches the
/// worlds are directly accessible for spawning agents or reading
/// columns.
#[derive(Debug)]
pub struct ParallelWorlds {
    worlds: Vec<World>,
}

impl ParallelWorlds {
    /// Construct one world per config.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::NoWorlds`] for an empty batch, or
    /// [`ParallelError::Config`] naming the first config that fails.
    pub fn new(configs: Vec<WorldConfig>) -> Result<Self, ParallelError> {
        if configs.is_empty() {
            return Err(ParallelError::NoWorlds);
        }
        let mut worlds = Vec::with_capacity(configs.len());
        for (world_index, config) in configs.into_iter().enumerate() {
            let world =
                World::new(config).map_err(|error| ParallelError::Config { world_index, error })?;
            worlds.push(world);
        }
        Ok(Self { worlds })
    }

    /// Number of worlds.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Always `false`: construction rejects empty batches.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// The worlds, in construction order.
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// The worlds, mutable — for spawning agents between batches.
    pub fn worlds_mut(&mut self) -> &mut [World] {
        &mut self.worlds
    }

    /// Advance every world `ticks` ticks, one thread per world.
    ///
    /// Reports are returned sorted by world index. With `ticks == 0`
    /// the reports carry default metrics and unchanged tick ids.
    pub fn run_ticks(&mut self, ticks: u64) -> Vec<WorldRunReport> {
        let (tx, rx) = unbounded();
        thread::scope(|scope| {
            for (world_index, world) in self.worlds.iter_mut().enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    let mut last = TickMetrics::default();
                    for _ in 0..ticks {
                        last = world.tick();
                    }
                    // The receiver outlives the scope; a send failure
                    // would mean the channel was dropped early, which
                    // cannot happen while `rx` is held below.
                    let _ = tx.send(WorldRunReport {
                        world_index,
                        ticks_run: ticks,
                        final_tick: world.tick_id(),
                        state_hash: world.state_hash(),
                        metrics: last,
                    });
                });
            }
        });
        drop(tx);
        let mut reports: Vec<WorldRunReport> = rx.iter().collect();
        reports.sort_by_key(|r| r.world_index);
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_seed(seed: u64) -> WorldConfig {
        WorldConfig {
            seed,
            initial_capacity: 32,
            ..WorldConfig::peaceful_flocks()
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(
            ParallelWorlds::new(vec![]).unwrap_err(),
            ParallelError::NoWorlds
        );
    }

    #[test]
    fn construction_error_names_the_world() {
        let good = config_with_seed(1);
        let bad = WorldConfig {
            dt: 0.0,
            ..config_with_seed(2)
        };
        match ParallelWorlds::new(vec![good, bad]) {
            Err(ParallelError::Config { world_index, .. }) => assert_eq!(world_index, 1),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn twin_worlds_stay_bit_identical() {
        let mut batch =
            ParallelWorlds::new(vec![config_with_seed(42), config_with_seed(42)]).unwrap();
        for world in batch.worlds_mut() {
            for _ in 0..20 {
                world.add_random_agent(0);
            }
        }
        let reports = batch.run_ticks(50);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].world_index, 0);
        assert_eq!(reports[1].world_index, 1);
        assert_eq!(reports[0].state_hash, reports[1].state_hash);
        assert_eq!(reports[0].final_tick, TickId(50));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut batch =
            ParallelWorlds::new(vec![config_with_seed(1), config_with_seed(2)]).unwrap();
        for world in batch.worlds_mut() {
            for _ in 0..20 {
                world.add_random_agent(0);
            }
        }
        let reports = batch.run_ticks(10);
        assert_ne!(reports[0].state_hash, reports[1].state_hash);
    }

    #[test]
    fn zero_ticks_is_a_no_op() {
        let mut batch = ParallelWorlds::new(vec![config_with_seed(5)]).unwrap();
        let before = batch.worlds()[0].state_hash();
        let reports = batch.run_ticks(0);
        assert_eq!(reports[0].ticks_run, 0);
        assert_eq!(reports[0].final_tick, TickId(0));
        assert_eq!(batch.worlds()[0].state_hash(), before);
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let mut parallel =
            ParallelWorlds::new(vec![config_with_seed(9), config_with_seed(10)]).unwrap();
        for world in parallel.worlds_mut() {
            for _ in 0..10 {
                world.add_random_agent(1);
            }
        }
        let reports = parallel.run_ticks(25);

        for (i, seed) in [9u64, 10].into_iter().enumerate() {
            let mut world = World::new(config_with_seed(seed)).unwrap();
            for _ in 0..10 {
                world.add_random_agent(1);
            }
            for _ in 0..25 {
                world.tick();
            }
            assert_eq!(
                reports[i].state_hash,
                world.state_hash(),
                "world {i} diverged from its sequential twin"
            );
        }
    }
}
