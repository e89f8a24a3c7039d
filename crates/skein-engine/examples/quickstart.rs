//! Skein Quickstart — a complete, minimal flock from scratch.
//!
//! Demonstrates:
//!   1. Building a WorldConfig from the "peaceful flocks" preset
//!   2. Spawning agents (explicit and PRNG-sampled)
//!   3. Ticking and reading per-stage metrics
//!   4. Reading columns, neighbour counts, and grid statistics
//!   5. Marking an agent dead from an external system's point of view
//!
//! Run with:
//!   cargo run --example quickstart

use skein_core::{AgentState, Genome};
use skein_engine::{World, WorldConfig};

const FLOCK_SIZE: usize = 500;
const WARMUP_TICKS: u64 = 300;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Skein Quickstart ===\n");

    // 1. Configure: 1000x1000 toroidal world, balanced flocking weights.
    let config = WorldConfig {
        seed: 42,
        initial_capacity: FLOCK_SIZE,
        ..WorldConfig::peaceful_flocks()
    };
    println!(
        "World: {}x{} ({:?} boundary), dt = {:.4}s, seed = {}",
        config.width, config.height, config.boundary, config.dt, config.seed
    );

    let mut world = World::new(config)?;

    // 2. Spawn one hand-placed scout plus a random flock.
    world.add_agent((500.0, 500.0), (20.0, 0.0), 1, Genome::default());
    for _ in 1..FLOCK_SIZE {
        world.add_random_agent(0);
    }
    println!("Spawned {} agents\n", world.count());

    // 3. Run the warm-up, printing progress every 60 ticks.
    for _ in 0..WARMUP_TICKS {
        let metrics = world.tick();
        if world.tick_id().0 % 60 == 0 {
            let mean_speed: f32 = (0..world.count())
                .map(|i| (world.vx()[i].powi(2) + world.vy()[i].powi(2)).sqrt())
                .sum::<f32>()
                / world.count() as f32;
            println!(
                "  tick {:>4}: mean_speed={:6.2}, neighbours[scout]={}, tick_time={}us \
                 (grid {}us, sense {}us, behave {}us, integrate {}us)",
                world.tick_id(),
                mean_speed,
                world.neighbor_counts()[0],
                metrics.total_us,
                metrics.grid_us,
                metrics.sense_us,
                metrics.behavior_us,
                metrics.integrate_us,
            );
        }
    }

    // 4. Inspect spatial occupancy.
    let stats = world.stats();
    println!(
        "\nAfter warm-up: {} live agents, {}/{} cells occupied, \
         max {} per cell (avg {:.2} per occupied cell)",
        stats.live_agents,
        stats.grid.occupied_cells,
        stats.grid.total_cells,
        stats.grid.max_agents_per_cell,
        stats.grid.avg_agents_per_occupied_cell,
    );

    // 5. An external system kills the scout; the flock stops seeing it.
    world.states_mut()[0].insert(AgentState::DEAD);
    world.tick();
    println!(
        "Scout marked dead: live agents now {}, scout neighbours {}",
        world.stats().live_agents,
        world.neighbor_counts()[0],
    );

    println!("\nState hash: {:#018x}", world.state_hash());
    println!("Done.");
    Ok(())
}
