//! Reference scenarios: seed 42, dt = 1/60, Wrap boundary, the
//! "peaceful flocks" preset unless a scenario says otherwise.

use skein_core::{BoundaryMode, Genome, TickId};
use skein_engine::{World, WorldConfig};

fn reference_config() -> WorldConfig {
    WorldConfig {
        seed: 42,
        ..WorldConfig::peaceful_flocks()
    }
}

// ── Scenario 1: empty world ─────────────────────────────────────

#[test]
fn empty_world_is_stable_and_allocation_free() {
    let mut world = World::new(reference_config()).unwrap();
    let first = world.tick();
    let baseline = first.memory_bytes;
    for _ in 0..99 {
        let metrics = world.tick();
        assert_eq!(metrics.memory_bytes, baseline, "no growth without agents");
    }
    assert!(world.is_empty());
    assert_eq!(world.tick_id(), TickId(100));
    assert!((world.time() - 100.0 * world.config().dt as f64).abs() < 1e-12);
}

// ── Scenario 2: lone cruiser ────────────────────────────────────

#[test]
fn lone_agent_coasts_under_friction_alone() {
    let mut world = World::new(reference_config()).unwrap();
    world.add_agent((500.0, 500.0), (10.0, 0.0), 0, Genome::default());

    // Mirror of the integrate arithmetic, same operation order,
    // including the toroidal wrap (whose double-mod is not a bitwise
    // no-op for arbitrary interior floats).
    let (dt, friction) = (world.config().dt, world.config().friction);
    let wrap = |v: f32, limit: f32| ((v % limit) + limit) % limit;
    let mut expected_x = 500.0f32;
    let mut expected_vx = 10.0f32;
    for _ in 0..10 {
        world.tick();
        expected_vx *= friction;
        expected_x = wrap(expected_x + expected_vx * dt, 1000.0);
        assert_eq!(world.neighbor_counts()[0], 0, "a lone agent has no neighbours");
    }

    assert_eq!(world.vx()[0].to_bits(), expected_vx.to_bits());
    assert_eq!(world.x()[0].to_bits(), expected_x.to_bits());
    assert_eq!(world.y()[0], 500.0);
    assert_eq!(world.vy()[0], 0.0);
}

// ── Scenario 3: two-agent separation ────────────────────────────

#[test]
fn facing_pair_reports_symmetric_aggregates() {
    let mut world = World::new(reference_config()).unwrap();
    world.add_agent((500.0, 495.0), (0.0, 0.0), 0, Genome::default());
    world.add_agent((500.0, 505.0), (0.0, 0.0), 0, Genome::default());
    world.tick();

    let agg = world.aggregates();
    assert_eq!(agg.neighbor_count[0], 1);
    assert_eq!(agg.neighbor_count[1], 1);

    // Separation points outward in +/- y; alignment is zero for a
    // zero-velocity pair.
    assert!(agg.separation_y[0] < 0.0);
    assert!(agg.separation_y[1] > 0.0);
    assert_eq!(agg.separation_x[0], 0.0);
    assert_eq!(agg.alignment_vx[0], 0.0);
    assert_eq!(agg.alignment_vy[0], 0.0);

    // The mirrored geometry yields mirrored repulsion.
    assert_eq!(agg.separation_y[0], -agg.separation_y[1]);
}

// ── Scenario 4: thousand-agent flock ────────────────────────────

#[test]
fn thousand_agent_flock_stays_within_invariants() {
    let mut world = World::new(WorldConfig {
        initial_capacity: 1000,
        ..reference_config()
    })
    .unwrap();
    for _ in 0..1000 {
        world.add_random_agent(0);
    }
    for _ in 0..100 {
        world.tick();
    }

    let (w, h, cap) = (
        world.config().width,
        world.config().height,
        world.config().max_speed * (1.0 + 1e-5),
    );
    let mut speed_sum = 0.0f64;
    for i in 0..world.count() {
        assert!((0.0..=w).contains(&world.x()[i]), "x[{i}] out of bounds");
        assert!((0.0..=h).contains(&world.y()[i]), "y[{i}] out of bounds");
        let speed = (world.vx()[i].powi(2) + world.vy()[i].powi(2)).sqrt();
        assert!(speed <= cap, "agent {i} over the speed cap: {speed}");
        speed_sum += speed as f64;
    }
    // Average speed after warm-up sits below the hard cap.
    assert!(speed_sum / 1000.0 <= world.config().max_speed as f64);

    let stats = world.grid_stats();
    assert_eq!(stats.total_cells, 1600); // 40 x 40 cells of 25 units
    assert_eq!(stats.occupied_cells + stats.empty_cells, stats.total_cells);
    assert!(stats.max_agents_per_cell >= 1);
    // Occupancy accounting adds back up to the population.
    let recounted = stats.avg_agents_per_occupied_cell * stats.occupied_cells as f64;
    assert!((recounted - 1000.0).abs() < 1e-6);
}

// ── Scenario 6: grid stress ─────────────────────────────────────

#[test]
fn hundred_thousand_agents_rebuild_without_reallocation() {
    let mut world = World::new(WorldConfig {
        initial_capacity: 100_000,
        ..reference_config()
    })
    .unwrap();
    for _ in 0..100_000 {
        world.add_random_agent(0);
    }

    let first = world.tick();
    let second = world.tick();
    assert_eq!(
        first.memory_bytes, second.memory_bytes,
        "ticking must not reallocate at full capacity"
    );

    let stats = world.grid_stats();
    assert!(stats.total_cells - stats.empty_cells <= stats.total_cells);
    assert!(stats.occupied_cells > 0);
}

// ── Boundary behaviours ─────────────────────────────────────────

#[test]
fn wrap_agent_reappears_at_the_far_side() {
    let mut world = World::new(reference_config()).unwrap();
    world.add_agent((999.9, 500.0), (30.0, 0.0), 0, Genome::default());
    world.tick();
    assert!(
        world.x()[0] < 10.0,
        "expected wrap to near zero, got {}",
        world.x()[0]
    );
    assert!(world.vx()[0] > 0.0, "wrap leaves velocity untouched");
}

#[test]
fn reflect_agent_bounces_back_into_the_world() {
    let mut world = World::new(WorldConfig {
        boundary: BoundaryMode::Reflect,
        ..reference_config()
    })
    .unwrap();
    world.add_agent((0.1, 500.0), (-30.0, 0.0), 0, Genome::default());
    world.tick();
    assert!(world.x()[0] > 0.0);
    assert!(world.vx()[0] > 0.0, "reflection must flip the velocity");
}

#[test]
fn clamp_agent_parks_exactly_on_the_wall() {
    let mut world = World::new(WorldConfig {
        boundary: BoundaryMode::Clamp,
        ..reference_config()
    })
    .unwrap();
    world.add_agent((999.9, 500.0), (30.0, 0.0), 0, Genome::default());
    world.tick();
    assert_eq!(world.x()[0], 1000.0);
    assert_eq!(world.vx()[0], 0.0);
}

// ── Translation symmetry (wrap mode) ────────────────────────────

#[test]
fn half_world_translation_symmetry_is_preserved() {
    // Two agent pairs, each the other's image under a (W/2, H/2)
    // translation. The offsets are exactly representable, so the
    // initial state is exactly invariant; after a few ticks the pair
    // images must still match to within accumulated rounding.
    let mut world = World::new(reference_config()).unwrap();
    let base = [(100.0f32, 200.0f32), (104.0, 203.0)];
    for &(x, y) in &base {
        world.add_agent((x, y), (1.0, 0.5), 0, Genome::default());
    }
    for &(x, y) in &base {
        world.add_agent((x + 500.0, y + 500.0), (1.0, 0.5), 0, Genome::default());
    }

    for _ in 0..5 {
        world.tick();
    }
    for i in 0..2 {
        let dx = (world.x()[i] + 500.0 - world.x()[i + 2]).abs();
        let dy = (world.y()[i] + 500.0 - world.y()[i + 2]).abs();
        assert!(dx < 1e-2 && dy < 1e-2, "pair {i} broke symmetry: {dx}, {dy}");
        let dvx = (world.vx()[i] - world.vx()[i + 2]).abs();
        let dvy = (world.vy()[i] - world.vy()[i + 2]).abs();
        assert!(dvx < 1e-2 && dvy < 1e-2);
    }
}
