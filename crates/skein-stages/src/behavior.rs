//! Steering force computation from neighbour aggregates.

use crate::sense::SenseBuffers;
use crate::{EPS_DIVISION, EPS_MAGNITUDE};
use skein_core::AgentState;

/// The steering rules, in priority order.
///
/// Rules are tagged variants rather than trait objects: the rule set
/// is closed and the hot loop dispatches with a match, not a vtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    /// Push away from close neighbours.
    Separation,
    /// Match the average neighbour heading.
    Alignment,
    /// Pull toward the neighbour centroid.
    Cohesion,
}

/// Fixed evaluation order: separation drains the budget first, then
/// alignment, then cohesion.
const PRIORITY: [RuleKind; 3] = [RuleKind::Separation, RuleKind::Alignment, RuleKind::Cohesion];

/// How the stage converts aggregates into force.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BehaviorMode {
    /// Reynolds steering: per-rule desired velocities, prioritized
    /// against a shared force budget. The default.
    #[default]
    Steering,
    /// Legacy raw forces: weighted rule vectors summed without
    /// priority, jointly clamped to the force budget. Kept as an
    /// opt-in only.
    RawForce,
}

/// Parameter record for the behaviour stage.
#[derive(Clone, Copy, Debug)]
pub struct SteeringParams {
    /// Hard speed cap; desired velocities are scaled against it.
    pub max_speed: f32,
    /// Per-agent per-tick steering budget.
    pub max_force: f32,
    /// Weight on the separation rule.
    pub separation_weight: f32,
    /// Weight on the alignment rule.
    pub alignment_weight: f32,
    /// Weight on the cohesion rule.
    pub cohesion_weight: f32,
    /// Neighbour count above which separation is boosted.
    pub crowding_threshold: u32,
    /// Separation multiplier at full crowding.
    pub crowding_boost: f32,
}

/// Linear interpolation between `a` and `b`.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The behaviour stage.
///
/// Reads the sense aggregates plus tick-start positions and
/// velocities; adds a steering force into the force columns. Never
/// touches velocity or position directly.
#[derive(Debug, Clone)]
pub struct BehaviorStage {
    params: SteeringParams,
    mode: BehaviorMode,
}

impl BehaviorStage {
    /// Create a behaviour stage with the given parameters and mode.
    pub fn new(params: SteeringParams, mode: BehaviorMode) -> Self {
        Self { params, mode }
    }

    /// The configured parameters.
    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    /// The configured mode.
    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    /// Add steering forces for all live agents with neighbours.
    ///
    /// Agents with `neighbor_count == 0` receive no force — an empty
    /// sky steers nobody. Zero allocations.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        aggregates: &SenseBuffers,
        x: &[f32],
        y: &[f32],
        vx: &[f32],
        vy: &[f32],
        state: &[AgentState],
        fx: &mut [f32],
        fy: &mut [f32],
    ) {
        let n = x.len();
        debug_assert_eq!(n, fx.len());
        debug_assert_eq!(n, fy.len());

        for i in 0..n {
            if state[i].is_dead() || aggregates.neighbor_count[i] == 0 {
                continue;
            }
            let (ax, ay) = match self.mode {
                BehaviorMode::Steering => self.steer(aggregates, x, y, vx, vy, i),
                BehaviorMode::RawForce => self.raw_force(aggregates, x, y, vx, vy, i),
            };
            fx[i] += ax;
            fy[i] += ay;
        }
    }

    /// Prioritized Reynolds steering for one agent.
    fn steer(
        &self,
        agg: &SenseBuffers,
        x: &[f32],
        y: &[f32],
        vx: &[f32],
        vy: &[f32],
        i: usize,
    ) -> (f32, f32) {
        let p = &self.params;
        let count = agg.neighbor_count[i];
        let inv = 1.0 / count as f32;
        let (cur_x, cur_y) = (vx[i], vy[i]);

        let mut budget = p.max_force;
        let mut accum_x = 0.0f32;
        let mut accum_y = 0.0f32;

        for rule in PRIORITY {
            if budget <= 0.0 {
                break;
            }
            // Desired velocity for this rule, or skip when the rule's
            // input vector is degenerate.
            let (des_x, des_y) = match rule {
                RuleKind::Separation => {
                    let sx = agg.separation_x[i];
                    let sy = agg.separation_y[i];
                    let mag = (sx * sx + sy * sy).sqrt();
                    if mag <= EPS_MAGNITUDE {
                        continue;
                    }
                    let boost = if count > p.crowding_threshold {
                        let excess = (count - p.crowding_threshold) as f32;
                        let t = (excess / p.crowding_threshold.max(1) as f32).min(1.0);
                        lerp(1.0, p.crowding_boost, t)
                    } else {
                        1.0
                    };
                    let speed = p.max_speed * p.separation_weight * boost;
                    (sx / mag * speed, sy / mag * speed)
                }
                RuleKind::Alignment => {
                    let avg_x = agg.alignment_vx[i] * inv;
                    let avg_y = agg.alignment_vy[i] * inv;
                    let mag = (avg_x * avg_x + avg_y * avg_y).sqrt();
                    if mag <= EPS_MAGNITUDE {
                        continue;
                    }
                    let speed = p.max_speed * p.alignment_weight;
                    (avg_x / mag * speed, avg_y / mag * speed)
                }
                RuleKind::Cohesion => {
                    let to_x = agg.cohesion_x[i] * inv - x[i];
                    let to_y = agg.cohesion_y[i] * inv - y[i];
                    let mag = (to_x * to_x + to_y * to_y).sqrt();
                    if mag <= EPS_MAGNITUDE {
                        continue;
                    }
                    let speed = p.max_speed * p.cohesion_weight;
                    (to_x / mag * speed, to_y / mag * speed)
                }
            };

            // Prioritized add: each rule takes what it needs from the
            // remaining budget, never more.
            let steer_x = des_x - cur_x;
            let steer_y = des_y - cur_y;
            let mag = (steer_x * steer_x + steer_y * steer_y).sqrt();
            if mag <= EPS_DIVISION {
                continue;
            }
            let take = mag.min(budget);
            let scale = take / mag;
            accum_x += steer_x * scale;
            accum_y += steer_y * scale;
            budget -= take;
        }

        (accum_x, accum_y)
    }

    /// Legacy raw-force behaviour for one agent: weighted rule vectors
    /// summed and jointly clamped to the force budget.
    fn raw_force(
        &self,
        agg: &SenseBuffers,
        x: &[f32],
        y: &[f32],
        vx: &[f32],
        vy: &[f32],
        i: usize,
    ) -> (f32, f32) {
        let p = &self.params;
        let inv = 1.0 / agg.neighbor_count[i] as f32;

        let mut fx = agg.separation_x[i] * p.separation_weight;
        let mut fy = agg.separation_y[i] * p.separation_weight;

        fx += (agg.alignment_vx[i] * inv - vx[i]) * p.alignment_weight;
        fy += (agg.alignment_vy[i] * inv - vy[i]) * p.alignment_weight;

        fx += (agg.cohesion_x[i] * inv - x[i]) * p.cohesion_weight;
        fy += (agg.cohesion_y[i] * inv - y[i]) * p.cohesion_weight;

        let mag = (fx * fx + fy * fy).sqrt();
        if mag > p.max_force && mag > EPS_DIVISION {
            let scale = p.max_force / mag;
            fx *= scale;
            fy *= scale;
        }
        (fx, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SteeringParams {
        SteeringParams {
            max_speed: 50.0,
            max_force: 10.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            crowding_threshold: 6,
            crowding_boost: 2.0,
        }
    }

    fn buffers_for_one(capacity: usize) -> SenseBuffers {
        SenseBuffers::with_capacity(capacity)
    }

    fn magnitude(x: f32, y: f32) -> f32 {
        (x * x + y * y).sqrt()
    }

    /// Run the stage for one stationary agent with the given aggregates.
    fn run_single(stage: &BehaviorStage, agg: &SenseBuffers) -> (f32, f32) {
        let x = [500.0f32];
        let y = [500.0f32];
        let vx = [0.0f32];
        let vy = [0.0f32];
        let state = [AgentState::empty()];
        let mut fx = [0.0f32];
        let mut fy = [0.0f32];
        stage.run(agg, &x, &y, &vx, &vy, &state, &mut fx, &mut fy);
        (fx[0], fy[0])
    }

    #[test]
    fn no_neighbors_no_force() {
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let agg = buffers_for_one(1);
        let (fx, fy) = run_single(&stage, &agg);
        assert_eq!(fx, 0.0);
        assert_eq!(fy, 0.0);
    }

    #[test]
    fn dead_agent_gets_no_force() {
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 1.0;

        let mut dead = AgentState::empty();
        dead.insert(AgentState::DEAD);
        let mut fx = [0.0f32];
        let mut fy = [0.0f32];
        stage.run(
            &agg,
            &[500.0],
            &[500.0],
            &[0.0],
            &[0.0],
            &[dead],
            &mut fx,
            &mut fy,
        );
        assert_eq!(fx[0], 0.0);
        assert_eq!(fy[0], 0.0);
    }

    #[test]
    fn separation_alone_clamps_to_budget() {
        // A strong separation signal asks for far more than the budget
        // allows; the committed force is exactly max_force.
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 3.0;
        agg.cohesion_x[0] = 480.0;
        agg.cohesion_y[0] = 500.0;

        let (fx, fy) = run_single(&stage, &agg);
        let mag = magnitude(fx, fy);
        assert!(
            (mag - params().max_force).abs() < 1e-4,
            "expected a saturated budget, got |f| = {mag}"
        );
        // Desired separation velocity points along +x.
        assert!(fx > 0.0);
    }

    #[test]
    fn budget_never_exceeded_with_all_rules_active() {
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 3;
        agg.separation_x[0] = 0.5;
        agg.separation_y[0] = -0.2;
        agg.alignment_vx[0] = 30.0;
        agg.alignment_vy[0] = -12.0;
        agg.cohesion_x[0] = 1530.0;
        agg.cohesion_y[0] = 1440.0;

        let (fx, fy) = run_single(&stage, &agg);
        assert!(magnitude(fx, fy) <= params().max_force + 1e-4);
    }

    #[test]
    fn priority_gives_separation_the_whole_budget() {
        // With a saturating separation demand, alignment and cohesion
        // must not alter the outcome: the result equals the
        // separation-only result.
        let mut full = buffers_for_one(1);
        full.neighbor_count[0] = 2;
        full.separation_x[0] = 2.0;
        full.separation_y[0] = 1.0;
        full.alignment_vx[0] = -40.0;
        full.alignment_vy[0] = 25.0;
        full.cohesion_x[0] = 900.0;
        full.cohesion_y[0] = 1100.0;

        let mut sep_only = buffers_for_one(1);
        sep_only.neighbor_count[0] = 2;
        sep_only.separation_x[0] = 2.0;
        sep_only.separation_y[0] = 1.0;

        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let with_all = run_single(&stage, &full);
        let with_sep = run_single(&stage, &sep_only);
        assert_eq!(with_all, with_sep);
    }

    #[test]
    fn leftover_budget_flows_to_lower_priority_rules() {
        // Weak separation leaves budget for cohesion to consume.
        let stage = BehaviorStage::new(
            SteeringParams {
                separation_weight: 0.01,
                ..params()
            },
            BehaviorMode::Steering,
        );
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 0.5;
        agg.cohesion_x[0] = 480.0;
        agg.cohesion_y[0] = 500.0;

        let mut sep_only = buffers_for_one(1);
        sep_only.neighbor_count[0] = 1;
        sep_only.separation_x[0] = 0.5;

        let (fx_all, fy_all) = run_single(&stage, &agg);
        let (fx_sep, _) = run_single(&stage, &sep_only);
        // Cohesion pulls toward -x (centroid at 480 < 500), so the
        // combined force differs from separation alone.
        assert!(fx_all < fx_sep);
        assert_eq!(fy_all, 0.0);
    }

    #[test]
    fn crowding_boost_scales_separation_demand() {
        // Below the threshold vs. far above it, same separation vector.
        let base = params();
        let stage = BehaviorStage::new(
            SteeringParams {
                max_force: 1.0e6, // effectively unlimited, isolate the boost
                ..base
            },
            BehaviorMode::Steering,
        );

        // Cohesion centroids sit exactly on the agent so only
        // separation contributes.
        let mut calm = buffers_for_one(1);
        calm.neighbor_count[0] = 2;
        calm.separation_x[0] = 1.0;
        calm.cohesion_x[0] = 2.0 * 500.0;
        calm.cohesion_y[0] = 2.0 * 500.0;

        let crowd_count = 2 * base.crowding_threshold; // full boost
        let mut crowded = buffers_for_one(1);
        crowded.neighbor_count[0] = crowd_count;
        crowded.separation_x[0] = 1.0;
        crowded.cohesion_x[0] = crowd_count as f32 * 500.0;
        crowded.cohesion_y[0] = crowd_count as f32 * 500.0;

        let (fx_calm, _) = run_single(&stage, &calm);
        let (fx_crowd, _) = run_single(&stage, &crowded);
        assert!(
            (fx_crowd / fx_calm - base.crowding_boost).abs() < 1e-4,
            "boost ratio was {}",
            fx_crowd / fx_calm
        );
    }

    #[test]
    fn crowding_boost_interpolates_below_saturation() {
        let base = params();
        let stage = BehaviorStage::new(
            SteeringParams {
                max_force: 1.0e6,
                ..base
            },
            BehaviorMode::Steering,
        );

        // excess = 3, threshold = 6 -> t = 0.5 -> boost = lerp(1, 2, 0.5).
        let half_count = base.crowding_threshold + 3;
        let mut half = buffers_for_one(1);
        half.neighbor_count[0] = half_count;
        half.separation_x[0] = 1.0;
        half.cohesion_x[0] = half_count as f32 * 500.0;
        half.cohesion_y[0] = half_count as f32 * 500.0;

        let mut calm = buffers_for_one(1);
        calm.neighbor_count[0] = 1;
        calm.separation_x[0] = 1.0;
        calm.cohesion_x[0] = 500.0;
        calm.cohesion_y[0] = 500.0;

        let (fx_half, _) = run_single(&stage, &half);
        let (fx_calm, _) = run_single(&stage, &calm);
        assert!((fx_half / fx_calm - 1.5).abs() < 1e-4);
    }

    #[test]
    fn degenerate_aggregates_are_skipped() {
        // Non-zero neighbour count but all aggregate vectors below the
        // magnitude epsilon: no rule fires, no force.
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 1e-5;
        agg.cohesion_x[0] = 500.0; // centroid exactly at the agent
        agg.cohesion_y[0] = 500.0;

        let (fx, fy) = run_single(&stage, &agg);
        assert_eq!(fx, 0.0);
        assert_eq!(fy, 0.0);
    }

    #[test]
    fn force_accumulates_onto_existing_contents() {
        let stage = BehaviorStage::new(params(), BehaviorMode::Steering);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 2.0;

        let mut fx = [1.0f32];
        let mut fy = [0.5f32];
        stage.run(
            &agg,
            &[500.0],
            &[500.0],
            &[0.0],
            &[0.0],
            &[AgentState::empty()],
            &mut fx,
            &mut fy,
        );
        assert!(fx[0] > 1.0, "steering must add to, not replace, the force");
        assert_eq!(fy[0], 0.5);
    }

    #[test]
    fn raw_force_mode_clamps_to_budget() {
        let stage = BehaviorStage::new(params(), BehaviorMode::RawForce);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.separation_x[0] = 100.0;
        agg.alignment_vx[0] = 200.0;
        agg.cohesion_x[0] = 900.0;
        agg.cohesion_y[0] = 500.0;

        let (fx, fy) = run_single(&stage, &agg);
        let mag = magnitude(fx, fy);
        assert!((mag - params().max_force).abs() < 1e-4);
    }

    #[test]
    fn raw_force_mode_sums_without_priority() {
        // A pure cohesion signal produces force along the centroid
        // direction, no budget draining from earlier rules.
        let stage = BehaviorStage::new(params(), BehaviorMode::RawForce);
        let mut agg = buffers_for_one(1);
        agg.neighbor_count[0] = 1;
        agg.cohesion_x[0] = 504.0;
        agg.cohesion_y[0] = 500.0;

        let (fx, fy) = run_single(&stage, &agg);
        assert!((fx - 4.0).abs() < 1e-5, "w_coh = 1, offset 4 -> fx = 4");
        assert_eq!(fy, 0.0);
    }

    #[test]
    fn default_mode_is_steering() {
        assert_eq!(BehaviorMode::default(), BehaviorMode::Steering);
    }
}
