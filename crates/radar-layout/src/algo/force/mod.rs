//! Velocity-based declutter: a collide force plus a weak anchor toward each seed position.
//!
//! Mirrors the usual force-simulation tick (alpha cooling, velocity decay, collision against the
//! predicted next position) with one addition: every body is clamped into its own segment after
//! each tick, and its velocity is reset to the displacement it actually made.

use crate::algo::{Body, ForceOptions, RelaxParams, RelaxStats, StopReason, degenerate_direction};
use crate::geometry::{Point, Segment};
use nalgebra as na;

type Vec2 = na::Vector2<f64>;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.6;

fn to_vec(p: Point) -> Vec2 {
    Vec2::new(p.x, p.y)
}

fn to_point(v: Vec2) -> Point {
    Point::new(v.x, v.y)
}

pub(crate) fn relax(
    bodies: &mut [Body],
    segments: &[Segment],
    params: &RelaxParams,
    opts: &ForceOptions,
) -> RelaxStats {
    let ticks = params.iterations;
    let mut stats = RelaxStats::default();
    if ticks == 0 || bodies.is_empty() {
        return stats;
    }

    // Cool from alpha = 1 down to ALPHA_MIN over exactly `ticks` ticks.
    let alpha_decay = 1.0 - ALPHA_MIN.powf(1.0 / ticks as f64);
    let diameter = params.min_distance;
    let mut alpha = 1.0;
    let mut velocity: Vec<Vec2> = vec![Vec2::zeros(); bodies.len()];

    for tick in 0..ticks {
        if params.budget.exhausted() {
            stats.stop = StopReason::Budget;
            break;
        }
        alpha += (0.0 - alpha) * alpha_decay;

        for (b, v) in bodies.iter().zip(velocity.iter_mut()) {
            *v += (to_vec(b.anchor) - to_vec(b.point)) * (opts.anchor_strength * alpha);
        }

        for j in 0..bodies.len() {
            for k in (j + 1)..bodies.len() {
                let pj = to_vec(bodies[j].point) + velocity[j];
                let pk = to_vec(bodies[k].point) + velocity[k];
                let mut delta = pj - pk;
                let mut l = delta.norm();
                if l >= diameter {
                    continue;
                }
                if l == 0.0 {
                    let (ux, uy) = degenerate_direction(j, k);
                    delta = Vec2::new(ux, uy) * 1e-6;
                    l = 1e-6;
                }
                // Equal radii: each body takes half of the correction.
                let push = delta * ((diameter - l) / l * opts.collide_strength * 0.5);
                velocity[j] += push;
                velocity[k] -= push;
            }
        }

        for (b, v) in bodies.iter_mut().zip(velocity.iter_mut()) {
            *v *= VELOCITY_DECAY;
            let from = to_vec(b.point);
            let moved = segments[b.segment].clamp(to_point(from + *v), params.center);
            *v = to_vec(moved) - from;
            b.point = moved;
        }
        stats.passes = tick + 1;
    }
    stats
}
