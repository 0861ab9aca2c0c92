pub(crate) mod force;
pub(crate) mod pairwise;
pub(crate) mod seed;

use crate::error::{Error, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Minimum spacing the declutter pass tries to enforce between any two markers.
    pub min_distance: f64,
    /// Relaxation passes (pairwise) or simulation ticks (force). Zero keeps the seeded positions.
    pub iterations: usize,
    /// Seed for reproducible jitter. `None` draws a fresh seed on every call, so identical inputs
    /// may produce different (always valid) layouts.
    pub seed: Option<u64>,
    pub category_order: CategoryOrder,
    pub relaxation: Relaxation,
    /// Optional wall-clock cap on relaxation, checked between passes.
    pub time_budget_ms: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_distance: 22.0,
            iterations: 30,
            seed: None,
            category_order: CategoryOrder::default(),
            relaxation: Relaxation::default(),
            time_budget_ms: None,
        }
    }
}

impl LayoutOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(Error::InvalidMinDistance {
                value: self.min_distance,
            });
        }
        if let Relaxation::Force(f) = &self.relaxation {
            check_strength("collide_strength", f.collide_strength)?;
            check_strength("anchor_strength", f.anchor_strength)?;
        }
        Ok(())
    }
}

fn check_strength(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidStrength { name, value })
    }
}

/// Order in which categories receive angular sub-ranges inside a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryOrder {
    /// Sorted by category name; stable regardless of catalog order.
    #[default]
    Lexicographic,
    /// First-seen order in the input list (legacy dashboard behaviour).
    Insertion,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum Relaxation {
    /// Symmetric pairwise repulsion with per-pair clamping.
    #[default]
    Pairwise,
    /// Velocity-based collide + anchor simulation, clamped after every tick.
    Force(ForceOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceOptions {
    pub collide_strength: f64,
    /// Pull back toward each item's seeded position.
    pub anchor_strength: f64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            collide_strength: 0.8,
            anchor_strength: 0.1,
        }
    }
}

/// Working state for one placed item during a layout call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Body {
    /// Index into the caller's item slice.
    pub(crate) item: usize,
    /// Index into the segment table built while seeding.
    pub(crate) segment: usize,
    pub(crate) point: Point,
    pub(crate) anchor: Point,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RelaxParams {
    pub(crate) center: Point,
    pub(crate) min_distance: f64,
    pub(crate) iterations: usize,
    pub(crate) budget: Budget,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
}

impl Budget {
    pub(crate) fn new(limit: Option<Duration>) -> Self {
        Self {
            deadline: limit.map(|d| Instant::now() + d),
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StopReason {
    #[default]
    Iterations,
    Settled,
    Budget,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RelaxStats {
    pub(crate) passes: usize,
    pub(crate) stop: StopReason,
}

/// Splits out mutable references to two distinct bodies, `j < k`.
pub(crate) fn pair_mut(bodies: &mut [Body], j: usize, k: usize) -> (&mut Body, &mut Body) {
    debug_assert!(j < k);
    let (lo, hi) = bodies.split_at_mut(k);
    (&mut lo[j], &mut hi[0])
}

/// Unit direction for separating two coincident points. Depends only on the pair indices so
/// reruns stay reproducible.
pub(crate) fn degenerate_direction(j: usize, k: usize) -> (f64, f64) {
    const GOLDEN: f64 = 0.618_033_988_749_894_9;
    let t = ((j as f64) * GOLDEN + (k as f64) * GOLDEN * GOLDEN).fract();
    let theta = t * std::f64::consts::TAU;
    (theta.cos(), theta.sin())
}

/// Pairs closer than `min_distance`.
pub(crate) fn count_overlaps(bodies: &[Body], min_distance: f64) -> usize {
    let mut n = 0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.point.distance(b.point) < min_distance {
                n += 1;
            }
        }
    }
    n
}
