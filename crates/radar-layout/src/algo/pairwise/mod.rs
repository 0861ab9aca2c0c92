//! Iterative all-pairs repulsion.
//!
//! Each pass visits every unordered pair once. A pair closer than `min_distance` is pushed apart
//! symmetrically along the line between the two points, and both points are clamped back into
//! their own segment right away, so later pairs in the same pass only ever see in-bounds
//! positions. This is a declutter pass rather than a packing solver: an over-full segment keeps
//! some overlap.

use crate::algo::{Body, RelaxParams, RelaxStats, StopReason, degenerate_direction, pair_mut};
use crate::geometry::Segment;

pub(crate) fn relax(bodies: &mut [Body], segments: &[Segment], params: &RelaxParams) -> RelaxStats {
    let min_distance = params.min_distance;
    let center = params.center;
    let mut stats = RelaxStats::default();

    for pass in 0..params.iterations {
        if params.budget.exhausted() {
            stats.stop = StopReason::Budget;
            break;
        }

        let mut changed = false;
        for j in 0..bodies.len() {
            for k in (j + 1)..bodies.len() {
                let (a, b) = pair_mut(bodies, j, k);
                let dx = b.point.x - a.point.x;
                let dy = b.point.y - a.point.y;
                let d = dx.hypot(dy);
                if d >= min_distance {
                    continue;
                }

                let (ux, uy) = if d > 0.0 {
                    (dx / d, dy / d)
                } else {
                    degenerate_direction(j, k)
                };
                let push = (min_distance - d) / 2.0;

                let before = (a.point, b.point);
                a.point.x -= ux * push;
                a.point.y -= uy * push;
                b.point.x += ux * push;
                b.point.y += uy * push;
                a.point = segments[a.segment].clamp(a.point, center);
                b.point = segments[b.segment].clamp(b.point, center);
                changed |= (a.point, b.point) != before;
            }
        }

        stats.passes = pass + 1;
        // Relaxation is deterministic, so a pass that moved nothing would repeat forever.
        if !changed {
            stats.stop = StopReason::Settled;
            break;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::Budget;
    use crate::geometry::{Band, Point, Polar, Sector};

    const CENTER: Point = Point::new(0.0, 0.0);

    fn body(item: usize, p: Point) -> Body {
        Body {
            item,
            segment: 0,
            point: p,
            anchor: p,
        }
    }

    fn params(min_distance: f64, iterations: usize) -> RelaxParams {
        RelaxParams {
            center: CENTER,
            min_distance,
            iterations,
            budget: Budget::new(None),
        }
    }

    fn wide_segment() -> Vec<Segment> {
        vec![Segment::new(
            Sector::new("s", 0.0, 90.0),
            Band::new("b", 100.0, 400.0),
        )]
    }

    #[test]
    fn close_pair_is_pushed_to_min_distance() {
        let segs = wide_segment();
        let p = Polar {
            angle: 45.0,
            radius: 200.0,
        }
        .to_point(CENTER);
        let mut bodies = vec![body(0, p), body(1, Point::new(p.x + 4.0, p.y))];
        relax(&mut bodies, &segs, &params(20.0, 10));
        let d = bodies[0].point.distance(bodies[1].point);
        assert!((d - 20.0).abs() < 1e-9, "distance: {d}");
        // Symmetric push keeps the midpoint.
        let mid_x = (bodies[0].point.x + bodies[1].point.x) / 2.0;
        assert!((mid_x - (p.x + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_are_separated_deterministically() {
        let segs = wide_segment();
        let p = Polar {
            angle: 45.0,
            radius: 200.0,
        }
        .to_point(CENTER);
        let mut first = vec![body(0, p), body(1, p)];
        let mut second = first.clone();
        relax(&mut first, &segs, &params(20.0, 5));
        relax(&mut second, &segs, &params(20.0, 5));
        let d = first[0].point.distance(first[1].point);
        assert!(d >= 20.0 - 1e-9, "distance: {d}");
        assert_eq!(first[0].point, second[0].point);
        assert_eq!(first[1].point, second[1].point);
    }

    #[test]
    fn pushed_points_never_leave_their_segment() {
        let segs = vec![Segment::new(
            Sector::new("s", 0.0, 90.0),
            Band::new("b", 50.0, 60.0),
        )];
        let mut bodies: Vec<Body> = (0..12)
            .map(|i| {
                body(
                    i,
                    Polar {
                        angle: 40.0 + i as f64 * 0.5,
                        radius: 55.0,
                    }
                    .to_point(CENTER),
                )
            })
            .collect();
        relax(&mut bodies, &segs, &params(30.0, 30));
        for b in &bodies {
            assert!(segs[0].contains(b.point, CENTER), "{:?}", b.point);
        }
    }

    #[test]
    fn settled_layout_stops_early() {
        let segs = wide_segment();
        let mut bodies = vec![
            body(0, Polar { angle: 10.0, radius: 200.0 }.to_point(CENTER)),
            body(1, Polar { angle: 80.0, radius: 200.0 }.to_point(CENTER)),
        ];
        let stats = relax(&mut bodies, &segs, &params(10.0, 30));
        assert_eq!(stats.stop, StopReason::Settled);
        assert_eq!(stats.passes, 1);
    }

    #[test]
    fn exhausted_budget_skips_relaxation() {
        let segs = wide_segment();
        let p = Polar {
            angle: 45.0,
            radius: 200.0,
        }
        .to_point(CENTER);
        let mut bodies = vec![body(0, p), body(1, p)];
        let stats = relax(
            &mut bodies,
            &segs,
            &RelaxParams {
                budget: Budget::new(Some(std::time::Duration::ZERO)),
                ..params(20.0, 30)
            },
        );
        assert_eq!(stats.stop, StopReason::Budget);
        assert_eq!(stats.passes, 0);
        assert_eq!(bodies[0].point, bodies[1].point);
    }
}
