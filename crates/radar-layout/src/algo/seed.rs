//! Grouping items into segments and drawing their initial positions.

use crate::algo::{Body, CategoryOrder};
use crate::geometry::{Band, Geometry, GeometryIndex, Polar, Sector, Segment};
use crate::model::{Diagnostic, Item, UnassignableReason};
use crate::rng::XorShift64Star;
use indexmap::IndexMap;

/// Fraction of a sub-range (angular) or band (radial) kept clear on each side when seeding.
const INSET: f64 = 0.1;

#[derive(Debug)]
pub(crate) struct Seeded {
    pub(crate) segments: Vec<Segment>,
    /// One body per placeable item, in input order.
    pub(crate) bodies: Vec<Body>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

pub(crate) fn seed<P>(
    items: &[Item<P>],
    geometry: &Geometry,
    order: CategoryOrder,
    rng: &mut XorShift64Star,
) -> Seeded {
    let index = GeometryIndex::new(geometry);

    let mut diagnostics = Vec::new();
    let mut groups: IndexMap<(usize, usize), (&Sector, &Band, Vec<usize>)> = IndexMap::new();
    for (idx, item) in items.iter().enumerate() {
        let sector = index.sector(&item.sector_key);
        let band = index.band(&item.band_key);
        let (Some((sector_rank, sector)), Some((band_rank, band))) = (sector, band) else {
            let reason = match (sector, band) {
                (None, None) => UnassignableReason::UnknownSectorAndBand,
                (None, Some(_)) => UnassignableReason::UnknownSector,
                _ => UnassignableReason::UnknownBand,
            };
            tracing::debug!(
                id = %item.id,
                sector = %item.sector_key,
                band = %item.band_key,
                ?reason,
                "item left out of layout"
            );
            diagnostics.push(Diagnostic::UnassignableItem {
                id: item.id.clone(),
                sector_key: item.sector_key.clone(),
                band_key: item.band_key.clone(),
                reason,
            });
            continue;
        };
        groups
            .entry((sector_rank, band_rank))
            .or_insert_with(|| (sector, band, Vec::new()))
            .2
            .push(idx);
    }
    // Geometry order, so the random stream does not depend on which segment appears first.
    groups.sort_keys();

    let center = geometry.center;
    let mut segments = Vec::with_capacity(groups.len());
    let mut bodies = Vec::with_capacity(items.len());
    for (sector, band, members) in groups.into_values() {
        let segment_idx = segments.len();
        segments.push(Segment::new(sector.clone(), band.clone()));

        let mut by_category: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for &idx in &members {
            by_category
                .entry(items[idx].category.as_str())
                .or_default()
                .push(idx);
        }
        if order == CategoryOrder::Lexicographic {
            by_category.sort_keys();
        }

        let sub_span = sector.span() / (by_category.len() as f64);
        tracing::trace!(
            sector = %sector.key,
            band = %band.key,
            items = members.len(),
            categories = by_category.len(),
            "seeding segment"
        );
        for (ci, idxs) in by_category.values().enumerate() {
            let sub_start = sector.angle_start + (ci as f64) * sub_span;
            for &idx in idxs {
                let polar = Polar {
                    angle: sub_start + rng.next_f64_range(INSET, 1.0 - INSET) * sub_span,
                    radius: area_uniform_radius(band, rng),
                };
                let point = polar.to_point(center);
                bodies.push(Body {
                    item: idx,
                    segment: segment_idx,
                    point,
                    anchor: point,
                });
            }
        }
    }
    bodies.sort_by_key(|b| b.item);

    Seeded {
        segments,
        bodies,
        diagnostics,
    }
}

/// Radius whose distribution is uniform by area over the inset band, so outer parts of the ring
/// are not starved of markers.
fn area_uniform_radius(band: &Band, rng: &mut XorShift64Star) -> f64 {
    let lo = band.inner_radius + INSET * band.width();
    let hi = band.inner_radius + (1.0 - INSET) * band.width();
    let u = rng.next_f64_unit();
    (lo * lo + u * (hi * hi - lo * lo)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Sector};

    fn geometry() -> Geometry {
        Geometry {
            center: Point::new(0.0, 0.0),
            sectors: vec![Sector::new("q", 0.0, 90.0), Sector::new("w", 90.0, 180.0)],
            bands: vec![Band::new("inner", 50.0, 100.0), Band::new("outer", 100.0, 200.0)],
        }
    }

    #[test]
    fn seeds_stay_inside_inset_region() {
        let g = geometry();
        let items: Vec<Item> = (0..40)
            .map(|i| Item::new(format!("i{i}"), "q", "outer", format!("c{}", i % 3)))
            .collect();
        let mut rng = XorShift64Star::new(5);
        let s = seed(&items, &g, CategoryOrder::Lexicographic, &mut rng);
        assert_eq!(s.bodies.len(), 40);
        assert_eq!(s.segments.len(), 1);
        for b in &s.bodies {
            let p = b.point.to_polar(g.center);
            assert!(p.radius >= 110.0 - 1e-9 && p.radius <= 190.0 + 1e-9, "{p:?}");
            // Three categories of 30° each, inset by 3° at both ends.
            assert!(p.angle >= 3.0 - 1e-9 && p.angle <= 87.0 + 1e-9, "{p:?}");
            assert_eq!(b.point, b.anchor);
        }
    }

    #[test]
    fn categories_get_disjoint_sub_ranges_in_sorted_order() {
        let g = geometry();
        let items = vec![
            Item::new("a", "q", "inner", "zeta"),
            Item::new("b", "q", "inner", "alpha"),
            Item::new("c", "q", "inner", "zeta"),
        ];
        let mut rng = XorShift64Star::new(11);
        let s = seed(&items, &g, CategoryOrder::Lexicographic, &mut rng);
        let angle = |i: usize| s.bodies[i].point.to_polar(g.center).angle;
        // alpha owns [0, 45), zeta owns [45, 90).
        assert!(angle(1) < 45.0);
        assert!(angle(0) > 45.0 && angle(2) > 45.0);

        let mut rng = XorShift64Star::new(11);
        let s = seed(&items, &g, CategoryOrder::Insertion, &mut rng);
        let angle = |i: usize| s.bodies[i].point.to_polar(g.center).angle;
        assert!(angle(0) < 45.0 && angle(2) < 45.0);
        assert!(angle(1) > 45.0);
    }

    #[test]
    fn unknown_keys_become_diagnostics() {
        let g = geometry();
        let items = vec![
            Item::new("ok", "q", "inner", ""),
            Item::new("no-sector", "nope", "inner", ""),
            Item::new("no-band", "q", "nope", ""),
            Item::new("neither", "nope", "nope", ""),
        ];
        let mut rng = XorShift64Star::new(1);
        let s = seed(&items, &g, CategoryOrder::Lexicographic, &mut rng);
        assert_eq!(s.bodies.len(), 1);
        assert_eq!(s.bodies[0].item, 0);
        let reasons: Vec<_> = s
            .diagnostics
            .iter()
            .map(|Diagnostic::UnassignableItem { reason, .. }| *reason)
            .collect();
        assert_eq!(
            reasons,
            vec![
                UnassignableReason::UnknownSector,
                UnassignableReason::UnknownBand,
                UnassignableReason::UnknownSectorAndBand,
            ]
        );
    }

    #[test]
    fn bodies_keep_input_order_across_segments() {
        let g = geometry();
        let items = vec![
            Item::new("x", "w", "outer", ""),
            Item::new("y", "q", "inner", ""),
            Item::new("z", "w", "outer", ""),
        ];
        let mut rng = XorShift64Star::new(2);
        let s = seed(&items, &g, CategoryOrder::Lexicographic, &mut rng);
        let order: Vec<usize> = s.bodies.iter().map(|b| b.item).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(s.segments.len(), 2);
        assert_eq!(s.segments[s.bodies[1].segment].sector.key, "q");
    }

    #[test]
    fn area_uniform_radius_favours_outer_half() {
        let band = Band::new("b", 0.0, 100.0);
        let mut rng = XorShift64Star::new(42);
        let n = 4000;
        // Inset range is [10, 90]; the area midpoint is sqrt((10² + 90²) / 2) ≈ 64.
        let outer = (0..n)
            .filter(|_| area_uniform_radius(&band, &mut rng) > 50.0)
            .count();
        assert!(outer as f64 / n as f64 > 0.6, "outer share: {outer}/{n}");
    }
}
