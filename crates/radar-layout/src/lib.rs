#![forbid(unsafe_code)]

//! Headless radial segment layout for technology-radar style charts.
//!
//! Items tagged with a sector (angular wedge) and a band (concentric ring) are seeded inside
//! their segment, clustered by category, and decluttered so markers keep a minimum distance
//! without ever leaving their own segment. The crate performs no I/O and keeps no state between
//! calls.

pub mod algo;
pub mod error;
pub mod geometry;
pub mod model;
mod rng;

pub use algo::{CategoryOrder, ForceOptions, LayoutOptions, Relaxation};
pub use error::{Error, Result};
pub use geometry::{Band, Geometry, Point, Polar, Sector, Segment};
pub use model::{Diagnostic, Item, LayoutResult, PositionedItem, UnassignableReason};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Places `items` inside `geometry`.
///
/// Geometry and options are validated before any placement work. Items whose sector or band key
/// is unknown are reported in [`LayoutResult::diagnostics`] instead of failing the call; every
/// other item appears in the result, in input order, inside its own segment.
pub fn layout<P: Clone>(
    items: &[Item<P>],
    geometry: &Geometry,
    options: &LayoutOptions,
) -> Result<LayoutResult<P>> {
    geometry.validate()?;
    options.validate()?;

    let seed = options.seed.unwrap_or_else(rng::XorShift64Star::entropy_seed);
    let _span = tracing::debug_span!(
        "layout",
        items = items.len(),
        sectors = geometry.sectors.len(),
        bands = geometry.bands.len(),
        seed
    )
    .entered();

    let mut rng = rng::XorShift64Star::new(seed);
    let algo::seed::Seeded {
        segments,
        mut bodies,
        diagnostics,
    } = algo::seed::seed(items, geometry, options.category_order, &mut rng);

    let params = algo::RelaxParams {
        center: geometry.center,
        min_distance: options.min_distance,
        iterations: options.iterations,
        budget: algo::Budget::new(
            options
                .time_budget_ms
                .map(std::time::Duration::from_millis),
        ),
    };
    let stats = match &options.relaxation {
        Relaxation::Pairwise => algo::pairwise::relax(&mut bodies, &segments, &params),
        Relaxation::Force(opts) => algo::force::relax(&mut bodies, &segments, &params, opts),
    };
    if stats.stop == algo::StopReason::Budget {
        tracing::warn!(
            passes = stats.passes,
            budget_ms = options.time_budget_ms,
            "layout time budget exhausted before relaxation finished"
        );
    }
    tracing::debug!(
        placed = bodies.len(),
        dropped = diagnostics.len(),
        segments = segments.len(),
        passes = stats.passes,
        stop = ?stats.stop,
        residual_overlaps = algo::count_overlaps(&bodies, options.min_distance),
        "layout finished"
    );

    let items = bodies
        .iter()
        .map(|b| PositionedItem {
            item: items[b.item].clone(),
            x: b.point.x,
            y: b.point.y,
            segment: segments[b.segment].clone(),
        })
        .collect();

    Ok(LayoutResult { items, diagnostics })
}
