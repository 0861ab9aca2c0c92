use radar_layout::{Band, Error, Geometry, Item, LayoutOptions, Point, Sector, layout};

fn one_band() -> Vec<Band> {
    vec![Band::new("r", 50.0, 100.0)]
}

#[test]
fn zero_span_sector_is_rejected() {
    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("flat", 45.0, 45.0)],
        one_band(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::EmptySectorSpan { .. }), "{err}");
}

#[test]
fn sector_wider_than_a_turn_is_rejected() {
    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("huge", 0.0, 400.0)],
        one_band(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidSectorSpan { .. }), "{err}");
}

#[test]
fn sector_bounds_past_a_full_turn_are_wrapped() {
    // [700, 10] is the 30° wedge from 340° to 10°.
    let geometry = Geometry::new(
        Point::default(),
        vec![Sector::new("wrap", 700.0, 10.0), Sector::new("q", 10.0, 90.0)],
        one_band(),
    )
    .unwrap();
    assert_eq!(geometry.sectors[0].span(), 30.0);

    let items: Vec<Item> = (0..5)
        .map(|i| Item::new(format!("i{i}"), "wrap", "r", ""))
        .collect();
    let result = layout(&items, &geometry, &LayoutOptions::seeded(3)).unwrap();
    assert_eq!(result.items.len(), 5);
    for p in &result.items {
        assert!(p.segment.contains(p.point(), geometry.center), "{p:?}");
        let angle = p.point().to_polar(geometry.center).angle;
        assert!(angle >= 340.0 - 1e-6 || angle <= 10.0 + 1e-6, "angle {angle}");
    }
}

#[test]
fn inverted_or_negative_band_is_rejected() {
    for band in [
        Band::new("inverted", 100.0, 50.0),
        Band::new("flat", 60.0, 60.0),
        Band::new("negative", -10.0, 50.0),
    ] {
        let err = Geometry::new(
            Point::default(),
            vec![Sector::new("q", 0.0, 90.0)],
            vec![band],
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyBandSpan { .. }), "{err}");
    }
}

#[test]
fn overlapping_bands_are_rejected() {
    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("q", 0.0, 90.0)],
        vec![Band::new("a", 0.0, 60.0), Band::new("b", 50.0, 100.0)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::OverlappingBands { .. }), "{err}");
}

#[test]
fn wrapping_sector_overlap_is_detected() {
    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("wrap", 300.0, 30.0), Sector::new("q", 0.0, 90.0)],
        one_band(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::OverlappingSectors { .. }), "{err}");
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("q", 0.0, 90.0), Sector::new("q", 90.0, 180.0)],
        one_band(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateSectorKey { .. }), "{err}");

    let err = Geometry::new(
        Point::default(),
        vec![Sector::new("q", 0.0, 90.0)],
        vec![Band::new("r", 0.0, 10.0), Band::new("r", 10.0, 20.0)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateBandKey { .. }), "{err}");
}

#[test]
fn non_finite_center_is_rejected() {
    let err = Geometry::new(
        Point::new(f64::NAN, 0.0),
        vec![Sector::new("q", 0.0, 90.0)],
        one_band(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NonFiniteGeometry { .. }), "{err}");
}

#[test]
fn layout_validates_geometry_before_placing() {
    // Built by hand to bypass `Geometry::new`.
    let geometry = Geometry {
        center: Point::default(),
        sectors: vec![Sector::new("q", 10.0, 10.0)],
        bands: one_band(),
    };
    let items = vec![Item::new("a", "q", "r", "")];
    let err = layout(&items, &geometry, &LayoutOptions::seeded(1)).unwrap_err();
    assert!(matches!(err, Error::EmptySectorSpan { .. }), "{err}");
}

#[test]
fn layout_rejects_non_positive_min_distance() {
    let items = vec![Item::new("a", "techniques", "adopt", "")];
    let options = LayoutOptions {
        min_distance: 0.0,
        ..LayoutOptions::seeded(1)
    };
    let err = layout(&items, &Geometry::tech_radar(), &options).unwrap_err();
    assert!(matches!(err, Error::InvalidMinDistance { .. }), "{err}");
}
