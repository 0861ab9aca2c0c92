//! Polar segment geometry: sectors (angular wedges), bands (concentric rings) and the tiles
//! formed by crossing the two.
//!
//! Angles are in degrees. Angle 0 points along +x and angles grow toward +y, so on a y-down
//! screen they run clockwise. A sector whose end lies before its start wraps through 0°.

use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

mod preset;

/// Slack used when testing whether a point sits inside a segment (degrees and pixels).
pub const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn to_polar(self, center: Point) -> Polar {
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Polar {
            angle: normalize_degrees(dy.atan2(dx).to_degrees()),
            radius: dx.hypot(dy),
        }
    }

    pub(crate) fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// Degrees, normalized to `[0, 360)` when produced by [`Point::to_polar`].
    pub angle: f64,
    pub radius: f64,
}

impl Polar {
    pub fn to_point(self, center: Point) -> Point {
        let rad = self.angle.to_radians();
        Point {
            x: center.x + rad.cos() * self.radius,
            y: center.y + rad.sin() * self.radius,
        }
    }
}

/// Maps any angle onto `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let v = angle.rem_euclid(360.0);
    // `rem_euclid` rounds tiny negative inputs up to exactly 360.0.
    if v >= 360.0 { 0.0 } else { v }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub key: String,
    pub angle_start: f64,
    pub angle_end: f64,
}

impl Sector {
    pub fn new(key: impl Into<String>, angle_start: f64, angle_end: f64) -> Self {
        Self {
            key: key.into(),
            angle_start,
            angle_end,
        }
    }

    /// Angular extent in degrees, unwrapping sectors that cross 0°.
    ///
    /// Bounds need not be normalized: `[700, 10]` is the same 30° wedge as `[340, 10]`. A
    /// nonzero multiple of 360 is a full turn; identical bounds give 0.
    pub fn span(&self) -> f64 {
        let raw = self.angle_end - self.angle_start;
        if raw >= 360.0 {
            return 360.0;
        }
        let span = normalize_degrees(raw);
        if span == 0.0 && raw != 0.0 { 360.0 } else { span }
    }

    pub fn mid_angle(&self) -> f64 {
        self.angle_start + self.span() / 2.0
    }

    /// Clockwise distance from `angle_start` to `angle`, in `[0, 360)`.
    fn offset_of(&self, angle: f64) -> f64 {
        normalize_degrees(angle - self.angle_start)
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        let span = self.span();
        if span >= 360.0 {
            return true;
        }
        let offset = self.offset_of(angle);
        offset <= span + TOLERANCE || 360.0 - offset <= TOLERANCE
    }

    /// Returns `angle` when it lies inside the sector, otherwise whichever bound is angularly
    /// nearer. Ties go to the end bound.
    pub fn clamp_angle(&self, angle: f64) -> f64 {
        let span = self.span();
        if span >= 360.0 {
            return angle;
        }
        let offset = self.offset_of(angle);
        if offset <= span {
            return angle;
        }
        let past_end = offset - span;
        let before_start = 360.0 - offset;
        if before_start < past_end {
            self.angle_start
        } else {
            self.angle_start + span
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.angle_start.is_finite() && self.angle_end.is_finite()) {
            return Err(Error::NonFiniteGeometry {
                field: format!("sectors[{}]", self.key),
            });
        }
        let raw = self.angle_end - self.angle_start;
        if self.span() <= TOLERANCE {
            return Err(Error::EmptySectorSpan {
                key: self.key.clone(),
                start: self.angle_start,
                end: self.angle_end,
            });
        }
        // A full turn built as `start..start + 360` may round a hair past 360.
        if raw > 360.0 + TOLERANCE {
            return Err(Error::InvalidSectorSpan {
                key: self.key.clone(),
                start: self.angle_start,
                end: self.angle_end,
            });
        }
        Ok(())
    }

    /// Two arcs overlap with positive measure iff one starts strictly inside the other.
    fn overlaps(&self, other: &Sector) -> bool {
        self.offset_of(other.angle_start) < self.span() - TOLERANCE
            || other.offset_of(self.angle_start) < other.span() - TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub key: String,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Band {
    pub fn new(key: impl Into<String>, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            key: key.into(),
            inner_radius,
            outer_radius,
        }
    }

    pub fn width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    pub fn contains_radius(&self, radius: f64) -> bool {
        radius >= self.inner_radius - TOLERANCE && radius <= self.outer_radius + TOLERANCE
    }

    pub fn clamp_radius(&self, radius: f64) -> f64 {
        radius.max(self.inner_radius).min(self.outer_radius)
    }

    fn validate(&self) -> Result<()> {
        if !(self.inner_radius.is_finite() && self.outer_radius.is_finite()) {
            return Err(Error::NonFiniteGeometry {
                field: format!("bands[{}]", self.key),
            });
        }
        if self.inner_radius < 0.0 || self.outer_radius <= self.inner_radius {
            return Err(Error::EmptyBandSpan {
                key: self.key.clone(),
                inner: self.inner_radius,
                outer: self.outer_radius,
            });
        }
        Ok(())
    }

    fn overlaps(&self, other: &Band) -> bool {
        self.inner_radius < other.outer_radius - TOLERANCE
            && other.inner_radius < self.outer_radius - TOLERANCE
    }
}

/// One sector crossed with one band: the region a positioned item must stay inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub sector: Sector,
    pub band: Band,
}

impl Segment {
    pub fn new(sector: Sector, band: Band) -> Self {
        Self { sector, band }
    }

    pub fn contains(&self, point: Point, center: Point) -> bool {
        let polar = point.to_polar(center);
        if !self.band.contains_radius(polar.radius) {
            return false;
        }
        // The angle of the center itself is meaningless.
        polar.radius <= TOLERANCE || self.sector.contains_angle(polar.angle)
    }

    /// Projects `point` onto the nearest location inside the segment.
    ///
    /// Points already inside are returned unchanged. A point sitting on the center has no
    /// direction, so it lands on the sector's mid-angle at the inner radius.
    pub fn clamp(&self, point: Point, center: Point) -> Point {
        if self.contains(point, center) {
            return point;
        }
        let polar = point.to_polar(center);
        if polar.radius <= TOLERANCE {
            return Polar {
                angle: self.sector.mid_angle(),
                radius: self.band.inner_radius,
            }
            .to_point(center);
        }
        Polar {
            angle: self.sector.clamp_angle(polar.angle),
            radius: self.band.clamp_radius(polar.radius),
        }
        .to_point(center)
    }

    /// Area of the annular wedge, used to estimate how many markers fit.
    pub fn area(&self) -> f64 {
        let inner = self.band.inner_radius;
        let outer = self.band.outer_radius;
        std::f64::consts::PI * (outer * outer - inner * inner) * (self.sector.span() / 360.0)
    }
}

/// Shared center plus the sector and band lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(default)]
    pub center: Point,
    pub sectors: Vec<Sector>,
    pub bands: Vec<Band>,
}

impl Geometry {
    pub fn new(center: Point, sectors: Vec<Sector>, bands: Vec<Band>) -> Result<Self> {
        let g = Self {
            center,
            sectors,
            bands,
        };
        g.validate()?;
        Ok(g)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(Error::NonFiniteGeometry {
                field: "center".to_string(),
            });
        }

        let mut sector_keys: FxHashSet<&str> = FxHashSet::default();
        for s in &self.sectors {
            s.validate()?;
            if !sector_keys.insert(s.key.as_str()) {
                return Err(Error::DuplicateSectorKey { key: s.key.clone() });
            }
        }
        for (i, a) in self.sectors.iter().enumerate() {
            for b in &self.sectors[i + 1..] {
                if a.overlaps(b) {
                    return Err(Error::OverlappingSectors {
                        a: a.key.clone(),
                        b: b.key.clone(),
                    });
                }
            }
        }

        let mut band_keys: FxHashSet<&str> = FxHashSet::default();
        for b in &self.bands {
            b.validate()?;
            if !band_keys.insert(b.key.as_str()) {
                return Err(Error::DuplicateBandKey { key: b.key.clone() });
            }
        }
        for (i, a) in self.bands.iter().enumerate() {
            for b in &self.bands[i + 1..] {
                if a.overlaps(b) {
                    return Err(Error::OverlappingBands {
                        a: a.key.clone(),
                        b: b.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn sector(&self, key: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.key == key)
    }

    pub fn band(&self, key: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.key == key)
    }

    pub fn segment(&self, sector_key: &str, band_key: &str) -> Option<Segment> {
        Some(Segment::new(
            self.sector(sector_key)?.clone(),
            self.band(band_key)?.clone(),
        ))
    }
}

/// Key lookup tables built once per layout call. Each entry carries the position of the sector
/// or band in the geometry, which fixes the segment seeding order.
#[derive(Debug)]
pub(crate) struct GeometryIndex<'a> {
    sectors: FxHashMap<&'a str, (usize, &'a Sector)>,
    bands: FxHashMap<&'a str, (usize, &'a Band)>,
}

impl<'a> GeometryIndex<'a> {
    pub(crate) fn new(geometry: &'a Geometry) -> Self {
        Self {
            sectors: geometry
                .sectors
                .iter()
                .enumerate()
                .map(|(i, s)| (s.key.as_str(), (i, s)))
                .collect(),
            bands: geometry
                .bands
                .iter()
                .enumerate()
                .map(|(i, b)| (b.key.as_str(), (i, b)))
                .collect(),
        }
    }

    pub(crate) fn sector(&self, key: &str) -> Option<(usize, &'a Sector)> {
        self.sectors.get(key).copied()
    }

    pub(crate) fn band(&self, key: &str) -> Option<(usize, &'a Band)> {
        self.bands.get(key).copied()
    }
}
