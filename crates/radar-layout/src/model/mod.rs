use crate::geometry::{Point, Segment};
use serde::{Deserialize, Serialize};

/// A catalog entry to place. `payload` carries whatever the caller needs back (name,
/// description, links); the layout never looks at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item<P = ()> {
    pub id: String,
    #[serde(alias = "quadrant")]
    pub sector_key: String,
    #[serde(alias = "ring")]
    pub band_key: String,
    /// Sub-cluster label inside a segment. Not an identity field.
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub payload: P,
}

impl Item<()> {
    pub fn new(
        id: impl Into<String>,
        sector_key: impl Into<String>,
        band_key: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sector_key: sector_key.into(),
            band_key: band_key.into(),
            category: category.into(),
            payload: (),
        }
    }
}

impl<P> Item<P> {
    pub fn with_payload<Q>(self, payload: Q) -> Item<Q> {
        Item {
            id: self.id,
            sector_key: self.sector_key,
            band_key: self.band_key,
            category: self.category,
            payload,
        }
    }
}

/// Serializes as the flattened item plus `x`, `y` and `segment`. A map payload that has any of
/// those keys yields an object with duplicate keys, so callers with free-form payloads should
/// rename or nest them first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedItem<P = ()> {
    #[serde(flatten)]
    pub item: Item<P>,
    /// Absolute canvas coordinates (the geometry center is already applied).
    pub x: f64,
    pub y: f64,
    pub segment: Segment,
}

impl<P> PositionedItem<P> {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnassignableReason {
    UnknownSector,
    UnknownBand,
    UnknownSectorAndBand,
}

/// Non-fatal findings collected during a layout call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// The item names a sector or band missing from the geometry and was left out.
    UnassignableItem {
        id: String,
        sector_key: String,
        band_key: String,
        reason: UnassignableReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult<P = ()> {
    /// Placed items, in the relative order of the input.
    pub items: Vec<PositionedItem<P>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<P> LayoutResult<P> {
    /// Smallest distance between any two placed items, `None` with fewer than two.
    pub fn min_separation(&self) -> Option<f64> {
        let mut min: Option<f64> = None;
        for (i, a) in self.items.iter().enumerate() {
            for b in &self.items[i + 1..] {
                let d = a.point().distance(b.point());
                min = Some(min.map_or(d, |m| m.min(d)));
            }
        }
        min
    }
}
