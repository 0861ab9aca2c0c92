use super::{Band, Geometry, Point, Sector};

impl Geometry {
    /// The classic four-quadrant, four-ring technology radar on an 800×800 canvas.
    ///
    /// Quadrants follow screen angles (clockwise from +x): techniques bottom-right, tools
    /// bottom-left, platforms top-left, languages and frameworks top-right.
    pub fn tech_radar() -> Self {
        Self {
            center: Point::new(400.0, 400.0),
            sectors: vec![
                Sector::new("languages-and-frameworks", 270.0, 360.0),
                Sector::new("platforms", 180.0, 270.0),
                Sector::new("tools", 90.0, 180.0),
                Sector::new("techniques", 0.0, 90.0),
            ],
            bands: vec![
                Band::new("adopt", 50.0, 110.0),
                Band::new("trial", 110.0, 190.0),
                Band::new("assess", 190.0, 290.0),
                Band::new("hold", 290.0, 370.0),
            ],
        }
    }
}
