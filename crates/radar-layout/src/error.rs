#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sector `{key}` has an empty angular span ({start}° to {end}°)")]
    EmptySectorSpan { key: String, start: f64, end: f64 },
    #[error("sector `{key}` spans more than a full turn ({start}° to {end}°)")]
    InvalidSectorSpan { key: String, start: f64, end: f64 },
    #[error("band `{key}` has an empty or negative radial span ({inner} to {outer})")]
    EmptyBandSpan { key: String, inner: f64, outer: f64 },
    #[error("sectors `{a}` and `{b}` overlap")]
    OverlappingSectors { a: String, b: String },
    #[error("bands `{a}` and `{b}` overlap")]
    OverlappingBands { a: String, b: String },
    #[error("duplicate sector key: {key}")]
    DuplicateSectorKey { key: String },
    #[error("duplicate band key: {key}")]
    DuplicateBandKey { key: String },
    #[error("geometry contains a non-finite value in `{field}`")]
    NonFiniteGeometry { field: String },
    #[error("min_distance must be a positive finite number, got {value}")]
    InvalidMinDistance { value: f64 },
    #[error("{name} must lie in (0, 1], got {value}")]
    InvalidStrength { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
