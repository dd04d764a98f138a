//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum Polar2Wgs84Error {
    /// The geometry cannot be processed: wrong kind, missing rings or bad coordinates.
    #[error("invalid input geometry: {0}")]
    InvalidInputGeometry(String),
    /// The geometry is neither a polygon nor a multipolygon.
    #[error("unsupported geometry type: '{0}', expected a Polygon or a MultiPolygon")]
    UnsupportedGeometryType(String),
    /// Processing options are out of their valid range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// A coordinate transformation produced non-finite values.
    #[error("projection failed: {0}")]
    Projection(String),
    /// GeoJSON conversion error.
    #[error("geojson error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Polar2Wgs84Error>;
