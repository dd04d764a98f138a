use geo_types::{coord, Coord};

use crate::projection::datum::Datum;
use crate::projection::traits::Projection;

/// Equidistant cylindrical projection with the standard parallel on the equator (EPSG:32662).
///
/// Longitude and latitude are scaled by the semimajor axis of the datum, so the result is in meters along the
/// equator and along meridians. Unprojected coordinates are snapped into `[-180, 180]` x `[-90, 90]`, as the
/// round trip through radians may push the edges of the range out by a rounding error.
#[derive(Debug, Copy, Clone)]
pub struct PlateCarree {
    datum: Datum,
}

impl PlateCarree {
    /// Creates a new instance for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Default for PlateCarree {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl Projection for PlateCarree {
    type InPoint = Coord<f64>;
    type OutPoint = Coord<f64>;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let x = self.datum.semimajor() * input.x.to_radians();
        let y = self.datum.semimajor() * input.y.to_radians();

        if x.is_finite() && y.is_finite() {
            Some(coord! { x: x, y: y })
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lon = (input.x / self.datum.semimajor()).to_degrees();
        let lat = (input.y / self.datum.semimajor()).to_degrees();

        if lon.is_finite() && lat.is_finite() {
            Some(coord! { x: lon.clamp(-180.0, 180.0), y: lat.clamp(-90.0, 90.0) })
        } else {
            None
        }
    }
}
