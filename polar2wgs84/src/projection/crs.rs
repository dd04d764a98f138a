use geo_types::Coord;
use lazy_static::lazy_static;

use crate::projection::datum::Datum;
use crate::projection::impls::{PlateCarree, PolarStereographic};
use crate::projection::traits::Projection;
use crate::projection::Hemisphere;

/// Projection from WGS84 lon/lat degrees into planar metres.
pub type PlanarProjection = dyn Projection<InPoint = Coord<f64>, OutPoint = Coord<f64>> + Send + Sync;

lazy_static! {
    static ref PLATE_CARREE: PlateCarree = PlateCarree::new(Datum::WGS84);
    static ref POLAR_NORTH: PolarStereographic =
        PolarStereographic::new(Datum::WGS84, Hemisphere::North);
    static ref POLAR_SOUTH: PolarStereographic =
        PolarStereographic::new(Datum::WGS84, Hemisphere::South);
}

/// Coordinate reference systems known to the crate.
///
/// Projection parameters of every system are computed once on first use and shared between all the callers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Geographic WGS84, longitude and latitude in degrees (EPSG:4326).
    Wgs84,
    /// Equidistant cylindrical projection on WGS84 (EPSG:32662).
    PlateCarree,
    /// Polar stereographic projection centered on the North Pole.
    PolarNorth,
    /// Polar stereographic projection centered on the South Pole.
    PolarSouth,
}

impl Crs {
    /// Polar stereographic system of the given hemisphere.
    pub fn polar(hemisphere: Hemisphere) -> Self {
        match hemisphere {
            Hemisphere::North => Crs::PolarNorth,
            Hemisphere::South => Crs::PolarSouth,
        }
    }

    /// EPSG code of the system, if it has one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Wgs84 => Some(4326),
            Crs::PlateCarree => Some(32662),
            Crs::PolarNorth | Crs::PolarSouth => None,
        }
    }

    /// Projection from WGS84 into this system. Returns `None` for WGS84 itself.
    pub fn projection(&self) -> Option<&'static PlanarProjection> {
        match self {
            Crs::Wgs84 => None,
            Crs::PlateCarree => Some(&*PLATE_CARREE),
            Crs::PolarNorth => Some(&*POLAR_NORTH),
            Crs::PolarSouth => Some(&*POLAR_SOUTH),
        }
    }

    /// Transforms a coordinate from this system into `target`, going through WGS84 if neither is geographic.
    pub fn transform(&self, target: Crs, coord: &Coord<f64>) -> Option<Coord<f64>> {
        if *self == target {
            return Some(*coord);
        }

        let geographic = match self.projection() {
            Some(projection) => projection.unproject(coord)?,
            None => *coord,
        };

        match target.projection() {
            Some(projection) => projection.project(&geographic),
            None => Some(geographic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo_types::coord;

    #[test]
    fn identity_transform() {
        let c = coord! { x: 12.0, y: 34.0 };
        assert_eq!(Crs::PolarNorth.transform(Crs::PolarNorth, &c), Some(c));
        assert!(Crs::Wgs84.projection().is_none());
    }

    #[test]
    fn transform_between_projected_systems() {
        let lonlat = coord! { x: -45.0, y: 75.0 };
        let polar = Crs::Wgs84
            .transform(Crs::PolarNorth, &lonlat)
            .expect("finite");
        let carree = Crs::PolarNorth
            .transform(Crs::PlateCarree, &polar)
            .expect("finite");
        let back = Crs::PlateCarree
            .transform(Crs::Wgs84, &carree)
            .expect("finite");

        assert_abs_diff_eq!(back.x, lonlat.x, epsilon = 1e-8);
        assert_abs_diff_eq!(back.y, lonlat.y, epsilon = 1e-8);
    }

    #[test]
    fn polar_by_hemisphere() {
        assert_eq!(Crs::polar(Hemisphere::North), Crs::PolarNorth);
        assert_eq!(Crs::polar(Hemisphere::South), Crs::PolarSouth);
        assert_eq!(Crs::PlateCarree.epsg(), Some(32662));
    }
}
