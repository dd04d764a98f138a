//! Entry point of the crate: repair of a footprint and its reduction to a bounded number of vertices.

use geo::orient::{Direction, Orient};
use geo::{Area, Winding};
use geo_types::{Geometry, MultiPolygon, Polygon};
use log::{debug, info};
use serde::Serialize;

use crate::angle::LongitudeNormalize;
use crate::antimeridian;
use crate::densify::{limit_vertices, GeodesicDensifier};
use crate::equator;
use crate::error::{Polar2Wgs84Error, Result};
use crate::geometry::Geom;
use crate::options::ProcessingOptions;
use crate::pole::Pole;
use crate::projection::{transform_polygon, Crs, Hemisphere};
use crate::stats::Stats;
use crate::validity::explain_validity;

/// Footprint polygon in WGS84 lon/lat degrees.
///
/// On creation the longitudes are moved into `[-180, 180]`, the exterior is oriented counter-clockwise and the
/// latitude statistics are computed. The footprint is never modified afterwards; every operation returns a new
/// geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    geometry: Polygon<f64>,
    stats: Stats,
}

impl Footprint {
    /// Creates a new footprint.
    ///
    /// Longitudes outside `[-180, 180]` are wrapped into it. Fails with [`Polar2Wgs84Error::InvalidInputGeometry`]
    /// if the exterior is empty, a coordinate is not finite or a latitude is outside `[-90, 90]`.
    pub fn new(polygon: Polygon<f64>) -> Result<Self> {
        if polygon.exterior().0.is_empty() {
            return Err(Polar2Wgs84Error::InvalidInputGeometry(
                "polygon exterior is empty".into(),
            ));
        }

        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for c in rings.flat_map(|ring| ring.coords()) {
            if !(c.x.is_finite() && c.y.is_finite()) {
                return Err(Polar2Wgs84Error::InvalidInputGeometry(format!(
                    "coordinate ({}, {}) is not finite",
                    c.x, c.y
                )));
            }
            if !(-90.0..=90.0).contains(&c.y) {
                return Err(Polar2Wgs84Error::InvalidInputGeometry(format!(
                    "latitude {} is out of range",
                    c.y
                )));
            }
        }

        let geometry = polygon.wrap_lon_180().orient(Direction::Default);
        let stats = Stats::from_ring(geometry.exterior());
        debug!("Footprint statistics: {stats:?}");

        Ok(Self { geometry, stats })
    }

    /// Normalized footprint polygon.
    pub fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }

    /// Latitude statistics of the exterior ring.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns a geometry valid under the planar rules of GeoJSON.
    ///
    /// A footprint lying in a single hemisphere is first checked for the pole; if it does not contain it, it is
    /// split along the antimeridian when needed. A footprint spanning both hemispheres is split at the equator and
    /// both halves are repaired the same way.
    pub fn make_valid_geojson_geometry(&self) -> Result<Geom> {
        if !self.stats.is_single_hemisphere() {
            info!("Footprint spans both hemispheres");
            return equator::make_valid_geojson_geometry(&self.geometry);
        }

        let pole = Pole::new(Hemisphere::from(self.stats.only_positive_lat));
        if pole.is_pole_included(&self.geometry)? {
            info!("Footprint contains the pole at latitude {}", pole.pole_latitude());
            return Ok(Geom::Polygon(pole.close_around_pole(&self.geometry)));
        }

        Ok(antimeridian::make_valid_geojson_geometry(&self.geometry))
    }

    /// Densifies the geometry along great circles, then simplifies it in plate carrée until every member has at
    /// most `max_points` exterior coordinates.
    ///
    /// Every member of a multipolygon is processed independently and the result has the same kind as the input.
    pub fn to_wgs84_plate_carre(&self, geom: &Geom, options: &ProcessingOptions) -> Result<Geom> {
        options.validate()?;
        let densifier = GeodesicDensifier::new(options.densify);

        let process = |polygon: &Polygon<f64>| -> Result<Polygon<f64>> {
            let densified = densifier.densify(&Geometry::Polygon(polygon.clone()))?;
            let planar = transform_polygon(&densified, Crs::Wgs84, Crs::PlateCarree)?;
            let simplified = limit_vertices(&planar, &options.simplify);
            transform_polygon(&simplified, Crs::PlateCarree, Crs::Wgs84)
        };

        match geom {
            Geom::Polygon(polygon) => Ok(Geom::Polygon(process(polygon)?)),
            Geom::MultiPolygon(mp) => {
                #[cfg(feature = "parallel")]
                let parts = {
                    use rayon::prelude::*;
                    mp.0.par_iter().map(process).collect::<Result<Vec<_>>>()?
                };
                #[cfg(not(feature = "parallel"))]
                let parts = mp.0.iter().map(process).collect::<Result<Vec<_>>>()?;

                Ok(Geom::MultiPolygon(MultiPolygon::new(parts)))
            }
        }
    }
}

impl TryFrom<Geom> for Footprint {
    type Error = Polar2Wgs84Error;

    fn try_from(value: Geom) -> Result<Self> {
        match value {
            Geom::Polygon(polygon) => Self::new(polygon),
            Geom::MultiPolygon(_) => Err(Polar2Wgs84Error::InvalidInputGeometry(
                "a footprint must be a single Polygon, got a MultiPolygon".into(),
            )),
        }
    }
}

impl TryFrom<Geometry<f64>> for Footprint {
    type Error = Polar2Wgs84Error;

    fn try_from(value: Geometry<f64>) -> Result<Self> {
        Geom::try_from(value)?.try_into()
    }
}

impl TryFrom<geojson::Geometry> for Footprint {
    type Error = Polar2Wgs84Error;

    fn try_from(value: geojson::Geometry) -> Result<Self> {
        Geom::try_from(value)?.try_into()
    }
}

/// Summary of the validity and shape of a geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonReport {
    /// The geometry is valid.
    pub is_valid: bool,
    /// Why the geometry is invalid.
    pub reason: Option<String>,
    /// Planar area in squared degrees.
    pub area: f64,
    /// The area is positive.
    pub has_area: bool,
    /// Orientation of the exterior ring of every member.
    pub exterior_ccw: Vec<bool>,
    /// Number of exterior coordinates of every member, closing point included.
    pub vertex_count: Vec<usize>,
}

/// Checks the validity, area and orientation of a geometry.
pub fn check_polygon(geom: &Geom) -> PolygonReport {
    let reason = explain_validity(geom);
    let area: f64 = geom.polygons().map(|p| p.unsigned_area()).sum();

    let report = PolygonReport {
        is_valid: reason.is_none(),
        reason,
        area,
        has_area: area > 0.0,
        exterior_ccw: geom.polygons().map(|p| p.exterior().is_ccw()).collect(),
        vertex_count: geom.polygons().map(|p| p.exterior().0.len()).collect(),
    };
    debug!("{} check: {report:?}", geom.type_name());

    report
}
