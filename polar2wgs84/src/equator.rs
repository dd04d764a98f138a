//! Repair of polygons spanning both hemispheres.
//!
//! The polygon is cut along the equator and every half is repaired on its own, either around its pole or along
//! the antimeridian. The halves are merged back with a geometric union.

use geo::orient::{Direction, Orient};
use geo::BooleanOps;
use geo_types::{MultiPolygon, Polygon};
use log::{debug, info};

use crate::angle::ANTIMERIDIAN_LONGITUDE;
use crate::antimeridian;
use crate::error::Result;
use crate::geometry::Geom;
use crate::pole::Pole;
use crate::split::{snap_to_meridians, split_at_parallel};

const EQUATOR_LATITUDE: f64 = 0.0;

/// Splits the polygon at the equator, repairs both halves and returns their union.
pub fn make_valid_geojson_geometry(polygon: &Polygon<f64>) -> Result<Geom> {
    info!("Splitting geometry along the equator");

    let mut repaired: Vec<Polygon<f64>> = Vec::new();
    for part in split_at_parallel(polygon, EQUATOR_LATITUDE) {
        let pole = Pole::for_polygon(&part);
        let fixed = if pole.is_pole_included(&part)? {
            Geom::Polygon(pole.close_around_pole(&part))
        } else {
            antimeridian::make_valid_geojson_geometry(&part)
        };
        repaired.extend(fixed.into_polygons());
    }
    debug!("Equator split produced {} simple polygons", repaired.len());

    let merged = union_all(repaired);
    let parts = merged
        .into_iter()
        .map(|part| {
            snap_to_meridians(&part, &[-ANTIMERIDIAN_LONGITUDE, ANTIMERIDIAN_LONGITUDE])
                .orient(Direction::Default)
        })
        .collect();

    Ok(Geom::from_parts(parts))
}

fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut polygons = polygons.into_iter();
    let Some(first) = polygons.next() else {
        return MultiPolygon::new(vec![]);
    };

    polygons.fold(MultiPolygon::new(vec![first]), |acc, polygon| {
        acc.union(&MultiPolygon::new(vec![polygon]))
    })
}
