//! Transformations between WGS84 and the planar systems used to repair footprints.

use geo::MapCoords;
use geo_types::{coord, Coord, LineString, Polygon};
use log::debug;

use crate::error::{Polar2Wgs84Error, Result};
use crate::geometry::Geom;

mod crs;
mod datum;
mod impls;
mod traits;

pub use crs::{Crs, PlanarProjection};
pub use datum::Datum;
pub use impls::{PlateCarree, PolarStereographic};
pub use traits::Projection;

/// One of the two hemispheres, identified by its pole.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    /// Northern hemisphere, pole at latitude 90.
    North,
    /// Southern hemisphere, pole at latitude -90.
    South,
}

impl Hemisphere {
    /// Latitude of the hemisphere pole.
    pub fn pole_latitude(self) -> f64 {
        match self {
            Hemisphere::North => 90.0,
            Hemisphere::South => -90.0,
        }
    }

    /// Returns true for the northern hemisphere.
    pub fn is_north(self) -> bool {
        self == Hemisphere::North
    }

    /// Hemisphere containing the given latitude. The equator belongs to the north.
    pub fn of_latitude(lat: f64) -> Self {
        if lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }
}

impl From<bool> for Hemisphere {
    fn from(is_north: bool) -> Self {
        if is_north {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }
}

/// Chooses the polar projection matching the ring.
///
/// Vertices with latitude above `threshold` are counted against the ones below `-threshold`, the closing point
/// of a closed ring being ignored. Returns `None` if the counts are equal.
pub fn is_polar_projection_suitable(ring: &LineString<f64>, threshold: f64) -> Option<Hemisphere> {
    let coords = match ring.0.split_last() {
        Some((_, rest)) if ring.is_closed() && !rest.is_empty() => rest,
        _ => &ring.0[..],
    };

    let north = coords.iter().filter(|c| c.y > threshold).count();
    let south = coords.iter().filter(|c| c.y < -threshold).count();

    match north.cmp(&south) {
        std::cmp::Ordering::Greater => Some(Hemisphere::North),
        std::cmp::Ordering::Less => Some(Hemisphere::South),
        std::cmp::Ordering::Equal => None,
    }
}

/// Transforms every vertex of the polygon between two coordinate systems.
pub fn transform_polygon(polygon: &Polygon<f64>, from: Crs, to: Crs) -> Result<Polygon<f64>> {
    polygon.try_map_coords(|c| {
        from.transform(to, &c).ok_or_else(|| {
            Polar2Wgs84Error::Projection(format!(
                "cannot transform ({}, {}) from {from:?} to {to:?}",
                c.x, c.y
            ))
        })
    })
}

/// Projects the geometry to plate carrée, or back to WGS84 if `reverse` is set.
///
/// Members of a multipolygon are transformed independently.
pub fn project_to_plate_carree(geom: &Geom, reverse: bool) -> Result<Geom> {
    let (from, to) = if reverse {
        (Crs::PlateCarree, Crs::Wgs84)
    } else {
        (Crs::Wgs84, Crs::PlateCarree)
    };

    let projected = geom.try_map_polygons(|polygon| transform_polygon(polygon, from, to))?;
    debug!("Projected geometry to plate carree (reverse={reverse})");

    Ok(projected)
}

/// Projects the geometry to the polar stereographic system of the given hemisphere, or back to WGS84 if `reverse`
/// is set.
pub fn project_to_polar(geom: &Geom, is_north: bool, reverse: bool) -> Result<Geom> {
    let polar = Crs::polar(Hemisphere::from(is_north));
    let (from, to) = if reverse {
        (polar, Crs::Wgs84)
    } else {
        (Crs::Wgs84, polar)
    };

    let projected = geom.try_map_polygons(|polygon| transform_polygon(polygon, from, to))?;
    debug!(
        "Projected geometry using {} polar projection (reverse={reverse})",
        if is_north { "north" } else { "south" }
    );

    Ok(projected)
}

/// Inserts points along straight edges so that no edge of any ring is longer than `max_distance`.
///
/// Distances are measured in the units of the polygon coordinates. A non-positive distance leaves the polygon
/// unchanged.
pub fn densify_planar(polygon: &Polygon<f64>, max_distance: f64) -> Polygon<f64> {
    if !(max_distance > 0.0 && max_distance.is_finite()) {
        return polygon.clone();
    }

    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| densify_planar_line(ring, max_distance))
        .collect();

    Polygon::new(densify_planar_line(polygon.exterior(), max_distance), interiors)
}

fn densify_planar_line(line: &LineString<f64>, max_distance: f64) -> LineString<f64> {
    let Some(last) = line.0.last().copied() else {
        return line.clone();
    };

    let mut coords = Vec::with_capacity(line.0.len());
    for segment in line.lines() {
        let length = segment.dx().hypot(segment.dy());
        let steps = (length / max_distance).ceil().max(1.0) as usize;

        coords.push(segment.start);
        for i in 1..steps {
            let t = i as f64 / steps as f64;
            coords.push(coord! {
                x: segment.start.x + t * segment.dx(),
                y: segment.start.y + t * segment.dy(),
            });
        }
    }
    coords.push(last);

    LineString::new(coords)
}

/// Densifies the polygon with straight edges of the polar stereographic plane and returns it to WGS84.
///
/// `max_distance` is in metres of the polar plane.
pub fn densify_in_polar(polygon: &Polygon<f64>, is_north: bool, max_distance: f64) -> Result<Polygon<f64>> {
    let polar = Crs::polar(Hemisphere::from(is_north));
    let projected = transform_polygon(polygon, Crs::Wgs84, polar)?;
    let densified = densify_planar(&projected, max_distance);
    debug!(
        "Densified polygon in polar plane: {} -> {} exterior points",
        projected.exterior().0.len(),
        densified.exterior().0.len()
    );

    transform_polygon(&densified, polar, Crs::Wgs84)
}

pub(crate) fn pole_coord() -> Coord<f64> {
    coord! { x: 0.0, y: 0.0 }
}
