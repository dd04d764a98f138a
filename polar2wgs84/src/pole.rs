//! Detection and repair of polygons enclosing one of the poles.
//!
//! A ring that goes around a pole has no interior in lon/lat space, so it is rebuilt as a ring that follows the
//! footprint boundary from -180 to 180 and comes back along the pole latitude.

use geo::orient::{Direction, Orient};
use geo::{Closest, ClosestPoint, Contains};
use geo_types::{coord, Coord, LineString, Point, Polygon};
use log::{debug, info, warn};

use crate::angle::{reorganize_longitudes, LongitudeNormalize, ANTIMERIDIAN_LONGITUDE};
use crate::error::Result;
use crate::projection::{is_polar_projection_suitable, pole_coord, transform_polygon, Crs, Hemisphere};
use crate::split::meridian_intersections;

/// Minimum distance in metres of the polar plane between the pole and the polygon boundary for the pole to be
/// considered inside.
pub const POLE_INCLUSION_TOLERANCE: f64 = 1e-6;

/// North or South Pole.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pole {
    pole_latitude: f64,
    is_north: bool,
}

impl Pole {
    /// North Pole.
    pub const NORTH: Pole = Pole {
        pole_latitude: 90.0,
        is_north: true,
    };

    /// South Pole.
    pub const SOUTH: Pole = Pole {
        pole_latitude: -90.0,
        is_north: false,
    };

    /// Pole of the given hemisphere.
    pub fn new(hemisphere: Hemisphere) -> Self {
        match hemisphere {
            Hemisphere::North => Self::NORTH,
            Hemisphere::South => Self::SOUTH,
        }
    }

    /// Pole of the hemisphere holding the majority of the polygon vertices.
    ///
    /// If both hemispheres hold the same number of vertices, the hemisphere of the first vertex is used.
    pub fn for_polygon(polygon: &Polygon<f64>) -> Self {
        let hemisphere = is_polar_projection_suitable(polygon.exterior(), 0.0).unwrap_or_else(|| {
            let first_lat = polygon.exterior().0.first().map_or(0.0, |c| c.y);
            Hemisphere::of_latitude(first_lat)
        });

        Self::new(hemisphere)
    }

    /// Latitude of the pole, 90 or -90.
    pub fn pole_latitude(&self) -> f64 {
        self.pole_latitude
    }

    /// Returns true for the North Pole.
    pub fn is_north(&self) -> bool {
        self.is_north
    }

    /// Hemisphere of the pole.
    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from(self.is_north)
    }

    /// Checks if the polygon strictly contains the pole.
    ///
    /// The polygon is projected to the polar stereographic plane of the pole, where the pole is the origin. A pole
    /// lying on the boundary, or closer to it than [`POLE_INCLUSION_TOLERANCE`], is not included.
    pub fn is_pole_included(&self, polygon: &Polygon<f64>) -> Result<bool> {
        let polar = transform_polygon(polygon, Crs::Wgs84, Crs::polar(self.hemisphere()))?;
        let pole = pole_coord();

        let included = polar.contains(&pole)
            && std::iter::once(polar.exterior())
                .chain(polar.interiors())
                .all(|ring| distance_to_ring(ring, pole) > POLE_INCLUSION_TOLERANCE);

        info!("Pole is contained in the geometry: {included}");
        Ok(included)
    }

    /// Rebuilds the polygon if it contains the pole, returns it unchanged otherwise.
    pub fn make_valid_geojson_geometry(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        if self.is_pole_included(polygon)? {
            Ok(self.close_around_pole(polygon))
        } else {
            Ok(polygon.clone())
        }
    }

    /// Rebuilds a polygon known to contain the pole as a ring going through both ends of the antimeridian and
    /// along the pole latitude.
    ///
    /// The latitude of the antimeridian crossing is taken from the boundary in `[0, 360]` space. If the boundary
    /// crosses it several times the second crossing along the ring is used. Holes are dropped.
    pub fn close_around_pole(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        let exterior_360 = polygon.exterior().to_lon_360();
        let crossings = meridian_intersections(&exterior_360, ANTIMERIDIAN_LONGITUDE);
        let Some(crossing) = crossings.get(1).or(crossings.first()) else {
            warn!("Polygon contains the pole but does not cross the antimeridian, leaving it unchanged");
            return polygon.clone();
        };
        debug!(
            "Antimeridian crossed {} times, using latitude {}",
            crossings.len(),
            crossing.y
        );

        let line = insert_all_sign_changes(
            polygon.exterior(),
            coord! { x: -ANTIMERIDIAN_LONGITUDE, y: crossing.y },
        );

        let mut coords = reorganize_longitudes(&line);
        coords.extend([
            coord! { x: ANTIMERIDIAN_LONGITUDE, y: self.pole_latitude },
            coord! { x: -ANTIMERIDIAN_LONGITUDE, y: self.pole_latitude },
        ]);
        if let Some(first) = coords.first().copied() {
            if coords.last() != Some(&first) {
                coords.push(first);
            }
        }
        coords.dedup();

        Polygon::new(LineString::new(coords), vec![]).orient(Direction::Default)
    }
}

/// Inserts `point` between every two consecutive vertices whose longitudes have opposite signs.
pub fn insert_all_sign_changes(line: &LineString<f64>, point: Coord<f64>) -> LineString<f64> {
    let mut coords = Vec::with_capacity(line.0.len());
    for (i, c) in line.0.iter().enumerate() {
        if let Some(prev) = i.checked_sub(1).map(|p| line.0[p]) {
            if prev.x * c.x < 0.0 {
                coords.push(point);
            }
        }
        coords.push(*c);
    }

    LineString::new(coords)
}

fn distance_to_ring(ring: &LineString<f64>, c: Coord<f64>) -> f64 {
    match ring.closest_point(&Point::from(c)) {
        Closest::Intersection(_) => 0.0,
        Closest::SinglePoint(p) => (p.x() - c.x).hypot(p.y() - c.y),
        Closest::Indeterminate => f64::INFINITY,
    }
}
