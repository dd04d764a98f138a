//! Latitude statistics, vertex counts and centroids of footprints.

use geo_types::{Coord, Geometry, LineString, Polygon};

use crate::error::{Polar2Wgs84Error, Result};
use crate::geometry::{geometry_type_name, Geom};

/// Latitude above which (or below the opposite of which) a vertex is considered to be in a polar area.
pub const HIGH_LATITUDE: f64 = 60.0;

/// Latitude distribution of the exterior ring of a footprint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    /// All latitudes are non-negative.
    pub only_positive_lat: bool,
    /// All latitudes are negative.
    pub only_negative_lat: bool,
    /// Number of points north of [`HIGH_LATITUDE`].
    pub high_latitude_pos: usize,
    /// Number of points south of `-HIGH_LATITUDE`.
    pub high_latitude_neg: usize,
}

impl Stats {
    /// Computes the statistics over all the coordinates of the ring, closing point included.
    pub fn from_ring(ring: &LineString<f64>) -> Self {
        Self {
            only_positive_lat: ring.coords().all(|c| c.y >= 0.0),
            only_negative_lat: ring.coords().all(|c| c.y < 0.0),
            high_latitude_pos: ring.coords().filter(|c| c.y > HIGH_LATITUDE).count(),
            high_latitude_neg: ring.coords().filter(|c| c.y < -HIGH_LATITUDE).count(),
        }
    }

    /// Returns true if the ring lies in a single hemisphere.
    pub fn is_single_hemisphere(&self) -> bool {
        self.only_positive_lat || self.only_negative_lat
    }
}

/// Total number of exterior coordinates of all the polygons, closing points included.
pub fn compute_nb_points(geom: &Geom) -> usize {
    geom.polygons().map(|p| p.exterior().0.len()).sum()
}

/// Centroid `(lon, lat)` of the exterior vertices of the geometry.
///
/// Longitudes are averaged on the unit circle, so a footprint around the antimeridian gets a centroid near 180
/// rather than near 0. Latitudes are averaged arithmetically. Closing points are not counted twice.
pub fn compute_centroid(geom: &Geom) -> Result<(f64, f64)> {
    let (mut sin_sum, mut cos_sum, mut lat_sum) = (0.0, 0.0, 0.0);
    let mut count = 0usize;

    for c in geom.polygons().flat_map(distinct_exterior_coords) {
        let lon = c.x.to_radians();
        sin_sum += lon.sin();
        cos_sum += lon.cos();
        lat_sum += c.y;
        count += 1;
    }

    if count == 0 {
        return Err(Polar2Wgs84Error::InvalidInputGeometry(
            "cannot compute the centroid of an empty geometry".into(),
        ));
    }

    let lon = sin_sum.atan2(cos_sum).to_degrees();
    Ok((lon, lat_sum / count as f64))
}

/// Same as [`compute_centroid`] for an arbitrary geometry. Only polygons and multipolygons are supported.
pub fn compute_centroid_geometry(geometry: &Geometry<f64>) -> Result<(f64, f64)> {
    let geom = match geometry {
        Geometry::Polygon(p) => Geom::Polygon(p.clone()),
        Geometry::MultiPolygon(mp) => Geom::MultiPolygon(mp.clone()),
        other => {
            return Err(Polar2Wgs84Error::UnsupportedGeometryType(
                geometry_type_name(other).to_string(),
            ))
        }
    };

    compute_centroid(&geom)
}

fn distinct_exterior_coords(polygon: &Polygon<f64>) -> impl Iterator<Item = &Coord<f64>> {
    let coords = &polygon.exterior().0;
    let len = if polygon.exterior().is_closed() && coords.len() > 1 {
        coords.len() - 1
    } else {
        coords.len()
    };
    coords[..len].iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, polygon, MultiPolygon};

    fn square() -> Polygon<f64> {
        polygon![
            (x: -10.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 20.0),
            (x: -10.0, y: 20.0),
            (x: -10.0, y: 10.0),
        ]
    }

    fn dateline_square() -> Polygon<f64> {
        polygon![
            (x: 170.0, y: 10.0),
            (x: -170.0, y: 10.0),
            (x: -170.0, y: 20.0),
            (x: 170.0, y: 20.0),
            (x: 170.0, y: 10.0),
        ]
    }

    #[test]
    fn stats_of_ring() {
        let ring = line_string![
            (x: 0.0, y: 55.0),
            (x: 10.0, y: 61.0),
            (x: 20.0, y: 75.0),
            (x: 0.0, y: 55.0),
        ];
        let stats = Stats::from_ring(&ring);
        assert!(stats.only_positive_lat);
        assert!(!stats.only_negative_lat);
        assert!(stats.is_single_hemisphere());
        assert_eq!(stats.high_latitude_pos, 2);
        assert_eq!(stats.high_latitude_neg, 0);

        let mixed = line_string![(x: 0.0, y: -70.0), (x: 10.0, y: 0.0), (x: 0.0, y: -70.0)];
        let stats = Stats::from_ring(&mixed);
        assert!(!stats.is_single_hemisphere());
        assert_eq!(stats.high_latitude_neg, 2);
    }

    #[test]
    fn nb_points() {
        let geom = Geom::MultiPolygon(MultiPolygon::new(vec![square(), dateline_square()]));
        assert_eq!(compute_nb_points(&geom), 10);
    }

    #[test]
    fn centroid_of_square() {
        let (lon, lat) = compute_centroid(&Geom::Polygon(square())).expect("not empty");
        assert_abs_diff_eq!(lon, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, 15.0, epsilon = 1e-6);
    }

    #[test]
    fn centroid_over_dateline() {
        let (lon, lat) = compute_centroid(&Geom::Polygon(dateline_square())).expect("not empty");
        assert_abs_diff_eq!(lon.abs(), 180.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, 15.0, epsilon = 1e-6);
    }

    #[test]
    fn centroid_of_empty() {
        let empty = Geom::MultiPolygon(MultiPolygon::new(vec![]));
        assert_matches!(
            compute_centroid(&empty),
            Err(Polar2Wgs84Error::InvalidInputGeometry(_))
        );
    }

    #[test]
    fn centroid_of_point() {
        assert_matches!(
            compute_centroid_geometry(&Geometry::Point(point!(x: 0.0, y: 0.0))),
            Err(Polar2Wgs84Error::UnsupportedGeometryType(name)) if name == "Point"
        );
        assert!(compute_centroid_geometry(&Geometry::Polygon(square())).is_ok());
    }
}
