//! Densification along great-circle arcs and vertex-count limiting.

use geo::{Simplify, SimplifyVwPreserve};
use geo_types::{coord, Coord, Geometry, LineString, Polygon};
use log::{debug, warn};
use nalgebra::Vector3;

use crate::error::{Polar2Wgs84Error, Result};
use crate::geometry::geometry_type_name;
use crate::options::{DensifyOptions, SimplifyOptions};
use crate::validity::is_valid_polygon;

const DEGENERATE_ANGLE: f64 = 1e-12;

/// Maximum number of steps a single arc is split into.
pub const MAX_SEGMENT_STEPS: usize = 1_000_000;

/// Inserts points along the great-circle arcs between consecutive ring vertices on a spherical planet.
#[derive(Debug, Default, Copy, Clone)]
pub struct GeodesicDensifier {
    options: DensifyOptions,
}

impl GeodesicDensifier {
    /// Creates a new densifier.
    pub fn new(options: DensifyOptions) -> Self {
        Self { options }
    }

    /// Densification parameters.
    pub fn options(&self) -> &DensifyOptions {
        &self.options
    }

    /// Points of the arc from `start` to `end`, both included, not farther apart than `max_step_km`.
    ///
    /// The end points are returned as given. If both are the same point of the sphere, like `(180, 90)` and
    /// `(-180, 90)`, no point is inserted; the result is only `start` when the coordinates are equal. A step that is
    /// not a positive number, or one so small that the arc would need more than [`MAX_SEGMENT_STEPS`] points, leaves
    /// the arc undensified.
    pub fn densify_segment(&self, start: Coord<f64>, end: Coord<f64>) -> Vec<Coord<f64>> {
        let u0 = to_unit(start);
        let u1 = to_unit(end);

        let theta = u0.dot(&u1).clamp(-1.0, 1.0).acos();
        if theta < DEGENERATE_ANGLE {
            return if start == end { vec![start] } else { vec![start, end] };
        }

        let steps = theta * self.options.radius_planet / self.options.max_step_km;
        if !(steps.is_finite() && steps > 0.0 && steps <= MAX_SEGMENT_STEPS as f64) {
            warn!(
                "Cannot densify segment with max_step_km = {} and radius_planet = {}",
                self.options.max_step_km, self.options.radius_planet
            );
            return vec![start, end];
        }

        let n = (steps.ceil() as usize).max(1);
        let sin_theta = theta.sin();

        (0..=n)
            .map(|i| match i {
                0 => start,
                i if i == n => end,
                i => {
                    let t = i as f64 / n as f64;
                    let u = (u0 * ((1.0 - t) * theta).sin() + u1 * (t * theta).sin()) / sin_theta;
                    from_unit(&u.normalize())
                }
            })
            .collect()
    }

    /// Densifies a ring. Unclosed rings are closed first.
    ///
    /// If all the coordinates of the ring are equal, the result is empty.
    pub fn densify_ring(&self, ring: &LineString<f64>) -> LineString<f64> {
        let mut coords = ring.0.clone();
        if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
            if first != last {
                debug!("Closing ring by duplicating first coordinate");
                coords.push(first);
            }
        }

        let mut densified: Vec<Coord<f64>> = coords
            .windows(2)
            .flat_map(|pair| {
                let mut segment = self.densify_segment(pair[0], pair[1]);
                segment.pop();
                segment
            })
            .collect();

        match densified.first().copied() {
            Some(first) => {
                densified.push(first);
                debug!("Closed densified ring with {} coordinates", densified.len());
            }
            None => warn!("Densified ring is empty, check input coordinates and parameters"),
        }

        LineString::new(densified)
    }

    /// Densifies the exterior and every hole of the polygon independently.
    pub fn densify_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        debug!(
            "Densifying polygon with max_step_km = {}, radius_planet = {}",
            self.options.max_step_km, self.options.radius_planet
        );

        let exterior = self.densify_ring(polygon.exterior());
        let interiors: Vec<_> = polygon
            .interiors()
            .iter()
            .map(|ring| self.densify_ring(ring))
            .collect();

        debug!(
            "Densified polygon: {} points exterior, {} holes",
            exterior.0.len(),
            interiors.len()
        );

        Polygon::new(exterior, interiors)
    }

    /// Densifies a geometry that must be a polygon with a non-empty exterior.
    pub fn densify(&self, geometry: &Geometry<f64>) -> Result<Polygon<f64>> {
        match geometry {
            Geometry::Polygon(polygon) if !polygon.exterior().0.is_empty() => Ok(self.densify_polygon(polygon)),
            Geometry::Polygon(_) => Err(Polar2Wgs84Error::InvalidInputGeometry(
                "polygon exterior is empty".to_string(),
            )),
            other => Err(Polar2Wgs84Error::InvalidInputGeometry(format!(
                "expected a Polygon, got '{}'",
                geometry_type_name(other)
            ))),
        }
    }
}

fn to_unit(c: Coord<f64>) -> Vector3<f64> {
    let (lon, lat) = (c.x.to_radians(), c.y.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn from_unit(u: &Vector3<f64>) -> Coord<f64> {
    coord! {
        x: u.y.atan2(u.x).to_degrees(),
        y: u.z.clamp(-1.0, 1.0).asin().to_degrees().clamp(-90.0, 90.0),
    }
}

/// Simplifies the polygon until its exterior has at most `max_points` coordinates.
///
/// Every attempt starts from the given polygon with a growing tolerance. If the tolerance exceeds
/// `tolerance_max` first, a warning is logged and the last attempt is returned.
pub fn limit_vertices(polygon: &Polygon<f64>, options: &SimplifyOptions) -> Polygon<f64> {
    debug!(
        "Limiting polygon vertices: max_points = {}, tolerance_start = {}, tolerance_max = {}",
        options.max_points, options.tolerance_start, options.tolerance_max
    );

    let mut tolerance = options.tolerance_start;
    let mut simplified = polygon.clone();

    while num_points(&simplified) > options.max_points {
        if tolerance > options.tolerance_max {
            warn!(
                "Reached maximum tolerance ({tolerance}) before achieving target vertices ({})",
                options.max_points
            );
            break;
        }

        simplified = simplify_preserving_topology(polygon, tolerance);
        debug!(
            "Simplified with tolerance {tolerance:.3}, points: {}",
            num_points(&simplified)
        );

        if !(options.tolerance_factor > 1.0) {
            warn!(
                "Tolerance factor {} does not grow the tolerance, stopping",
                options.tolerance_factor
            );
            break;
        }
        tolerance *= options.tolerance_factor;
    }

    debug!(
        "Final simplification: tolerance {tolerance:.3}, points {}",
        num_points(&simplified)
    );
    simplified
}

fn num_points(polygon: &Polygon<f64>) -> usize {
    polygon.exterior().0.len()
}

/// Douglas-Peucker simplification, falling back to topology-preserving Visvalingam-Whyatt if the result is not a
/// valid polygon.
fn simplify_preserving_topology(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    let simplified = polygon.simplify(&tolerance);
    if is_valid_polygon(&simplified) {
        return simplified;
    }

    debug!("Douglas-Peucker result is invalid, using topology-preserving Visvalingam-Whyatt");
    polygon.simplify_vw_preserve(&(tolerance * tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, polygon};

    fn densifier() -> GeodesicDensifier {
        GeodesicDensifier::new(DensifyOptions::default())
    }

    fn arc_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
        to_unit(a).dot(&to_unit(b)).clamp(-1.0, 1.0).acos() * 6371.0
    }

    #[test]
    fn degenerate_segment() {
        let c = coord! { x: 12.0, y: 34.0 };
        assert_eq!(densifier().densify_segment(c, c), vec![c]);
    }

    #[test]
    fn same_point_of_sphere_keeps_both_ends() {
        let start = coord! { x: 180.0, y: 90.0 };
        let end = coord! { x: -180.0, y: 90.0 };
        assert_eq!(densifier().densify_segment(start, end), vec![start, end]);

        let ring = line_string![
            (x: 170.0, y: 80.0),
            (x: 180.0, y: 80.0),
            (x: 180.0, y: 90.0),
            (x: -180.0, y: 90.0),
            (x: -180.0, y: 80.0),
            (x: 170.0, y: 80.0),
        ];
        let densified = densifier().densify_ring(&ring);
        assert!(densified.coords().any(|c| *c == start));
        assert!(densified.coords().any(|c| *c == end));
        assert!(densified.is_closed());
    }

    #[test]
    fn unusable_step_does_not_densify() {
        let start = coord! { x: 0.0, y: 0.0 };
        let end = coord! { x: 1.0, y: 0.0 };

        for max_step_km in [0.0, -5.0, f64::NAN, 1e-300] {
            let densifier = GeodesicDensifier::new(DensifyOptions {
                max_step_km,
                radius_planet: 6371.0,
            });
            assert_eq!(densifier.densify_segment(start, end), vec![start, end]);
        }

        let zero_radius = GeodesicDensifier::new(DensifyOptions {
            max_step_km: 5.0,
            radius_planet: 0.0,
        });
        assert_eq!(zero_radius.densify_segment(start, end), vec![start, end]);
    }

    #[test]
    fn segment_ends_are_exact() {
        let start = coord! { x: 180.0, y: 76.0 };
        let end = coord! { x: 180.0, y: 90.0 };
        let points = densifier().densify_segment(start, end);

        assert_eq!(points.first(), Some(&start));
        assert_eq!(points.last(), Some(&end));
        assert!(points
            .iter()
            .all(|c| (-180.0..=180.0).contains(&c.x) && (-90.0..=90.0).contains(&c.y)));
    }

    #[test]
    fn segment_steps() {
        let start = coord! { x: 0.0, y: 0.0 };
        let end = coord! { x: 1.0, y: 0.0 };
        let points = densifier().densify_segment(start, end);

        assert_eq!(points.len(), 24);
        assert_abs_diff_eq!(points[0].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[23].x, 1.0, epsilon = 1e-9);
        for pair in points.windows(2) {
            assert!(arc_km(pair[0], pair[1]) <= 5.0 + 1e-9);
            assert_abs_diff_eq!(pair[1].y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn segment_follows_great_circle() {
        let start = coord! { x: -90.0, y: 45.0 };
        let end = coord! { x: 90.0, y: 45.0 };
        let points = GeodesicDensifier::new(DensifyOptions {
            max_step_km: 510.0,
            radius_planet: 6371.0,
        })
        .densify_segment(start, end);

        assert_eq!(points.len(), 21);
        let highest = points.iter().map(|c| c.y).fold(f64::MIN, f64::max);
        assert_abs_diff_eq!(highest, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn ring_is_closed_and_dense() {
        let ring = line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let densified = densifier().densify_ring(&ring);

        assert!(densified.is_closed());
        assert!(densified.0.len() >= ring.0.len());
        for line in densified.lines() {
            assert!(arc_km(line.start, line.end) <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn unclosed_ring_is_closed() {
        let ring = line_string![(x: 0.0, y: 0.0), (x: 0.1, y: 0.0), (x: 0.1, y: 0.1)];
        let densified = densifier().densify_ring(&ring);

        assert!(densified.is_closed());
        assert!(densified.0.len() > ring.0.len());
    }

    #[test]
    fn degenerate_ring_is_empty() {
        let ring = line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0), (x: 5.0, y: 5.0)];
        assert!(densifier().densify_ring(&ring).0.is_empty());
    }

    #[test]
    fn holes_are_densified() {
        let polygon = Polygon::new(
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)],
            vec![line_string![
                (x: 0.2, y: 0.2),
                (x: 0.2, y: 0.8),
                (x: 0.8, y: 0.8),
                (x: 0.8, y: 0.2),
                (x: 0.2, y: 0.2),
            ]],
        );

        let densified = densifier().densify_polygon(&polygon);
        assert_eq!(densified.interiors().len(), 1);
        assert!(densified.interiors()[0].0.len() > 5);
        assert!(densified.interiors()[0].is_closed());
    }

    #[test]
    fn densify_rejects_non_polygons() {
        assert_matches!(
            densifier().densify(&Geometry::Point(point!(x: 1.0, y: 1.0))),
            Err(Polar2Wgs84Error::InvalidInputGeometry(_))
        );
        assert_matches!(
            densifier().densify(&Geometry::Polygon(Polygon::new(LineString::new(vec![]), vec![]))),
            Err(Polar2Wgs84Error::InvalidInputGeometry(_))
        );
        assert_matches!(
            densifier().densify(&Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)])),
            Ok(_)
        );
    }

    fn circle(radius: f64, n: usize) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                coord! { x: radius * a.cos(), y: radius * a.sin() }
            })
            .collect();
        Polygon::new(LineString::new(coords), vec![])
    }

    #[test]
    fn limit_vertices_reaches_target() {
        let polygon = circle(1_000_000.0, 200);
        let limited = limit_vertices(&polygon, &SimplifyOptions::default());

        assert!(limited.exterior().0.len() <= 20);
        assert!(limited.exterior().0.len() >= 4);
        assert!(is_valid_polygon(&limited));
    }

    #[test]
    fn limit_vertices_removes_collinear_points() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 50_000.0, y: 0.0),
            (x: 100_000.0, y: 0.0),
            (x: 100_000.0, y: 50_000.0),
            (x: 100_000.0, y: 100_000.0),
            (x: 50_000.0, y: 100_000.0),
            (x: 0.0, y: 100_000.0),
            (x: 0.0, y: 50_000.0),
        ];
        let limited = limit_vertices(
            &square,
            &SimplifyOptions {
                max_points: 5,
                ..Default::default()
            },
        );

        assert_eq!(limited.exterior().0.len(), 5);
    }

    #[test]
    fn limit_vertices_exhausted() {
        let polygon = circle(1_000_000.0, 50);
        let options = SimplifyOptions {
            max_points: 20,
            tolerance_start: 1000.0,
            tolerance_factor: 1.5,
            tolerance_max: 2000.0,
        };

        let limited = limit_vertices(&polygon, &options);
        assert_eq!(limited.exterior().0.len(), 51);
    }

    #[test]
    fn limit_vertices_keeps_small_polygons() {
        let polygon = circle(10.0, 8);
        assert_eq!(limit_vertices(&polygon, &SimplifyOptions::default()), polygon);
    }
}
