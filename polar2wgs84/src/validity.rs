//! Planar validity check of polygons with a human-readable reason.
//!
//! A polygon is valid if every ring has at least four finite coordinates, no ring crosses or touches itself, the
//! rings do not cross each other and every hole lies inside the shell. Members of a multipolygon must not overlap
//! and may only touch at points.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo_types::{Coord, Line, LineString, Polygon};

use crate::geometry::Geom;

/// Returns the reason why the geometry is invalid, or `None` if it is valid.
pub fn explain_validity(geom: &Geom) -> Option<String> {
    let polygons: Vec<&Polygon<f64>> = geom.polygons().collect();
    for polygon in &polygons {
        if let Some(reason) = explain_polygon_validity(polygon) {
            return Some(reason);
        }
    }

    for (i, a) in polygons.iter().enumerate() {
        for b in &polygons[i + 1..] {
            if let Some(c) = rings_conflict(a.exterior(), b.exterior()) {
                return Some(located("Self-intersection", c));
            }
            if let Some(c) = first_inside(a.exterior(), b).or_else(|| first_inside(b.exterior(), a)) {
                return Some(located("Self-intersection", c));
            }
        }
    }

    None
}

/// Returns the reason why the polygon is invalid, or `None` if it is valid.
pub fn explain_polygon_validity(polygon: &Polygon<f64>) -> Option<String> {
    let rings: Vec<&LineString<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();

    for ring in &rings {
        if let Some(reason) = explain_ring_validity(ring) {
            return Some(reason);
        }
    }

    for (i, a) in rings.iter().enumerate() {
        for b in &rings[i + 1..] {
            if let Some(c) = rings_conflict(a, b) {
                return Some(located("Self-intersection", c));
            }
        }
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    for hole in polygon.interiors() {
        if let Some(c) = hole
            .coords()
            .find(|c| shell.coordinate_position(c) == CoordPos::Outside)
        {
            return Some(located("Hole lies outside shell", *c));
        }
    }

    for (i, hole) in polygon.interiors().iter().enumerate() {
        for (j, other) in polygon.interiors().iter().enumerate() {
            if i == j {
                continue;
            }
            let other = Polygon::new(other.clone(), vec![]);
            if let Some(c) = first_inside(hole, &other) {
                return Some(located("Holes are nested", c));
            }
        }
    }

    None
}

/// Returns true if the polygon is valid.
pub fn is_valid_polygon(polygon: &Polygon<f64>) -> bool {
    explain_polygon_validity(polygon).is_none()
}

fn explain_ring_validity(ring: &LineString<f64>) -> Option<String> {
    let Some(first) = ring.0.first() else {
        return Some("Empty ring".to_string());
    };

    if let Some(c) = ring.coords().find(|c| !(c.x.is_finite() && c.y.is_finite())) {
        return Some(located("Invalid Coordinate", *c));
    }

    if !ring.is_closed() {
        return Some(located("Ring is not closed", *first));
    }

    let mut coords = ring.0.clone();
    coords.dedup();
    if coords.len() < 4 {
        return Some(located("Too few points in geometry component", *first));
    }

    let segments: Vec<Line<f64>> = LineString::new(coords).lines().collect();
    let n = segments.len();
    for i in 0..n {
        for j in i + 1..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if !envelopes_overlap(&segments[i], &segments[j]) {
                continue;
            }

            let point = match line_intersection(segments[i], segments[j]) {
                Some(LineIntersection::Collinear { intersection }) if intersection.start != intersection.end => {
                    Some(intersection.start)
                }
                Some(_) if adjacent => None,
                Some(LineIntersection::SinglePoint { intersection, .. }) => Some(intersection),
                Some(LineIntersection::Collinear { intersection }) => Some(intersection.start),
                None => None,
            };

            if let Some(c) = point {
                return Some(located("Self-intersection", c));
            }
        }
    }

    None
}

/// First point where two rings cross or share a segment. Rings touching at single points do not conflict.
fn rings_conflict(a: &LineString<f64>, b: &LineString<f64>) -> Option<Coord<f64>> {
    for sa in a.lines() {
        for sb in b.lines() {
            if !envelopes_overlap(&sa, &sb) {
                continue;
            }

            match line_intersection(sa, sb) {
                Some(LineIntersection::SinglePoint {
                    intersection,
                    is_proper: true,
                }) => return Some(intersection),
                Some(LineIntersection::Collinear { intersection }) if intersection.start != intersection.end => {
                    return Some(intersection.start);
                }
                _ => {}
            }
        }
    }

    None
}

fn first_inside(ring: &LineString<f64>, polygon: &Polygon<f64>) -> Option<Coord<f64>> {
    ring.coords()
        .find(|c| polygon.coordinate_position(c) == CoordPos::Inside)
        .copied()
}

fn envelopes_overlap(a: &Line<f64>, b: &Line<f64>) -> bool {
    a.start.x.min(a.end.x) <= b.start.x.max(b.end.x)
        && b.start.x.min(b.end.x) <= a.start.x.max(a.end.x)
        && a.start.y.min(a.end.y) <= b.start.y.max(b.end.y)
        && b.start.y.min(b.end.y) <= a.start.y.max(a.end.y)
}

fn located(reason: &str, c: Coord<f64>) -> String {
    format!("{reason}[{} {}]", c.x, c.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    #[test]
    fn valid_polygon() {
        assert_eq!(explain_polygon_validity(&square(0.0, 0.0, 10.0)), None);

        let with_hole = Polygon::new(
            square(0.0, 0.0, 10.0).exterior().clone(),
            vec![square(2.0, 2.0, 2.0).exterior().clone()],
        );
        assert!(is_valid_polygon(&with_hole));
    }

    #[test]
    fn bowtie() {
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        assert!(explain_polygon_validity(&bowtie)
            .expect("invalid")
            .starts_with("Self-intersection"));
    }

    #[test]
    fn spike() {
        let spike = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 20.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
        ];
        assert!(!is_valid_polygon(&spike));
    }

    #[test]
    fn too_few_points() {
        let line = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)];
        assert!(explain_polygon_validity(&line)
            .expect("invalid")
            .starts_with("Too few points"));

        let duplicated = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert!(!is_valid_polygon(&duplicated));
    }

    #[test]
    fn invalid_coordinate() {
        let polygon = polygon![
            (x: 0.0, y: 0.0),
            (x: f64::INFINITY, y: 0.0),
            (x: 1.0, y: 1.0),
        ];
        assert!(explain_polygon_validity(&polygon)
            .expect("invalid")
            .starts_with("Invalid Coordinate"));
    }

    #[test]
    fn hole_outside_shell() {
        let polygon = Polygon::new(
            square(0.0, 0.0, 10.0).exterior().clone(),
            vec![square(20.0, 20.0, 2.0).exterior().clone()],
        );
        assert_eq!(
            explain_polygon_validity(&polygon).as_deref(),
            Some("Hole lies outside shell[20 20]")
        );
    }

    #[test]
    fn hole_crossing_shell() {
        let polygon = Polygon::new(
            square(0.0, 0.0, 10.0).exterior().clone(),
            vec![square(8.0, 2.0, 4.0).exterior().clone()],
        );
        assert!(explain_polygon_validity(&polygon)
            .expect("invalid")
            .starts_with("Self-intersection"));
    }

    #[test]
    fn multipolygon_members() {
        let disjoint = Geom::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 1.0),
            square(5.0, 5.0, 1.0),
        ]));
        assert_eq!(explain_validity(&disjoint), None);

        let corner = Geom::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 1.0),
            square(1.0, 1.0, 1.0),
        ]));
        assert_eq!(explain_validity(&corner), None);

        let overlapping = Geom::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 2.0),
            square(1.0, 1.0, 2.0),
        ]));
        assert!(explain_validity(&overlapping).is_some());

        let nested = Geom::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 10.0),
            square(2.0, 2.0, 1.0),
        ]));
        assert!(explain_validity(&nested).is_some());

        let shared_edge = Geom::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 1.0),
            square(1.0, 0.0, 1.0),
        ]));
        assert!(explain_validity(&shared_edge).is_some());
    }
}
