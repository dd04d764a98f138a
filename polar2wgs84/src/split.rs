//! Planar splitting of polygons along a meridian or a parallel.
//!
//! Splitting is done by clipping the polygon with the two half-planes on both sides of the line. Clipping may
//! shift the points created on the line by a rounding error, so coordinates closer to the line than
//! [`SNAP_TOLERANCE`] are moved onto it.

use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, BooleanOps, BoundingRect, MapCoords, RemoveRepeatedPoints};
use geo_types::{coord, Coord, Line, LineString, Polygon, Rect};
use log::debug;

/// Distance in degrees under which a coordinate is considered to lie on the split line.
pub const SNAP_TOLERANCE: f64 = 1e-6;

const MARGIN: f64 = 1.0;

/// Splits the polygon along the meridian `x = lon`. Parts west of the line come first.
///
/// A polygon that does not extend on both sides of the line is returned as the only part.
pub fn split_at_meridian(polygon: &Polygon<f64>, lon: f64) -> Vec<Polygon<f64>> {
    let Some(bbox) = polygon.bounding_rect() else {
        return vec![];
    };
    let (min, max) = (bbox.min(), bbox.max());
    if min.x >= lon || max.x <= lon {
        return vec![polygon.clone()];
    }

    let west = Rect::new(
        coord! { x: min.x - MARGIN, y: min.y - MARGIN },
        coord! { x: lon, y: max.y + MARGIN },
    );
    let east = Rect::new(
        coord! { x: lon, y: min.y - MARGIN },
        coord! { x: max.x + MARGIN, y: max.y + MARGIN },
    );

    let parts = clip(polygon, &[west, east], move |c| snap_x(c, lon));
    debug!("Split polygon at meridian {lon} into {} parts", parts.len());
    parts
}

/// Splits the polygon along the parallel `y = lat`. Parts south of the line come first.
///
/// A polygon that does not extend on both sides of the line is returned as the only part.
pub fn split_at_parallel(polygon: &Polygon<f64>, lat: f64) -> Vec<Polygon<f64>> {
    let Some(bbox) = polygon.bounding_rect() else {
        return vec![];
    };
    let (min, max) = (bbox.min(), bbox.max());
    if min.y >= lat || max.y <= lat {
        return vec![polygon.clone()];
    }

    let south = Rect::new(
        coord! { x: min.x - MARGIN, y: min.y - MARGIN },
        coord! { x: max.x + MARGIN, y: lat },
    );
    let north = Rect::new(
        coord! { x: min.x - MARGIN, y: lat },
        coord! { x: max.x + MARGIN, y: max.y + MARGIN },
    );

    let parts = clip(polygon, &[south, north], move |c| snap_y(c, lat));
    debug!("Split polygon at parallel {lat} into {} parts", parts.len());
    parts
}

/// Points where the line crosses or touches the meridian `x = lon`, in the order they are met along the line.
///
/// Repeated consecutive points, like a vertex lying on the meridian, are reported once. Segments spanning more
/// than 180 degrees of longitude are wrap-arounds of the `[0, 360]` space and are skipped.
pub fn meridian_intersections(line: &LineString<f64>, lon: f64) -> Vec<Coord<f64>> {
    let meridian = Line::new(coord! { x: lon, y: -90.0 }, coord! { x: lon, y: 90.0 });

    let mut points: Vec<Coord<f64>> = Vec::new();
    for segment in line.lines().filter(|s| s.dx().abs() <= 180.0) {
        match line_intersection(segment, meridian) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => points.push(intersection),
            Some(LineIntersection::Collinear { intersection }) => {
                points.push(intersection.start);
                points.push(intersection.end);
            }
            None => {}
        }
    }

    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    points
}

fn clip<F>(polygon: &Polygon<f64>, windows: &[Rect<f64>], snap: F) -> Vec<Polygon<f64>>
where
    F: Fn(Coord<f64>) -> Coord<f64> + Copy,
{
    windows
        .iter()
        .flat_map(|window| polygon.intersection(&window.to_polygon()))
        .map(|part| part.map_coords(snap).remove_repeated_points())
        .filter(|part| part.exterior().0.len() >= 4 && part.unsigned_area() > 0.0)
        .collect()
}

fn snap_x(c: Coord<f64>, lon: f64) -> Coord<f64> {
    if (c.x - lon).abs() < SNAP_TOLERANCE {
        coord! { x: lon, y: c.y }
    } else {
        c
    }
}

fn snap_y(c: Coord<f64>, lat: f64) -> Coord<f64> {
    if (c.y - lat).abs() < SNAP_TOLERANCE {
        coord! { x: c.x, y: lat }
    } else {
        c
    }
}

/// Snaps coordinates closer than [`SNAP_TOLERANCE`] to one of the given meridians onto it.
pub(crate) fn snap_to_meridians(polygon: &Polygon<f64>, meridians: &[f64]) -> Polygon<f64> {
    polygon.map_coords(|c| meridians.iter().fold(c, |c, lon| snap_x(c, *lon)))
}
