//! Splitting of polygons crossing the antimeridian.

use geo::orient::{Direction, Orient};
use geo_types::{LineString, Polygon};
use log::{debug, info};

use crate::angle::{LongitudeNormalize, ANTIMERIDIAN_LONGITUDE};
use crate::geometry::Geom;
use crate::split::split_at_meridian;

/// Returns true if two consecutive points of the ring are more than 180 degrees of longitude apart.
///
/// Footprint edges are assumed to be shorter than half the globe, so such a jump means the edge goes over the
/// dateline.
pub fn crosses_antimeridian(ring: &LineString<f64>) -> bool {
    let crosses = ring
        .lines()
        .any(|line| (line.end.x - line.start.x).abs() > ANTIMERIDIAN_LONGITUDE);
    debug!("Ring crosses the antimeridian: {crosses}");
    crosses
}

/// Returns true if any exterior longitude is greater than 180.
pub fn contains_lon_gt_180(polygon: &Polygon<f64>) -> bool {
    polygon
        .exterior()
        .coords()
        .any(|c| c.x > ANTIMERIDIAN_LONGITUDE)
}

/// Splits the polygon along the antimeridian if its exterior crosses it.
///
/// The polygon is moved into `[0, 360]` space, cut at `x = 180` and every part is moved back into `[-180, 180]`.
/// A part lying east of the cut keeps its dateline edge at -180, a part west of it keeps it at 180.
pub fn make_valid_geojson_geometry(polygon: &Polygon<f64>) -> Geom {
    if !crosses_antimeridian(polygon.exterior()) {
        info!("Geometry does not cross the antimeridian");
        return Geom::Polygon(polygon.clone());
    }

    info!("Splitting geometry along the antimeridian");
    let parts = split_at_meridian(&polygon.to_lon_360(), ANTIMERIDIAN_LONGITUDE)
        .into_iter()
        .map(|part| {
            let is_360_space = contains_lon_gt_180(&part);
            part.to_lon_180(is_360_space).orient(Direction::Default)
        })
        .collect();

    Geom::from_parts(parts)
}
