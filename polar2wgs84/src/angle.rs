//! Longitude normalization between the `[-180, 180]` and `[0, 360]` representations.
//!
//! Dateline handling works in the `[0, 360]` space where the antimeridian becomes an ordinary vertical line at
//! `x = 180`, and converts back to `[-180, 180]` afterwards.

use geo::MapCoords;
use geo_types::{coord, Coord, LineString};

/// Longitude of the antimeridian in `[0, 360]` space and of the eastern edge in `[-180, 180]` space.
pub const ANTIMERIDIAN_LONGITUDE: f64 = 180.0;

/// Conversion of all the longitudes of a geometry between the two representations.
///
/// Both conversions are coordinate-wise: latitudes, vertex count and vertex order are preserved.
pub trait LongitudeNormalize {
    /// Shifts every negative longitude by `+360`, moving the geometry into `[0, 360]` space.
    fn to_lon_360(&self) -> Self;

    /// Moves the geometry back into `[-180, 180]` space.
    ///
    /// Longitudes greater than 180 are shifted by `-360`. If `is_360_space` is set, a longitude of exactly 180 is
    /// considered to be already past the dateline and is shifted to -180 as well.
    fn to_lon_180(&self, is_360_space: bool) -> Self;

    /// Wraps every longitude into `[-180, 180]`, whatever number of turns it is away from that range.
    ///
    /// Longitudes already in the range, including both ends, are kept as they are.
    fn wrap_lon_180(&self) -> Self;
}

impl<G> LongitudeNormalize for G
where
    G: MapCoords<f64, f64, Output = G>,
{
    fn to_lon_360(&self) -> Self {
        self.map_coords(|c| coord! { x: lon_to_360(c.x), y: c.y })
    }

    fn to_lon_180(&self, is_360_space: bool) -> Self {
        self.map_coords(move |c| coord! { x: lon_to_180(c.x, is_360_space), y: c.y })
    }

    fn wrap_lon_180(&self) -> Self {
        self.map_coords(|c| coord! { x: wrap_longitude(c.x), y: c.y })
    }
}

fn lon_to_360(lon: f64) -> f64 {
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

fn lon_to_180(lon: f64, is_360_space: bool) -> f64 {
    let past_dateline = if is_360_space {
        lon >= ANTIMERIDIAN_LONGITUDE
    } else {
        lon > ANTIMERIDIAN_LONGITUDE
    };

    if past_dateline {
        lon - 360.0
    } else {
        lon
    }
}

/// Wraps a longitude into `[-180, 180]`. Values inside the range are returned unchanged.
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-ANTIMERIDIAN_LONGITUDE..=ANTIMERIDIAN_LONGITUDE).contains(&lon) {
        lon
    } else {
        (lon + ANTIMERIDIAN_LONGITUDE).rem_euclid(360.0) - ANTIMERIDIAN_LONGITUDE
    }
}

/// Sorts the points of a ring by increasing longitude.
///
/// The closing point of a closed ring is dropped before sorting. A point at longitude 180 with the latitude of the
/// westernmost point is appended to the result; it is the junction with the polar cap when a pole-enclosing ring
/// is rebuilt, so this is not a general-purpose ring operation.
pub fn reorganize_longitudes(line: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut coords = line.0.clone();
    if line.is_closed() && coords.len() > 1 {
        coords.pop();
    }

    coords.sort_by(|a, b| a.x.total_cmp(&b.x));

    if let Some(first) = coords.first().copied() {
        coords.push(coord! { x: ANTIMERIDIAN_LONGITUDE, y: first.y });
    }

    coords
}
