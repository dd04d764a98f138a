//! Polygonal geometries accepted and produced by the crate.
//!
//! GeoJSON only lets a footprint be a `Polygon` or a `MultiPolygon`, so the public API works with the [`Geom`] enum
//! instead of the open [`geo_types::Geometry`].

use geo_types::{Geometry, MultiPolygon, Polygon};

use crate::error::{Polar2Wgs84Error, Result};

/// Polygon or multipolygon in lon/lat (or projected) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    /// Single polygon.
    Polygon(Polygon<f64>),
    /// Several disjoint polygons.
    MultiPolygon(MultiPolygon<f64>),
}

impl Geom {
    /// Builds a geometry from a list of parts: a polygon if there is exactly one part, a multipolygon otherwise.
    pub fn from_parts(mut parts: Vec<Polygon<f64>>) -> Self {
        if parts.len() == 1 {
            if let Some(polygon) = parts.pop() {
                return Geom::Polygon(polygon);
            }
        }

        Geom::MultiPolygon(MultiPolygon::new(parts))
    }

    /// Iterates over the simple polygons of the geometry.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        let parts: &[Polygon<f64>] = match self {
            Geom::Polygon(polygon) => std::slice::from_ref(polygon),
            Geom::MultiPolygon(mp) => &mp.0,
        };
        parts.iter()
    }

    /// Consumes the geometry returning its simple polygons.
    pub fn into_polygons(self) -> Vec<Polygon<f64>> {
        match self {
            Geom::Polygon(polygon) => vec![polygon],
            Geom::MultiPolygon(mp) => mp.0,
        }
    }

    /// Applies `f` to every member polygon, keeping the geometry kind.
    pub fn try_map_polygons<F>(&self, f: F) -> Result<Geom>
    where
        F: Fn(&Polygon<f64>) -> Result<Polygon<f64>>,
    {
        Ok(match self {
            Geom::Polygon(polygon) => Geom::Polygon(f(polygon)?),
            Geom::MultiPolygon(mp) => Geom::MultiPolygon(MultiPolygon::new(
                mp.0.iter().map(f).collect::<Result<Vec<_>>>()?,
            )),
        })
    }

    /// Name of the geometry type as used by GeoJSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geom::Polygon(_) => "Polygon",
            Geom::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Converts the geometry into a GeoJSON geometry object.
    pub fn to_geojson(&self) -> geojson::Geometry {
        let value = match self {
            Geom::Polygon(polygon) => geojson::Value::from(polygon),
            Geom::MultiPolygon(mp) => geojson::Value::from(mp),
        };
        geojson::Geometry::new(value)
    }
}

impl From<Polygon<f64>> for Geom {
    fn from(value: Polygon<f64>) -> Self {
        Geom::Polygon(value)
    }
}

impl From<MultiPolygon<f64>> for Geom {
    fn from(value: MultiPolygon<f64>) -> Self {
        Geom::MultiPolygon(value)
    }
}

impl From<Geom> for Geometry<f64> {
    fn from(value: Geom) -> Self {
        match value {
            Geom::Polygon(polygon) => Geometry::Polygon(polygon),
            Geom::MultiPolygon(mp) => Geometry::MultiPolygon(mp),
        }
    }
}

impl TryFrom<Geometry<f64>> for Geom {
    type Error = Polar2Wgs84Error;

    fn try_from(value: Geometry<f64>) -> Result<Self> {
        match value {
            Geometry::Polygon(polygon) => Ok(Geom::Polygon(polygon)),
            Geometry::MultiPolygon(mp) => Ok(Geom::MultiPolygon(mp)),
            other => Err(Polar2Wgs84Error::UnsupportedGeometryType(
                geometry_type_name(&other).to_string(),
            )),
        }
    }
}

impl TryFrom<geojson::Geometry> for Geom {
    type Error = Polar2Wgs84Error;

    fn try_from(value: geojson::Geometry) -> Result<Self> {
        let geometry: Geometry<f64> = value.try_into()?;
        geometry.try_into()
    }
}

pub(crate) fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
