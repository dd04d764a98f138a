//! Polar2wgs84 repairs satellite footprints given in WGS84 longitude/latitude so that they stay valid under the
//! planar rules of GeoJSON, and reduces them to a bounded number of vertices while keeping their geodesic shape.
//!
//! A footprint is broken in lon/lat space when it goes around a pole, when it crosses the antimeridian or when it
//! spans both hemispheres and does both. [`Footprint::make_valid_geojson_geometry`] detects these cases and returns
//! a valid polygon or multipolygon. [`Footprint::to_wgs84_plate_carre`] densifies the footprint along great circles
//! and simplifies it in plate carrée.
//!
//! # Quick start
//!
//! ```
//! use geo_types::polygon;
//! use polar2wgs84::{check_polygon, Footprint, Geom, ProcessingOptions};
//!
//! let footprint = Footprint::new(polygon![
//!     (x: 170.0, y: 60.0),
//!     (x: 179.0, y: 60.0),
//!     (x: -170.0, y: 60.0),
//!     (x: -160.0, y: 70.0),
//!     (x: 150.0, y: 80.0),
//!     (x: 170.0, y: 60.0),
//! ])
//! .unwrap();
//!
//! let valid = footprint.make_valid_geojson_geometry().unwrap();
//! assert!(matches!(valid, Geom::MultiPolygon(_)));
//! assert!(check_polygon(&valid).is_valid);
//!
//! let simplified = footprint
//!     .to_wgs84_plate_carre(&valid, &ProcessingOptions::default())
//!     .unwrap();
//! println!("{}", simplified.to_geojson());
//! ```
//!
//! The crate emits log records through the [`log`] facade and never installs a logger.

pub mod angle;
pub mod antimeridian;
pub mod densify;
pub mod equator;
pub mod pole;
pub mod projection;
pub mod split;
pub mod stats;
pub mod validity;

mod error;
pub use error::*;

mod footprint;
pub use footprint::*;

mod geometry;
pub use geometry::*;

mod options;
pub use options::*;

pub use angle::LongitudeNormalize;
pub use densify::GeodesicDensifier;
pub use pole::Pole;
pub use stats::Stats;
