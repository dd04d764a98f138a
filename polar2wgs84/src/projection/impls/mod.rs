//! Implementations of the fixed projections used by the crate.
mod plate_carree;
mod polar_stereographic;

pub use plate_carree::PlateCarree;
pub use polar_stereographic::PolarStereographic;
