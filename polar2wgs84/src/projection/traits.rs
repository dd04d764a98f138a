/// Forward and inverse transformation of points between two coordinate systems.
pub trait Projection {
    /// Point type in the source coordinate system.
    type InPoint;
    /// Point type in the target coordinate system.
    type OutPoint;

    /// Transforms a point into the target coordinate system. Returns `None` if the result is not finite.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Transforms a point back into the source coordinate system.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
