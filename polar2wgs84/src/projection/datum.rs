/// Reference ellipsoid used by the planar projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Semimajor axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening `1/f`.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Flattening `f`.
    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_flattening
    }

    /// First eccentricity `e = sqrt(2f - f^2)`.
    pub fn eccentricity(&self) -> f64 {
        let f = self.flattening();
        (2.0 * f - f * f).sqrt()
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_eccentricity() {
        assert_abs_diff_eq!(
            Datum::WGS84.eccentricity(),
            0.0818191908426,
            epsilon = 1e-12
        );
    }
}
