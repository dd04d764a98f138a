use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use geo_types::{coord, Coord};

use crate::angle::wrap_longitude;
use crate::projection::datum::Datum;
use crate::projection::traits::Projection;
use crate::projection::Hemisphere;

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE_EPSILON: f64 = 1e-12;

/// Ellipsoidal polar stereographic projection centered on one of the poles, with scale factor 1 at the pole and
/// the 180° meridian as the central meridian.
///
/// The pole projects to `(0, 0)`.
#[derive(Debug, Copy, Clone)]
pub struct PolarStereographic {
    hemisphere: Hemisphere,
    central_meridian: f64,
    eccentricity: f64,
    rho_factor: f64,
}

impl PolarStereographic {
    /// Creates a new projection around the pole of the given hemisphere.
    pub fn new(datum: Datum, hemisphere: Hemisphere) -> Self {
        let e = datum.eccentricity();
        let scale = 1.0;
        let rho_factor = 2.0 * datum.semimajor() * scale
            / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();

        Self {
            hemisphere,
            central_meridian: 180f64.to_radians(),
            eccentricity: e,
            rho_factor,
        }
    }

    /// Hemisphere of the projection pole.
    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    fn conformal_factor(&self, phi: f64) -> f64 {
        let e_sin = self.eccentricity * phi.sin();
        ((1.0 - e_sin) / (1.0 + e_sin)).powf(self.eccentricity / 2.0)
    }

    fn inverse_latitude(&self, t: f64) -> f64 {
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let next = FRAC_PI_2 - 2.0 * (t * self.conformal_factor(phi)).atan();
            let delta = (next - phi).abs();
            phi = next;
            if delta < CONVERGENCE_EPSILON {
                break;
            }
        }

        phi
    }
}

impl Projection for PolarStereographic {
    type InPoint = Coord<f64>;
    type OutPoint = Coord<f64>;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let (phi, sign) = match self.hemisphere {
            Hemisphere::North => (input.y.to_radians(), 1.0),
            Hemisphere::South => (-input.y.to_radians(), -1.0),
        };
        let dlon = input.x.to_radians() - self.central_meridian;

        let t = (FRAC_PI_4 - phi / 2.0).tan() / self.conformal_factor(phi);
        let rho = self.rho_factor * t;

        let x = rho * dlon.sin();
        let y = -sign * rho * dlon.cos();

        if x.is_finite() && y.is_finite() {
            Some(coord! { x: x, y: y })
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let rho = input.x.hypot(input.y);
        let t = rho / self.rho_factor;
        let phi = self.inverse_latitude(t);

        let (lat, dlon) = match self.hemisphere {
            Hemisphere::North => (phi, input.x.atan2(-input.y)),
            Hemisphere::South => (-phi, input.x.atan2(input.y)),
        };
        let lon = wrap_longitude((self.central_meridian + dlon).to_degrees());
        let lat = lat.to_degrees();

        if lon.is_finite() && lat.is_finite() {
            Some(coord! { x: lon, y: lat })
        } else {
            None
        }
    }
}
