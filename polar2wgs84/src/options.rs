//! Parameters of the densify and simplify pipeline.
//!
//! Every field is optional when deserializing, and the nested structs are flattened, so a configuration is a
//! single JSON object like `{"max_step_km": 2.0, "max_points": 50}`.

use serde::{Deserialize, Serialize};

use crate::error::{Polar2Wgs84Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Parameters of the geodesic densification.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct DensifyOptions {
    /// Maximum great-circle distance between two consecutive points, in kilometres.
    #[serde(default = "default_max_step_km")]
    pub max_step_km: f64,
    /// Radius of the sphere, in kilometres.
    #[serde(default = "default_radius_planet")]
    pub radius_planet: f64,
}

fn default_max_step_km() -> f64 {
    5.0
}

fn default_radius_planet() -> f64 {
    EARTH_RADIUS_KM
}

impl Default for DensifyOptions {
    fn default() -> Self {
        Self {
            max_step_km: default_max_step_km(),
            radius_planet: default_radius_planet(),
        }
    }
}

/// Tolerance ladder of the vertex limiter.
///
/// Tolerances are in the units of the planar system the polygon is simplified in (metres for plate carrée).
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifyOptions {
    /// Maximum number of exterior ring coordinates, closing point included.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    /// First tolerance tried.
    #[serde(default = "default_tolerance_start")]
    pub tolerance_start: f64,
    /// Factor applied to the tolerance after every unsuccessful attempt.
    #[serde(default = "default_tolerance_factor")]
    pub tolerance_factor: f64,
    /// The ladder stops once the tolerance exceeds this value.
    #[serde(default = "default_tolerance_max")]
    pub tolerance_max: f64,
}

fn default_max_points() -> usize {
    20
}

fn default_tolerance_start() -> f64 {
    1000.0
}

fn default_tolerance_factor() -> f64 {
    1.5
}

fn default_tolerance_max() -> f64 {
    50000.0
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_points: default_max_points(),
            tolerance_start: default_tolerance_start(),
            tolerance_factor: default_tolerance_factor(),
            tolerance_max: default_tolerance_max(),
        }
    }
}

/// All the parameters of [`Footprint::to_wgs84_plate_carre`](crate::Footprint::to_wgs84_plate_carre).
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingOptions {
    /// Densification parameters.
    #[serde(flatten)]
    pub densify: DensifyOptions,
    /// Simplification parameters.
    #[serde(flatten)]
    pub simplify: SimplifyOptions,
}

impl ProcessingOptions {
    /// Returns options with the given densification step.
    pub fn with_max_step_km(&self, max_step_km: f64) -> Self {
        Self {
            densify: DensifyOptions {
                max_step_km,
                ..self.densify
            },
            ..*self
        }
    }

    /// Returns options with the given sphere radius.
    pub fn with_radius_planet(&self, radius_planet: f64) -> Self {
        Self {
            densify: DensifyOptions {
                radius_planet,
                ..self.densify
            },
            ..*self
        }
    }

    /// Returns options with the given vertex cap.
    pub fn with_max_points(&self, max_points: usize) -> Self {
        Self {
            simplify: SimplifyOptions {
                max_points,
                ..self.simplify
            },
            ..*self
        }
    }

    /// Returns options with the given starting tolerance.
    pub fn with_tolerance_start(&self, tolerance_start: f64) -> Self {
        Self {
            simplify: SimplifyOptions {
                tolerance_start,
                ..self.simplify
            },
            ..*self
        }
    }

    /// Returns options with the given tolerance factor.
    pub fn with_tolerance_factor(&self, tolerance_factor: f64) -> Self {
        Self {
            simplify: SimplifyOptions {
                tolerance_factor,
                ..self.simplify
            },
            ..*self
        }
    }

    /// Returns options with the given maximum tolerance.
    pub fn with_tolerance_max(&self, tolerance_max: f64) -> Self {
        Self {
            simplify: SimplifyOptions {
                tolerance_max,
                ..self.simplify
            },
            ..*self
        }
    }

    /// Checks that all the values are in their valid range.
    pub fn validate(&self) -> Result<()> {
        self.densify.validate()?;
        self.simplify.validate()
    }
}

impl DensifyOptions {
    /// Checks that the step and the radius are positive.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("max_step_km", self.max_step_km)?;
        ensure_positive("radius_planet", self.radius_planet)
    }
}

impl SimplifyOptions {
    /// Checks that the ladder is increasing and terminates.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("tolerance_start", self.tolerance_start)?;
        ensure_positive("tolerance_max", self.tolerance_max)?;

        if !(self.tolerance_factor > 1.0 && self.tolerance_factor.is_finite()) {
            return Err(Polar2Wgs84Error::InvalidOptions(format!(
                "tolerance_factor must be greater than 1, got {}",
                self.tolerance_factor
            )));
        }

        Ok(())
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Polar2Wgs84Error::InvalidOptions(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults() {
        let options = ProcessingOptions::default();
        assert_eq!(options.densify.max_step_km, 5.0);
        assert_eq!(options.densify.radius_planet, 6371.0);
        assert_eq!(options.simplify.max_points, 20);
        assert_eq!(options.simplify.tolerance_start, 1000.0);
        assert_eq!(options.simplify.tolerance_factor, 1.5);
        assert_eq!(options.simplify.tolerance_max, 50000.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn deserialize_partial() {
        let options: ProcessingOptions =
            serde_json::from_str(r#"{"max_step_km": 2.5, "max_points": 60}"#).expect("valid json");

        assert_eq!(options.densify.max_step_km, 2.5);
        assert_eq!(options.densify.radius_planet, 6371.0);
        assert_eq!(options.simplify.max_points, 60);
        assert_eq!(options.simplify.tolerance_factor, 1.5);
    }

    #[test]
    fn deserialize_empty() {
        let options: ProcessingOptions = serde_json::from_str("{}").expect("valid json");
        assert_eq!(options, ProcessingOptions::default());
    }

    #[test]
    fn serialize_flat() {
        let value = serde_json::to_value(ProcessingOptions::default()).expect("serializable");
        assert_eq!(value["max_step_km"], 5.0);
        assert_eq!(value["tolerance_max"], 50000.0);
    }

    #[test]
    fn setters() {
        let options = ProcessingOptions::default()
            .with_max_step_km(1.0)
            .with_max_points(100)
            .with_tolerance_start(10.0);

        assert_eq!(options.densify.max_step_km, 1.0);
        assert_eq!(options.simplify.max_points, 100);
        assert_eq!(options.simplify.tolerance_start, 10.0);
        assert_eq!(options.simplify.tolerance_max, 50000.0);
    }

    #[test]
    fn invalid_values() {
        assert_matches!(
            ProcessingOptions::default().with_tolerance_factor(1.0).validate(),
            Err(Polar2Wgs84Error::InvalidOptions(_))
        );
        assert_matches!(
            ProcessingOptions::default().with_max_step_km(0.0).validate(),
            Err(Polar2Wgs84Error::InvalidOptions(_))
        );
        assert_matches!(
            ProcessingOptions::default().with_radius_planet(f64::NAN).validate(),
            Err(Polar2Wgs84Error::InvalidOptions(_))
        );
    }
}
