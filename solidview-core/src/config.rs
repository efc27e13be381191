/// Session configuration.
///
/// Every field has a default, so an empty TOML document is a valid config.
/// A partial document overrides only the tables and keys it names:
///
/// ```toml
/// shape = "cylinder"
/// target_volume = 250.0
///
/// [controls.radius]
/// value = 3.0
/// min = 0.5
/// max = 12.0
/// ```
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::orbit::OrbitCamera;
use crate::shape::{Dimension, ShapeKind, ShapeParameters};
use crate::transform::DEFAULT_SPIN;

/// Initial value and range of one labeled control.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ControlConfig {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 {
    0.1
}

impl ControlConfig {
    const fn new(value: f64, min: f64, max: f64) -> Self {
        Self {
            value,
            min,
            max,
            step: 0.1,
        }
    }
}

/// `[controls]`: one table per dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub height: ControlConfig,
    #[serde(rename = "sideA")]
    pub side_a: ControlConfig,
    #[serde(rename = "sideB")]
    pub side_b: ControlConfig,
    pub length: ControlConfig,
    pub width: ControlConfig,
    pub depth: ControlConfig,
    pub radius: ControlConfig,
}

impl ControlsConfig {
    pub fn get(&self, dimension: Dimension) -> &ControlConfig {
        match dimension {
            Dimension::Height => &self.height,
            Dimension::SideA => &self.side_a,
            Dimension::SideB => &self.side_b,
            Dimension::Length => &self.length,
            Dimension::Width => &self.width,
            Dimension::Depth => &self.depth,
            Dimension::Radius => &self.radius,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            height: ControlConfig::new(2.0, 0.5, 10.0),
            side_a: ControlConfig::new(4.0, 0.5, 20.0),
            side_b: ControlConfig::new(6.0, 0.5, 20.0),
            length: ControlConfig::new(5.0, 0.5, 10.0),
            width: ControlConfig::new(3.0, 0.5, 10.0),
            depth: ControlConfig::new(3.0, 0.5, 10.0),
            radius: ControlConfig::new(2.0, 0.5, 10.0),
        }
    }
}

/// Everything a session starts from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub shape: ShapeKind,
    pub target_volume: f64,
    /// Ambient rotation of the solid, radians per frame
    pub spin_per_frame: f32,
    pub camera: OrbitCamera,
    pub controls: ControlsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Trapezoid,
            target_volume: 100.0,
            spin_per_frame: DEFAULT_SPIN,
            camera: OrbitCamera::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: SessionConfig =
            toml::from_str(input).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_volume.is_finite() && self.target_volume > 0.0) {
            return Err(Error::Config(format!(
                "target_volume must be positive, got {}",
                self.target_volume
            )));
        }
        if !self.spin_per_frame.is_finite() {
            return Err(Error::Config("spin_per_frame must be finite".into()));
        }
        let camera = &self.camera;
        if ![camera.radius, camera.theta, camera.phi]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::Config("camera values must be finite".into()));
        }
        for dimension in Dimension::ALL {
            let control = self.controls.get(dimension);
            if !(control.min > 0.0 && control.min < control.max) {
                return Err(Error::Config(format!(
                    "{dimension}: range [{}, {}] must be positive and non-empty",
                    control.min, control.max
                )));
            }
            if !(control.min..=control.max).contains(&control.value) {
                return Err(Error::Config(format!(
                    "{dimension}: value {} outside [{}, {}]",
                    control.value, control.min, control.max
                )));
            }
            if !(control.step.is_finite() && control.step > 0.0) {
                return Err(Error::Config(format!("{dimension}: step must be positive")));
            }
        }
        Ok(())
    }

    /// Initial parameters for `kind`, taken from the control values
    pub fn parameters(&self, kind: ShapeKind) -> Result<ShapeParameters> {
        let value = |d: Dimension| self.controls.get(d).value;
        let params = match kind {
            ShapeKind::Trapezoid => ShapeParameters::Trapezoid {
                height: value(Dimension::Height),
                side_a: value(Dimension::SideA),
                side_b: value(Dimension::SideB),
                length: value(Dimension::Length),
            },
            ShapeKind::Cuboid => ShapeParameters::Cuboid {
                width: value(Dimension::Width),
                height: value(Dimension::Height),
                depth: value(Dimension::Depth),
            },
            ShapeKind::Cylinder => ShapeParameters::Cylinder {
                radius: value(Dimension::Radius),
                height: value(Dimension::Height),
            },
            ShapeKind::Cone => ShapeParameters::Cone {
                radius: value(Dimension::Radius),
                height: value(Dimension::Height),
            },
        };
        params.validate()?;
        Ok(params)
    }

    /// Orbit state with the radius and polar angle brought into range
    pub fn orbit(&self) -> OrbitCamera {
        OrbitCamera::new(self.camera.radius, self.camera.theta, self.camera.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.shape, ShapeKind::Trapezoid);
        assert_eq!(config.target_volume, 100.0);
    }

    #[test]
    fn test_partial_override() {
        let config = SessionConfig::from_toml_str(
            r#"
            shape = "cone"
            target_volume = 250.0

            [controls.radius]
            value = 3.0
            min = 0.5
            max = 12.0

            [camera]
            radius = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.shape, ShapeKind::Cone);
        assert_eq!(config.controls.radius.max, 12.0);
        assert_eq!(config.controls.radius.step, 0.1);
        assert_eq!(config.controls.height, ControlsConfig::default().height);
        assert_eq!(config.camera.radius, 30.0);
        assert_eq!(config.camera.theta, OrbitCamera::default().theta);
        assert_eq!(
            config.parameters(ShapeKind::Cone).unwrap(),
            ShapeParameters::Cone {
                radius: 3.0,
                height: 2.0
            }
        );
    }

    #[test]
    fn test_invalid_documents_rejected() {
        for doc in [
            "target_volume = -1.0",
            "shape = \"sphere\"",
            "[controls.height]\nvalue = 20.0\nmin = 1.0\nmax = 10.0",
            "[controls.width]\nvalue = 1.0\nmin = 0.0\nmax = 10.0",
            "[controls.depth]\nvalue = 1.0\nmin = 0.5\nmax = 10.0\nstep = 0.0",
        ] {
            let err = SessionConfig::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_orbit_is_clamped() {
        let config = SessionConfig::from_toml_str("[camera]\nradius = 500.0\nphi = 0.0").unwrap();
        let orbit = config.orbit();
        assert_eq!(orbit.radius, crate::orbit::MAX_RADIUS);
        assert_eq!(orbit.phi, crate::orbit::POLE_MARGIN);
    }

    #[test]
    fn test_every_kind_has_parameters() {
        let config = SessionConfig::default();
        for kind in ShapeKind::ALL {
            assert_eq!(config.parameters(kind).unwrap().kind(), kind);
        }
    }
}
