/// Shape kinds, their parameters, and the shape generator
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::parse::ensure_dimension;
use crate::primitives::{self, RADIAL_SEGMENTS};

/// The solid currently being explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Trapezoid,
    Cuboid,
    Cylinder,
    Cone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Trapezoid,
        ShapeKind::Cuboid,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Cuboid => "cuboid",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
        }
    }

    /// The parameters this kind owns, in display order
    pub fn dimensions(self) -> &'static [Dimension] {
        use Dimension::*;
        match self {
            ShapeKind::Trapezoid => &[Height, SideA, SideB, Length],
            ShapeKind::Cuboid => &[Width, Height, Depth],
            ShapeKind::Cylinder | ShapeKind::Cone => &[Radius, Height],
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("shape", s))
    }
}

/// A named shape parameter. Names match the input controls' identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Height,
    SideA,
    SideB,
    Length,
    Width,
    Depth,
    Radius,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Height,
        Dimension::SideA,
        Dimension::SideB,
        Dimension::Length,
        Dimension::Width,
        Dimension::Depth,
        Dimension::Radius,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Height => "height",
            Dimension::SideA => "sideA",
            Dimension::SideB => "sideB",
            Dimension::Length => "length",
            Dimension::Width => "width",
            Dimension::Depth => "depth",
            Dimension::Radius => "radius",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Height => "Height",
            Dimension::SideA => "Side A",
            Dimension::SideB => "Side B",
            Dimension::Length => "Length",
            Dimension::Width => "Width",
            Dimension::Depth => "Depth",
            Dimension::Radius => "Radius",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == s.trim())
            .ok_or_else(|| Error::invalid("dimension", s))
    }
}

/// Parameters of one solid. Each variant owns its own fields; all are > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParameters {
    Trapezoid {
        height: f64,
        side_a: f64,
        side_b: f64,
        length: f64,
    },
    Cuboid {
        width: f64,
        height: f64,
        depth: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Cone {
        radius: f64,
        height: f64,
    },
}

impl ShapeParameters {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParameters::Trapezoid { .. } => ShapeKind::Trapezoid,
            ShapeParameters::Cuboid { .. } => ShapeKind::Cuboid,
            ShapeParameters::Cylinder { .. } => ShapeKind::Cylinder,
            ShapeParameters::Cone { .. } => ShapeKind::Cone,
        }
    }

    /// Value of `dimension`, or `None` if this kind has no such field
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        use Dimension as D;
        match (*self, dimension) {
            (ShapeParameters::Trapezoid { height, .. }, D::Height)
            | (ShapeParameters::Cuboid { height, .. }, D::Height)
            | (ShapeParameters::Cylinder { height, .. }, D::Height)
            | (ShapeParameters::Cone { height, .. }, D::Height) => Some(height),
            (ShapeParameters::Trapezoid { side_a, .. }, D::SideA) => Some(side_a),
            (ShapeParameters::Trapezoid { side_b, .. }, D::SideB) => Some(side_b),
            (ShapeParameters::Trapezoid { length, .. }, D::Length) => Some(length),
            (ShapeParameters::Cuboid { width, .. }, D::Width) => Some(width),
            (ShapeParameters::Cuboid { depth, .. }, D::Depth) => Some(depth),
            (ShapeParameters::Cylinder { radius, .. }, D::Radius)
            | (ShapeParameters::Cone { radius, .. }, D::Radius) => Some(radius),
            _ => None,
        }
    }

    /// Copy of these parameters with `dimension` set to `value`
    pub fn with(&self, dimension: Dimension, value: f64) -> Result<Self> {
        let value = ensure_dimension(dimension.name(), value)?;
        let mut next = *self;
        let slot = match (&mut next, dimension) {
            (ShapeParameters::Trapezoid { height, .. }, Dimension::Height)
            | (ShapeParameters::Cuboid { height, .. }, Dimension::Height)
            | (ShapeParameters::Cylinder { height, .. }, Dimension::Height)
            | (ShapeParameters::Cone { height, .. }, Dimension::Height) => height,
            (ShapeParameters::Trapezoid { side_a, .. }, Dimension::SideA) => side_a,
            (ShapeParameters::Trapezoid { side_b, .. }, Dimension::SideB) => side_b,
            (ShapeParameters::Trapezoid { length, .. }, Dimension::Length) => length,
            (ShapeParameters::Cuboid { width, .. }, Dimension::Width) => width,
            (ShapeParameters::Cuboid { depth, .. }, Dimension::Depth) => depth,
            (ShapeParameters::Cylinder { radius, .. }, Dimension::Radius)
            | (ShapeParameters::Cone { radius, .. }, Dimension::Radius) => radius,
            _ => return Err(Error::invalid(dimension.name(), format!("not a {} field", self.kind()))),
        };
        *slot = value;
        Ok(next)
    }

    /// `(dimension, value)` pairs in display order
    pub fn values(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.kind()
            .dimensions()
            .iter()
            .filter_map(|&d| self.get(d).map(|v| (d, v)))
    }

    pub fn validate(&self) -> Result<()> {
        for (dimension, value) in self.values() {
            ensure_dimension(dimension.name(), value)?;
        }
        Ok(())
    }

    /// Closed-form volume of the ideal solid
    pub fn volume(&self) -> Result<f64> {
        self.validate()?;
        Ok(match *self {
            ShapeParameters::Trapezoid {
                height,
                side_a,
                side_b,
                length,
            } => ((side_a + side_b) / 2.0) * height * length,
            ShapeParameters::Cuboid {
                width,
                height,
                depth,
            } => width * height * depth,
            ShapeParameters::Cylinder { radius, height } => cylinder_volume(radius, height),
            ShapeParameters::Cone { radius, height } => cylinder_volume(radius, height) / 3.0,
        })
    }
}

fn cylinder_volume(radius: f64, height: f64) -> f64 {
    PI * radius.powi(2) * height
}

/// A generated solid: its tessellation and its exact volume
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub mesh: Mesh,
    pub volume: f64,
}

/// Build the mesh and volume for `params`.
///
/// Fails with [`Error::InvalidParameter`] if any field is not a positive number
/// representable as an `f32` mesh coordinate.
pub fn generate(params: &ShapeParameters) -> Result<Solid> {
    let volume = params.volume()?;
    let mesh = match *params {
        ShapeParameters::Trapezoid {
            height,
            side_a,
            side_b,
            length,
        } => primitives::trapezoid(height as f32, side_a as f32, side_b as f32, length as f32),
        ShapeParameters::Cuboid {
            width,
            height,
            depth,
        } => primitives::cuboid(width as f32, height as f32, depth as f32),
        ShapeParameters::Cylinder { radius, height } => {
            primitives::cylinder(radius as f32, height as f32, RADIAL_SEGMENTS)
        }
        ShapeParameters::Cone { radius, height } => {
            primitives::cone(radius as f32, height as f32, RADIAL_SEGMENTS)
        }
    };
    Ok(Solid { mesh, volume })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::enclosed_volume;
    use approx::assert_relative_eq;

    fn trapezoid(height: f64, side_a: f64, side_b: f64, length: f64) -> ShapeParameters {
        ShapeParameters::Trapezoid {
            height,
            side_a,
            side_b,
            length,
        }
    }

    #[test]
    fn test_trapezoid_volume_formula() {
        for &(h, a, b, l) in &[(2.0, 4.0, 6.0, 5.0), (0.3, 1.7, 9.1, 2.2), (10.0, 0.1, 0.1, 0.1)] {
            let solid = generate(&trapezoid(h, a, b, l)).unwrap();
            assert_eq!(solid.volume, ((a + b) / 2.0) * h * l);
        }
    }

    #[test]
    fn test_cylinder_and_cone_volumes() {
        for &(r, h) in &[(1.0, 1.0), (2.5, 3.0), (0.4, 7.5)] {
            let cylinder = generate(&ShapeParameters::Cylinder { radius: r, height: h }).unwrap();
            let cone = generate(&ShapeParameters::Cone { radius: r, height: h }).unwrap();
            assert_eq!(cylinder.volume, PI * r.powi(2) * h);
            assert_eq!(cone.volume, cylinder.volume / 3.0);
            assert_relative_eq!(cone.volume, (1.0 / 3.0) * PI * r * r * h, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_cuboid_volume() {
        let solid = generate(&ShapeParameters::Cuboid {
            width: 2.0,
            height: 3.0,
            depth: 4.0,
        })
        .unwrap();
        assert_eq!(solid.volume, 24.0);
        assert_relative_eq!(enclosed_volume(&solid.mesh), 24.0, epsilon = 1e-4);
    }

    #[test]
    fn test_every_kind_centered_on_height_axis() {
        let shapes = [
            trapezoid(2.0, 4.0, 6.0, 5.0),
            ShapeParameters::Cuboid {
                width: 2.0,
                height: 3.0,
                depth: 4.0,
            },
            ShapeParameters::Cylinder {
                radius: 1.0,
                height: 5.0,
            },
            ShapeParameters::Cone {
                radius: 1.0,
                height: 5.0,
            },
        ];
        for params in shapes {
            let bounds = generate(&params).unwrap().mesh.bounds().unwrap();
            let height = params.get(Dimension::Height).unwrap() as f32;
            assert_relative_eq!(bounds.min.y, -height / 2.0, epsilon = 1e-5);
            assert_relative_eq!(bounds.max.y, height / 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let params = trapezoid(3.0, 2.0, 8.0, 4.0);
        let first = generate(&params).unwrap();
        let second = generate(&params).unwrap();
        assert_eq!(first.volume, second.volume);
        assert_eq!(first.mesh.bounds(), second.mesh.bounds());
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_positive_parameter_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = generate(&trapezoid(2.0, bad, 6.0, 5.0)).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "sideA"));
        }
    }

    #[test]
    fn test_parameter_outside_mesh_range_rejected() {
        // would collapse to zero or overflow to infinity as f32
        for bad in [1e-200, 1e300] {
            let err = generate(&trapezoid(bad, 4.0, 6.0, 5.0)).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "height"));
        }
        let params = trapezoid(2.0, 4.0, 6.0, 5.0);
        assert!(params.with(Dimension::Height, 1e-200).is_err());
        assert!(params.with(Dimension::Height, 1e-30).is_ok());
    }

    #[test]
    fn test_with_updates_one_field() {
        let params = trapezoid(2.0, 4.0, 6.0, 5.0);
        let next = params.with(Dimension::Length, 7.5).unwrap();
        assert_eq!(next.get(Dimension::Length), Some(7.5));
        assert_eq!(next.get(Dimension::Height), Some(2.0));
        assert_eq!(params.get(Dimension::Length), Some(5.0));
    }

    #[test]
    fn test_with_rejects_foreign_dimension_and_bad_values() {
        let params = ShapeParameters::Cylinder {
            radius: 1.0,
            height: 2.0,
        };
        assert!(params.with(Dimension::SideA, 3.0).is_err());
        assert!(params.with(Dimension::Radius, 0.0).is_err());
        assert_eq!(params.get(Dimension::Width), None);
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        for dimension in Dimension::ALL {
            assert_eq!(dimension.name().parse::<Dimension>().unwrap(), dimension);
        }
        assert_eq!("Cone".parse::<ShapeKind>().unwrap(), ShapeKind::Cone);
        assert!("sphere".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_values_follow_display_order() {
        let params = ShapeParameters::Cuboid {
            width: 1.0,
            height: 2.0,
            depth: 3.0,
        };
        let dims: Vec<Dimension> = params.values().map(|(d, _)| d).collect();
        assert_eq!(dims, vec![Dimension::Width, Dimension::Height, Dimension::Depth]);
    }
}
