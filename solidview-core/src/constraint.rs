/// Volume constraint solver
///
/// Inverts each volume formula for one designated free parameter: given the
/// target volume and the other (fixed) parameters, the largest value of the
/// free parameter whose volume stays within the target. The result is meant
/// as the upper end of the free control's range, never as a clamp.
use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::parse::ensure_positive;
use crate::shape::{Dimension, ShapeKind, ShapeParameters};

/// Upper range limit for one or more controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBound {
    pub controls: &'static [Dimension],
    pub max: f64,
}

/// Controls whose range follows the target volume for `kind`
pub fn free_controls(kind: ShapeKind) -> &'static [Dimension] {
    match kind {
        ShapeKind::Trapezoid => &[Dimension::SideA, Dimension::SideB],
        ShapeKind::Cuboid => &[Dimension::Width],
        ShapeKind::Cylinder | ShapeKind::Cone => &[Dimension::Radius],
    }
}

/// Whether a change to `dimension` moves the bound of `kind`'s free controls
pub fn is_fixed(kind: ShapeKind, dimension: Dimension) -> bool {
    kind.dimensions().contains(&dimension) && !free_controls(kind).contains(&dimension)
}

/// Largest side length for a trapezoid of the given height and length:
/// `2 * target / (height * length)`.
pub fn max_side(target: f64, height: f64, length: f64) -> Result<f64> {
    finite_bound(ShapeKind::Trapezoid, (2.0 * target) / (height * length))
}

/// Bound for the free control(s) of `params`' kind, holding every other field fixed
pub fn solve(target: f64, params: &ShapeParameters) -> Result<SliderBound> {
    let target = ensure_positive("targetVolume", target)?;
    let kind = params.kind();
    let max = match *params {
        ShapeParameters::Trapezoid { height, length, .. } => max_side(target, height, length)?,
        ShapeParameters::Cuboid { height, depth, .. } => {
            finite_bound(kind, target / (height * depth))?
        }
        ShapeParameters::Cylinder { height, .. } => {
            finite_bound(kind, (target / (PI * height)).sqrt())?
        }
        ShapeParameters::Cone { height, .. } => {
            finite_bound(kind, (3.0 * target / (PI * height)).sqrt())?
        }
    };
    Ok(SliderBound {
        controls: free_controls(kind),
        max,
    })
}

fn finite_bound(shape: ShapeKind, bound: f64) -> Result<f64> {
    if bound.is_finite() {
        Ok(bound)
    } else {
        Err(Error::DegenerateConstraint { shape })
    }
}
