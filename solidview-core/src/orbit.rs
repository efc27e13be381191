/// Orbit camera controller: spherical camera state around the origin
use std::f64::consts::{FRAC_PI_4, PI};

use nalgebra::Point3;
use serde::Deserialize;

use crate::projection::CameraTransform;

/// Radians of orbit per pixel of pointer travel
pub const ROTATE_SPEED: f64 = 0.01;
/// Radius change per unit of wheel delta
pub const ZOOM_SPEED: f64 = 0.05;
pub const MIN_RADIUS: f64 = 5.0;
pub const MAX_RADIUS: f64 = 50.0;
/// Keeps the camera off the poles, where the up vector would flip
pub const POLE_MARGIN: f64 = 0.1;

/// Spherical camera position: `theta` wraps freely around Y, `phi` is
/// measured from +Y and stays within `[POLE_MARGIN, PI - POLE_MARGIN]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitCamera {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
}

impl OrbitCamera {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self {
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            theta,
            phi: clamp_phi(phi),
        }
    }

    /// Orbit state for a camera placed at `eye` looking at the origin
    pub fn looking_from(eye: Point3<f64>) -> Self {
        let radius = eye.coords.norm();
        let phi = (eye.y / radius).acos();
        let theta = eye.z.atan2(eye.x);
        Self::new(radius, theta, phi)
    }

    /// Apply a pointer drag of `(dx, dy)` pixels
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.theta -= dx * ROTATE_SPEED;
        let phi = self.phi + dy * ROTATE_SPEED;
        self.phi = clamp_phi(phi);
        if self.phi != phi {
            tracing::trace!(requested = phi, clamped = self.phi, "orbit held at pole margin");
        }
    }

    /// Apply a wheel delta; positive moves the camera away
    pub fn zoom(&mut self, delta: f64) {
        let radius = self.radius + delta * ZOOM_SPEED;
        self.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
        if self.radius != radius {
            tracing::trace!(requested = radius, clamped = self.radius, "zoom limit reached");
        }
    }

    pub fn to_cartesian(&self) -> Point3<f64> {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Point3::new(
            self.radius * sin_phi * cos_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * sin_theta,
        )
    }

    pub fn transform(&self) -> CameraTransform {
        CameraTransform::looking_at_origin(self.to_cartesian().cast::<f32>())
    }
}

fn clamp_phi(phi: f64) -> f64 {
    phi.clamp(POLE_MARGIN, PI - POLE_MARGIN)
}

impl Default for OrbitCamera {
    /// Equivalent to a camera parked at (15, 15, 15)
    fn default() -> Self {
        Self::new(15.0 * 3f64.sqrt(), FRAC_PI_4, (1.0 / 3f64.sqrt()).acos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_matches_fixed_viewpoint() {
        let eye = OrbitCamera::default().to_cartesian();
        assert_relative_eq!(eye, Point3::new(15.0, 15.0, 15.0), epsilon = 1e-9);
    }

    #[test]
    fn test_looking_from_round_trip() {
        let eye = Point3::new(3.0, -4.0, 12.0);
        let camera = OrbitCamera::looking_from(eye);
        assert_relative_eq!(camera.radius, 13.0, epsilon = 1e-12);
        assert_relative_eq!(camera.to_cartesian(), eye, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_moves_both_angles() {
        let mut camera = OrbitCamera::new(20.0, FRAC_PI_4, FRAC_PI_4);
        camera.rotate(10.0, 0.0);
        camera.rotate(0.0, 10.0);
        assert_relative_eq!(camera.theta, FRAC_PI_4 - 0.1, epsilon = 1e-12);
        assert_relative_eq!(camera.phi, FRAC_PI_4 + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_phi_never_crosses_poles() {
        let mut camera = OrbitCamera::default();
        let deltas = [500.0, -37.0, 9000.0, -12000.0, 3.5, -0.25, 400.0, -400.0];
        for (i, &dy) in deltas.iter().enumerate() {
            camera.rotate(dy * 0.5, dy);
            camera.zoom(dy);
            assert!(camera.phi >= POLE_MARGIN, "step {i}: phi {}", camera.phi);
            assert!(camera.phi <= PI - POLE_MARGIN, "step {i}: phi {}", camera.phi);
        }
    }

    #[test]
    fn test_theta_accumulates_without_wrapping() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 1.0);
        for _ in 0..1000 {
            camera.rotate(100.0, 0.0);
        }
        assert_relative_eq!(camera.theta, -1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::new(20.0, 0.0, 1.0);
        camera.zoom(100.0);
        assert_relative_eq!(camera.radius, 25.0);
        for _ in 0..20 {
            camera.zoom(100.0);
        }
        assert_eq!(camera.radius, MAX_RADIUS);
        camera.zoom(-10_000.0);
        assert_eq!(camera.radius, MIN_RADIUS);
    }

    #[test]
    fn test_transform_looks_at_origin() {
        let transform = OrbitCamera::default().transform();
        assert_eq!(transform.target, Point3::origin());
        assert_relative_eq!(transform.eye.x, 15.0, epsilon = 1e-4);
    }
}
