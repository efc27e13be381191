/// Model transform: the ambient spin applied to the displayed solid
use nalgebra::{Matrix4, Vector3};

/// Default spin per frame about +Y, in radians
pub const DEFAULT_SPIN: f32 = 0.005;

/// Rotation of the displayed solid about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub angle: f32,
    pub per_frame: f32,
}

impl Spin {
    pub fn new(per_frame: f32) -> Self {
        Self {
            angle: 0.0,
            per_frame,
        }
    }

    /// Advance by one frame
    pub fn step(&mut self) {
        self.angle = (self.angle + self.per_frame) % std::f32::consts::TAU;
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, self.angle, 0.0))
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN)
    }
}
