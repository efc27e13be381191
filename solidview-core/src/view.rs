/// View coordinator and the collaborator traits it drives.
///
/// The coordinator owns the live solid and the renderer's handle for it.
/// It pushes results outward: meshes and camera transforms go to the
/// [`Renderer`], formatted values go to the [`Readout`].
use nalgebra::Matrix4;

use crate::geometry::Mesh;
use crate::projection::CameraTransform;
use crate::shape::{Dimension, ShapeParameters, Solid};
use crate::transform::Spin;

/// Surface appearance of the solid. Fixed; not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub double_sided: bool,
    pub shininess: f32,
}

pub const SOLID_MATERIAL: Material = Material {
    color: 0x3498db,
    opacity: 0.8,
    double_sided: true,
    shininess: 30.0,
};

/// Rendering backend
pub trait Renderer {
    /// Backend-side resources for one uploaded mesh
    type MeshHandle;

    fn upload(&mut self, mesh: &Mesh, material: &Material) -> Self::MeshHandle;
    fn release(&mut self, handle: Self::MeshHandle);
    fn set_camera(&mut self, camera: &CameraTransform);
    /// Draw one frame of `mesh` under `model`
    fn draw(&mut self, mesh: &Self::MeshHandle, model: &Matrix4<f32>);
    fn resize(&mut self, width: u32, height: u32);
}

/// Whether the current volume is over the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStatus {
    WithinTarget,
    ExceedsTarget,
}

impl VolumeStatus {
    pub fn compare(volume: f64, target: f64) -> Self {
        if volume > target {
            VolumeStatus::ExceedsTarget
        } else {
            VolumeStatus::WithinTarget
        }
    }
}

/// Text readouts next to the controls
pub trait Readout {
    fn show_parameter(&mut self, dimension: Dimension, text: String);
    fn show_volume(&mut self, text: String, status: VolumeStatus);
}

/// Range limits of the labeled input controls
pub trait InputControls {
    /// Set the upper end of `dimension`'s range. The current value is not touched.
    fn set_max(&mut self, dimension: Dimension, max: f64);
}

pub fn format_parameter(value: f64) -> String {
    format!("{value:.1}")
}

pub fn format_volume(value: f64) -> String {
    format!("{value:.2}")
}

struct LiveSolid<H> {
    solid: Solid,
    handle: H,
}

pub struct ViewCoordinator<R: Renderer, D: Readout> {
    renderer: R,
    readout: D,
    live: Option<LiveSolid<R::MeshHandle>>,
    camera: CameraTransform,
    spin: Spin,
}

impl<R: Renderer, D: Readout> ViewCoordinator<R, D> {
    pub fn new(mut renderer: R, readout: D, camera: CameraTransform, spin: Spin) -> Self {
        renderer.set_camera(&camera);
        Self {
            renderer,
            readout,
            live: None,
            camera,
            spin,
        }
    }

    /// Replace the displayed solid and refresh every readout.
    ///
    /// The new mesh is uploaded before the old handle is released, so there
    /// is never a frame without a mesh.
    pub fn commit(&mut self, solid: Solid, params: &ShapeParameters, target: f64) {
        let handle = self.renderer.upload(&solid.mesh, &SOLID_MATERIAL);
        tracing::debug!(
            shape = %params.kind(),
            volume = solid.volume,
            triangles = solid.mesh.triangle_count(),
            "solid committed"
        );
        if let Some(old) = self.live.replace(LiveSolid { solid, handle }) {
            self.renderer.release(old.handle);
        }

        for (dimension, value) in params.values() {
            self.readout.show_parameter(dimension, format_parameter(value));
        }
        self.show_volume(target);
    }

    /// Re-evaluate the volume readout against `target`
    pub fn show_volume(&mut self, target: f64) {
        if let Some(volume) = self.volume() {
            self.readout
                .show_volume(format_volume(volume), VolumeStatus::compare(volume, target));
        }
    }

    pub fn camera_changed(&mut self, camera: CameraTransform) {
        self.camera = camera;
        self.renderer.set_camera(&camera);
    }

    /// Advance the ambient spin and redraw the live solid
    pub fn frame(&mut self) {
        self.spin.step();
        if let Some(live) = &self.live {
            self.renderer.draw(&live.handle, &self.spin.model_matrix());
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Release the live mesh and hand the collaborators back
    pub fn release(mut self) -> (R, D) {
        if let Some(live) = self.live.take() {
            self.renderer.release(live.handle);
        }
        (self.renderer, self.readout)
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.live.as_ref().map(|live| &live.solid.mesh)
    }

    pub fn volume(&self) -> Option<f64> {
        self.live.as_ref().map(|live| live.solid.volume)
    }

    pub fn camera(&self) -> &CameraTransform {
        &self.camera
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn readout(&self) -> &D {
        &self.readout
    }
}
