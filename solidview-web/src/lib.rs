/// Solidview Web - WASM bindings for the browser page
///
/// The page owns the DOM, the sliders and the WebGL scene. It forwards
/// pointer, touch, wheel and control events here and reads back what
/// changed: mesh buffers and camera for its renderer, formatted readouts and
/// slider limits for its form.
use std::collections::HashMap;

use nalgebra::Matrix4;
use solidview_core::{
    view::SOLID_MATERIAL, CameraTransform, Dimension, InputControls, Material, Mesh, PointerEvent,
    Readout, Renderer, Session, SessionConfig, ShapeKind, VolumeStatus,
};
use wasm_bindgen::prelude::*;

/// Keeps the latest mesh as flat buffers for the page to upload
struct BufferRenderer {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    generation: u32,
    eye: [f32; 3],
    model: Matrix4<f32>,
    size: (u32, u32),
}

impl Default for BufferRenderer {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            generation: 0,
            eye: [0.0; 3],
            model: Matrix4::identity(),
            size: (0, 0),
        }
    }
}

impl Renderer for BufferRenderer {
    type MeshHandle = u32;

    fn upload(&mut self, mesh: &Mesh, _material: &Material) -> u32 {
        self.positions = mesh.position_buffer();
        self.normals = mesh.normal_buffer();
        self.indices = mesh.index_buffer();
        self.generation += 1;
        self.generation
    }

    fn release(&mut self, handle: u32) {
        // The replacement is uploaded first; only clear if this is still the live mesh
        if handle == self.generation {
            self.positions = Vec::new();
            self.normals = Vec::new();
            self.indices = Vec::new();
        }
    }

    fn set_camera(&mut self, camera: &CameraTransform) {
        self.eye = [camera.eye.x, camera.eye.y, camera.eye.z];
    }

    fn draw(&mut self, _mesh: &u32, model: &Matrix4<f32>) {
        self.model = *model;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[derive(Default)]
struct PageReadout {
    parameters: HashMap<Dimension, String>,
    volume: String,
    exceeds: bool,
}

impl Readout for PageReadout {
    fn show_parameter(&mut self, dimension: Dimension, text: String) {
        self.parameters.insert(dimension, text);
    }

    fn show_volume(&mut self, text: String, status: VolumeStatus) {
        self.volume = text;
        self.exceeds = status == VolumeStatus::ExceedsTarget;
    }
}

#[derive(Default)]
struct SliderLimits {
    max: HashMap<Dimension, f64>,
}

impl InputControls for SliderLimits {
    fn set_max(&mut self, dimension: Dimension, max: f64) {
        self.max.insert(dimension, max);
    }
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session<BufferRenderer, PageReadout, SliderLimits>,
}

impl WebSession {
    pub fn with_config(config: &SessionConfig) -> solidview_core::Result<Self> {
        let session = Session::start(
            config,
            BufferRenderer::default(),
            PageReadout::default(),
            SliderLimits::default(),
        )?;
        Ok(Self { session })
    }

    fn pointer(&mut self, event: PointerEvent) -> bool {
        self.session.on_pointer(event).prevent_default
    }
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session from an optional TOML configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<WebSession, JsValue> {
        let config = match config_toml {
            Some(text) => SessionConfig::from_toml_str(&text),
            None => Ok(SessionConfig::default()),
        };
        config
            .and_then(|config| Self::with_config(&config))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // Pointer input. Each returns whether the page should call preventDefault().

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.pointer(PointerEvent::Down { x, y })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.pointer(PointerEvent::Move { x, y })
    }

    pub fn pointer_up(&mut self) -> bool {
        self.pointer(PointerEvent::Up)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.pointer(PointerEvent::Leave)
    }

    pub fn touch_start(&mut self, x: f64, y: f64) -> bool {
        self.pointer(PointerEvent::TouchStart { x, y })
    }

    pub fn touch_move(&mut self, x: f64, y: f64) -> bool {
        self.pointer(PointerEvent::TouchMove { x, y })
    }

    pub fn touch_end(&mut self) -> bool {
        self.pointer(PointerEvent::TouchEnd)
    }

    pub fn wheel(&mut self, delta: f64) -> bool {
        self.pointer(PointerEvent::Wheel { delta })
    }

    // Form input

    /// `change` on the shape selector. Unknown names are ignored.
    pub fn select_shape(&mut self, name: &str) -> bool {
        match name.parse::<ShapeKind>() {
            Ok(kind) => {
                self.session.on_shape_selected(kind);
                true
            }
            Err(error) => {
                tracing::warn!(%error, "unknown shape");
                false
            }
        }
    }

    /// `input` on a parameter slider, identified by its control id
    pub fn set_parameter(&mut self, name: &str, raw: &str) -> bool {
        match name.parse::<Dimension>() {
            Ok(dimension) => self.session.on_parameter_input(dimension, raw),
            Err(error) => {
                tracing::warn!(%error, "unknown control");
                false
            }
        }
    }

    pub fn set_target_volume(&mut self, raw: &str) -> bool {
        self.session.on_target_volume_input(raw)
    }

    // Frame loop and viewport

    /// Call from requestAnimationFrame; stop scheduling once this returns false
    pub fn frame(&mut self) -> bool {
        self.session.frame()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.session.resize(width, height);
    }

    /// Resize to the browser window's inner size
    pub fn resize_to_window(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };
        let (width, height) = (dimension(window.inner_width()), dimension(window.inner_height()));
        self.session.resize(width, height);
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    // Renderer outputs

    /// Increments every time a new mesh replaces the old one
    pub fn mesh_generation(&self) -> u32 {
        self.session.view().renderer().generation
    }

    pub fn positions(&self) -> Vec<f32> {
        self.session.view().renderer().positions.clone()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.session.view().renderer().normals.clone()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.session.view().renderer().indices.clone()
    }

    pub fn camera_eye(&self) -> Vec<f32> {
        self.session.view().renderer().eye.to_vec()
    }

    /// Column-major model matrix of the last frame
    pub fn model_matrix(&self) -> Vec<f32> {
        self.session.view().renderer().model.as_slice().to_vec()
    }

    pub fn viewport_width(&self) -> u32 {
        self.session.view().renderer().size.0
    }

    pub fn viewport_height(&self) -> u32 {
        self.session.view().renderer().size.1
    }

    pub fn material_color(&self) -> u32 {
        SOLID_MATERIAL.color
    }

    pub fn material_opacity(&self) -> f32 {
        SOLID_MATERIAL.opacity
    }

    pub fn material_shininess(&self) -> f32 {
        SOLID_MATERIAL.shininess
    }

    // Form outputs

    pub fn shape(&self) -> String {
        self.session.kind().to_string()
    }

    pub fn parameter_text(&self, name: &str) -> Option<String> {
        let dimension = name.parse::<Dimension>().ok()?;
        self.session.view().readout().parameters.get(&dimension).cloned()
    }

    pub fn volume_text(&self) -> String {
        self.session.view().readout().volume.clone()
    }

    pub fn volume_exceeds_target(&self) -> bool {
        self.session.view().readout().exceeds
    }

    pub fn slider_max(&self, name: &str) -> Option<f64> {
        let dimension = name.parse::<Dimension>().ok()?;
        self.session.input().max.get(&dimension).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web() -> WebSession {
        WebSession::with_config(&SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state_is_published() {
        let web = web();
        assert_eq!(web.shape(), "trapezoid");
        assert_eq!(web.mesh_generation(), 1);
        assert_eq!(web.indices().len(), 12 * 3);
        assert_eq!(web.positions().len(), web.normals().len());
        assert_eq!(web.volume_text(), "50.00");
        assert!(!web.volume_exceeds_target());
        assert_eq!(web.slider_max("sideA"), Some(20.0));
        assert_eq!(web.parameter_text("length").as_deref(), Some("5.0"));
    }

    #[test]
    fn test_parameter_change_replaces_buffers() {
        let mut web = web();
        assert!(web.set_parameter("sideB", "16"));
        assert_eq!(web.mesh_generation(), 2);
        assert!(!web.positions().is_empty());
        assert_eq!(web.volume_text(), "100.00");
        assert!(!web.set_parameter("sideB", ""));
        assert!(!web.set_parameter("diameter", "3"));
        assert_eq!(web.mesh_generation(), 2);
    }

    #[test]
    fn test_shape_selection() {
        let mut web = web();
        assert!(web.select_shape("cylinder"));
        assert_eq!(web.shape(), "cylinder");
        assert_eq!(web.indices().len(), 32 * 4 * 3);
        assert!(web.slider_max("radius").is_some());
        assert!(!web.select_shape("sphere"));
    }

    #[test]
    fn test_gestures_report_prevent_default() {
        let mut web = web();
        let eye = web.camera_eye();
        assert!(!web.pointer_down(10.0, 10.0));
        assert!(!web.pointer_move(30.0, 10.0));
        assert_ne!(web.camera_eye(), eye);
        assert!(!web.pointer_up());
        assert!(web.touch_start(0.0, 0.0));
        assert!(web.touch_end());
        assert!(web.wheel(120.0));
    }

    #[test]
    fn test_frame_until_stopped() {
        let mut web = web();
        assert!(web.frame());
        assert_ne!(web.model_matrix(), Matrix4::<f32>::identity().as_slice().to_vec());
        web.resize(800, 600);
        assert_eq!((web.viewport_width(), web.viewport_height()), (800, 600));
        web.stop();
        assert!(!web.frame());
    }
}
