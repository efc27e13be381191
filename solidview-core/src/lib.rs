/// Solidview Core Library - solid geometry, volume constraints and orbit camera
///
/// This library holds everything behind the interactive view: the shape
/// generator, the volume constraint solver, the orbit camera with its drag
/// lifecycle, and the view coordinator that forwards results to a renderer
/// and readout supplied by the host.

pub mod config;
pub mod constraint;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod orbit;
pub mod parse;
pub mod primitives;
pub mod projection;
pub mod session;
pub mod shape;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use config::SessionConfig;
pub use constraint::SliderBound;
pub use error::{Error, Result};
pub use geometry::{Bounds, Mesh, Triangle, Vertex};
pub use interaction::{DragSession, EventResponse, PointerEvent};
pub use orbit::OrbitCamera;
pub use projection::{Camera, CameraTransform, ProjectionMode};
pub use session::Session;
pub use shape::{generate, Dimension, ShapeKind, ShapeParameters, Solid};
pub use transform::Spin;
pub use view::{InputControls, Material, Readout, Renderer, VolumeStatus, ViewCoordinator};
