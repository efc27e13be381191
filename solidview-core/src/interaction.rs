/// Drag lifecycle: which pointer events reach the orbit camera
use crate::orbit::OrbitCamera;

/// Pointer, touch and wheel input in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    /// Primary touch point
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    Wheel { delta: f64 },
}

impl PointerEvent {
    fn is_touch(&self) -> bool {
        matches!(
            self,
            PointerEvent::TouchStart { .. } | PointerEvent::TouchMove { .. } | PointerEvent::TouchEnd
        )
    }
}

/// What the host should do after an event was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The camera transform changed and must be pushed to the renderer
    pub camera_changed: bool,
    /// Suppress the platform's default scroll/zoom gesture
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        last_pointer: (f64, f64),
    },
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    /// Feed one event through the drag state machine, rotating or zooming `camera`
    pub fn handle(&mut self, event: PointerEvent, camera: &mut OrbitCamera) -> EventResponse {
        let mut response = EventResponse {
            camera_changed: false,
            prevent_default: event.is_touch(),
        };

        match (event, *self) {
            (PointerEvent::Down { x, y } | PointerEvent::TouchStart { x, y }, _) => {
                *self = DragSession::Dragging {
                    last_pointer: (x, y),
                };
            }
            (
                PointerEvent::Move { x, y } | PointerEvent::TouchMove { x, y },
                DragSession::Dragging {
                    last_pointer: (last_x, last_y),
                },
            ) => {
                camera.rotate(x - last_x, y - last_y);
                *self = DragSession::Dragging {
                    last_pointer: (x, y),
                };
                response.camera_changed = true;
            }
            (PointerEvent::Move { .. } | PointerEvent::TouchMove { .. }, DragSession::Idle) => {}
            (PointerEvent::Up | PointerEvent::Leave | PointerEvent::TouchEnd, _) => {
                *self = DragSession::Idle;
            }
            (PointerEvent::Wheel { delta }, _) => {
                camera.zoom(delta);
                response.camera_changed = true;
                response.prevent_default = true;
            }
        }

        response
    }
}
