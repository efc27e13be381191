/// Interactive session: the single owner of all process-wide state.
///
/// Input handlers never fail. Bad input is logged and dropped, and the
/// previous solid, bound and camera stay in place.
use crate::config::SessionConfig;
use crate::constraint::{self, SliderBound};
use crate::error::Result;
use crate::interaction::{DragSession, EventResponse, PointerEvent};
use crate::orbit::OrbitCamera;
use crate::parse::{parse_number, parse_positive};
use crate::shape::{generate, Dimension, ShapeKind, ShapeParameters};
use crate::transform::Spin;
use crate::view::{InputControls, Readout, Renderer, ViewCoordinator};

/// Last valid parameters of every kind, so switching back restores them
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParameterSet {
    trapezoid: ShapeParameters,
    cuboid: ShapeParameters,
    cylinder: ShapeParameters,
    cone: ShapeParameters,
}

impl ParameterSet {
    fn from_config(config: &SessionConfig) -> Result<Self> {
        Ok(Self {
            trapezoid: config.parameters(ShapeKind::Trapezoid)?,
            cuboid: config.parameters(ShapeKind::Cuboid)?,
            cylinder: config.parameters(ShapeKind::Cylinder)?,
            cone: config.parameters(ShapeKind::Cone)?,
        })
    }

    fn get(&self, kind: ShapeKind) -> &ShapeParameters {
        match kind {
            ShapeKind::Trapezoid => &self.trapezoid,
            ShapeKind::Cuboid => &self.cuboid,
            ShapeKind::Cylinder => &self.cylinder,
            ShapeKind::Cone => &self.cone,
        }
    }

    fn set(&mut self, params: ShapeParameters) {
        let slot = match params.kind() {
            ShapeKind::Trapezoid => &mut self.trapezoid,
            ShapeKind::Cuboid => &mut self.cuboid,
            ShapeKind::Cylinder => &mut self.cylinder,
            ShapeKind::Cone => &mut self.cone,
        };
        *slot = params;
    }
}

pub struct Session<R: Renderer, D: Readout, I: InputControls> {
    kind: ShapeKind,
    parameters: ParameterSet,
    target_volume: f64,
    orbit: OrbitCamera,
    drag: DragSession,
    view: ViewCoordinator<R, D>,
    input: I,
    bound: Option<SliderBound>,
    running: bool,
}

impl<R: Renderer, D: Readout, I: InputControls> Session<R, D, I> {
    /// Build the session, show the initial solid and start the frame cadence.
    ///
    /// Fails only when the configuration itself is invalid.
    pub fn start(config: &SessionConfig, renderer: R, readout: D, input: I) -> Result<Self> {
        config.validate()?;
        let parameters = ParameterSet::from_config(config)?;
        let orbit = config.orbit();
        let view = ViewCoordinator::new(
            renderer,
            readout,
            orbit.transform(),
            Spin::new(config.spin_per_frame),
        );

        let mut session = Self {
            kind: config.shape,
            parameters,
            target_volume: config.target_volume,
            orbit,
            drag: DragSession::default(),
            view,
            input,
            bound: None,
            running: true,
        };

        let params = *session.parameters();
        let solid = generate(&params)?;
        session.view.commit(solid, &params, session.target_volume);
        session.apply_bound();
        tracing::info!(shape = %session.kind, target = session.target_volume, "session started");
        Ok(session)
    }

    /// A control's value changed. Returns whether a new solid was committed.
    pub fn on_parameter_input(&mut self, dimension: Dimension, raw: &str) -> bool {
        if !self.running {
            return false;
        }
        let current = *self.parameters();
        let next = parse_number(dimension.name(), raw)
            .and_then(|value| current.with(dimension, value))
            .and_then(|params| generate(&params).map(|solid| (params, solid)));

        match next {
            Ok((params, solid)) => {
                self.parameters.set(params);
                self.view.commit(solid, &params, self.target_volume);
                if constraint::is_fixed(self.kind, dimension) {
                    self.apply_bound();
                }
                true
            }
            Err(error) => {
                tracing::warn!(%error, %dimension, "input ignored, keeping previous solid");
                false
            }
        }
    }

    /// The target volume changed. Returns whether it was accepted.
    pub fn on_target_volume_input(&mut self, raw: &str) -> bool {
        if !self.running {
            return false;
        }
        match parse_positive("targetVolume", raw) {
            Ok(target) => {
                self.target_volume = target;
                self.view.show_volume(target);
                self.apply_bound();
                true
            }
            Err(error) => {
                tracing::warn!(%error, "target volume ignored");
                false
            }
        }
    }

    /// Switch the active solid, restoring that kind's last valid parameters
    pub fn on_shape_selected(&mut self, kind: ShapeKind) {
        if !self.running || kind == self.kind {
            return;
        }
        let params = *self.parameters.get(kind);
        match generate(&params) {
            Ok(solid) => {
                self.kind = kind;
                self.view.commit(solid, &params, self.target_volume);
                self.apply_bound();
            }
            Err(error) => tracing::warn!(%error, shape = %kind, "shape switch ignored"),
        }
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> EventResponse {
        if !self.running {
            return EventResponse::default();
        }
        let response = self.drag.handle(event, &mut self.orbit);
        if response.camera_changed {
            self.view.camera_changed(self.orbit.transform());
        }
        response
    }

    /// Per-frame refresh. Returns `false` once the session has stopped, at
    /// which point the host should stop scheduling frames.
    pub fn frame(&mut self) -> bool {
        if self.running {
            self.view.frame();
        }
        self.running
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.view.resize(width, height);
    }

    /// Stop the frame cadence. Input is ignored from here on.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Release the live mesh and hand the collaborators back
    pub fn teardown(mut self) -> (R, D, I) {
        self.stop();
        let (renderer, readout) = self.view.release();
        tracing::info!("session torn down");
        (renderer, readout, self.input)
    }

    fn apply_bound(&mut self) {
        match constraint::solve(self.target_volume, self.parameters()) {
            Ok(bound) => {
                for &control in bound.controls {
                    self.input.set_max(control, bound.max);
                }
                self.bound = Some(bound);
            }
            Err(error) => tracing::debug!(%error, "keeping previous slider bound"),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Parameters of the active kind
    pub fn parameters(&self) -> &ShapeParameters {
        self.parameters.get(self.kind)
    }

    pub fn target_volume(&self) -> f64 {
        self.target_volume
    }

    /// Bound last applied to the free controls
    pub fn bound(&self) -> Option<SliderBound> {
        self.bound
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    pub fn view(&self) -> &ViewCoordinator<R, D> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewCoordinator<R, D> {
        &mut self.view
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}
