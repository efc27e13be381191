/// Terminal front end: ASCII viewport, keyboard sliders, mouse orbit
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use solidview_core::{PointerEvent, Session, SessionConfig, ShapeKind};

pub mod panel;
pub mod renderer;

pub use panel::{Readings, Sliders, PANEL_WIDTH};
pub use renderer::AsciiRenderer;

/// Approximate pixel size of one terminal cell, so drag deltas feel like pointer pixels
const CELL_PIXELS: (f64, f64) = (8.0, 16.0);
/// Wheel delta per scroll notch, as a browser reports it
const WHEEL_NOTCH: f64 = 100.0;
/// Rows above the viewport used by the status line
const HEADER_ROWS: u16 = 1;

type TerminalSession = Session<AsciiRenderer, Readings, Sliders>;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    session: TerminalSession,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &SessionConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (view_width, view_height) = viewport_size(width, height);
        let sliders = Sliders::new(&config.controls, config.shape, config.target_volume);
        let session = Session::start(
            config,
            AsciiRenderer::new(view_width as usize, view_height as usize),
            Readings::default(),
            sliders,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            session,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        )?;

        let mut app = self;
        let result = app.main_loop();
        app.session.teardown();

        // Cleanup
        execute!(
            stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        execute!(stdout(), terminal::Clear(ClearType::All))?;

        loop {
            let frame_start = Instant::now();

            // Drain pending input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if !self.session.frame() {
                break;
            }
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if let Some(pointer) = self.pointer_event(mouse) {
                    self.session.on_pointer(pointer);
                }
            }
            Event::FocusLost => {
                self.session.on_pointer(PointerEvent::Leave);
            }
            Event::Resize(width, height) => {
                let (view_width, view_height) = viewport_size(width, height);
                self.session.resize(view_width as u32, view_height as u32);
                let _ = execute!(stdout(), terminal::Clear(ClearType::All));
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.session.stop(),
            KeyCode::Tab | KeyCode::Down => self.session.input_mut().select_next(),
            KeyCode::BackTab | KeyCode::Up => self.session.input_mut().select_previous(),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.nudge(1.0),
            KeyCode::Left | KeyCode::Char('-') => self.nudge(-1.0),
            KeyCode::Char(']') => self.nudge_target(1.0),
            KeyCode::Char('[') => self.nudge_target(-1.0),
            KeyCode::Char('p') => self.session.view_mut().renderer_mut().toggle_projection(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.select_shape(ShapeKind::ALL[index]);
            }
            _ => {}
        }
    }

    fn nudge(&mut self, steps: f64) {
        if let Some((dimension, raw)) = self.session.input_mut().nudge_selected(steps) {
            self.session.on_parameter_input(dimension, &raw);
        }
    }

    fn nudge_target(&mut self, steps: f64) {
        let raw = self.session.input_mut().nudge_target(steps);
        self.session.on_target_volume_input(&raw);
    }

    fn select_shape(&mut self, kind: ShapeKind) {
        self.session.on_shape_selected(kind);
        let params = *self.session.parameters();
        self.session.input_mut().show_kind(kind, &params);
    }

    /// Translate a mouse event over the viewport into surface pixels
    fn pointer_event(&self, mouse: MouseEvent) -> Option<PointerEvent> {
        let renderer = self.session.view().renderer();
        let inside = (mouse.column as usize) < renderer.width() && mouse.row >= HEADER_ROWS;
        let x = mouse.column as f64 * CELL_PIXELS.0;
        let y = mouse.row as f64 * CELL_PIXELS.1;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => Some(PointerEvent::Down { x, y }),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(PointerEvent::Move { x, y })
            }
            MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up),
            MouseEventKind::ScrollDown if inside => Some(PointerEvent::Wheel { delta: WHEEL_NOTCH }),
            MouseEventKind::ScrollUp if inside => Some(PointerEvent::Wheel { delta: -WHEEL_NOTCH }),
            _ => None,
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        let renderer = self.session.view().renderer();
        renderer.present(&mut stdout, HEADER_ROWS)?;

        panel::draw(
            &mut stdout,
            renderer.width() as u16 + 1,
            self.session.input(),
            self.session.view().readout(),
        )?;

        // Status line
        let orbit = self.session.orbit();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Solidview | {} | r {:.1} θ {:.2} φ {:.2} | FPS: {:.1}",
                self.session.kind(),
                orbit.radius,
                orbit.theta,
                orbit.phi,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Viewport cells left after the panel and status line
fn viewport_size(width: u16, height: u16) -> (u16, u16) {
    (
        width.saturating_sub(PANEL_WIDTH + 1).max(1),
        height.saturating_sub(HEADER_ROWS).max(1),
    )
}
