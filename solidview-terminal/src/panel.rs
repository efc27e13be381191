/// Keyboard sliders and text readouts drawn beside the viewport
use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use solidview_core::{
    config::ControlsConfig, Dimension, InputControls, Readout, ShapeKind, ShapeParameters,
    VolumeStatus,
};

/// Columns reserved for the panel
pub const PANEL_WIDTH: u16 = 30;

/// Target volume change per key press
const TARGET_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub dimension: Dimension,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Slider {
    /// Move by `steps` and keep the result inside the current range.
    ///
    /// A value left above a lowered maximum only snaps back here, when the
    /// user moves the slider again. If the maximum drops below the minimum
    /// the slider rests at its minimum.
    fn nudge(&mut self, steps: f64) -> f64 {
        self.value = (self.value + steps * self.step).min(self.max).max(self.min);
        self.value
    }
}

/// One slider per dimension, only the active kind's are shown
pub struct Sliders {
    sliders: Vec<Slider>,
    kind: ShapeKind,
    selected: usize,
    target_volume: f64,
}

impl Sliders {
    pub fn new(controls: &ControlsConfig, kind: ShapeKind, target_volume: f64) -> Self {
        let sliders = Dimension::ALL
            .iter()
            .map(|&dimension| {
                let control = controls.get(dimension);
                Slider {
                    dimension,
                    value: control.value,
                    min: control.min,
                    max: control.max,
                    step: control.step,
                }
            })
            .collect();
        Self {
            sliders,
            kind,
            selected: 0,
            target_volume,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn slider(&self, dimension: Dimension) -> Option<&Slider> {
        self.sliders.iter().find(|s| s.dimension == dimension)
    }

    fn slider_mut(&mut self, dimension: Dimension) -> Option<&mut Slider> {
        self.sliders.iter_mut().find(|s| s.dimension == dimension)
    }

    pub fn selected(&self) -> Dimension {
        let visible = self.kind.dimensions();
        visible[self.selected % visible.len()]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.kind.dimensions().len();
    }

    pub fn select_previous(&mut self) {
        let count = self.kind.dimensions().len();
        self.selected = (self.selected + count - 1) % count;
    }

    /// Show `kind`'s sliders, positioned at the session's values for it
    pub fn show_kind(&mut self, kind: ShapeKind, params: &ShapeParameters) {
        self.kind = kind;
        self.selected = 0;
        for (dimension, value) in params.values() {
            if let Some(slider) = self.slider_mut(dimension) {
                slider.value = value;
            }
        }
    }

    /// Move the selected slider; returns the control and its new value as text
    pub fn nudge_selected(&mut self, steps: f64) -> Option<(Dimension, String)> {
        let dimension = self.selected();
        let value = self.slider_mut(dimension)?.nudge(steps);
        Some((dimension, value.to_string()))
    }

    /// Move the target volume; returns the new value as text
    pub fn nudge_target(&mut self, steps: f64) -> String {
        self.target_volume = (self.target_volume + steps * TARGET_STEP).max(TARGET_STEP);
        self.target_volume.to_string()
    }

    pub fn target_volume(&self) -> f64 {
        self.target_volume
    }
}

impl InputControls for Sliders {
    fn set_max(&mut self, dimension: Dimension, max: f64) {
        if let Some(slider) = self.slider_mut(dimension) {
            slider.max = max;
        }
    }
}

/// Latest formatted values pushed by the session
#[derive(Debug, Default)]
pub struct Readings {
    parameters: HashMap<Dimension, String>,
    volume: String,
    status: Option<VolumeStatus>,
}

impl Readings {
    pub fn parameter(&self, dimension: Dimension) -> Option<&str> {
        self.parameters.get(&dimension).map(String::as_str)
    }

    pub fn volume(&self) -> (&str, Option<VolumeStatus>) {
        (&self.volume, self.status)
    }
}

impl Readout for Readings {
    fn show_parameter(&mut self, dimension: Dimension, text: String) {
        self.parameters.insert(dimension, text);
    }

    fn show_volume(&mut self, text: String, status: VolumeStatus) {
        self.volume = text;
        self.status = Some(status);
    }
}

/// Writes consecutive panel lines starting below the title row
struct Lines<'a, W: Write> {
    writer: &'a mut W,
    left: u16,
    row: u16,
}

impl<W: Write> Lines<'_, W> {
    fn line(&mut self, color: Color, text: impl Into<String>) -> std::io::Result<()> {
        self.writer
            .queue(cursor::MoveTo(self.left, self.row))?
            .queue(Clear(ClearType::UntilNewLine))?
            .queue(SetForegroundColor(color))?
            .queue(Print(text.into()))?;
        self.row += 1;
        Ok(())
    }
}

/// Draw the panel with its left edge at column `left`
pub fn draw<W: Write>(
    writer: &mut W,
    left: u16,
    sliders: &Sliders,
    readings: &Readings,
) -> std::io::Result<()> {
    let mut out = Lines {
        writer,
        left,
        row: 1,
    };

    let shapes: Vec<String> = ShapeKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            if *kind == sliders.kind() {
                format!("[{}:{}]", i + 1, kind)
            } else {
                format!("{}:{}", i + 1, kind)
            }
        })
        .collect();
    out.line(Color::Yellow, shapes[..2].join(" "))?;
    out.line(Color::Yellow, shapes[2..].join(" "))?;
    out.line(Color::Reset, "")?;

    for &dimension in sliders.kind().dimensions() {
        let marker = if dimension == sliders.selected() { '>' } else { ' ' };
        let text = readings.parameter(dimension).unwrap_or("-");
        let max = sliders
            .slider(dimension)
            .map(|s| format!("{:.1}", s.max))
            .unwrap_or_default();
        out.line(
            Color::White,
            format!("{marker} {:<7}{text:>7}  max {max}", dimension.label()),
        )?;
    }
    out.line(Color::Reset, "")?;

    out.line(
        Color::White,
        format!("  Target  {:>8.2}", sliders.target_volume()),
    )?;
    let (volume, status) = readings.volume();
    let color = match status {
        Some(VolumeStatus::ExceedsTarget) => Color::Red,
        Some(VolumeStatus::WithinTarget) => Color::Green,
        None => Color::Grey,
    };
    out.line(color, format!("  Volume  {volume:>8}"))?;
    out.line(Color::Reset, "")?;

    for help in [
        "Tab/Up/Down  pick slider",
        "Left/Right   adjust",
        "[ ]          target volume",
        "1-4          shape",
        "p            projection",
        "drag/wheel   orbit/zoom",
        "q            quit",
    ] {
        out.line(Color::DarkGrey, help)?;
    }

    out.writer.queue(ResetColor)?;
    Ok(())
}
