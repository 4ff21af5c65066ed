//! 2D drawing surface abstraction
//!
//! The minimal subset of the canvas 2D API the scene needs. Coordinates are
//! screen space, y down.

/// Primitive 2D drawing target
pub trait Surface {
    /// Erase a rectangular region
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Colour used by subsequent `stroke` calls (CSS colour string)
    fn set_stroke_style(&mut self, color: &str);
    /// Start a new path, discarding the current one
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Add a full circle to the current path
    fn arc(&mut self, x: f64, y: f64, radius: f64);
    /// Outline the current path
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// A single recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { x: f64, y: f64, width: f64, height: f64 },
    StrokeStyle(String),
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64 },
    Stroke,
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records every call, cleared along with the canvas
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Circles drawn since the last clear, as (x, y, radius)
    pub fn arcs(&self) -> Vec<(f64, f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::Arc { x, y, radius } => Some((x, y, radius)),
                _ => None,
            })
            .collect()
    }

    /// Text drawn since the last clear
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `line_to` calls since the last clear
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineTo { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // Only the latest frame is of interest
        self.commands.clear();
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Arc { x, y, radius });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}
