//! Opaque render context handed through the draw pass

use crate::physics::collision::Rect;
use super::commands::{Color, DrawCommand};

/// Drawing surface passed to [`NodeBehavior::render`](crate::scene::NodeBehavior::render)
pub trait Canvas {
    /// Fill a world-space rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a world-space rectangle
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
}

/// Canvas that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}

    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f32) {}
}

/// Canvas that records every command in submission order
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the canvas empty for the next frame
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, line_width });
    }
}
