//! Canvas that records draw calls instead of rasterizing them
//!
//! Used by the native build (headless runs) and by tests that compare frames.

use glam::Vec2;

use super::Canvas;
use crate::sim::{Rect, SpriteKind};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
        color: String,
    },
    Rect {
        rect: Rect,
        color: String,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: String,
        alpha: f32,
    },
    Sprite {
        sprite: SpriteKind,
        rect: Rect,
        rotation: f32,
        alpha: f32,
    },
    Text {
        text: String,
        at: Vec2,
        font_px: f32,
        color: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, width: f32, height: f32, color: &str) {
        // A clear wipes everything recorded so far, like it would on screen
        self.commands.clear();
        self.commands.push(DrawCommand::Clear {
            width,
            height,
            color: color.to_string(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: color.to_string(),
            alpha,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect, rotation: f32, alpha: f32) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            rect,
            rotation,
            alpha,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32, color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            font_px,
            color: color.to_string(),
        });
    }
}
