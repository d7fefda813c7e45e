//! `CanvasRenderingContext2d` backend (web only)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::Canvas;
use crate::sim::{Rect, SpriteKind};

/// Font used by the title and game over screens
const FONT_FAMILY: &str = "'Press Start 2P'";

pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    player: HtmlImageElement,
    invader: HtmlImageElement,
}

impl Canvas2d {
    /// Wrap the canvas' 2d context, `None` if the browser refuses one
    pub fn new(
        canvas: &HtmlCanvasElement,
        player: HtmlImageElement,
        invader: HtmlImageElement,
    ) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            player,
            invader,
        })
    }

    fn image(&self, sprite: SpriteKind) -> &HtmlImageElement {
        match sprite {
            SpriteKind::Player => &self.player,
            SpriteKind::Invader => &self.invader,
        }
    }
}

impl Canvas for Canvas2d {
    fn clear(&mut self, width: f32, height: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(alpha as f64);
        ctx.begin_path();
        let _ = ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        ctx.set_fill_style_str(color);
        ctx.fill();
        ctx.close_path();
        ctx.restore();
    }

    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect, rotation: f32, alpha: f32) {
        let ctx = &self.ctx;
        let center = rect.center();
        ctx.save();
        ctx.set_global_alpha(alpha as f64);
        if rotation != 0.0 {
            let _ = ctx.translate(center.x as f64, center.y as f64);
            let _ = ctx.rotate(rotation as f64);
            let _ = ctx.translate(-center.x as f64, -center.y as f64);
        }
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            self.image(sprite),
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
        ctx.restore();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color);
        ctx.set_text_align("center");
        ctx.set_font(&format!("{}px {}", font_px, FONT_FAMILY));
        let _ = ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}
