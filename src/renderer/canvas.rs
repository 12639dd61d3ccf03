//! Canvas 2D painter
//!
//! Replays a draw list onto a `CanvasRenderingContext2d`. Holds no game
//! state; the sprite sheet is drawn only once the image has loaded.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::shapes::DrawCommand;
use crate::sim::Rect;

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    sprite_sheet: HtmlImageElement,
    pub size: (f64, f64),
}

fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

impl CanvasPainter {
    pub fn new(
        ctx: CanvasRenderingContext2d,
        sprite_sheet: HtmlImageElement,
        size: (f64, f64),
    ) -> Self {
        Self {
            ctx,
            sprite_sheet,
            size,
        }
    }

    /// Clear the canvas and draw every command in order
    pub fn paint(&self, commands: &[DrawCommand]) {
        self.ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1);
        for command in commands {
            match command {
                DrawCommand::Sprite { src, dst } => self.sprite(src, dst),
                DrawCommand::FillRect { rect, color } => {
                    self.ctx.set_fill_style_str(&css_color(*color));
                    self.ctx.fill_rect(
                        rect.x as f64,
                        rect.y as f64,
                        rect.w as f64,
                        rect.h as f64,
                    );
                }
                DrawCommand::FillCircle { rect, color } => {
                    let radius = (rect.w.min(rect.h) / 2.0) as f64;
                    self.ctx.set_fill_style_str(&css_color(*color));
                    self.ctx.begin_path();
                    self.ctx
                        .arc(rect.x as f64 + radius, rect.y as f64 + radius, radius, 0.0, TAU)
                        .ok();
                    self.ctx.fill();
                }
                DrawCommand::StrokeRect { rect, color } => {
                    self.ctx.set_stroke_style_str(&css_color(*color));
                    self.ctx.set_line_width(1.0);
                    self.ctx.stroke_rect(
                        rect.x as f64,
                        rect.y as f64,
                        rect.w as f64,
                        rect.h as f64,
                    );
                }
            }
        }
    }

    fn sprite(&self, src: &Rect, dst: &Rect) {
        if !self.sprite_sheet.complete() || self.sprite_sheet.natural_width() == 0 {
            return;
        }
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.sprite_sheet,
                src.x as f64,
                src.y as f64,
                src.w as f64,
                src.h as f64,
                dst.x as f64,
                dst.y as f64,
                dst.w as f64,
                dst.h as f64,
            )
            .ok();
    }
}
