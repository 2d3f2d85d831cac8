//! Built-in demo game
//!
//! Exercises the drawing API: an off-screen canvas redrawn on target loss,
//! a rotating sprite, nested translated frames and both text styles. If the
//! game directory has a `sprite.png` it is drawn as well.

use anyhow::Result;
use glam::Vec2;

use sprig_core::{Color, DrawParams, Game, Graphics, RenderBackend, Surface};

const CANVAS_SIZE: u32 = 32;
const SPRITE_FILE: &str = "sprite.png";

#[derive(Default)]
pub struct DemoGame {
    time: f32,
    canvas: Option<Surface>,
    sprite: Option<Surface>,
}

impl DemoGame {
    /// Paint the checkerboard into the canvas surface.
    fn paint_canvas<B: RenderBackend>(&self, gfx: &mut Graphics<B>) -> Result<()> {
        let Some(canvas) = &self.canvas else {
            return Ok(());
        };

        gfx.push_state()?;
        gfx.set_target(Some(canvas))?;
        gfx.clear(Color::TRANSPARENT)?;

        let cell = (CANVAS_SIZE / 4) as f32;
        for row in 0..4 {
            for col in 0..4 {
                let color = if (row + col) % 2 == 0 {
                    Color::rgb(240, 200, 60)
                } else {
                    Color::rgb(60, 90, 200)
                };
                gfx.set_color(color);
                gfx.draw_rect_fill(col as f32 * cell, row as f32 * cell, cell, cell)?;
            }
        }
        gfx.set_color(Color::WHITE);
        let edge = CANVAS_SIZE as f32;
        gfx.draw_rect(0.0, 0.0, edge, edge)?;
        gfx.draw_line(0.0, 0.0, edge - 1.0, edge - 1.0)?;
        gfx.pop_state();
        Ok(())
    }
}

impl<B: RenderBackend> Game<B> for DemoGame {
    fn init(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        self.canvas = Some(gfx.texture_new_empty(CANVAS_SIZE, CANVAS_SIZE)?);
        if gfx.files().exists(SPRITE_FILE) {
            self.sprite = Some(gfx.texture_new(SPRITE_FILE)?);
        }
        self.paint_canvas(gfx)
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        self.time += dt;
        Ok(())
    }

    fn draw(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        let (w, h) = gfx.screen().dimensions();
        gfx.clear(Color::rgb(16, 16, 32))?;

        if let Some(canvas) = &self.canvas {
            let half = (CANVAS_SIZE / 2) as f32;
            gfx.push_state()?;
            gfx.set_translation(w as i32 / 2, h as i32 / 2);
            gfx.texture_draw(
                canvas,
                &DrawParams::at(-half, -half).rotate((self.time * 90.0) as f64, Vec2::splat(half)),
            )?;

            // Same canvas, tinted, orbiting in a child frame
            gfx.push_state()?;
            gfx.set_translation(w as i32 / 2, h as i32 / 2);
            gfx.translate_by(
                (self.time.cos() * half * 2.0) as i32,
                (self.time.sin() * half * 2.0) as i32,
            );
            gfx.set_color(Color::rgba(255, 120, 120, 200));
            gfx.texture_draw(canvas, &DrawParams::at(-4.0, -4.0).quad(0, 0, 8, 8))?;
            gfx.pop_state();
            gfx.pop_state();
        }

        if let Some(sprite) = &self.sprite {
            gfx.texture_draw(sprite, &DrawParams::at(8.0, 24.0))?;
        }

        gfx.set_color(Color::WHITE);
        gfx.print(4.0, 4.0, "sprig", Color::TRANSPARENT)?;
        gfx.print_color(4.0, h as f32 - 12.0, 0x1E, &format!("t={:.1}", self.time))?;
        Ok(())
    }

    fn targets_reset(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        self.paint_canvas(gfx)
    }

    fn device_reset(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        self.paint_canvas(gfx)
    }
}
