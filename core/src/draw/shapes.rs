//! Points, lines and rectangles

use crate::backend::{FRect, RenderBackend};
use crate::color::Color;
use crate::context::Graphics;
use crate::error::GraphicsResult;

impl<B: RenderBackend> Graphics<B> {
    /// Fill the whole active target with `color`. Not offset by the origin
    /// and not blended.
    pub fn clear(&mut self, color: Color) -> GraphicsResult<()> {
        self.backend.set_draw_color(color)?;
        self.backend.clear()?;
        Ok(())
    }

    pub fn draw_point(&mut self, x: f32, y: f32) -> GraphicsResult<()> {
        let origin = self.prepare_draw()?;
        self.backend.draw_point(origin.x + x, origin.y + y)?;
        Ok(())
    }

    /// Line with both endpoints included.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> GraphicsResult<()> {
        let origin = self.prepare_draw()?;
        self.backend
            .draw_line(origin.x + x1, origin.y + y1, origin.x + x2, origin.y + y2)?;
        Ok(())
    }

    /// One pixel rectangle outline.
    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> GraphicsResult<()> {
        let origin = self.prepare_draw()?;
        self.backend
            .draw_rect(FRect::new(origin.x + x, origin.y + y, w, h))?;
        Ok(())
    }

    pub fn draw_rect_fill(&mut self, x: f32, y: f32, w: f32, h: f32) -> GraphicsResult<()> {
        let origin = self.prepare_draw()?;
        self.backend
            .fill_rect(FRect::new(origin.x + x, origin.y + y, w, h))?;
        Ok(())
    }
}
