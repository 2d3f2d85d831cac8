//! Textured sprite blits

use glam::Vec2;

use crate::backend::{FRect, Flip, Rect, RenderBackend};
use crate::context::Graphics;
use crate::error::{GraphicsError, GraphicsResult};
use crate::surface::Surface;

/// Options for [`Graphics::texture_draw`].
///
/// A zero `quad` selects the whole texture. The destination size is the
/// quad size times `scale`. `pivot` is relative to the destination's
/// top-left corner, not its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Source region in texture pixels
    pub quad: Rect,
    /// Destination top-left, before the origin offset
    pub position: Vec2,
    pub scale: Vec2,
    /// Clockwise, in degrees
    pub rotation: f64,
    pub pivot: Vec2,
    pub flip: Flip,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            quad: Rect::default(),
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            pivot: Vec2::ZERO,
            flip: Flip::None,
        }
    }
}

impl DrawParams {
    /// Whole texture at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn quad(mut self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.quad = Rect::new(x, y, w, h);
        self
    }

    pub fn scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    pub fn rotate(mut self, degrees: f64, pivot: Vec2) -> Self {
        self.rotation = degrees;
        self.pivot = pivot;
        self
    }

    pub fn flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }
}

impl<B: RenderBackend> Graphics<B> {
    /// Blit part of `surface` onto the active target.
    ///
    /// The sprite is tinted with the current frame color: RGB goes to the
    /// texture's color mod and A to its alpha mod.
    pub fn texture_draw(&mut self, surface: &Surface, params: &DrawParams) -> GraphicsResult<()> {
        let q = params.quad;
        if q.x < 0 || q.y < 0 || q.w < 0 || q.h < 0 {
            return Err(GraphicsError::InvalidArgument(format!(
                "quad components must be non-negative, got ({}, {}, {}, {})",
                q.x, q.y, q.w, q.h
            )));
        }
        if surface.is_deleted() {
            return Err(GraphicsError::InvalidArgument(format!(
                "texture {} was deleted",
                surface.id().0
            )));
        }

        let quad = if q.is_zero() {
            Rect::new(0, 0, surface.width() as i32, surface.height() as i32)
        } else {
            q
        };

        let id = surface.id();
        let state = self.stack.current();
        let (tint, origin) = (state.color, state.origin.as_vec2());
        self.backend.set_texture_color_mod(id, tint.r, tint.g, tint.b)?;
        self.backend.set_texture_alpha_mod(id, tint.a)?;

        let pos = origin + params.position;
        let size = Vec2::new(quad.w as f32, quad.h as f32) * params.scale;
        self.backend.copy_ex(
            id,
            quad,
            FRect::new(pos.x, pos.y, size.x, size.y),
            params.rotation,
            params.pivot,
            params.flip,
        )?;
        Ok(())
    }
}
