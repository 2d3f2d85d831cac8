//! Immediate-mode draw primitives
//!
//! Shapes, sprites and text drawn onto the active target of a
//! [`Graphics`] context. All of them read the current stack frame: the
//! frame color becomes the draw color (or the sprite tint) right before the
//! call, and coordinates are shifted by the frame origin. `clear` is the one
//! primitive that ignores the origin.

mod shapes;
mod sprites;
mod text;


pub use sprites::DrawParams;

use glam::Vec2;

use crate::backend::RenderBackend;
use crate::context::Graphics;
use crate::error::GraphicsResult;

impl<B: RenderBackend> Graphics<B> {
    /// Load the frame color into the renderer and return the frame origin.
    fn prepare_draw(&mut self) -> GraphicsResult<Vec2> {
        let state = self.stack.current();
        let (color, origin) = (state.color, state.origin.as_vec2());
        self.backend.set_draw_color(color)?;
        Ok(origin)
    }
}
