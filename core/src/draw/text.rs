//! Text with the built-in font

use crate::backend::RenderBackend;
use crate::color::{Color, attribute_colors};
use crate::context::Graphics;
use crate::error::GraphicsResult;

impl<B: RenderBackend> Graphics<B> {
    /// Print `text` in the current color over `bg`.
    ///
    /// Pass [`Color::TRANSPARENT`] for no background.
    pub fn print(&mut self, x: f32, y: f32, text: &str, bg: Color) -> GraphicsResult<()> {
        let state = self.stack.current();
        let (fg, origin) = (state.color, state.origin.as_vec2());
        self.font
            .print(&mut self.backend, origin.x + x, origin.y + y, text, fg, bg)?;
        Ok(())
    }

    /// Print `text` with palette colors picked by a text attribute byte
    /// (low nibble foreground, high nibble background).
    pub fn print_color(&mut self, x: f32, y: f32, attr: u8, text: &str) -> GraphicsResult<()> {
        let (fg, bg) = attribute_colors(attr);
        let origin = self.stack.current().origin.as_vec2();
        self.font
            .print(&mut self.backend, origin.x + x, origin.y + y, text, fg, bg)?;
        Ok(())
    }
}
