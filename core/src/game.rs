//! Script callbacks
//!
//! A [`Game`] is whatever drives the drawing API: a script runtime binding
//! or plain Rust. The runner calls these synchronously from the frame loop.
//! Every method defaults to doing nothing.

use anyhow::Result;

use crate::backend::RenderBackend;
use crate::context::Graphics;

#[allow(unused_variables)]
pub trait Game<B: RenderBackend> {
    /// Called once after the graphics context exists.
    fn init(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        Ok(())
    }

    /// Advance game state by `dt` seconds.
    fn update(&mut self, dt: f32) -> Result<()> {
        Ok(())
    }

    /// Draw one frame. The stack is reset and the screen bound on entry.
    fn draw(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        Ok(())
    }

    fn focus(&mut self, focused: bool) -> Result<()> {
        Ok(())
    }

    fn key_down(&mut self, key: &str) -> Result<()> {
        Ok(())
    }

    fn key_up(&mut self, key: &str) -> Result<()> {
        Ok(())
    }

    fn text_input(&mut self, text: &str) -> Result<()> {
        Ok(())
    }

    fn mouse_down(&mut self, x: i32, y: i32, button: u8) -> Result<()> {
        Ok(())
    }

    fn mouse_up(&mut self, x: i32, y: i32, button: u8) -> Result<()> {
        Ok(())
    }

    fn mouse_moved(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> Result<()> {
        Ok(())
    }

    fn mouse_wheel(&mut self, x: i32, y: i32) -> Result<()> {
        Ok(())
    }

    /// Render target contents were lost. Surfaces the game drew into must
    /// be redrawn.
    fn targets_reset(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        Ok(())
    }

    /// The render device was reset.
    fn device_reset(&mut self, gfx: &mut Graphics<B>) -> Result<()> {
        Ok(())
    }
}
