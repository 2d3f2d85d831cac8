//! Shared test utilities for unit tests

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::backend::{
    BackendError, BackendResult, FRect, Flip, Rect, RenderBackend, SoftwareRenderer,
    TextureAccess, TextureId, TextureInfo,
};
use crate::color::{BlendMode, Color};
use crate::codec::{self, ImageFormat};
use crate::context::{Graphics, GraphicsConfig};
use crate::io::MemoryFileSystem;
use crate::surface::Surface;

// ============================================================================
// Contexts
// ============================================================================

/// Context over a software renderer whose display matches the screen.
pub fn software_context(width: u32, height: u32) -> Graphics<SoftwareRenderer> {
    software_context_with_files(width, height, MemoryFileSystem::new())
}

pub fn software_context_with_files(
    width: u32,
    height: u32,
    files: MemoryFileSystem,
) -> Graphics<SoftwareRenderer> {
    let config = GraphicsConfig {
        width,
        height,
        ..GraphicsConfig::default()
    };
    Graphics::new(SoftwareRenderer::new(width, height), Box::new(files), &config)
        .expect("test context")
}

/// 16x16 context.
pub fn test_context() -> Graphics<SoftwareRenderer> {
    software_context(16, 16)
}

/// Software renderer whose draw-state and primitive calls can be made to
/// fail with a fixed diagnostic.
#[derive(Debug)]
pub struct FailingRenderer {
    pub inner: SoftwareRenderer,
    /// When set, drawing fails with this message
    pub fail_draws: Option<String>,
}

impl FailingRenderer {
    fn check(&self) -> BackendResult<()> {
        match &self.fail_draws {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl RenderBackend for FailingRenderer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        access: TextureAccess,
    ) -> BackendResult<TextureId> {
        self.inner.create_texture(width, height, access)
    }

    fn create_texture_from_image(&mut self, pixels: RgbaImage) -> BackendResult<TextureId> {
        self.inner.create_texture_from_image(pixels)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.inner.destroy_texture(id)
    }

    fn query_texture(&self, id: TextureId) -> BackendResult<TextureInfo> {
        self.inner.query_texture(id)
    }

    fn set_texture_color_mod(&mut self, id: TextureId, r: u8, g: u8, b: u8) -> BackendResult<()> {
        self.inner.set_texture_color_mod(id, r, g, b)
    }

    fn set_texture_alpha_mod(&mut self, id: TextureId, a: u8) -> BackendResult<()> {
        self.inner.set_texture_alpha_mod(id, a)
    }

    fn set_texture_blend_mode(&mut self, id: TextureId, mode: BlendMode) -> BackendResult<()> {
        self.inner.set_texture_blend_mode(id, mode)
    }

    fn texture_blend_mode(&self, id: TextureId) -> BackendResult<BlendMode> {
        self.inner.texture_blend_mode(id)
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> BackendResult<()> {
        self.inner.set_render_target(target)
    }

    fn render_target(&self) -> Option<TextureId> {
        self.inner.render_target()
    }

    fn output_size(&self) -> (u32, u32) {
        self.inner.output_size()
    }

    fn display_size(&self) -> (u32, u32) {
        self.inner.display_size()
    }

    fn set_draw_color(&mut self, color: Color) -> BackendResult<()> {
        self.check()?;
        self.inner.set_draw_color(color)
    }

    fn set_draw_blend_mode(&mut self, mode: BlendMode) -> BackendResult<()> {
        self.inner.set_draw_blend_mode(mode)
    }

    fn draw_blend_mode(&self) -> BlendMode {
        self.inner.draw_blend_mode()
    }

    fn clear(&mut self) -> BackendResult<()> {
        self.check()?;
        self.inner.clear()
    }

    fn draw_point(&mut self, x: f32, y: f32) -> BackendResult<()> {
        self.check()?;
        self.inner.draw_point(x, y)
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> BackendResult<()> {
        self.check()?;
        self.inner.draw_line(x1, y1, x2, y2)
    }

    fn draw_rect(&mut self, rect: FRect) -> BackendResult<()> {
        self.check()?;
        self.inner.draw_rect(rect)
    }

    fn fill_rect(&mut self, rect: FRect) -> BackendResult<()> {
        self.check()?;
        self.inner.fill_rect(rect)
    }

    fn copy_ex(
        &mut self,
        id: TextureId,
        src: Rect,
        dst: FRect,
        angle: f64,
        center: Vec2,
        flip: Flip,
    ) -> BackendResult<()> {
        self.check()?;
        self.inner.copy_ex(id, src, dst, angle, center, flip)
    }

    fn read_pixels(&mut self, rect: Option<Rect>) -> BackendResult<RgbaImage> {
        self.inner.read_pixels(rect)
    }

    fn present(&mut self) {
        self.inner.present()
    }
}

/// 16x16 context over a [`FailingRenderer`], healthy until `fail_draws` is set.
pub fn failing_context() -> Graphics<FailingRenderer> {
    let config = GraphicsConfig {
        width: 16,
        height: 16,
        ..GraphicsConfig::default()
    };
    let backend = FailingRenderer {
        inner: SoftwareRenderer::new(16, 16),
        fail_draws: None,
    };
    Graphics::new(backend, Box::new(MemoryFileSystem::new()), &config).expect("test context")
}

// ============================================================================
// Pixel access
// ============================================================================

pub fn surface_pixel(gfx: &Graphics<SoftwareRenderer>, surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    gfx.backend()
        .texture_pixels(surface.id())
        .expect("live texture")
        .get_pixel(x, y)
        .0
}

pub fn screen_pixel(gfx: &Graphics<SoftwareRenderer>, x: u32, y: u32) -> [u8; 4] {
    surface_pixel(gfx, gfx.screen(), x, y)
}

// ============================================================================
// Files
// ============================================================================

/// Encoded PNG filled with one color.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    codec::encode(&img, ImageFormat::Png).expect("encode png")
}
