//! Render backend abstraction
//!
//! The graphics context never touches pixels directly. Every draw, target
//! switch and readback goes through a [`RenderBackend`], which models an
//! accelerated 2D renderer: textures live behind opaque ids, one texture (or
//! the display) is the current render target, and draw calls use a
//! renderer-wide draw color and blend mode.
//!
//! [`SoftwareRenderer`] is the deterministic CPU implementation used by the
//! headless player and by tests.

mod raster;
mod software;


pub use software::SoftwareRenderer;

use glam::Vec2;
use image::RgbaImage;
use thiserror::Error;

use crate::color::{BlendMode, Color};

/// Opaque texture handle issued by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// How a texture may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureAccess {
    /// Sampling only
    Static,
    /// May also be bound as the render target
    Target,
}

/// Texel layout. All textures are 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    #[default]
    Rgba8,
}

/// Result of [`RenderBackend::query_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub access: TextureAccess,
}

/// Integer rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.w == 0 && self.h == 0
    }

    /// Intersection with `0..width` x `0..height`, or `None` when empty.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x.saturating_add(self.w)).min(width as i32);
        let y1 = (self.y.saturating_add(self.h)).min(height as i32);
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Floating point rectangle used for draw destinations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Mirroring applied by [`RenderBackend::copy_ex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl Flip {
    pub fn name(self) -> &'static str {
        match self {
            Flip::None => "none",
            Flip::Horizontal => "horizontal",
            Flip::Vertical => "vertical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Flip::None),
            "horizontal" => Some(Flip::Horizontal),
            "vertical" => Some(Flip::Vertical),
            _ => None,
        }
    }
}

/// Renderer diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Immediate-mode 2D renderer.
///
/// Calls are synchronous and issued from a single thread. Coordinates are
/// in pixels of the current render target.
pub trait RenderBackend {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    // ---- Textures ----

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        access: TextureAccess,
    ) -> BackendResult<TextureId>;

    /// Upload decoded pixels as a static texture.
    fn create_texture_from_image(&mut self, pixels: RgbaImage) -> BackendResult<TextureId>;

    /// Free a texture. If it is the current render target the display
    /// becomes the target.
    fn destroy_texture(&mut self, id: TextureId);

    fn query_texture(&self, id: TextureId) -> BackendResult<TextureInfo>;

    fn set_texture_color_mod(&mut self, id: TextureId, r: u8, g: u8, b: u8) -> BackendResult<()>;

    fn set_texture_alpha_mod(&mut self, id: TextureId, a: u8) -> BackendResult<()>;

    fn set_texture_blend_mode(&mut self, id: TextureId, mode: BlendMode) -> BackendResult<()>;

    fn texture_blend_mode(&self, id: TextureId) -> BackendResult<BlendMode>;

    // ---- Render target ----

    /// Bind a texture as render target, `None` for the display.
    ///
    /// Fails when the texture is unknown or was not created with
    /// [`TextureAccess::Target`]; the previous target stays bound.
    fn set_render_target(&mut self, target: Option<TextureId>) -> BackendResult<()>;

    fn render_target(&self) -> Option<TextureId>;

    /// Size of the current render target.
    fn output_size(&self) -> (u32, u32);

    /// Size of the display.
    fn display_size(&self) -> (u32, u32);

    // ---- Draw state ----

    fn set_draw_color(&mut self, color: Color) -> BackendResult<()>;

    fn set_draw_blend_mode(&mut self, mode: BlendMode) -> BackendResult<()>;

    fn draw_blend_mode(&self) -> BlendMode;

    // ---- Primitives ----

    /// Fill the whole target with the draw color, ignoring blending.
    fn clear(&mut self) -> BackendResult<()>;

    fn draw_point(&mut self, x: f32, y: f32) -> BackendResult<()>;

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> BackendResult<()>;

    fn draw_rect(&mut self, rect: FRect) -> BackendResult<()>;

    fn fill_rect(&mut self, rect: FRect) -> BackendResult<()>;

    /// Copy `src` of a texture onto `dst` of the target.
    ///
    /// `angle` is in degrees, clockwise, around `center`, which is relative
    /// to the top-left corner of `dst`.
    fn copy_ex(
        &mut self,
        id: TextureId,
        src: Rect,
        dst: FRect,
        angle: f64,
        center: Vec2,
        flip: Flip,
    ) -> BackendResult<()>;

    // ---- Readback / output ----

    /// Read pixels from the current target, `None` for the whole target.
    fn read_pixels(&mut self, rect: Option<Rect>) -> BackendResult<RgbaImage>;

    /// Show the display contents.
    fn present(&mut self);
}
