//! CPU renderer over `image::RgbaImage` buffers

use glam::{Mat2, Vec2};
use hashbrown::HashMap;
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use super::raster::{self, mul8};
use super::{
    BackendError, BackendResult, FRect, Flip, PixelFormat, Rect, RenderBackend, TextureAccess,
    TextureId, TextureInfo,
};
use crate::color::{BlendMode, Color};

#[derive(Debug)]
struct SoftTexture {
    pixels: RgbaImage,
    access: TextureAccess,
    color_mod: [u8; 3],
    alpha_mod: u8,
    blend_mode: BlendMode,
}

impl SoftTexture {
    fn new(pixels: RgbaImage, access: TextureAccess) -> Self {
        Self {
            pixels,
            access,
            color_mod: [255; 3],
            alpha_mod: 255,
            // Matches accelerated renderers: fresh textures draw with no blending
            blend_mode: BlendMode::None,
        }
    }
}

/// Deterministic software implementation of [`RenderBackend`].
///
/// The display is a plain buffer; [`present`](RenderBackend::present) keeps a
/// copy of it so headless callers can inspect what would have been shown.
#[derive(Debug)]
pub struct SoftwareRenderer {
    display: RgbaImage,
    textures: HashMap<TextureId, SoftTexture>,
    next_id: u32,
    target: Option<TextureId>,
    draw_color: Color,
    blend_mode: BlendMode,
    presented: Option<RgbaImage>,
    frames_presented: u64,
}

impl SoftwareRenderer {
    /// Renderer with a black display of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            textures: HashMap::new(),
            next_id: 1,
            target: None,
            draw_color: Color::WHITE,
            blend_mode: BlendMode::None,
            presented: None,
            frames_presented: 0,
        }
    }

    /// Current display buffer.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    /// Last presented frame.
    pub fn presented(&self) -> Option<&RgbaImage> {
        self.presented.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Raw pixels of a texture.
    pub fn texture_pixels(&self, id: TextureId) -> Option<&RgbaImage> {
        self.textures.get(&id).map(|t| &t.pixels)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Simulate a lost render-target event: every target texture loses its
    /// contents.
    pub fn invalidate_targets(&mut self) {
        for texture in self.textures.values_mut() {
            if texture.access == TextureAccess::Target {
                texture.pixels.fill(0);
            }
        }
        debug!("software renderer: render targets invalidated");
    }

    fn texture(&self, id: TextureId) -> BackendResult<&SoftTexture> {
        self.textures
            .get(&id)
            .ok_or_else(|| BackendError(format!("invalid texture {}", id.0)))
    }

    fn texture_mut(&mut self, id: TextureId) -> BackendResult<&mut SoftTexture> {
        self.textures
            .get_mut(&id)
            .ok_or_else(|| BackendError(format!("invalid texture {}", id.0)))
    }

    fn insert(&mut self, texture: SoftTexture) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, texture);
        id
    }

    fn target_image(&self) -> BackendResult<&RgbaImage> {
        match self.target {
            None => Ok(&self.display),
            Some(id) => self.texture(id).map(|t| &t.pixels),
        }
    }

    fn target_image_mut(&mut self) -> BackendResult<&mut RgbaImage> {
        match self.target {
            None => Ok(&mut self.display),
            Some(id) => self.texture_mut(id).map(|t| &mut t.pixels),
        }
    }
}

impl RenderBackend for SoftwareRenderer {
    fn name(&self) -> &'static str {
        "software"
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        access: TextureAccess,
    ) -> BackendResult<TextureId> {
        if width == 0 || height == 0 {
            return Err(BackendError(format!(
                "invalid texture size {width}x{height}"
            )));
        }
        let id = self.insert(SoftTexture::new(RgbaImage::new(width, height), access));
        debug!("software renderer: created {width}x{height} {access:?} texture {}", id.0);
        Ok(id)
    }

    fn create_texture_from_image(&mut self, pixels: RgbaImage) -> BackendResult<TextureId> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(BackendError::new("empty image"));
        }
        Ok(self.insert(SoftTexture::new(pixels, TextureAccess::Static)))
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_none() {
            warn!("software renderer: destroy of unknown texture {}", id.0);
            return;
        }
        if self.target == Some(id) {
            self.target = None;
        }
    }

    fn query_texture(&self, id: TextureId) -> BackendResult<TextureInfo> {
        let texture = self.texture(id)?;
        Ok(TextureInfo {
            width: texture.pixels.width(),
            height: texture.pixels.height(),
            format: PixelFormat::Rgba8,
            access: texture.access,
        })
    }

    fn set_texture_color_mod(&mut self, id: TextureId, r: u8, g: u8, b: u8) -> BackendResult<()> {
        self.texture_mut(id)?.color_mod = [r, g, b];
        Ok(())
    }

    fn set_texture_alpha_mod(&mut self, id: TextureId, a: u8) -> BackendResult<()> {
        self.texture_mut(id)?.alpha_mod = a;
        Ok(())
    }

    fn set_texture_blend_mode(&mut self, id: TextureId, mode: BlendMode) -> BackendResult<()> {
        self.texture_mut(id)?.blend_mode = mode;
        Ok(())
    }

    fn texture_blend_mode(&self, id: TextureId) -> BackendResult<BlendMode> {
        Ok(self.texture(id)?.blend_mode)
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> BackendResult<()> {
        if let Some(id) = target {
            let texture = self.texture(id)?;
            if texture.access != TextureAccess::Target {
                return Err(BackendError(format!(
                    "texture {} is not a render target",
                    id.0
                )));
            }
        }
        self.target = target;
        Ok(())
    }

    fn render_target(&self) -> Option<TextureId> {
        self.target
    }

    fn output_size(&self) -> (u32, u32) {
        self.target_image()
            .map(|img| img.dimensions())
            .unwrap_or_else(|_| self.display.dimensions())
    }

    fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }

    fn set_draw_color(&mut self, color: Color) -> BackendResult<()> {
        self.draw_color = color;
        Ok(())
    }

    fn set_draw_blend_mode(&mut self, mode: BlendMode) -> BackendResult<()> {
        self.blend_mode = mode;
        Ok(())
    }

    fn draw_blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    fn clear(&mut self) -> BackendResult<()> {
        let color = Rgba::from(self.draw_color);
        let img = self.target_image_mut()?;
        for pixel in img.pixels_mut() {
            *pixel = color;
        }
        Ok(())
    }

    fn draw_point(&mut self, x: f32, y: f32) -> BackendResult<()> {
        let (color, mode) = (self.draw_color, self.blend_mode);
        let img = self.target_image_mut()?;
        raster::put(img, x.floor() as i32, y.floor() as i32, color.to_array(), mode);
        Ok(())
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> BackendResult<()> {
        let (color, mode) = (self.draw_color, self.blend_mode);
        let img = self.target_image_mut()?;
        raster::line(img, Vec2::new(x1, y1), Vec2::new(x2, y2), color, mode);
        Ok(())
    }

    fn draw_rect(&mut self, rect: FRect) -> BackendResult<()> {
        let (color, mode) = (self.draw_color, self.blend_mode);
        raster::outline(self.target_image_mut()?, rect, color, mode);
        Ok(())
    }

    fn fill_rect(&mut self, rect: FRect) -> BackendResult<()> {
        let (color, mode) = (self.draw_color, self.blend_mode);
        raster::fill(self.target_image_mut()?, rect, color, mode);
        Ok(())
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
        let texture = self.texture(id)?;
        let (tw, th) = texture.pixels.dimensions();
        let Some(src) = src.clip_to(tw, th) else {
            return Ok(());
        };
        if dst.w == 0.0 || dst.h == 0.0 {
            return Ok(());
        }

        // Copy the source region out first so a texture may be drawn onto itself
        let region = image::imageops::crop_imm(
            &texture.pixels,
            src.x as u32,
            src.y as u32,
            src.w as u32,
            src.h as u32,
        )
        .to_image();
        let [mr, mg, mb] = texture.color_mod;
        let ma = texture.alpha_mod;
        let mode = texture.blend_mode;

        let pivot = Vec2::new(dst.x, dst.y) + center;
        let radians = (angle as f32).to_radians();
        let forward = Mat2::from_angle(radians);
        let inverse = Mat2::from_angle(-radians);

        // Bounding box of the rotated destination
        let corners = [
            Vec2::new(dst.x, dst.y),
            Vec2::new(dst.x + dst.w, dst.y),
            Vec2::new(dst.x, dst.y + dst.h),
            Vec2::new(dst.x + dst.w, dst.y + dst.h),
        ]
        .map(|corner| pivot + forward * (corner - pivot));
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, c| acc.min(*c));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, c| acc.max(*c));

        let target = self.target_image_mut()?;
        let (out_w, out_h) = target.dimensions();
        let x0 = (min.x.floor() as i32).max(0);
        let y0 = (min.y.floor() as i32).max(0);
        let x1 = (max.x.ceil() as i32).min(out_w as i32);
        let y1 = (max.y.ceil() as i32).min(out_h as i32);

        let (sw, sh) = (src.w as f32, src.h as f32);
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let local = inverse * (sample - pivot) + pivot - Vec2::new(dst.x, dst.y);
                // Normalized position inside dst; negative sizes mirror
                let u = local.x / dst.w;
                let v = local.y / dst.h;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let mut sx = ((u * sw) as u32).min(src.w as u32 - 1);
                let mut sy = ((v * sh) as u32).min(src.h as u32 - 1);
                match flip {
                    Flip::None => {}
                    Flip::Horizontal => sx = src.w as u32 - 1 - sx,
                    Flip::Vertical => sy = src.h as u32 - 1 - sy,
                }
                let [r, g, b, a] = region.get_pixel(sx, sy).0;
                let texel = [mul8(r, mr), mul8(g, mg), mul8(b, mb), mul8(a, ma)];
                raster::put(target, x, y, texel, mode);
            }
        }
        Ok(())
    }

    fn read_pixels(&mut self, rect: Option<Rect>) -> BackendResult<RgbaImage> {
        let img = self.target_image()?;
        match rect {
            None => Ok(img.clone()),
            Some(rect) => {
                let clipped = rect
                    .clip_to(img.width(), img.height())
                    .ok_or_else(|| BackendError::new("read rectangle outside render target"))?;
                Ok(image::imageops::crop_imm(
                    img,
                    clipped.x as u32,
                    clipped.y as u32,
                    clipped.w as u32,
                    clipped.h as u32,
                )
                .to_image())
            }
        }
    }

    fn present(&mut self) {
        self.presented = Some(self.display.clone());
        self.frames_presented += 1;
    }
}
