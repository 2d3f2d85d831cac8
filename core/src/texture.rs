//! Surface lifecycle: load, create, save and delete

use tracing::{debug, info, warn};

use crate::backend::{BackendError, RenderBackend, TextureAccess, TextureId};
use crate::codec::{self, ImageFormat};
use crate::color::BlendMode;
use crate::context::Graphics;
use crate::error::{GraphicsError, GraphicsResult};
use crate::surface::Surface;

fn resource(e: BackendError) -> GraphicsError {
    GraphicsError::Resource(e.0)
}

impl<B: RenderBackend> Graphics<B> {
    fn wrap_texture(&mut self, id: TextureId) -> GraphicsResult<Surface> {
        let setup = self
            .backend
            .set_texture_blend_mode(id, BlendMode::Blend)
            .and_then(|()| self.backend.query_texture(id));
        match setup {
            Ok(info) => Ok(Surface::new(id, info, &self.graveyard)),
            Err(e) => {
                self.backend.destroy_texture(id);
                Err(resource(e))
            }
        }
    }

    /// Load an image file through the file collaborator.
    pub fn texture_new(&mut self, path: &str) -> GraphicsResult<Surface> {
        let bytes = self
            .files
            .read(path)
            .map_err(|e| GraphicsError::Resource(e.to_string()))?;
        let pixels = codec::decode(&bytes)?;
        let (w, h) = pixels.dimensions();
        let id = self
            .backend
            .create_texture_from_image(pixels)
            .map_err(resource)?;
        debug!("loaded {path} as {w}x{h} texture {}", id.0);
        self.wrap_texture(id)
    }

    /// Empty, transparent surface usable as a render target.
    pub fn texture_new_empty(&mut self, width: u32, height: u32) -> GraphicsResult<Surface> {
        if width == 0 || height == 0 {
            return Err(GraphicsError::InvalidArgument(format!(
                "texture size must be non-zero, got {width}x{height}"
            )));
        }
        let id = self
            .backend
            .create_texture(width, height, TextureAccess::Target)
            .map_err(resource)?;
        self.wrap_texture(id)
    }

    /// Free a surface's texture now. Other handles to it become dead.
    ///
    /// Deleting a surface that some stack frame still targets leaves that
    /// frame pointing at nothing; drawing then goes wherever the renderer
    /// falls back to.
    pub fn texture_del(&mut self, surface: &Surface) -> GraphicsResult<()> {
        if *surface == self.screen {
            return Err(GraphicsError::InvalidArgument(
                "the screen surface cannot be deleted".into(),
            ));
        }
        if surface.is_deleted() {
            return Ok(());
        }

        let id = surface.id();
        if self.stack.frames().iter().any(|f| f.target() == Some(id)) {
            warn!("deleting texture {} while it is a render target", id.0);
        }
        surface.mark_deleted();
        self.backend.destroy_texture(id);
        debug!("deleted texture {}", id.0);
        Ok(())
    }

    /// Encode the contents of `surface` and write them to `path`.
    ///
    /// `.png` paths are written as PNG, anything else as BMP. The surface is
    /// bound temporarily for the readback; the current frame's target is
    /// bound again afterwards, whether or not the save worked.
    pub fn texture_save(&mut self, surface: &Surface, path: &str) -> GraphicsResult<()> {
        if surface.is_deleted() {
            return Err(GraphicsError::InvalidArgument(format!(
                "texture {} was deleted",
                surface.id().0
            )));
        }

        let pixels = self.read_surface(surface);
        self.bind_current();
        let pixels = pixels?;

        let bytes = codec::encode(&pixels, ImageFormat::from_path(path))?;
        self.files
            .write(path, &bytes)
            .map_err(|e| GraphicsError::Resource(e.to_string()))?;
        info!("saved {}x{} texture to {path}", pixels.width(), pixels.height());
        Ok(())
    }

    fn read_surface(&mut self, surface: &Surface) -> GraphicsResult<image::RgbaImage> {
        let id = surface.id();
        if self.backend.render_target() != Some(id) {
            self.backend
                .set_render_target(Some(id))
                .map_err(|e| GraphicsError::TargetSwitchFailed(e.0))?;
        }
        Ok(self.backend.read_pixels(None)?)
    }

    /// Save the screen surface.
    pub fn screenshot(&mut self, path: &str) -> GraphicsResult<()> {
        let screen = self.screen.clone();
        self.texture_save(&screen, path)
    }

    pub fn texture_dimensions(&self, surface: &Surface) -> GraphicsResult<(u32, u32)> {
        let info = self.backend.query_texture(surface.id()).map_err(resource)?;
        Ok((info.width, info.height))
    }

    pub fn texture_set_blend_mode(
        &mut self,
        surface: &Surface,
        mode: BlendMode,
    ) -> GraphicsResult<()> {
        self.backend.set_texture_blend_mode(surface.id(), mode)?;
        Ok(())
    }

    pub fn texture_blend_mode(&self, surface: &Surface) -> GraphicsResult<BlendMode> {
        Ok(self.backend.texture_blend_mode(surface.id())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::io::MemoryFileSystem;
    use crate::test_utils::{software_context_with_files, solid_png, test_context};

    // =============================================================
    // Creation
    // =============================================================

    #[test]
    fn test_texture_new_from_png() {
        let mut files = MemoryFileSystem::new();
        files.insert("gfx/tile.png", solid_png(3, 5, [1, 2, 3, 255])).unwrap();
        let mut gfx = software_context_with_files(8, 8, files);

        let tile = gfx.texture_new("/gfx/tile.png").unwrap();
        assert_eq!(gfx.texture_dimensions(&tile).unwrap(), (3, 5));
        assert!(!tile.is_render_target());
        assert_eq!(gfx.texture_blend_mode(&tile).unwrap(), BlendMode::Blend);
    }

    #[test]
    fn test_texture_new_missing_file() {
        let mut gfx = test_context();
        let err = gfx.texture_new("nope.png").unwrap_err();
        assert!(matches!(err, GraphicsError::Resource(_)));
    }

    #[test]
    fn test_texture_new_undecodable() {
        let mut files = MemoryFileSystem::new();
        files.insert("bad.png", b"not a png".to_vec()).unwrap();
        let mut gfx = software_context_with_files(8, 8, files);
        assert!(matches!(
            gfx.texture_new("bad.png"),
            Err(GraphicsError::Resource(_))
        ));
    }

    #[test]
    fn test_texture_new_empty() {
        let mut gfx = test_context();
        let canvas = gfx.texture_new_empty(7, 3).unwrap();
        assert_eq!(canvas.dimensions(), (7, 3));
        assert!(canvas.is_render_target());

        assert!(matches!(
            gfx.texture_new_empty(0, 3),
            Err(GraphicsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_texture_blend_mode_roundtrip() {
        let mut gfx = test_context();
        let canvas = gfx.texture_new_empty(2, 2).unwrap();
        gfx.texture_set_blend_mode(&canvas, BlendMode::Mod).unwrap();
        assert_eq!(gfx.texture_blend_mode(&canvas).unwrap(), BlendMode::Mod);
    }

    // =============================================================
    // Deletion
    // =============================================================

    #[test]
    fn test_texture_del() {
        let mut gfx = test_context();
        let canvas = gfx.texture_new_empty(2, 2).unwrap();
        let id = canvas.id();

        gfx.texture_del(&canvas).unwrap();
        assert!(canvas.is_deleted());
        assert!(gfx.backend().texture_pixels(id).is_none());
        // Second delete is a no-op
        gfx.texture_del(&canvas).unwrap();
        // Dropping the handle does not queue it again
        drop(canvas);
        assert_eq!(gfx.collect_garbage(), 0);
    }

    #[test]
    fn test_deleted_texture_is_unusable() {
        let mut gfx = test_context();
        let canvas = gfx.texture_new_empty(2, 2).unwrap();
        gfx.texture_del(&canvas).unwrap();

        assert!(matches!(
            gfx.set_target(Some(&canvas)),
            Err(GraphicsError::TargetSwitchFailed(_))
        ));
        assert!(gfx.texture_dimensions(&canvas).is_err());
        assert!(matches!(
            gfx.texture_save(&canvas, "x.bmp"),
            Err(GraphicsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_screen_cannot_be_deleted() {
        let mut gfx = test_context();
        let screen = gfx.screen().clone();
        assert!(matches!(
            gfx.texture_del(&screen),
            Err(GraphicsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dropped_handle_is_collected() {
        let mut gfx = test_context();
        let id = gfx.texture_new_empty(2, 2).unwrap().id();
        assert_eq!(gfx.collect_garbage(), 1);
        assert!(gfx.backend().texture_pixels(id).is_none());
    }

    // =============================================================
    // Saving
    // =============================================================

    #[test]
    fn test_texture_save_writes_bmp_and_restores_target() {
        let mut gfx = test_context();
        let saved = gfx.texture_new_empty(2, 2).unwrap();
        let active = gfx.texture_new_empty(2, 2).unwrap();

        gfx.set_target(Some(&saved)).unwrap();
        gfx.clear(Color::rgb(0, 255, 0)).unwrap();

        gfx.push_state().unwrap();
        gfx.set_target(Some(&active)).unwrap();
        gfx.texture_save(&saved, "out/saved.bmp").unwrap();

        // The pushed frame's target is bound again, not the screen
        assert_eq!(gfx.backend().render_target(), Some(active.id()));

        let bytes = gfx.files().read("out/saved.bmp").unwrap();
        assert_eq!(&bytes[..2], b"BM");
        let decoded = codec::decode(&bytes).unwrap();
        assert_eq!(decoded.get_pixel(1, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_texture_save_png_by_extension() {
        let mut gfx = test_context();
        let canvas = gfx.texture_new_empty(3, 3).unwrap();
        gfx.texture_save(&canvas, "canvas.png").unwrap();
        let bytes = gfx.files().read("canvas.png").unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_texture_save_static_fails_and_restores() {
        let mut files = MemoryFileSystem::new();
        files.insert("s.png", solid_png(1, 1, [255; 4])).unwrap();
        let mut gfx = software_context_with_files(8, 8, files);
        let sprite = gfx.texture_new("s.png").unwrap();
        let canvas = gfx.texture_new_empty(2, 2).unwrap();
        gfx.set_target(Some(&canvas)).unwrap();

        let err = gfx.texture_save(&sprite, "s.bmp").unwrap_err();
        assert!(matches!(err, GraphicsError::TargetSwitchFailed(_)));
        assert_eq!(gfx.backend().render_target(), Some(canvas.id()));
        assert!(!gfx.files().exists("s.bmp"));
    }

    #[test]
    fn test_screenshot() {
        let mut gfx = test_context();
        gfx.set_color(Color::rgb(255, 0, 0));
        gfx.draw_point(0.0, 0.0).unwrap();
        gfx.screenshot("shot.png").unwrap();

        let decoded = codec::decode(&gfx.files().read("shot.png").unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }
}
