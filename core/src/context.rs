//! Graphics context
//!
//! [`Graphics`] ties the state stack to a render backend. It owns the screen
//! surface (the off-screen buffer scripts draw into by default), the debug
//! font and the file collaborator used by texture load/save.
//!
//! Every operation resolves against the current stack frame: color and
//! origin are read from it, and the renderer's bound target always follows
//! the frame's `target` (or the screen when it has none).
//!
//! Draw primitives live in [`crate::draw`], texture lifecycle in
//! [`crate::texture`].


use glam::IVec2;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, FRect, Flip, Rect, RenderBackend, TextureAccess};
use crate::color::{BlendMode, Color};
use crate::error::{GraphicsError, GraphicsResult};
use crate::font::DebugFont;
use crate::io::FileSystem;
use crate::state::{GraphicStack, GraphicState, MAX_GRAPHIC_STATES};
use crate::surface::{Graveyard, Surface};

impl From<BackendError> for GraphicsError {
    fn from(e: BackendError) -> Self {
        GraphicsError::RenderBackend(e.0)
    }
}

/// Construction parameters for [`Graphics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsConfig {
    /// Screen surface width
    pub width: u32,
    /// Screen surface height
    pub height: u32,
    /// Stack capacity
    pub capacity: usize,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            capacity: MAX_GRAPHIC_STATES,
        }
    }
}

/// The graphics context of one running game.
pub struct Graphics<B: RenderBackend> {
    pub(crate) backend: B,
    pub(crate) stack: GraphicStack,
    pub(crate) screen: Surface,
    pub(crate) font: DebugFont,
    pub(crate) files: Box<dyn FileSystem>,
    pub(crate) graveyard: Graveyard,
}

impl<B: RenderBackend> Graphics<B> {
    /// Create the screen surface and font, then reset the stack.
    ///
    /// The screen starts opaque black. Failing to create it is fatal for
    /// the host.
    pub fn new(
        mut backend: B,
        files: Box<dyn FileSystem>,
        config: &GraphicsConfig,
    ) -> GraphicsResult<Self> {
        let GraphicsConfig { width, height, .. } = *config;
        if width == 0 || height == 0 {
            return Err(GraphicsError::InvalidArgument(format!(
                "screen size must be non-zero, got {width}x{height}"
            )));
        }

        let resource = |e: BackendError| GraphicsError::Resource(e.0);
        let graveyard = Graveyard::default();
        let screen_id = backend
            .create_texture(width, height, TextureAccess::Target)
            .map_err(resource)?;
        let info = backend.query_texture(screen_id).map_err(resource)?;
        backend.set_texture_blend_mode(screen_id, BlendMode::Blend)?;
        backend.set_draw_blend_mode(BlendMode::Blend)?;
        let font = DebugFont::open(&mut backend).map_err(resource)?;

        let mut graphics = Self {
            screen: Surface::new(screen_id, info, &graveyard),
            backend,
            stack: GraphicStack::new(config.capacity),
            font,
            files,
            graveyard,
        };
        graphics.reset_stack();
        graphics.clear(Color::BLACK)?;

        info!(
            "graphics context ready: {}x{} screen, {} states, {} renderer",
            width,
            height,
            graphics.stack.capacity(),
            graphics.backend.name()
        );
        Ok(graphics)
    }

    // ========================================================================
    // Stack
    // ========================================================================

    /// Enter a fresh default frame targeting the screen.
    pub fn push_state(&mut self) -> GraphicsResult<()> {
        self.stack.push()?;
        self.bind_current();
        Ok(())
    }

    /// Leave the current frame and rebind the parent's target. Popping the
    /// base frame resets it in place.
    pub fn pop_state(&mut self) {
        self.stack.pop();
        self.bind_current();
    }

    /// Unwind to the default base frame.
    pub fn reset_stack(&mut self) {
        self.stack.reset();
        self.bind_current();
    }

    pub fn current_state(&self) -> &GraphicState {
        self.stack.current()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn stack(&self) -> &GraphicStack {
        &self.stack
    }

    // ========================================================================
    // Color and translation
    // ========================================================================

    pub fn set_color(&mut self, color: Color) {
        self.stack.current_mut().color = color;
    }

    pub fn color(&self) -> Color {
        self.stack.current().color
    }

    /// Set the current frame's origin. Absolute, not relative to parent
    /// frames.
    pub fn set_translation(&mut self, x: i32, y: i32) {
        self.stack.current_mut().origin = IVec2::new(x, y);
    }

    pub fn translation(&self) -> IVec2 {
        self.stack.current().origin
    }

    /// Move the current frame's origin by `(dx, dy)`, saturating at the
    /// `i32` range.
    pub fn translate_by(&mut self, dx: i32, dy: i32) {
        let origin = &mut self.stack.current_mut().origin;
        *origin = origin.saturating_add(IVec2::new(dx, dy));
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Redirect drawing to `surface`, or back to the screen with `None`
    /// (or the screen surface itself).
    ///
    /// The renderer is switched first; on failure the frame keeps its
    /// previous target and keep-alive.
    pub fn set_target(&mut self, surface: Option<&Surface>) -> GraphicsResult<()> {
        // The screen is stored as "no target"
        let surface = surface.filter(|s| **s != self.screen);
        let id = surface.map_or(self.screen.id(), Surface::id);
        if surface.is_some_and(Surface::is_deleted) {
            return Err(GraphicsError::TargetSwitchFailed(format!(
                "texture {} was deleted",
                id.0
            )));
        }

        if let Err(e) = self.backend.set_render_target(Some(id)) {
            warn!("render target switch to texture {} failed: {}", id.0, e);
            return Err(GraphicsError::TargetSwitchFailed(e.0));
        }
        self.stack.current_mut().retarget(surface);
        Ok(())
    }

    /// Host handle of the current frame's target, `None` for the screen.
    pub fn get_target(&self) -> Option<Surface> {
        self.stack.current().target_surface().cloned()
    }

    /// Read one pixel of the active target at `(x, y)` plus origin.
    ///
    /// Outside the target this is transparent black. Slow; meant for tests
    /// and debugging.
    pub fn get_point(&mut self, x: i32, y: i32) -> GraphicsResult<Color> {
        let origin = self.translation();
        let (Some(px), Some(py)) = (origin.x.checked_add(x), origin.y.checked_add(y)) else {
            return Ok(Color::TRANSPARENT);
        };
        let p = IVec2::new(px, py);
        let (w, h) = self.backend.output_size();
        if p.x < 0 || p.y < 0 || p.x >= w as i32 || p.y >= h as i32 {
            return Ok(Color::TRANSPARENT);
        }
        let pixels = self.backend.read_pixels(Some(Rect::new(p.x, p.y, 1, 1)))?;
        Ok(Color::from(*pixels.get_pixel(0, 0)))
    }

    /// Bind the current frame's target on the renderer.
    ///
    /// A frame whose surface was deleted underneath it cannot be bound; the
    /// renderer then keeps whatever it had.
    pub(crate) fn bind_current(&mut self) {
        let id = self.stack.current().target().unwrap_or(self.screen.id());
        if let Err(e) = self.backend.set_render_target(Some(id)) {
            warn!("could not bind render target {}: {}", id.0, e);
        }
    }

    // ========================================================================
    // Blend mode
    // ========================================================================

    /// Renderer-wide blend mode for primitives. Not part of the stack.
    pub fn set_blend_mode(&mut self, mode: BlendMode) -> GraphicsResult<()> {
        self.backend.set_draw_blend_mode(mode)?;
        Ok(())
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.backend.draw_blend_mode()
    }

    // ========================================================================
    // Frame lifecycle
    // ========================================================================

    /// Start a frame: free orphaned textures and unwind the stack.
    pub fn begin_frame(&mut self) {
        self.collect_garbage();
        self.reset_stack();
    }

    /// Composite the screen onto the display and present it.
    ///
    /// The display stays bound afterwards.
    pub fn end_frame(&mut self) -> GraphicsResult<()> {
        let screen = self.screen.id();
        let (sw, sh) = self.screen.dimensions();

        self.backend.set_render_target(None)?;
        self.backend.set_draw_color(Color::BLACK)?;
        self.backend.clear()?;
        self.backend.set_texture_color_mod(screen, 255, 255, 255)?;
        self.backend.set_texture_alpha_mod(screen, 255)?;

        let (dw, dh) = self.backend.display_size();
        self.backend.copy_ex(
            screen,
            Rect::new(0, 0, sw as i32, sh as i32),
            FRect::new(0.0, 0.0, dw as f32, dh as f32),
            0.0,
            glam::Vec2::ZERO,
            Flip::None,
        )?;
        self.backend.present();
        Ok(())
    }

    /// Recover after the backend reported lost render targets or a device
    /// reset. Surface contents are not restored; the font is rebuilt and
    /// the current frame's target rebound.
    pub fn recover_targets(&mut self) -> GraphicsResult<()> {
        info!("recovering render targets");
        self.font
            .reopen(&mut self.backend)
            .map_err(|e| GraphicsError::Resource(e.0))?;

        let id = self.stack.current().target().unwrap_or(self.screen.id());
        self.backend
            .set_render_target(Some(id))
            .map_err(|e| GraphicsError::TargetSwitchFailed(e.0))
    }

    /// Free textures whose last host handle was dropped.
    pub fn collect_garbage(&mut self) -> usize {
        let dead: Vec<_> = self.graveyard.borrow_mut().drain(..).collect();
        for id in &dead {
            debug!("freeing orphaned texture {}", id.0);
            self.backend.destroy_texture(*id);
        }
        dead.len()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn files(&self) -> &dyn FileSystem {
        self.files.as_ref()
    }

    pub fn files_mut(&mut self) -> &mut dyn FileSystem {
        self.files.as_mut()
    }

    /// The system-owned screen surface.
    pub fn screen(&self) -> &Surface {
        &self.screen
    }

    pub fn font(&self) -> &DebugFont {
        &self.font
    }
}

impl<B: RenderBackend> Drop for Graphics<B> {
    fn drop(&mut self) {
        self.stack.release_all();
        self.font.close(&mut self.backend);
        self.collect_garbage();
        self.screen.mark_deleted();
        self.backend.destroy_texture(self.screen.id());
        debug!("graphics context released");
    }
}
