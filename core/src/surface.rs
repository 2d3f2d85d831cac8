//! Host-side texture handles
//!
//! A [`Surface`] is what scripts hold: a cheap, clonable handle to a backend
//! texture. The graphics context only references surfaces; while one is the
//! target of a stack frame the frame carries a [`KeepAlive`] so the texture
//! cannot be reclaimed underneath the renderer.
//!
//! Dropping the last handle does not touch the backend immediately. The id
//! is queued and the context frees it on its next garbage pass. An explicit
//! `texture_del` frees it right away.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::backend::{PixelFormat, TextureAccess, TextureId, TextureInfo};

/// Texture ids whose last handle went away.
pub(crate) type Graveyard = Rc<RefCell<Vec<TextureId>>>;

struct SurfaceInner {
    id: TextureId,
    info: TextureInfo,
    deleted: Cell<bool>,
    graveyard: Weak<RefCell<Vec<TextureId>>>,
}

impl Drop for SurfaceInner {
    fn drop(&mut self) {
        if self.deleted.get() {
            return;
        }
        if let Some(graveyard) = self.graveyard.upgrade() {
            graveyard.borrow_mut().push(self.id);
        }
    }
}

/// Handle to a texture owned by the host.
#[derive(Clone)]
pub struct Surface {
    inner: Rc<SurfaceInner>,
}

impl Surface {
    pub(crate) fn new(id: TextureId, info: TextureInfo, graveyard: &Graveyard) -> Self {
        Self {
            inner: Rc::new(SurfaceInner {
                id,
                info,
                deleted: Cell::new(false),
                graveyard: Rc::downgrade(graveyard),
            }),
        }
    }

    pub fn id(&self) -> TextureId {
        self.inner.id
    }

    pub fn width(&self) -> u32 {
        self.inner.info.width
    }

    pub fn height(&self) -> u32 {
        self.inner.info.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn format(&self) -> PixelFormat {
        self.inner.info.format
    }

    pub fn access(&self) -> TextureAccess {
        self.inner.info.access
    }

    /// Created with render-target capability.
    pub fn is_render_target(&self) -> bool {
        self.access() == TextureAccess::Target
    }

    /// Whether `texture_del` already freed the backing texture.
    pub fn is_deleted(&self) -> bool {
        self.inner.deleted.get()
    }

    /// Number of live handles, keep-alive tokens included.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub(crate) fn mark_deleted(&self) {
        self.inner.deleted.set(true);
    }

    pub(crate) fn keep_alive(&self) -> KeepAlive {
        KeepAlive(self.clone())
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Surface {}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.inner.id.0)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("access", &self.access())
            .field("deleted", &self.is_deleted())
            .finish()
    }
}

/// Reference held by a stack frame while a surface is its render target.
///
/// Releasing it (frame reset or pop) gives up the frame's claim; the
/// surface lives on as long as the host holds a handle.
#[derive(Debug, Clone)]
pub struct KeepAlive(Surface);

impl KeepAlive {
    pub fn surface(&self) -> &Surface {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> TextureInfo {
        TextureInfo {
            width: 4,
            height: 2,
            format: PixelFormat::Rgba8,
            access: TextureAccess::Target,
        }
    }

    #[test]
    fn test_last_handle_queues_texture() {
        let graveyard = Graveyard::default();
        let surface = Surface::new(TextureId(7), info(), &graveyard);
        let copy = surface.clone();
        assert_eq!(copy.handle_count(), 2);

        drop(surface);
        assert!(graveyard.borrow().is_empty());
        drop(copy);
        assert_eq!(*graveyard.borrow(), vec![TextureId(7)]);
    }

    #[test]
    fn test_deleted_surface_is_not_queued() {
        let graveyard = Graveyard::default();
        let surface = Surface::new(TextureId(1), info(), &graveyard);
        surface.mark_deleted();
        drop(surface);
        assert!(graveyard.borrow().is_empty());
    }

    #[test]
    fn test_keep_alive_extends_lifetime() {
        let graveyard = Graveyard::default();
        let surface = Surface::new(TextureId(3), info(), &graveyard);
        let token = surface.keep_alive();
        drop(surface);
        assert!(graveyard.borrow().is_empty());
        assert_eq!(token.surface().dimensions(), (4, 2));
        drop(token);
        assert_eq!(graveyard.borrow().len(), 1);
    }
}
