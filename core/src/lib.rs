//! Sprig Core - graphics context for a scriptable 2D game runtime
//!
//! This crate provides the immediate-mode drawing layer a script runtime
//! talks to, built around a save/restore stack of drawing state.
//!
//! # Architecture
//!
//! - [`Graphics`] - The graphics context: state stack, screen surface, draw calls
//! - [`GraphicStack`] - Fixed-capacity stack of [`GraphicState`] frames
//! - [`RenderBackend`] - Renderer abstraction, with [`SoftwareRenderer`] on the CPU
//! - [`Surface`] - Host handle to a texture, usable as sprite source or render target
//! - [`Runner`] - Frame and event driver invoking [`Game`] callbacks
//! - [`FileSystem`] - Game file access for texture load/save and `conf.toml`

pub mod backend;
pub mod codec;
pub mod color;
pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod event;
pub mod font;
pub mod game;
pub mod io;
pub mod runner;
pub mod state;
pub mod surface;
#[cfg(test)]
pub mod test_utils;
pub mod texture;

// Re-export the drawing API
pub use backend::{
    BackendError, FRect, Flip, PixelFormat, Rect, RenderBackend, SoftwareRenderer, TextureAccess,
    TextureId, TextureInfo,
};
pub use color::{BlendMode, Color, PALETTE};
pub use context::{Graphics, GraphicsConfig};
pub use draw::DrawParams;
pub use error::{GraphicsError, GraphicsResult};
pub use state::{GraphicStack, GraphicState, MAX_GRAPHIC_STATES};
pub use surface::{KeepAlive, Surface};

// Re-export host integration types
pub use config::{CONF_FILE_NAME, ConfigError, GameConfig};
pub use event::Event;
pub use game::Game;
pub use io::{DirFileSystem, FileSystem, FsError, MemoryFileSystem};
pub use runner::{Runner, frame_delay};
