//! Graphic state stack
//!
//! A fixed-capacity stack of [`GraphicState`] frames. The frame at the stack
//! pointer is the current one; every color, translation and target query
//! resolves against it.
//!
//! The stack is pure bookkeeping. Binding the resolved target on the
//! renderer is the caller's job (see [`crate::Graphics`]).
//!
//! # Semantics
//!
//! - `push` starts a fresh default frame, it does not inherit the parent's
//!   color, origin or target.
//! - `pop` at depth 0 resets the base frame in place.
//! - `reset` pops down to and including the base frame.


use glam::IVec2;

use crate::backend::TextureId;
use crate::color::Color;
use crate::error::{GraphicsError, GraphicsResult};
use crate::surface::{KeepAlive, Surface};

/// Default stack capacity.
pub const MAX_GRAPHIC_STATES: usize = 64;

/// One stack frame.
#[derive(Debug, Clone, Default)]
pub struct GraphicState {
    /// Draw color and sprite tint
    pub color: Color,
    /// Offset applied to all primitive coordinates
    pub origin: IVec2,
    target: Option<TextureId>,
    keep_alive: Option<KeepAlive>,
}

impl GraphicState {
    /// Restore defaults, releasing the target keep-alive.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Point the frame at `surface` (`None` = screen), replacing any
    /// previously held keep-alive.
    pub fn retarget(&mut self, surface: Option<&Surface>) {
        self.target = surface.map(Surface::id);
        self.keep_alive = surface.map(Surface::keep_alive);
    }

    /// Target texture, `None` meaning the screen.
    pub fn target(&self) -> Option<TextureId> {
        self.target
    }

    /// Host handle of the target.
    pub fn target_surface(&self) -> Option<&Surface> {
        self.keep_alive.as_ref().map(KeepAlive::surface)
    }
}

/// Array-backed stack of graphic states.
#[derive(Debug)]
pub struct GraphicStack {
    states: Vec<GraphicState>,
    pointer: usize,
}

impl GraphicStack {
    /// Stack with `capacity` frames (at least one), positioned on a
    /// default base frame.
    pub fn new(capacity: usize) -> Self {
        Self {
            states: vec![GraphicState::default(); capacity.max(1)],
            pointer: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    /// Index of the current frame, 0 for the base frame.
    pub fn depth(&self) -> usize {
        self.pointer
    }

    pub fn current(&self) -> &GraphicState {
        &self.states[self.pointer]
    }

    pub fn current_mut(&mut self) -> &mut GraphicState {
        &mut self.states[self.pointer]
    }

    /// Enter a new default frame.
    ///
    /// Fails with [`GraphicsError::CapacityExceeded`] when the stack is
    /// full, leaving it untouched.
    pub fn push(&mut self) -> GraphicsResult<()> {
        if self.pointer + 1 >= self.states.len() {
            return Err(GraphicsError::CapacityExceeded {
                capacity: self.states.len(),
            });
        }
        self.pointer += 1;
        self.states[self.pointer].reset();
        Ok(())
    }

    /// Reset the current frame and step back to its parent. Never fails.
    pub fn pop(&mut self) {
        self.states[self.pointer].reset();
        self.pointer = self.pointer.saturating_sub(1);
    }

    /// Unwind to a single default base frame.
    pub fn reset(&mut self) {
        for _ in 0..=self.pointer {
            self.pop();
        }
    }

    /// Drop every keep-alive on every slot.
    pub fn release_all(&mut self) {
        self.states.iter_mut().for_each(GraphicState::reset);
        self.pointer = 0;
    }

    /// Frames from the base up to the current one.
    pub fn frames(&self) -> &[GraphicState] {
        &self.states[..=self.pointer]
    }
}

impl Default for GraphicStack {
    fn default() -> Self {
        Self::new(MAX_GRAPHIC_STATES)
    }
}
