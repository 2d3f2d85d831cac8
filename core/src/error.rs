//! Error types for the graphics context

use thiserror::Error;

/// Errors reported by graphics context operations.
///
/// Every failure leaves the state stack intact: a failed push does not move
/// the stack pointer and a failed target switch does not touch the frame.
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// Push beyond the stack capacity
    #[error("graphic state stack is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// The surface could not be bound as render target
    #[error("failed to switch render target: {0}")]
    TargetSwitchFailed(String),

    /// A draw call failed in the renderer
    #[error("render backend error: {0}")]
    RenderBackend(String),

    /// Surface creation, decoding or encoding failed
    #[error("resource error: {0}")]
    Resource(String),

    /// Color channel outside `0..=255`
    #[error("color channel '{channel}' out of range: {value}")]
    InvalidColor { channel: char, value: i64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type GraphicsResult<T> = Result<T, GraphicsError>;
