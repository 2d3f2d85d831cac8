//! Platform events delivered to the runner

/// Input and system events, already translated from the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Quit,
    FocusGained,
    FocusLost,
    KeyDown {
        key: String,
        /// Auto-repeat; ignored by the runner
        repeat: bool,
    },
    KeyUp {
        key: String,
    },
    TextInput(String),
    MouseDown {
        x: i32,
        y: i32,
        button: u8,
    },
    MouseUp {
        x: i32,
        y: i32,
        button: u8,
    },
    MouseMoved {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
    },
    MouseWheel {
        x: i32,
        y: i32,
    },
    /// Render target contents were lost
    RenderTargetsReset,
    /// The render device was recreated; all textures may be gone
    RenderDeviceReset,
}
