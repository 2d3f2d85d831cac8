//! Frame and event driver
//!
//! [`Runner`] owns the graphics context and the game. The host feeds it
//! events and calls [`Runner::frame`] once per tick:
//!
//! 1. `update(dt)`
//! 2. stack reset, screen bound
//! 3. `draw`
//! 4. screen composited onto the display and presented
//!
//! A failing callback is logged, flags the runner to quit and is returned
//! to the host.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::backend::RenderBackend;
use crate::context::Graphics;
use crate::event::Event;
use crate::game::Game;

pub struct Runner<B: RenderBackend, G: Game<B>> {
    graphics: Graphics<B>,
    game: G,
    should_quit: bool,
    focused: bool,
    frames: u64,
}

impl<B: RenderBackend, G: Game<B>> Runner<B, G> {
    /// Take over a ready context and run the game's `init`.
    pub fn new(mut graphics: Graphics<B>, mut game: G) -> Result<Self> {
        if let Err(e) = game.init(&mut graphics) {
            error!("init callback failed: {e:#}");
            return Err(e.context("init callback failed"));
        }
        Ok(Self {
            graphics,
            game,
            should_quit: false,
            focused: true,
            frames: 0,
        })
    }

    fn check(&mut self, callback: &'static str, result: Result<()>) -> Result<()> {
        result.map_err(|e| {
            error!("{callback} callback failed: {e:#}");
            self.should_quit = true;
            e.context(format!("{callback} callback failed"))
        })
    }

    /// Dispatch one event to the game.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        let result = match event {
            Event::Quit => {
                self.should_quit = true;
                Ok(())
            }
            Event::FocusGained => {
                self.focused = true;
                self.game.focus(true)
            }
            Event::FocusLost => {
                self.focused = false;
                self.game.focus(false)
            }
            Event::KeyDown { repeat: true, .. } => Ok(()),
            Event::KeyDown { key, .. } => self.game.key_down(&key),
            Event::KeyUp { key } => self.game.key_up(&key),
            Event::TextInput(text) => self.game.text_input(&text),
            Event::MouseDown { x, y, button } => self.game.mouse_down(x, y, button),
            Event::MouseUp { x, y, button } => self.game.mouse_up(x, y, button),
            Event::MouseMoved { x, y, dx, dy } => self.game.mouse_moved(x, y, dx, dy),
            Event::MouseWheel { x, y } => self.game.mouse_wheel(x, y),
            Event::RenderTargetsReset => {
                info!("render targets reset");
                self.graphics.recover_targets()?;
                self.game.targets_reset(&mut self.graphics)
            }
            Event::RenderDeviceReset => {
                info!("render device reset");
                self.graphics.recover_targets()?;
                self.game.device_reset(&mut self.graphics)
            }
        };
        self.check("event", result)
    }

    /// Run one update/draw/present cycle.
    pub fn frame(&mut self, dt: f32) -> Result<()> {
        let updated = self.game.update(dt);
        self.check("update", updated)?;

        self.graphics.begin_frame();
        let drawn = self.game.draw(&mut self.graphics);
        // Present even when draw failed so the display is never stale
        let presented = self.graphics.end_frame();
        self.check("draw", drawn)?;
        presented.context("failed to present frame")?;

        self.frames += 1;
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn graphics(&self) -> &Graphics<B> {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut Graphics<B> {
        &mut self.graphics
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }
}

/// Time left to sleep after a frame that took `elapsed` to honor an `fps`
/// cap. `None` when uncapped or already late.
pub fn frame_delay(fps: u32, elapsed: Duration) -> Option<Duration> {
    if fps == 0 {
        return None;
    }
    let budget = Duration::from_secs_f64(1.0 / fps as f64);
    budget.checked_sub(elapsed).filter(|d| !d.is_zero())
}
