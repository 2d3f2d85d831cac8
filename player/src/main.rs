//! Sprig - Headless Player
//!
//! Runs a game directory on the software renderer for a fixed number of
//! frames, optionally saving a screenshot of the last one.
//!
//! # Usage
//!
//! ```bash
//! sprig-player path/to/game
//! sprig-player path/to/game --frames 120
//! sprig-player path/to/game --frames 60 --screenshot shots/last.png
//! ```

mod demo;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use sprig_core::{
    DirFileSystem, GameConfig, Graphics, Runner, SoftwareRenderer, frame_delay,
};

use demo::DemoGame;

#[derive(Parser)]
#[command(name = "sprig-player")]
#[command(author, version, about = "Sprig - headless 2D game player")]
struct Args {
    /// Game directory (may contain conf.toml)
    game_dir: PathBuf,

    /// Number of frames to run
    #[arg(long, short = 'n', default_value = "1")]
    frames: u64,

    /// Save the screen after the last frame (virtual path, .png or .bmp)
    #[arg(long, short = 's')]
    screenshot: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    if !args.game_dir.is_dir() {
        bail!("game directory not found: {}", args.game_dir.display());
    }

    let mut files = DirFileSystem::new(&args.game_dir);
    let config = GameConfig::load(&files).context("failed to load game configuration")?;
    if let Some(dir) = config.write_dir() {
        info!("write directory: {}", dir.display());
        files = files.with_write_dir(dir);
    }

    let graphics_config = config.graphics();
    let display_w = (graphics_config.width as f32 * config.zoom).round() as u32;
    let display_h = (graphics_config.height as f32 * config.zoom).round() as u32;
    info!(
        "{}: {}x{} screen, {}x{} display",
        config.window_title,
        graphics_config.width,
        graphics_config.height,
        display_w,
        display_h
    );

    let backend = SoftwareRenderer::new(display_w, display_h);
    let graphics = Graphics::new(backend, Box::new(files), &graphics_config)
        .context("failed to create graphics context")?;
    let mut runner = Runner::new(graphics, DemoGame::default())?;

    let dt = if config.fps > 0 {
        1.0 / config.fps as f32
    } else {
        1.0 / 60.0
    };
    for _ in 0..args.frames {
        if runner.should_quit() {
            break;
        }
        let start = Instant::now();
        runner.frame(dt)?;
        if let Some(delay) = frame_delay(config.fps, start.elapsed()) {
            std::thread::sleep(delay);
        }
    }

    if let Some(path) = &args.screenshot {
        runner
            .graphics_mut()
            .screenshot(path)
            .with_context(|| format!("failed to save screenshot to {path}"))?;
    }

    info!("ran {} frames", runner.frame_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir, frames: u64, screenshot: Option<&str>) -> Args {
        Args {
            game_dir: dir.path().to_path_buf(),
            frames,
            screenshot: screenshot.map(String::from),
        }
    }

    #[test]
    fn test_run_writes_screenshot_into_game_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("conf.toml"), "width = 64\nheight = 48\n").unwrap();

        run(&args(&dir, 3, Some("shots/last.bmp"))).unwrap();

        let bytes = std::fs::read(dir.path().join("shots").join("last.bmp")).unwrap();
        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn test_run_without_conf_uses_defaults() {
        let dir = TempDir::new().unwrap();
        run(&args(&dir, 1, None)).unwrap();
    }

    #[test]
    fn test_run_rejects_invalid_conf() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("conf.toml"), "zoom = 0.5").unwrap();
        assert!(run(&args(&dir, 1, None)).is_err());
    }

    #[test]
    fn test_run_missing_dir() {
        let dir = TempDir::new().unwrap();
        let mut missing = args(&dir, 1, None);
        missing.game_dir = dir.path().join("nope");
        assert!(run(&missing).is_err());
    }
}
