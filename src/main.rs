//! Breakout main entry point.
//!
//! Boots the Breakout game on the engine library:
//! - **configparser** `config.ini` for canvas size, frame rate and asset loader knobs
//! - **clap** for the command line
//! - **raylib** for the window (cargo feature `raylib`); without it, or with
//!   `--headless`, frames are drawn into a recording canvas
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing)
//! 2. Build the engine and push the boot scene, which starts loading assets
//! 3. Every host tick, offer the current time to the engine; when a frame is
//!    due it updates every scene and redraws
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --headless --frames 60
//! cargo run --release --features raylib
//! ```

// Do not create console on Windows
#![cfg_attr(
    all(target_os = "windows", feature = "raylib"),
    windows_subsystem = "windows"
)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use breakoutengine::assets::FileFetcher;
use breakoutengine::engine::Engine;
use breakoutengine::game::Breakout;
use breakoutengine::render::RecordingCanvas;
use breakoutengine::resources::gameconfig::GameConfig;
use clap::Parser;
use log::{debug, info, warn};

/// Breakout on a tiny 2D engine
#[derive(Parser)]
#[command(version, about = "Breakout boot sequence on a small 2D scene-graph engine")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Run without a window, drawing into a recording canvas.
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode.
    #[arg(long, default_value_t = 90)]
    frames: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default configuration");
    }

    let fetcher = Arc::new(FileFetcher::new(config.assets_root.clone()));
    let mut engine = Breakout::new(&config, fetcher);

    #[cfg(feature = "raylib")]
    {
        if !cli.headless {
            run_windowed(&mut engine, &config);
            return;
        }
    }

    if !cli.headless {
        info!("Built without the `raylib` feature; running headless");
    }
    run_headless(&mut engine, cli.frames);
}

/// Drive the engine against the wall clock, drawing into a recording canvas.
fn run_headless(engine: &mut Engine, frames: u32) {
    let mut canvas = RecordingCanvas::new();
    let start = Instant::now();
    let mut ran = 0;

    while ran < frames {
        canvas.take_commands();
        if engine.frame(start.elapsed().as_secs_f64(), &mut canvas) {
            ran += 1;
            debug!(
                "frame {}: {} scenes, {} draw calls",
                ran,
                engine.scenes().len(),
                canvas.commands().len()
            );
        } else {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    let scenes: Vec<&str> = engine.scenes().iter().map(|s| s.name()).collect();
    info!(
        "Ran {} frames in {:.2}s; scenes {:?}; {} textures loaded; last frame drew images {:?} and text {:?}",
        ran,
        start.elapsed().as_secs_f32(),
        scenes,
        engine.context().textures().len(),
        canvas.drawn_images(),
        canvas.drawn_texts()
    );
}

#[cfg(feature = "raylib")]
fn run_windowed(engine: &mut Engine, config: &GameConfig) {
    use breakoutengine::render::raylibcanvas::{RaylibCanvas, TextureCache};
    use raylib::prelude::*;

    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title(&config.title)
        .build();
    // The engine paces itself; raylib just presents at display rate.
    rl.set_target_fps(60);

    let mut cache = TextureCache::new();
    let mut last_mouse = rl.get_mouse_position();

    while !rl.window_should_close() {
        let mouse = rl.get_mouse_position();
        if mouse.x != last_mouse.x || mouse.y != last_mouse.y {
            engine.pointer_move(mouse.x, mouse.y);
            last_mouse = mouse;
        }
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            engine.pointer_down(mouse.x, mouse.y);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            engine.pointer_up(mouse.x, mouse.y);
        }

        engine.advance(rl.get_time());

        let mut d = rl.begin_drawing(&thread);
        let mut canvas = RaylibCanvas::new(&mut d, &thread, &mut cache);
        engine.render(&mut canvas);
    }

    info!("Window closed, {} textures were on the GPU", cache.len());
}
