// Scaled Video - Main Entry Point
//
// Shows an animated test pattern drawn at a fixed virtual resolution and
// scaled to the window. With --headless the same scene runs against an
// in-memory display and a JSON report of the chosen scaler is printed.

use clap::Parser;
use scaled_video::config::{Config, VideoConfig, CONFIG_FILE};
use scaled_video::demo::Demo;
use scaled_video::display::{run_window, MemoryDisplay};
use scaled_video::session::VideoSession;
use scaled_video::surface::Surface;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scaled-video", version, about = "Scale a virtual surface onto a display")]
struct Args {
    /// Configuration file (created with defaults if missing)
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Run against an in-memory display instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Display width (overrides the configuration)
    #[arg(long)]
    width: Option<u32>,

    /// Display height (overrides the configuration)
    #[arg(long)]
    height: Option<u32>,

    /// Display bit depth, 0 lets the device choose
    #[arg(long)]
    depth: Option<u8>,

    /// Start fullscreen
    #[arg(long)]
    fullscreen: bool,

    /// Blend pixel edges for non-integer scale ratios
    #[arg(long)]
    high_quality: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config).video;
    log::info!("configuration loaded from '{}'", args.config.display());

    if let Some(width) = args.width {
        config.window_width = width;
    }
    if let Some(height) = args.height {
        config.window_height = height;
    }
    if let Some(depth) = args.depth {
        config.bit_depth = depth;
    }
    config.fullscreen |= args.fullscreen;
    config.high_quality |= args.high_quality;

    if args.headless {
        run_headless(&config, args.frames)
    } else {
        run_window(&config)
    }
}

/// Render `frames` frames into a memory display and report the result
fn run_headless(
    config: &VideoConfig,
    frames: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let virtual_res = config.virtual_resolution();
    let mut canvas = Surface::new(virtual_res.width, virtual_res.height, config.canvas_format());
    let mut demo = Demo::new();
    demo.test_pattern(&mut canvas);

    let mut session = VideoSession::new(MemoryDisplay::default(), canvas, config.to_mode_request())?;
    session.update(true)?;
    for _ in 0..frames {
        let changed = demo.step(session.canvas_mut());
        session.mark_dirty(changed);
        session.update(true)?;
    }

    println!("{}", session.describe());
    println!("{}", serde_json::to_string_pretty(&session.info())?);
    log::info!(
        "{} frames, {} presentations",
        demo.frame(),
        session.display().presented().len()
    );
    Ok(())
}
