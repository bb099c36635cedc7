//! Driver monitoring application: raises drowsiness and yawn alerts from a
//! camera, a video file or a recorded landmark replay.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use driver_monitor::{
    alert::AlertBoard,
    app::{MonitorApp, RunSummary},
    config::{Config, EXAMPLE_CONFIG},
    constants::DEFAULT_POLL_INTERVAL_MS,
    monitor::DriverMonitor,
    replay::{ReplayLandmarks, ReplaySource},
};
use log::info;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").args(["cam", "video", "replay"])))]
struct Args {
    /// Camera index to use (default 0 when no other input is given)
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// Landmark replay file (JSON lines) to process instead of video
    #[arg(short, long)]
    replay: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Write the example configuration to this path and exit
    #[arg(long)]
    write_config: Option<String>,

    /// Override the drowsiness EAR threshold
    #[arg(long)]
    ear_threshold: Option<f64>,

    /// Override the yawn lip-distance threshold
    #[arg(long)]
    yawn_threshold: Option<f64>,

    /// Override the smoothing window size
    #[arg(short, long)]
    window: Option<usize>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Print the alert state as JSON whenever it changes
    #[arg(long)]
    emit_json: bool,

    /// Alert polling interval in milliseconds for --emit-json
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_ms: u64,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("Failed to write {path}"))?;
        info!("Example configuration written to {}", path);
        return Ok(());
    }

    let config = load_config(&args)?;
    let monitor = DriverMonitor::new(&config)?;

    let stop = Arc::new(AtomicBool::new(false));
    let reporter = args
        .emit_json
        .then(|| spawn_alert_reporter(monitor.alert_board(), Duration::from_millis(args.poll_ms), Arc::clone(&stop)));

    let summary = run(&args, &config, monitor)?;

    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = reporter {
        let _ = handle.join();
    }

    info!(
        "Drowsy in {} of {} frames, yawning in {}",
        summary.drowsy_frames, summary.frames, summary.yawning_frames
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    if let Some(threshold) = args.ear_threshold {
        config.drowsiness.threshold = threshold;
    }
    if let Some(threshold) = args.yawn_threshold {
        config.yawn.threshold = threshold;
    }
    if let Some(window) = args.window {
        config.smoothing.window_size = window;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &Config, monitor: DriverMonitor) -> Result<RunSummary> {
    if let Some(path) = &args.replay {
        let source = ReplaySource::open(path)?;
        let mut app = MonitorApp::new(source, ReplayLandmarks, monitor);
        return Ok(app.run(args.max_frames));
    }
    run_video(args, config, monitor)
}

#[cfg(feature = "vision")]
fn run_video(args: &Args, config: &Config, monitor: DriverMonitor) -> Result<RunSummary> {
    use driver_monitor::vision::{CameraSource, OnnxLandmarkProvider, VideoSource};

    let video_source = match &args.video {
        Some(path) => VideoSource::File(path.clone()),
        None => VideoSource::Camera(args.cam.unwrap_or(0)),
    };
    let source = CameraSource::open(video_source, &config.video)?;
    let provider = OnnxLandmarkProvider::new(config)?;

    let mut app = MonitorApp::new(source, provider, monitor);
    Ok(app.run(args.max_frames))
}

#[cfg(not(feature = "vision"))]
fn run_video(_args: &Args, _config: &Config, _monitor: DriverMonitor) -> Result<RunSummary> {
    anyhow::bail!("Camera and video input need the `vision` feature; rebuild with --features vision or pass --replay")
}

/// Poll the alert board and print each change as a JSON line
fn spawn_alert_reporter(board: Arc<AlertBoard>, interval: Duration, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut last = None;
        loop {
            // Read the flag first so the final state is always reported
            let stopping = stop.load(Ordering::Relaxed);
            let state = board.get_alert_state();
            if last != Some(state) {
                match serde_json::to_string(&state) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::warn!("Failed to encode alert state: {e}"),
                }
                last = Some(state);
            }
            if stopping {
                break;
            }
            thread::sleep(interval);
        }
    })
}
