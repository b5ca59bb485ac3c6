//! Application entry point for the keyboard soundboard.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line and resolve the data directory.
//! 3. Open the default output device and start its stream (degrades to a
//!    silent [`NoOutput`] sink when no device is usable).
//! 4. Spawn the playback worker.
//! 5. Load settings and keybinds into the [`AppContext`]; malformed files
//!    abort startup.
//! 6. Start the global key listener thread.
//! 7. Create the [`tokio`] runtime used for imports.
//! 8. Run [`eframe::run_native`], which blocks the main thread until the window
//!    is closed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use eframe::egui;
use soundboard::{
    app::{SoundboardApp, WINDOW_TITLE},
    config::AppPaths,
    context::AppContext,
    hotkey::{GlobalHookListener, KeyHook},
    playback::{AudioOutput, NoOutput, PlaybackEngine, StreamHandle, VoiceSink, Volume},
};
use tokio::sync::mpsc;

#[derive(Parser)]
#[clap(version, about = "Bind keys to sound clips and play them from anywhere.")]
struct Cli {
    /// Directory holding settings.json, keybinds.json and sounds/.
    #[clap(long, env = "SOUNDBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Initial playback volume, 0.0 to 1.0.
    #[clap(long, default_value_t = Volume::DEFAULT)]
    volume: f32,
}

/// Open the default output device.  The returned handle must stay alive on
/// this thread for as long as sound should play.
fn open_output() -> (Arc<dyn VoiceSink>, Option<StreamHandle>) {
    let output = match AudioOutput::new() {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Audio output unavailable: {e}");
            return (Arc::new(NoOutput::new(e.to_string())), None);
        }
    };

    let slot = output.slot();
    match output.start(slot.clone()) {
        Ok(handle) => (Arc::new(slot), Some(handle)),
        Err(e) => {
            log::warn!("Failed to start audio stream: {e}");
            (Arc::new(NoOutput::new(e.to_string())), None)
        }
    }
}

fn native_options() -> eframe::NativeOptions {
    let viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([640.0, 400.0])
        .with_min_inner_size([480.0, 320.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Soundboard starting up");

    // 2. Paths
    let cli = Cli::parse();
    let paths = match cli.data_dir {
        Some(dir) => AppPaths::in_dir(dir),
        None => AppPaths::new(),
    };
    paths
        .ensure_dirs()
        .with_context(|| format!("failed to create {}", paths.sounds_dir.display()))?;

    // 3. Audio output
    let (sink, _stream_handle) = open_output();

    // 4. Playback worker
    let (playback_tx, playback_rx) = mpsc::unbounded_channel();
    let player = Arc::new(PlaybackEngine::new(sink, playback_tx));

    // 5. Stores
    let ctx = AppContext::load(paths, Volume::new(cli.volume), player)?;

    // 6. Global key listener
    let hook: Arc<dyn KeyHook> = Arc::new(GlobalHookListener::start());

    // 7. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    let handle = rt.handle().clone();

    // 8. GUI (blocks until the window is closed)
    eframe::run_native(
        WINDOW_TITLE,
        native_options(),
        Box::new(move |cc| {
            Ok(Box::new(SoundboardApp::new(
                cc,
                ctx,
                hook,
                playback_rx,
                handle,
            )))
        }),
    )
    .map_err(|e| anyhow!("GUI failed: {e}"))
}
