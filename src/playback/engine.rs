//! Last-wins clip playback.
//!
//! [`PlaybackEngine::play`] only enqueues; decoding happens on the
//! `playback-worker` thread so hook callbacks return immediately.  Requests
//! that pile up while the worker is busy are collapsed to the newest one,
//! since a later trigger would cut the earlier clip off anyway.

use std::path::{Path, PathBuf};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use super::voice::{Voice, VoiceSink};
use super::{PlaybackError, PlaybackEvent};
use crate::audio::{convert, decode_file};

enum Request {
    Play { path: PathBuf, volume: f32 },
    Stop,
}

pub struct PlaybackEngine {
    sink: Arc<dyn VoiceSink>,
    requests: std_mpsc::Sender<Request>,
    _worker: Option<JoinHandle<()>>,
}

impl PlaybackEngine {
    /// Spawn the worker.  Failures are logged and posted on `events`.
    pub fn new(sink: Arc<dyn VoiceSink>, events: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        let (tx, rx) = std_mpsc::channel::<Request>();

        let worker_sink = Arc::clone(&sink);
        let worker = std::thread::Builder::new()
            .name("playback-worker".into())
            .spawn(move || run_worker(worker_sink.as_ref(), rx, &events));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("failed to spawn playback-worker thread: {e}");
                None
            }
        };

        Self {
            sink,
            requests: tx,
            _worker: worker,
        }
    }

    /// Queue `path` to play at `volume` (clamped to `[0.0, 1.0]`), cutting
    /// off whatever is playing when it starts.
    pub fn play(&self, path: impl Into<PathBuf>, volume: f32) {
        let path = path.into();
        let request = Request::Play {
            path,
            volume: volume.clamp(0.0, 1.0),
        };
        if self.requests.send(request).is_err() {
            log::error!("playback worker is not running");
        }
    }

    /// Decode and start `path` on the calling thread.
    pub fn play_now(&self, path: &Path, volume: f32) -> Result<(), PlaybackError> {
        start_clip(self.sink.as_ref(), path, volume.clamp(0.0, 1.0))
    }

    /// Silence the current clip.  Queued plays that have not started yet are
    /// dropped too.
    pub fn stop(&self) {
        self.sink.stop();
        let _ = self.requests.send(Request::Stop);
    }
}

fn run_worker(
    sink: &dyn VoiceSink,
    rx: std_mpsc::Receiver<Request>,
    events: &mpsc::UnboundedSender<PlaybackEvent>,
) {
    while let Ok(mut request) = rx.recv() {
        // Skip to the newest request.
        while let Ok(newer) = rx.try_recv() {
            request = newer;
        }

        match request {
            Request::Stop => sink.stop(),
            Request::Play { path, volume } => {
                if let Err(e) = start_clip(sink, &path, volume) {
                    log::error!("failed to play {}: {e}", path.display());
                    let _ = events.send(PlaybackEvent::Failed {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }
    log::debug!("playback worker exiting");
}

fn start_clip(sink: &dyn VoiceSink, path: &Path, volume: f32) -> Result<(), PlaybackError> {
    let clip = decode_file(path)?;
    let samples = convert(&clip.samples, clip.format(), sink.format());
    log::debug!("playing {} at volume {volume:.1}", path.display());
    sink.start(Voice::new(path.display().to_string(), samples, volume))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
