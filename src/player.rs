//! Audio playback through external `ffprobe`, `ffplay`, and `yt-dlp`
//! processes.
//!
//! All playback is serialized on one task: direct plays and queued
//! requests share a single queue, so at most one child process renders
//! audio at a time. Stopping kills the in-flight process, drops the
//! queue, and fails any callers still waiting on their request.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Downloaded audio lands here before playback.
const DOWNLOAD_FILE: &str = "song.mp3";

/// Extra wait beyond the probed duration before a playback process is
/// killed and the track counted as finished.
const PLAYBACK_GRACE: Duration = Duration::from_secs(2);

/// Errors from the playback collaborators.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Launching or waiting on a child process failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// `ffprobe` exited unsuccessfully.
    #[error("ffprobe failed with {0}")]
    Probe(ExitStatus),

    /// `ffprobe` output was not the expected JSON document.
    #[error("unreadable ffprobe output: {0}")]
    ProbeOutput(#[from] serde_json::Error),

    /// `ffprobe` reported a duration that does not parse.
    #[error("invalid duration {0:?} in ffprobe output")]
    Duration(String),

    /// `yt-dlp` exited unsuccessfully.
    #[error("download failed with {0}")]
    Download(ExitStatus),

    /// `ffplay` exited unsuccessfully.
    #[error("playback failed with {0}")]
    Playback(ExitStatus),

    /// Playback was stopped before this request finished.
    #[error("playback stopped")]
    Stopped,
}

/// Handle to the playback task.
#[derive(Clone)]
pub struct Player {
    jobs: mpsc::UnboundedSender<PlayerJob>,
}

enum PlayerJob {
    Play {
        source: Source,
        done: Option<oneshot::Sender<Result<(), PlayerError>>>,
    },
    Stop {
        done: Option<oneshot::Sender<()>>,
    },
}

enum Source {
    /// A local file, left in place after playback.
    File(PathBuf),
    /// A search query or URL, downloaded first and removed afterwards.
    Query(String),
}

impl Player {
    /// Spawn the playback task on the current runtime.
    pub(crate) fn spawn() -> Self {
        let (jobs, queue) = mpsc::unbounded_channel();
        tokio::spawn(player_task(queue));
        Self { jobs }
    }

    /// Play a local audio file, resolving when its playback finishes or
    /// fails.
    ///
    /// Requests play in arrival order; this call waits through anything
    /// already queued ahead of it.
    pub async fn play_file(&self, path: impl Into<PathBuf>) -> Result<(), PlayerError> {
        self.play(Source::File(path.into())).await
    }

    /// Download the best audio for a search query or URL and play it,
    /// resolving when playback finishes or fails. The downloaded file is
    /// removed afterwards.
    pub async fn play_url(&self, query: impl Into<String>) -> Result<(), PlayerError> {
        self.play(Source::Query(query.into())).await
    }

    /// Queue a search query or URL for download and playback without
    /// waiting on it. Failures are logged by the playback task.
    pub fn enqueue(&self, query: impl Into<String>) {
        let _ = self.jobs.send(PlayerJob::Play {
            source: Source::Query(query.into()),
            done: None,
        });
    }

    /// Kill the in-flight playback process and drop everything queued.
    pub fn stop(&self) {
        let _ = self.jobs.send(PlayerJob::Stop { done: None });
    }

    /// Like [`Player::stop`], but resolves once the kill has happened.
    pub(crate) async fn shutdown(&self) {
        let (done, confirmed) = oneshot::channel();
        if self.jobs.send(PlayerJob::Stop { done: Some(done) }).is_ok() {
            let _ = confirmed.await;
        }
    }

    async fn play(&self, source: Source) -> Result<(), PlayerError> {
        let (done, outcome) = oneshot::channel();
        self.jobs
            .send(PlayerJob::Play { source, done: Some(done) })
            .map_err(|_| PlayerError::Stopped)?;
        outcome.await.map_err(|_| PlayerError::Stopped)?
    }
}

type DoneSender = Option<oneshot::Sender<Result<(), PlayerError>>>;

struct Playing {
    child: Child,
    deadline: Instant,
    done: DoneSender,
    cleanup: Option<PathBuf>,
}

async fn player_task(mut jobs: mpsc::UnboundedReceiver<PlayerJob>) {
    let mut queue: VecDeque<(Source, DoneSender)> = VecDeque::new();
    let mut current: Option<Playing> = None;

    loop {
        if current.is_none() {
            if let Some((source, done)) = queue.pop_front() {
                match start(source).await {
                    Ok(playing) => current = Some(Playing { done, ..playing }),
                    Err(e) => match done {
                        Some(done) => {
                            let _ = done.send(Err(e));
                        }
                        None => error!(error = %e, "queued playback failed"),
                    },
                }
                continue;
            }
        }

        tokio::select! {
            job = jobs.recv() => match job {
                Some(PlayerJob::Play { source, done }) => queue.push_back((source, done)),
                Some(PlayerJob::Stop { done }) => {
                    halt(&mut current, &mut queue).await;
                    if let Some(done) = done {
                        let _ = done.send(());
                    }
                }
                None => {
                    halt(&mut current, &mut queue).await;
                    break;
                }
            },
            outcome = wait_playing(&mut current) => {
                if let Some(finished) = current.take() {
                    finish(finished, outcome).await;
                }
            }
        }
    }
}

/// Download if needed, then launch `ffplay`. The deadline is the probed
/// duration plus a grace period.
async fn start(source: Source) -> Result<Playing, PlayerError> {
    let (path, cleanup) = match source {
        Source::File(path) => (path, None),
        Source::Query(query) => {
            let path = PathBuf::from(DOWNLOAD_FILE);
            download(&query, &path).await?;
            (path.clone(), Some(path))
        }
    };

    let duration = probe_duration(&path).await?;
    info!(path = %path.display(), duration_secs = duration.as_secs(), "playing");

    let child = Command::new("ffplay")
        .args(["-nodisp", "-autoexit", "-v", "-8"])
        .arg(&path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    Ok(Playing {
        child,
        deadline: Instant::now() + duration + PLAYBACK_GRACE,
        done: None,
        cleanup,
    })
}

/// Resolve when the current playback ends, one way or another. Pends
/// forever while nothing is playing.
async fn wait_playing(current: &mut Option<Playing>) -> Result<(), PlayerError> {
    match current {
        Some(playing) => {
            tokio::select! {
                status = playing.child.wait() => match status {
                    Ok(status) if status.success() => Ok(()),
                    Ok(status) => Err(PlayerError::Playback(status)),
                    Err(e) => Err(PlayerError::Io(e)),
                },
                // Overrunning the probed duration counts as finished.
                _ = tokio::time::sleep_until(playing.deadline) => {
                    let _ = playing.child.kill().await;
                    Ok(())
                }
            }
        }
        None => std::future::pending().await,
    }
}

async fn finish(finished: Playing, outcome: Result<(), PlayerError>) {
    match &outcome {
        Ok(()) => debug!("track finished"),
        Err(e) => error!(error = %e, "playback failed"),
    }
    if let Some(done) = finished.done {
        let _ = done.send(outcome);
    }
    remove_download(finished.cleanup).await;
}

async fn halt(
    current: &mut Option<Playing>,
    queue: &mut VecDeque<(Source, DoneSender)>,
) {
    if let Some(mut playing) = current.take() {
        if let Err(e) = playing.child.kill().await {
            error!(error = %e, "failed to kill playback process");
        }
        if let Some(done) = playing.done {
            let _ = done.send(Err(PlayerError::Stopped));
        }
        remove_download(playing.cleanup).await;
    }
    while let Some((_, done)) = queue.pop_front() {
        if let Some(done) = done {
            let _ = done.send(Err(PlayerError::Stopped));
        }
    }
}

async fn remove_download(path: Option<PathBuf>) {
    if let Some(path) = path {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            debug!(path = %path.display(), error = %e, "could not remove download");
        }
    }
}

async fn download(query: &str, target: &Path) -> Result<(), PlayerError> {
    info!(query = %query, "downloading audio");
    let status = Command::new("yt-dlp")
        .args([
            "--format",
            "bestaudio/best",
            "--no-playlist",
            "--default-search",
            "auto",
            "--quiet",
            "--force-overwrites",
        ])
        .arg("--output")
        .arg(target)
        .arg(query)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await?;
    if !status.success() {
        return Err(PlayerError::Download(status));
    }
    Ok(())
}

/// Probe the duration of an audio file with `ffprobe`.
pub async fn probe_duration(path: &Path) -> Result<Duration, PlayerError> {
    let output = Command::new("ffprobe")
        .args(["-v", "-8", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await?;
    if !output.status.success() {
        return Err(PlayerError::Probe(output.status));
    }
    parse_duration(&output.stdout)
}

#[derive(Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: String,
}

fn parse_duration(json: &[u8]) -> Result<Duration, PlayerError> {
    let probe: ProbeOutput = serde_json::from_slice(json)?;
    let raw = probe.format.duration;
    raw.parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .ok_or(PlayerError::Duration(raw))
}
