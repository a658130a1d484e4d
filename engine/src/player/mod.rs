// --- DeaDBeeF adapter ------------------------------------------------------
//
// Everything the web layer knows about the player goes through `Player`.
// Each call spawns `deadbeef` once and parses what it prints; nothing is
// cached and no state is kept between calls, so a `Player` can be shared
// freely between request handlers.

pub mod action;
pub mod artwork;
pub mod command;
pub mod format;
pub mod snapshot;
pub mod timestamp;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

pub use action::Action;
pub use artwork::Artwork;
pub use command::{CommandOutput, CommandRunner, ProcessRunner};
pub use format::{Attribute, AttributeRequest};
pub use snapshot::Snapshot;
pub use timestamp::parse_timestamp;

use crate::error::Result;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DeaDBeeF (\d+\.\d+\.\d+)").expect("version regex"));

/// Handle on a DeaDBeeF installation.
#[derive(Clone)]
pub struct Player {
    path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl Player {
    /// Player driven through the executable at `path`.
    pub fn new(path: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        let path = path.into();
        let runner = ProcessRunner::new(path.clone()).with_timeout(timeout);
        Self {
            path,
            runner: Arc::new(runner),
        }
    }

    /// Player whose invocations go through `runner` instead of a child process.
    pub fn with_runner(path: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.runner.run(&args).await
    }

    /// Query the current track for `request`.
    ///
    /// An empty request returns an empty snapshot without running the player.
    pub async fn now_playing(&self, request: &AttributeRequest) -> Result<Snapshot> {
        if request.is_empty() {
            return Ok(Snapshot::empty());
        }

        let out = self.run(["--nowplaying".to_string(), request.format_string()]).await?;
        if !out.success() {
            debug!("--nowplaying exited with {:?}; treating as nothing playing", out.code);
            return Ok(Snapshot::empty());
        }
        Ok(Snapshot::parse(request, &out.stdout))
    }

    /// Like [`now_playing`](Self::now_playing) but returns values in request
    /// order, `None` where there is nothing to report.
    pub async fn now_playing_values(&self, request: &AttributeRequest) -> Result<Vec<Option<String>>> {
        Ok(self.now_playing(request).await?.values(request))
    }

    /// `x.y.z` from `--version`, or an empty string if it can't be found.
    pub async fn version(&self) -> Result<String> {
        let out = self.run(["--version"]).await?;
        Ok(parse_version(&out.stdout))
    }

    /// Playback position as a percentage of track length.
    ///
    /// 0.0 when nothing is playing or either timestamp is unusable.
    pub async fn progress(&self) -> Result<f64> {
        let request = AttributeRequest::new([Attribute::PlaybackPos, Attribute::Length]);
        let values = self.now_playing_values(&request).await?;

        let seconds = |v: Option<&String>| v.and_then(|s| parse_timestamp(s));
        let (Some(pos), Some(len)) = (seconds(values[0].as_ref()), seconds(values[1].as_ref())) else {
            return Ok(0.0);
        };
        Ok(percentage(pos, len))
    }

    /// Cover art for the current track, if any source has one.
    pub async fn album_cover(&self) -> Result<Option<Artwork>> {
        let request = AttributeRequest::new([Attribute::FullPath, Attribute::FullDir]);
        let values = self.now_playing_values(&request).await?;

        let (Some(path), Some(dir)) = (non_empty(&values[0]), non_empty(&values[1])) else {
            return Ok(None);
        };
        let (track, dir) = (PathBuf::from(path), PathBuf::from(dir));

        let art = tokio::task::spawn_blocking(move || artwork::resolve(&track, &dir)).await?;
        Ok(art)
    }

    /// Run a transport action. `Ok(false)` means the player exited non-zero.
    pub async fn perform(&self, action: Action) -> Result<bool> {
        let out = self.run([action.flag()]).await?;
        if !out.success() {
            warn!("{} exited with {:?}", action.flag(), out.code);
        }
        Ok(out.success())
    }

    /// Append `paths` to the play queue.
    pub async fn enqueue<I, S>(&self, paths: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = std::iter::once("--queue".to_string()).chain(paths.into_iter().map(Into::into));
        let out = self.run(args).await?;
        if !out.success() {
            warn!("--queue exited with {:?}", out.code);
        }
        Ok(out.success())
    }
}

fn parse_version(stdout: &str) -> String {
    VERSION_RE
        .captures(stdout)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn percentage(pos: u64, len: u64) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (100.0 * pos as f64 / len as f64).clamp(0.0, 100.0)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim_end).filter(|s| !s.is_empty())
}
