use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the player adapter.
///
/// "Nothing playing", "no artwork" and malformed timestamps are not errors;
/// those come back as empty values.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("unknown now-playing attribute '{0}'")]
    UnknownAttribute(String),

    #[error("failed to launch {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} did not exit within {timeout:?}")]
    Timeout { path: String, timeout: Duration },

    #[error("I/O error while talking to the player: {0}")]
    Io(#[from] std::io::Error),

    #[error("artwork lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
