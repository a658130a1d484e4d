use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{PlayerError, Result};

/// What a finished player invocation left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The single point of contact with the player executable.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Spawns the real executable once per call and waits for it.
///
/// stderr goes to `/dev/null`; DeaDBeeF is chatty there (plugin loading,
/// GTK warnings) and none of it is useful to callers.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Kill the child and fail with [`PlayerError::Timeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let path = self.executable.display().to_string();
        debug!("exec {} {:?}", path, args);

        let mut cmd = Command::new(&self.executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // A dropped request (client went away, timeout) must not leave
            // the child running.
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| PlayerError::Spawn {
            path: path.clone(),
            source,
        })?;

        let out = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| PlayerError::Timeout { path: path.clone(), timeout })??,
            None => child.wait_with_output().await?,
        };

        let output = CommandOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        };
        debug!("exit {:?} from {}", output.code, path);
        Ok(output)
    }
}

/// Test double that answers every call with the same output and records the
/// argument vectors it was given.
#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;

    pub(crate) struct FakeRunner {
        reply: CommandOutput,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        pub(crate) fn new(code: i32, stdout: &str) -> Self {
            Self {
                reply: CommandOutput {
                    code: Some(code),
                    stdout: stdout.to_string(),
                },
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, args: &[String]) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(self.reply.clone())
        }
    }
}
