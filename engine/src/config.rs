use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;

pub const DEFAULT_PLAYER: &str = "/opt/deadbeef/bin/deadbeef";
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Web UI to control DeaDBeeF.
///
/// Every option can also come from a `BEEFDEETS_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "beefdeets", version, about)]
pub struct Config {
    /// Address to bind to.
    #[arg(env = "BEEFDEETS_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind to.
    #[arg(env = "BEEFDEETS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path to the DeaDBeeF executable.
    #[arg(long, env = "BEEFDEETS_PLAYER", default_value = DEFAULT_PLAYER)]
    pub player: PathBuf,

    /// Kill a player invocation that runs longer than this many seconds.
    #[arg(long, env = "BEEFDEETS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Directory holding index.js and index.css.
    #[arg(long, env = "BEEFDEETS_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Refuse to start without a player to drive.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.player.is_file() {
            bail!("DeaDBeeF executable {} does not exist", self.player.display());
        }
        Ok(())
    }
}
