// beefdeets: a small web control panel for DeaDBeeF.
//
//   - `player` wraps the `deadbeef` command line (now playing, transport,
//     queue, cover art)
//   - `http` exposes it as JSON endpoints and one HTML page
//   - `config` is the command line / environment surface of the binary

pub mod config;
pub mod error;
pub mod http;
pub mod player;

pub use error::{PlayerError, Result};
pub use player::Player;
