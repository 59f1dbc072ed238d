//! Playback registry for soundcue
//!
//! Launches one external player process per `play` call and keeps a registry
//! of the live ones so they can be stopped early:
//! - `Player::play` / `Player::play_tracked` start playback and return at once
//! - `Player::stop` / `Player::stop_all` terminate tracked players
//! - `Finished` resolves once a playback is over, whatever the reason

mod outcome;
mod player;
mod registry;

pub use outcome::*;
pub use player::*;
pub use registry::ActivePlayback;
