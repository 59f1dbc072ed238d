//! Host adapter trait interfaces for soundcue
//!
//! This crate defines the interface between the playback registry and the
//! platform-specific pieces: how a player command line is built, how it is
//! launched, and how its exit is observed. It contains no platform code itself.

mod command;
mod mock;
mod platform;
mod status;
mod traits;

pub use command::*;
pub use mock::*;
pub use platform::*;
pub use status::*;
pub use traits::*;
