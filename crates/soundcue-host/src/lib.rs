//! Host adapter for soundcue
//!
//! Provides:
//! - Player command lines for macOS (`afplay`) and Windows (`powershell`)
//! - Process spawning with drained stdout/stderr
//! - Graceful termination (SIGTERM on Unix)
//! - Exit observation

mod commands;
mod launcher;
mod process;

pub use commands::*;
pub use launcher::*;
pub use process::*;
