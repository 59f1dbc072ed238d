//! Shared utilities for soundcue
//!
//! This crate provides:
//! - The `PlaybackId` type and its random generator
//! - Default paths for the configuration file

mod ids;
mod paths;

pub use ids::*;
pub use paths::*;
