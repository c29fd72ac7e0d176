//! # Contracts
//!
//! Shared data structures and traits for the sensor HUD pipeline.
//! Every other crate in the workspace depends on this one; it depends on none of them.
//!
//! ## Time Model
//! - Sample timestamps are microseconds (`u64`) on the video clock
//! - Config offsets (`startoff`/`endoff`) are milliseconds

mod canvas;
mod config;
mod error;
mod sample;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use sample::*;
