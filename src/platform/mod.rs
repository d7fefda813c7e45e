//! Platform glue between the host page and the simulation
//!
//! - Keyboard mapping with phase gating (`input`)
//! - Frame driver with start/stop/pause/resume (`runner`)

pub mod input;
pub mod runner;

pub use input::{Controls, Key};
pub use runner::{Engine, LoopToken};
