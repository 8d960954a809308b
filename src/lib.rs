//! Hill Drive Simulation Library
//!
//! Two-wheel vehicle physics over endless procedural terrain. The simulation
//! can run headless or with a Bevy viewer.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
