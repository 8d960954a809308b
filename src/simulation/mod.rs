//! Standalone vehicle simulation module
//!
//! This module contains the terrain and wheel physics that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod config;
mod coupling;
mod segment;
mod terrain;
mod types;
mod wheel;
mod world;

pub use config::{Preset, SimConfig};
pub use coupling::{apply_spring, rotate_about_center, separation, spring_impulse, WheelPair};
pub use segment::{LineEquation, Segment};
pub use terrain::{Terrain, TerrainGenerator, MAX_SEGMENTS_PER_SCREEN};
pub use types::{
    CameraOffset, DriveInput, ScreenCircle, Viewport, WheelId, ANGULAR_SNAP_EPSILON,
    ROTATION_EPSILON, SOFT_LANDING_SPEED,
};
pub use wheel::Wheel;
pub use world::{
    SimWorld, WorldSnapshot, DEFAULT_SPAWN_X, DEFAULT_SPAWN_Y, DEFAULT_WHEELBASE,
    DEFAULT_WHEEL_RADIUS,
};
