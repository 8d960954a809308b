//! Core types for the vehicle simulation
//!
//! These are standalone types that don't depend on Bevy.

/// A unique identifier for a wheel in the world's arena
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WheelId(pub usize);

/// Per-tick player input, fed in by whatever handles the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveInput {
    pub accelerating: bool,
    pub braking: bool,
    /// Extra forward push while in contact with the ground
    pub nitro: bool,
}

impl DriveInput {
    pub fn new(accelerating: bool, braking: bool, nitro: bool) -> Self {
        Self {
            accelerating,
            braking,
            nitro,
        }
    }

    pub fn accelerate() -> Self {
        Self::new(true, false, false)
    }

    pub fn brake() -> Self {
        Self::new(false, true, false)
    }

    /// Accelerate and brake held together
    pub fn brace() -> Self {
        Self::new(true, true, false)
    }

    pub fn is_bracing(&self) -> bool {
        self.accelerating && self.braking
    }
}

/// Size of the visible window in screen units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True unless both dimensions are positive and finite
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Translation from world coordinates to screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraOffset {
    pub x: f64,
    pub y: f64,
}

impl CameraOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A wheel as it should be drawn on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCircle {
    pub x: i32,
    pub y: i32,
    pub radius: f64,
}

/// Small angular speeds below this are snapped to zero
pub const ANGULAR_SNAP_EPSILON: f64 = 1e-4;

/// Rotation about the pair's center is skipped below this angular speed
pub const ROTATION_EPSILON: f64 = 1e-6;

/// Normal speeds below this are treated as landing and get restitution
pub const SOFT_LANDING_SPEED: f64 = 0.2;
