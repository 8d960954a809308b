//! Wheel integration and ground collision
//!
//! World coordinates follow the screen: `y` grows downward. Vertical velocity
//! is measured the other way round, so gravity lowers `vy` and integration
//! subtracts it from `y`.

use anyhow::{ensure, Result};

use super::config::SimConfig;
use super::segment::{LineEquation, Segment};
use super::types::{
    CameraOffset, DriveInput, ScreenCircle, ANGULAR_SNAP_EPSILON, SOFT_LANDING_SPEED,
};

/// A single wheel
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Body tilt, only tracked on the root of a pair
    pub angle: f64,
    /// Tilt rate in radians per tick, only tracked on the root of a pair
    pub omega: f64,
    /// Set on the tick a hard landing registered; read by effects
    pub took_damage: bool,
    pub damage_cooldown_ticks: u32,
    radius: f64,
    is_root: bool,
}

impl Wheel {
    pub fn new(x: f64, y: f64, radius: f64) -> Result<Self> {
        ensure!(
            radius.is_finite() && radius > 0.0,
            "Wheel radius must be positive, got {radius}"
        );
        ensure!(
            x.is_finite() && y.is_finite(),
            "Wheel position must be finite, got ({x}, {y})"
        );
        Ok(Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            omega: 0.0,
            took_damage: false,
            damage_cooldown_ticks: 0,
            radius,
            is_root: false,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether this wheel owns the rotational state of a pair
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub(crate) fn mark_root(&mut self) {
        self.is_root = true;
    }

    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Reset the per-tick damage signal and count the cooldown down
    pub fn begin_tick(&mut self) {
        self.took_damage = false;
        self.damage_cooldown_ticks = self.damage_cooldown_ticks.saturating_sub(1);
    }

    /// Move by the current velocity, then apply gravity and drag
    pub fn integrate(&mut self, config: &SimConfig) {
        self.x += self.vx;
        self.y -= self.vy;

        self.vy -= config.gravity;

        self.vx *= config.air_resistance;
        self.vy *= config.air_resistance;
    }

    /// Resolve contact against every segment in order.
    /// Returns true if any segment was touched.
    pub fn collide<'a>(
        &mut self,
        segments: impl IntoIterator<Item = &'a Segment>,
        input: DriveInput,
        config: &SimConfig,
    ) -> bool {
        let mut touched = false;
        for segment in segments {
            // Vertical segments have no slope to resolve against
            let Some(line) = segment.line() else {
                continue;
            };
            let dist = line.distance_to(self.x, self.y);
            let foot_x = line.foot_x(self.x, self.y);
            if dist < self.radius && segment.contains_x(foot_x) {
                self.resolve_contact(line, dist, input, config);
                touched = true;
            }
        }
        touched
    }

    fn resolve_contact(
        &mut self,
        line: LineEquation,
        dist: f64,
        input: DriveInput,
        config: &SimConfig,
    ) {
        let m = line.slope;

        // Push out along the line's normal
        let overlap = self.radius - dist;
        let normal_angle = (-m).atan2(1.0);
        self.y -= overlap * normal_angle.cos();
        self.x -= overlap * normal_angle.sin();

        // Rotate velocity into line coordinates
        let theta = -m.atan();
        let (sin_t, cos_t) = theta.sin_cos();
        let mut v_along = self.vx * cos_t + self.vy * sin_t;
        let mut v_normal = self.vy * cos_t - self.vx * sin_t;

        self.register_impact(-v_normal, config);

        if v_normal < SOFT_LANDING_SPEED {
            v_normal *= config.restitution;
        }

        // Settle toward rest rather than true friction
        if v_along.abs() > config.rest_threshold() {
            v_along -= v_along.signum() * config.rest_decay();
        } else {
            v_along = 0.0;
        }

        if input.accelerating && v_along < config.max_velocity {
            v_along += config.acceleration * (1.0 - v_along / config.max_velocity);
        }
        if input.braking && v_along > -config.max_velocity {
            v_along -= config.deceleration * (1.0 + v_along / config.max_velocity);
        }
        if input.nitro {
            let boosted_cap = config.max_velocity * config.nitro_velocity_factor;
            if v_along < boosted_cap {
                v_along += config.nitro_acceleration * (1.0 - v_along / boosted_cap);
            }
        }

        // Back to world coordinates
        self.vx = v_along * cos_t - v_normal * sin_t;
        self.vy = v_along * sin_t + v_normal * cos_t;

        if self.is_root {
            // Ground contact bleeds rotational energy
            self.omega *= config.contact_spin_retention;
        }
    }

    /// Flag a hard landing if the cooldown has run out.
    /// Returns true when damage was registered.
    pub fn register_impact(&mut self, impact_speed: f64, config: &SimConfig) -> bool {
        if impact_speed > config.damage_impact_speed && self.damage_cooldown_ticks == 0 {
            self.took_damage = true;
            self.damage_cooldown_ticks = config.damage_cooldown_ticks;
            true
        } else {
            false
        }
    }

    /// Update tilt rate and angle from the held inputs
    pub fn update_tilt(&mut self, input: DriveInput, config: &SimConfig) {
        if input.is_bracing() {
            self.omega *= 0.5;
            self.omega -= config.restoring_torque * self.angle;
            if self.omega.abs() < ANGULAR_SNAP_EPSILON {
                self.omega = 0.0;
            }
            // Nose down while bracing
            self.vy -= config.gravity / 1.5;
        } else if input.accelerating {
            self.omega = (self.omega - config.angular_acceleration).max(-config.max_angular_velocity);
        } else if input.braking {
            self.omega = (self.omega + config.angular_deceleration).min(config.max_angular_velocity);
        } else {
            self.omega *= config.angular_damping;
            if self.omega.abs() < ANGULAR_SNAP_EPSILON {
                self.omega = 0.0;
            }
        }
        self.omega = self
            .omega
            .clamp(-config.max_angular_velocity, config.max_angular_velocity);

        self.angle += self.omega;
        let full_turn = 2.0 * std::f64::consts::PI;
        if self.angle > full_turn {
            self.angle -= full_turn;
        } else if self.angle <= -full_turn {
            self.angle += full_turn;
        }
    }

    /// Screen-space circle if the wheel's bounding box overlaps the rectangle
    /// `(x1, y1)-(x2, y2)` once shifted by the camera offset
    pub fn query_bounds(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        offset: CameraOffset,
    ) -> Option<ScreenCircle> {
        // NaN bounds count as empty
        if !(x2 > x1 && y2 > y1) {
            return None;
        }
        let sx = self.x + offset.x;
        let sy = self.y + offset.y;
        if sx + self.radius < x1
            || sx - self.radius > x2
            || sy + self.radius < y1
            || sy - self.radius > y2
        {
            return None;
        }
        Some(ScreenCircle {
            x: sx.round() as i32,
            y: sy.round() as i32,
            radius: self.radius,
        })
    }
}
