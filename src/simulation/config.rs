//! Tunable constants for the vehicle simulation
//!
//! Every number the physics reads lives in [`SimConfig`]. A world is built
//! with one config and keeps it for its whole lifetime, so different levels
//! can run different tunings side by side.

use anyhow::{ensure, Result};

/// Named tunings shipped with the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// Light, floaty first-generation handling
    Classic,
    /// Default handling with tilt and nitro
    #[default]
    Tilt,
    /// Heavier body with a stiff suspension
    Heavy,
}

/// All physics and terrain tunables
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Subtracted from vertical velocity every tick
    pub gravity: f64,
    /// Velocity multiplier applied every tick
    pub air_resistance: f64,
    /// Asymptotic cap for speed along the ground
    pub max_velocity: f64,
    /// Multiplier applied to normal velocity on soft landings (negative bounces)
    pub restitution: f64,
    /// Carried for tuning parity; the integrator uses settle-to-rest decay instead
    pub friction: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub spring_constant: f64,
    pub damping_factor: f64,

    pub angular_acceleration: f64,
    pub angular_deceleration: f64,
    /// Per-tick omega multiplier when no input is held
    pub angular_damping: f64,
    pub max_angular_velocity: f64,
    /// Torque pulling the body level while bracing
    pub restoring_torque: f64,
    /// Omega multiplier while the root wheel touches the ground
    pub contact_spin_retention: f64,

    pub nitro_acceleration: f64,
    /// Boosted speed cap as a multiple of `max_velocity`
    pub nitro_velocity_factor: f64,
    /// Impact speed into the ground that counts as damage
    pub damage_impact_speed: f64,
    pub damage_cooldown_ticks: u32,

    /// Horizontal length of each terrain segment
    pub terrain_step: f64,
    pub initial_difficulty: f64,
    pub difficulty_increment: f64,
    /// Exponent in (0, 1) damping large slopes
    pub irregularity: f64,
    /// Retained terrain, in multiples of the visible width
    pub retention_screens: usize,
    /// Distance the camera trails behind the vehicle
    pub camera_lead: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 0.05,
            air_resistance: 0.9995,
            max_velocity: 25.0,
            restitution: -0.1,
            friction: 0.9985,
            acceleration: 0.25,
            deceleration: 0.1,
            spring_constant: 0.05,
            damping_factor: 0.02,

            angular_acceleration: 0.0005,
            angular_deceleration: 0.0005,
            angular_damping: 0.98,
            max_angular_velocity: 0.018,
            restoring_torque: 0.002,
            contact_spin_retention: 0.9,

            nitro_acceleration: 0.15,
            nitro_velocity_factor: 1.5,
            damage_impact_speed: 5.0,
            damage_cooldown_ticks: 60,

            terrain_step: 20.0,
            initial_difficulty: 0.01,
            difficulty_increment: 0.001,
            irregularity: 0.5,
            retention_screens: 3,
            camera_lead: 200.0,
        }
    }
}

impl SimConfig {
    pub fn preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Tilt => base,
            Preset::Classic => Self {
                gravity: 0.02,
                air_resistance: 0.9999,
                max_velocity: 10.0,
                restitution: -0.2,
                friction: 0.99,
                acceleration: 0.1,
                deceleration: 0.075,
                spring_constant: 0.01,
                damping_factor: 0.05,
                ..base
            },
            Preset::Heavy => Self {
                gravity: 0.1,
                air_resistance: 0.9992,
                max_velocity: 30.0,
                restitution: -0.2,
                friction: 0.003,
                acceleration: 0.3,
                deceleration: 0.3,
                spring_constant: 0.6,
                damping_factor: 0.06,
                ..base
            },
        }
    }

    /// Speed along the ground below which the settle-to-rest decay snaps to zero
    pub fn rest_threshold(&self) -> f64 {
        self.max_velocity / 1000.0
    }

    /// Fixed per-contact nudge of tangential speed toward zero
    pub fn rest_decay(&self) -> f64 {
        self.max_velocity / 1500.0
    }

    /// Check that the tunables keep the simulation bounded
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gravity", self.gravity),
            ("air_resistance", self.air_resistance),
            ("max_velocity", self.max_velocity),
            ("restitution", self.restitution),
            ("friction", self.friction),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("spring_constant", self.spring_constant),
            ("damping_factor", self.damping_factor),
            ("angular_acceleration", self.angular_acceleration),
            ("angular_deceleration", self.angular_deceleration),
            ("angular_damping", self.angular_damping),
            ("max_angular_velocity", self.max_angular_velocity),
            ("restoring_torque", self.restoring_torque),
            ("contact_spin_retention", self.contact_spin_retention),
            ("nitro_acceleration", self.nitro_acceleration),
            ("nitro_velocity_factor", self.nitro_velocity_factor),
            ("damage_impact_speed", self.damage_impact_speed),
            ("terrain_step", self.terrain_step),
            ("initial_difficulty", self.initial_difficulty),
            ("difficulty_increment", self.difficulty_increment),
            ("irregularity", self.irregularity),
            ("camera_lead", self.camera_lead),
        ];
        for (name, value) in fields {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }

        ensure!(
            self.air_resistance > 0.0 && self.air_resistance <= 1.0,
            "air_resistance must be in (0, 1], got {}",
            self.air_resistance
        );
        ensure!(
            self.angular_damping > 0.0 && self.angular_damping <= 1.0,
            "angular_damping must be in (0, 1], got {}",
            self.angular_damping
        );
        ensure!(
            self.contact_spin_retention > 0.0 && self.contact_spin_retention <= 1.0,
            "contact_spin_retention must be in (0, 1], got {}",
            self.contact_spin_retention
        );
        ensure!(self.max_velocity > 0.0, "max_velocity must be positive");
        ensure!(
            self.max_angular_velocity > 0.0,
            "max_angular_velocity must be positive"
        );
        ensure!(
            self.nitro_velocity_factor > 0.0,
            "nitro_velocity_factor must be positive"
        );
        ensure!(self.terrain_step > 0.0, "terrain_step must be positive");
        ensure!(
            self.irregularity > 0.0 && self.irregularity < 1.0,
            "irregularity must be in (0, 1), got {}",
            self.irregularity
        );
        ensure!(
            self.difficulty_increment >= 0.0,
            "difficulty_increment must not be negative"
        );
        ensure!(self.retention_screens > 0, "retention_screens must be at least 1");
        Ok(())
    }
}
