//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI feeds keyboard state into `SimWorld::tick` and draws a snapshot taken after each tick.

mod components;
mod input;
mod sync;

use bevy::prelude::*;

pub use components::{HeldInput, SimWorldResource};

use crate::simulation::SimWorld;
use input::handle_input;
use sync::{draw_world, setup_camera, shake_camera, tick_simulation};

/// Simulation rate in ticks per second
pub const TICK_HZ: f64 = 200.0;

/// Plugin to register all UI systems
pub struct HillDriveUIPlugin {
    world: SimWorld,
}

impl HillDriveUIPlugin {
    pub fn new(world: SimWorld) -> Self {
        Self { world }
    }
}

impl Plugin for HillDriveUIPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimWorldResource(self.world.clone()))
            .init_resource::<HeldInput>()
            .insert_resource(ClearColor(Color::BLACK))
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (handle_input, draw_world, shake_camera))
            .add_systems(FixedUpdate, tick_simulation);
    }
}
