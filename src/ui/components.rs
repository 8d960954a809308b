//! UI components and resources for linking Bevy to simulation state

use bevy::prelude::*;

use crate::simulation::{DriveInput, SimWorld};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

/// Input currently held on the keyboard
#[derive(Resource, Default)]
pub struct HeldInput(pub DriveInput);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;
