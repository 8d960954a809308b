//! Input handling systems

use bevy::prelude::*;

use super::components::HeldInput;

/// Map the keyboard onto the drive input for the next tick
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut held: ResMut<HeldInput>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }

    held.0.accelerating = keyboard.pressed(KeyCode::KeyD);
    held.0.braking = keyboard.pressed(KeyCode::KeyA);
    held.0.nitro = keyboard.pressed(KeyCode::Space);
}
