//! Systems for stepping the simulation and drawing its state

use bevy::math::Isometry2d;
use bevy::prelude::*;

use super::components::{HeldInput, MainCamera, SimWorldResource};
use crate::simulation::Viewport;

const TERRAIN_COLOR: Color = Color::srgb(0.0, 0.59, 0.2);
const BODY_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

/// System to spawn the 2D camera
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));
}

/// System to run one simulation tick
pub fn tick_simulation(held: Res<HeldInput>, mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick(held.0);
}

/// Screen coordinates (origin top-left, y down) to Bevy's centered y-up space
fn to_bevy(viewport: Viewport, x: f64, y: f64) -> Vec2 {
    Vec2::new(
        (x - viewport.width / 2.0) as f32,
        (viewport.height / 2.0 - y) as f32,
    )
}

/// System to draw terrain and wheels from a settled snapshot
pub fn draw_world(sim_world: Res<SimWorldResource>, mut gizmos: Gizmos) {
    let snapshot = sim_world.0.snapshot();
    let viewport = snapshot.viewport;

    for [x1, y1, x2, y2] in snapshot.visible_segments() {
        gizmos.line_2d(
            to_bevy(viewport, x1.into(), y1.into()),
            to_bevy(viewport, x2.into(), y2.into()),
            TERRAIN_COLOR,
        );
    }

    let circles = snapshot.visible_wheels();
    for (_, circle) in &circles {
        let center = to_bevy(viewport, circle.x.into(), circle.y.into());
        gizmos.circle_2d(Isometry2d::from_translation(center), circle.radius as f32, Color::WHITE);
    }

    for pair in sim_world.0.pairs() {
        let root = circles.iter().find(|(id, _)| *id == pair.root);
        let partner = circles.iter().find(|(id, _)| *id == pair.partner);
        if let (Some((_, a)), Some((_, b))) = (root, partner) {
            gizmos.line_2d(
                to_bevy(viewport, a.x.into(), a.y.into()),
                to_bevy(viewport, b.x.into(), b.y.into()),
                BODY_COLOR,
            );
        }
    }
}

/// System to shake the camera while a wheel is recovering from a hard landing
pub fn shake_camera(
    sim_world: Res<SimWorldResource>,
    time: Res<Time>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let cooldown = sim_world
        .0
        .wheels()
        .iter()
        .map(|w| w.damage_cooldown_ticks)
        .max()
        .unwrap_or(0);
    let strength = (cooldown as f32 / 10.0).min(6.0);
    for mut transform in camera.iter_mut() {
        let t = time.elapsed_secs() * 60.0;
        transform.translation.x = strength * t.sin();
        transform.translation.y = strength * (t * 1.3).cos();
    }
}
