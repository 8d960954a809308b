//! Spring-damper coupling between two wheels
//!
//! A pair is stored as plain ids into the world's wheel arena. The root wheel
//! carries the pair's tilt; the partner only ever receives forces.

use super::config::SimConfig;
use super::types::{WheelId, ROTATION_EPSILON};
use super::wheel::Wheel;

/// Relation between a root wheel and one attached partner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelPair {
    pub root: WheelId,
    pub partner: WheelId,
    rest_length: f64,
}

impl WheelPair {
    /// Fix the rest length at the wheels' current separation
    pub fn attach(root: WheelId, partner: WheelId, root_wheel: &Wheel, partner_wheel: &Wheel) -> Self {
        let dx = partner_wheel.x - root_wheel.x;
        let dy = partner_wheel.y - root_wheel.y;
        Self {
            root,
            partner,
            rest_length: (dx * dx + dy * dy).sqrt(),
        }
    }

    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    pub fn involves(&self, id: WheelId) -> bool {
        self.root == id || self.partner == id
    }
}

/// Distance between the two wheel centers
pub fn separation(a: &Wheel, b: &Wheel) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Rotate both wheels about their midpoint by a small angle `delta`.
///
/// This is applied every tick with the root's angular speed, not derived from
/// its accumulated angle, so the body's real orientation and `angle` drift apart
/// whenever collisions or the spring move the wheels.
pub fn rotate_about_center(root: &mut Wheel, partner: &mut Wheel, delta: f64) {
    if delta.abs() <= ROTATION_EPSILON {
        return;
    }
    let cx = (root.x + partner.x) / 2.0;
    let cy = (root.y + partner.y) / 2.0;
    let (sin_a, cos_a) = delta.sin_cos();

    for wheel in [root, partner] {
        let rx = wheel.x - cx;
        let ry = wheel.y - cy;
        wheel.x = cx + rx * cos_a - ry * sin_a;
        wheel.y = cy + rx * sin_a + ry * cos_a;
    }
}

/// Net spring-minus-damping impulse to take from `first` and give to `second`,
/// or `None` when the wheels sit on top of each other.
pub fn spring_impulse(first: &Wheel, second: &Wheel, rest_length: f64, config: &SimConfig) -> Option<(f64, f64)> {
    let dx = second.x - first.x;
    let dy = second.y - first.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return None;
    }

    let spring = (distance - rest_length) * config.spring_constant;
    // Vertical velocity points up while y points down
    let unit_x = -dx / distance;
    let unit_y = dy / distance;
    let force_x = unit_x * spring;
    let force_y = unit_y * spring;

    let damping_x = (second.vx - first.vx) * config.damping_factor;
    let damping_y = (second.vy - first.vy) * config.damping_factor;

    Some((force_x - damping_x, force_y - damping_y))
}

/// Apply the coupling impulse to both wheels. The pair's total momentum is unchanged.
pub fn apply_spring(first: &mut Wheel, second: &mut Wheel, rest_length: f64, config: &SimConfig) -> Option<(f64, f64)> {
    let (ix, iy) = spring_impulse(first, second, rest_length, config)?;
    first.vx -= ix;
    first.vy -= iy;
    second.vx += ix;
    second.vy += iy;
    Some((ix, iy))
}
