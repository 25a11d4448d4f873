use crate::constants::{PULSE_AMPLITUDE, ROTATION_RATES};
use crate::shapes::{Shape, ShapePool};
use glam::Vec3;

/// Advance one shape to `elapsed` seconds on the render clock.
///
/// Hidden shapes are returned unchanged. Visible shapes spin on three axes and
/// pulse around their base scale; clicked shapes stop pulsing and ease toward
/// their shrunken `target_scale`. `blend` is the per-frame smoothing factor.
pub fn animate(shape: &Shape, elapsed: f32, blend: f32) -> Shape {
    let mut next = shape.clone();
    if !shape.is_visible() {
        return next;
    }
    let t = elapsed * shape.rotation_speed;
    next.rotation = Vec3::new(
        t * ROTATION_RATES[0],
        t * ROTATION_RATES[1],
        t * ROTATION_RATES[2],
    );
    let desired = desired_scale(shape, t);
    next.scale = shape.scale + (desired - shape.scale) * blend.clamp(0.0, 1.0);
    next
}

#[inline]
fn desired_scale(shape: &Shape, t: f32) -> f32 {
    let desired = if shape.is_clicked() {
        shape.target_scale
    } else {
        let pulse = (t + shape.pulse_phase).sin() * PULSE_AMPLITUDE + 1.0;
        shape.base_scale * pulse
    };
    if desired.is_finite() && desired > 0.0 {
        desired
    } else {
        shape.base_scale
    }
}

/// Apply [`animate`] to every shape in the pool.
pub fn step_pool(pool: &mut ShapePool, elapsed: f32, blend: f32) {
    for shape in pool.iter_mut() {
        *shape = animate(shape, elapsed, blend);
    }
}
