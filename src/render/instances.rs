use crate::constants::*;
use garden_core::Shape;
use glam::{EulerRot, Mat4, Quat, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
    /// rgb + intensity
    pub emissive: [f32; 4],
    /// x: 1 for lit, 0 for unlit
    pub material: [f32; 4],
}

/// Instances for one frame: lit bodies first, then glow shells.
#[derive(Clone, Debug, Default)]
pub struct InstanceBatch {
    pub instances: Vec<InstanceRaw>,
    pub bodies: u32,
}

impl InstanceBatch {
    pub fn glows(&self) -> u32 {
        self.instances.len() as u32 - self.bodies
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.bodies = 0;
    }
}

pub fn shape_model(shape: &Shape) -> Mat4 {
    let r = shape.rotation;
    Mat4::from_scale_rotation_translation(
        Vec3::splat(shape.scale),
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
        shape.position,
    )
}

fn body(shape: &Shape) -> InstanceRaw {
    let (color, opacity, emissive, intensity) = if shape.is_clicked() {
        (CLICKED_COLOR, CLICKED_OPACITY, CLICKED_COLOR, CLICKED_EMISSIVE_INTENSITY)
    } else {
        (PRIMARY_COLOR, RING_OPACITY, SECONDARY_COLOR, EMISSIVE_INTENSITY)
    };
    InstanceRaw {
        model: shape_model(shape).to_cols_array_2d(),
        color: [color[0], color[1], color[2], opacity],
        emissive: [emissive[0], emissive[1], emissive[2], intensity],
        material: [1.0, 0.0, 0.0, 0.0],
    }
}

// Unrotated, unit-scale halo at the ring's position.
fn glow(shape: &Shape) -> InstanceRaw {
    let c = PRIMARY_COLOR;
    InstanceRaw {
        model: Mat4::from_translation(shape.position).to_cols_array_2d(),
        color: [c[0], c[1], c[2], GLOW_OPACITY],
        emissive: [0.0; 4],
        material: [0.0; 4],
    }
}

/// Pack visible shapes into `batch`, bodies sorted back to front from `eye`.
pub fn build_instances<'s>(
    shapes: impl Iterator<Item = &'s Shape>,
    eye: Vec3,
    batch: &mut InstanceBatch,
) {
    batch.clear();
    let mut visible: Vec<&Shape> = shapes.filter(|s| s.is_visible()).collect();
    visible.truncate(MAX_POOL_SIZE);
    visible.sort_by(|a, b| {
        let da = a.position.distance_squared(eye);
        let db = b.position.distance_squared(eye);
        db.total_cmp(&da)
    });
    batch.instances.extend(visible.iter().map(|s| body(s)));
    batch.bodies = batch.instances.len() as u32;
    batch.instances.extend(
        visible
            .iter()
            .filter(|s| !s.is_clicked())
            .map(|s| glow(s)),
    );
}
