// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::{Vec2, Vec3};
use input::*;

#[test]
fn ray_sphere_hits_front_surface() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0)
        .expect("ray should hit");
    assert!((t - 3.0).abs() < 1e-5);
}

#[test]
fn ray_sphere_miss() {
    let hit = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(hit.is_none());
}

#[test]
fn ray_sphere_tangent_counts_as_hit() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(2.0, 0.0, 5.0), 2.0)
        .expect("grazing ray should hit");
    assert!((t - 5.0).abs() < 1e-3);
}

#[test]
fn ray_sphere_ignores_spheres_behind_origin() {
    let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0);
    assert!(hit.is_none());
}

#[test]
fn ray_sphere_from_inside_is_not_a_hit() {
    let hit = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::ZERO, 3.0);
    assert!(hit.is_none());
}

fn target(index: usize, z: f32) -> PickTarget {
    PickTarget {
        index,
        center: Vec3::new(0.0, 0.0, z),
        radius: 1.0,
    }
}

#[test]
fn pick_nearest_prefers_closest_hit() {
    // camera at z=10 looking down -Z: larger z is closer
    let targets = [target(3, -2.0), target(7, 2.0), target(9, 0.0)];
    let hit = pick_nearest(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, &targets);
    assert_eq!(hit, Some(7));
}

#[test]
fn pick_nearest_returns_shape_index_not_slot() {
    let targets = [PickTarget {
        index: 11,
        center: Vec3::new(4.0, 0.0, 0.0),
        radius: 0.5,
    }];
    let ro = Vec3::new(4.0, 0.0, 10.0);
    assert_eq!(pick_nearest(ro, Vec3::NEG_Z, &targets), Some(11));
    assert_eq!(pick_nearest(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, &targets), None);
}

#[test]
fn pick_nearest_empty() {
    assert_eq!(pick_nearest(Vec3::ZERO, Vec3::Z, &[]), None);
}

#[test]
fn css_to_backing_scales_by_device_ratio() {
    let p = css_to_backing(
        Vec2::new(100.0, 50.0),
        Vec2::new(400.0, 200.0),
        Vec2::new(800.0, 400.0),
    );
    assert_eq!(p, Vec2::new(200.0, 100.0));
}

#[test]
fn css_to_backing_zero_sized_canvas_maps_to_center() {
    let p = css_to_backing(Vec2::new(10.0, 10.0), Vec2::ZERO, Vec2::new(300.0, 150.0));
    assert_eq!(p, Vec2::new(150.0, 75.0));
}
