#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod camera {
    include!("../src/camera.rs");
}

use camera::Camera;
use constants::CAMERA_Z;
use glam::Vec3;

#[test]
fn center_pixel_looks_at_origin() {
    let cam = Camera::new(CAMERA_Z);
    let (ro, rd) = cam.screen_ray(400.0, 300.0, 800.0, 600.0);
    assert_eq!(ro, Vec3::new(0.0, 0.0, CAMERA_Z));
    assert!(rd.x.abs() < 1e-4 && rd.y.abs() < 1e-4);
    assert!((rd.z + 1.0).abs() < 1e-4);
}

#[test]
fn screen_axes_map_to_world_axes() {
    let cam = Camera::new(CAMERA_Z);
    let (_, top_left) = cam.screen_ray(0.0, 0.0, 800.0, 600.0);
    assert!(top_left.x < 0.0);
    assert!(top_left.y > 0.0);
    let (_, bottom_right) = cam.screen_ray(800.0, 600.0, 800.0, 600.0);
    assert!(bottom_right.x > 0.0);
    assert!(bottom_right.y < 0.0);
}

#[test]
fn edge_ray_matches_vertical_fov() {
    let cam = Camera::new(CAMERA_Z);
    let (_, rd) = cam.screen_ray(300.0, 0.0, 600.0, 600.0);
    let half = (rd.y / -rd.z).atan();
    assert!((half - cam.fov_y_rad / 2.0).abs() < 1e-3);
}

#[test]
fn degenerate_viewport_still_yields_unit_ray() {
    let cam = Camera::new(CAMERA_Z);
    let (_, rd) = cam.screen_ray(0.0, 0.0, 0.0, 0.0);
    assert!((rd.length() - 1.0).abs() < 1e-4);
}
