// Host-side tests for front-end constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_frames_the_scene() {
    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_FAR > CAMERA_Z);
    assert!(CAMERA_FOV_Y_DEG > 0.0 && CAMERA_FOV_Y_DEG < 180.0);
    // picking never shrinks a ring's bounding sphere
    assert!(PICK_RADIUS_SLACK >= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn opacities_and_intensities_are_unit_range() {
    for v in [
        RING_OPACITY,
        CLICKED_OPACITY,
        GLOW_OPACITY,
        EMISSIVE_INTENSITY,
        CLICKED_EMISSIVE_INTENSITY,
        AMBIENT_INTENSITY,
    ] {
        assert!((0.0..=1.0).contains(&v), "{v} out of range");
    }
    // collected rings fade out, glow stays faint
    assert!(CLICKED_OPACITY < RING_OPACITY);
    assert!(GLOW_OPACITY < CLICKED_OPACITY);
}

#[test]
fn palette_channels_are_normalized() {
    for c in [PRIMARY_COLOR, SECONDARY_COLOR, CLICKED_COLOR] {
        assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
    }
    assert!(CLEAR_COLOR.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn instance_buffer_fits_body_and_glow_per_ring() {
    assert_eq!(MAX_INSTANCES, MAX_POOL_SIZE * 2);
    assert!(MAX_POOL_SIZE >= garden_core::POOL_SIZE);
}

#[test]
fn data_attributes_are_prefixed() {
    for attr in [
        SECTION_TAB_ATTR,
        SECTION_ATTR,
        POOL_SIZE_ATTR,
        SEED_ATTR,
        SHAPE_ATTR,
        TRANSITIONING_ATTR,
    ] {
        assert!(attr.starts_with("data-"), "{attr}");
    }
}
