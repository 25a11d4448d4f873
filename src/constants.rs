// DOM hooks, camera and palette for the browser front-end.
//
// Tuning for the scene itself (spawn cadence, blend factors, scroll-spy
// weights) lives in `garden_core::constants`; this module only holds what
// the page and the renderer need.

// Element ids and attributes the page provides
pub const CANVAS_ID: &str = "hero-canvas";
pub const PROGRESS_ID: &str = "garden-progress";
pub const COMPLETE_ID: &str = "garden-complete";
pub const ABOUT_SCROLL_ID: &str = "about-scroll";
pub const SECTION_TAB_ATTR: &str = "data-section-tab";
pub const SECTION_ATTR: &str = "data-section";
pub const POOL_SIZE_ATTR: &str = "data-pool-size";
pub const SEED_ATTR: &str = "data-seed";
pub const SHAPE_ATTR: &str = "data-shape";
// Set by the host page while the hero section animates in or out
pub const TRANSITIONING_ATTR: &str = "data-transitioning";
pub const HIDDEN_CLASS: &str = "hidden";

// Upper bound on the canvas pool-size override
pub const MAX_POOL_SIZE: usize = 32;

// Overlay copy
pub const GARDEN_TITLE: &str = "Musical Torus Garden";
pub const GARDEN_HINT: &str = "Tap the rings to create harmonies";
pub const COMPLETE_TITLE: &str = "Harmonic Resonance!";
pub const COMPLETE_BODY: &str = "You created a musical pattern.";

// Camera
// Z distance used by both picking and the renderer's view matrix.
pub const CAMERA_Z: f32 = 10.0;
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Picking slack on top of a ring's bounding sphere
pub const PICK_RADIUS_SLACK: f32 = 1.1;

// Palette (linear-ish RGB)
pub const PRIMARY_COLOR: [f32; 3] = [0.0, 0.737, 0.831]; // #00bcd4
pub const SECONDARY_COLOR: [f32; 3] = [1.0, 0.251, 0.506]; // #ff4081
pub const CLICKED_COLOR: [f32; 3] = [0.0, 1.0, 0.0]; // #00ff00
pub const CLEAR_COLOR: [f64; 3] = [0.02, 0.03, 0.06];

// Material
pub const RING_OPACITY: f32 = 0.8;
pub const CLICKED_OPACITY: f32 = 0.3;
pub const GLOW_OPACITY: f32 = 0.1;
pub const EMISSIVE_INTENSITY: f32 = 0.4;
pub const CLICKED_EMISSIVE_INTENSITY: f32 = 0.3;
pub const AMBIENT_INTENSITY: f32 = 0.4;

// Lights: position and intensity
pub const KEY_LIGHT_POS: [f32; 3] = [10.0, 10.0, 10.0];
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;
pub const FILL_LIGHT_POS: [f32; 3] = [-10.0, -5.0, -10.0];
pub const FILL_LIGHT_INTENSITY: f32 = 0.8;

// Two instances per ring (body + glow shell), so the instance buffer holds
// twice the largest pool.
pub const MAX_INSTANCES: usize = MAX_POOL_SIZE * 2;
