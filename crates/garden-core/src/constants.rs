// Shared scene/audio tuning constants used by the core and the web frontend.

// Garden layout
pub const POOL_SIZE: usize = 5;
pub const RING_RADIUS_MIN: f32 = 4.0; // world units from the scene origin
pub const RING_RADIUS_SPAN: f32 = 3.0;
pub const RING_HEIGHT_SPAN: f32 = 4.0; // rings climb from -span/2 to +span/2

// Per-ring randomized parameters
pub const BASE_SCALE_MIN: f32 = 0.8;
pub const BASE_SCALE_SPAN: f32 = 0.4;
pub const ROTATION_SPEED_MIN: f32 = 0.5;
pub const ROTATION_SPEED_SPAN: f32 = 0.3;

// Animation
pub const GROW_IN_SCALE: f32 = 0.0001; // hidden rings start here and lerp in
pub const SCALE_BLEND: f32 = 0.15; // per-frame exponential smoothing factor
pub const PULSE_AMPLITUDE: f32 = 0.1;
pub const ROTATION_RATES: [f32; 3] = [0.3, 0.5, 0.2]; // x, y, z multipliers of t
pub const CLICKED_SCALE_FACTOR: f32 = 0.5;

// Round timing (seconds)
pub const SPAWN_INTERVAL_SEC: f32 = 1.6;
pub const COMPLETION_HOLD_SEC: f32 = 3.0;

// Music
pub const CHORD_VELOCITY: f32 = 0.5;
pub const DEFAULT_VELOCITY: f32 = 0.7;
pub const DEFAULT_BPM: f32 = 120.0;

// Master gain
pub const VOLUME_RAMP_SEC: f32 = 0.25;
pub const BREATH_RATE_HZ: f32 = 0.08;
pub const BREATH_DEPTH: f32 = 0.15; // master dips to (1 - depth) at the bottom of a breath

// Preferences
pub const PREFS_STORAGE_KEY: &str = "ui-store";
pub const DEFAULT_VOLUME: f32 = 0.5;
pub const VOLUME_STEP: f32 = 0.05;

// Scroll-spy
pub const SPY_ANCHOR_RATIO: f32 = 0.3;
pub const SPY_MIN_MARGIN: f32 = 0.1;
pub const SPY_MIN_SWITCH_INTERVAL_MS: f64 = 250.0;
pub const SPY_QUIET_PERIOD_MS: f64 = 150.0;
pub const SPY_TAB_DEBOUNCE_MS: f64 = 200.0;
pub const SPY_BOTTOM_THRESHOLD_PX: f32 = 50.0;
pub const SPY_RATIO_WEIGHT: f32 = 0.6;
pub const SPY_PROXIMITY_WEIGHT: f32 = 0.4;
