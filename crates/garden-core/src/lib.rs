pub mod animator;
pub mod audio;
pub mod constants;
pub mod gain;
pub mod garden;
pub mod music;
pub mod prefs;
pub mod scrollspy;
pub mod shapes;

pub use audio::*;
pub use constants::*;
pub use gain::*;
pub use garden::*;
pub use music::*;
pub use prefs::*;
pub use scrollspy::*;
pub use shapes::*;
