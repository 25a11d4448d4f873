pub mod keyboard;
pub mod keymap;
pub mod pointer;
pub mod scroll;

pub use keyboard::wire_global_keydown;
pub use pointer::{wire_pointer_handlers, PointerWiring};
pub use scroll::wire_scroll_spy;
