pub mod keyboard;
pub mod pointer;

pub use keyboard::wire_effect_keys;
pub use pointer::wire_pointer_handlers;
