pub mod orientation;
pub mod pointer;
pub mod touch;

pub use orientation::wire_orientation;
pub use pointer::{find_status, wire_pointer_handlers, InputWiring};
pub use touch::wire_touch_handlers;
