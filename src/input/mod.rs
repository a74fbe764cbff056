mod commands;
mod keyboard;
mod mouse;

pub use commands::Command;
pub use keyboard::handle_key_input;
pub use mouse::handle_mouse_input;
