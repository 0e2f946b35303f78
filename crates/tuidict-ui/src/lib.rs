pub mod events;
pub mod render;
pub mod terminal;

pub use events::{InputReader, translate};
pub use render::draw;
pub use terminal::{check_tui_support, restore_terminal, setup_terminal};
