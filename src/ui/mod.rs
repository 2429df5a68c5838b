pub mod display;
pub mod panel;

pub use display::BufferDisplay;
pub use panel::{NO_HISTORY_MESSAGE, render_history, render_panel};
