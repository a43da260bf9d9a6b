//! Viewport and repaint control: converts cursor and document changes
//! into the smallest screen refresh the surface can honor.

pub mod engine;
pub mod status;
pub mod viewport;

pub use engine::{END_OF_TEXT, RenderEngine, STATUS_ROWS};
pub use status::format_status;
pub use viewport::{ScrollPolicy, ScrollShift, policy_for, scroll_to_cursor};
