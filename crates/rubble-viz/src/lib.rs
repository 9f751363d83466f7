//! Renderer-facing snapshots: one draw item per geometry and the HUD text.
//! Nothing in here talks to a GPU; a frontend consumes these each frame.

mod draw;
mod hud;

pub use draw::{draw_list, DrawItem};
pub use hud::{hud_lines, HudLine, HudStats};
