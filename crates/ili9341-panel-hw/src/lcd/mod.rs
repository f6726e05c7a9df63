//! LCD controller module.
//!
//! Drives the 240x320 RGB565 ILI9341 over any [`crate::Transport`].

mod device;
mod font;
mod init;
mod raster;

pub mod protocol;
pub mod window;

pub use device::{ClipPolicy, Ili9341, SharedIli9341};
pub use font::{glyph, Cursor, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use init::{InitStep, DISPLAY_ON_SETTLE_MS, INIT_SEQUENCE, POWER_ON_SETTLE_MS};
pub use protocol::{Command, Protocol};
pub use raster::{circle_octants, CircleSteps, LinePoints};
pub use window::Window;
