//! ILI9341 Panel Hardware Library
//!
//! Driver for 240x320 ILI9341 TFT panels on a 4-wire SPI bus (clock/data,
//! D/C select, chip select), plus a software controller emulator that decodes
//! the same wire protocol into an RGB565 framebuffer.

pub mod color;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod lcd;
pub mod orientation;
pub mod transport;

pub use color::Rgb565;
pub use emulator::PanelEmulator;
pub use error::{Error, Result};
pub use framebuffer::Framebuffer;
pub use lcd::{ClipPolicy, Cursor, Ili9341, SharedIli9341, Window};
pub use orientation::{Orientation, PanelState};
pub use transport::{BusEvent, RecordingTransport, SpiTransport, Transport};

/// Native panel dimensions (portrait, as wired).
pub const PANEL_WIDTH: u16 = 240;
pub const PANEL_HEIGHT: u16 = 320;
