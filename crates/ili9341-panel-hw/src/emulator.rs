//! Software model of the controller side of the bus.
//!
//! [`PanelEmulator`] is a [`Transport`] that decodes what the driver sends:
//! address windows, memory writes, MADCTL and the power/display state
//! commands. Pixel words land in a native-orientation [`Framebuffer`], which
//! makes it possible to test drawing pixel-for-pixel and to take
//! screenshots without hardware.

use crate::framebuffer::Framebuffer;
use crate::lcd::Command;
use crate::orientation::madctl;
use crate::transport::Transport;
use crate::{Rgb565, PANEL_HEIGHT, PANEL_WIDTH};
use std::convert::Infallible;
use tracing::trace;

/// Emulated ILI9341 attached to a perfect bus.
#[derive(Debug)]
pub struct PanelEmulator {
    gram: Framebuffer,
    data_mode: bool,
    selected: bool,
    command: Option<u8>,
    params: Vec<u8>,
    madctl: u8,
    columns: (u16, u16),
    pages: (u16, u16),
    cursor: (u16, u16),
    carry: Option<u8>,
    sleeping: bool,
    display_on: bool,
    transactions: usize,
    pixel_words: usize,
    windows: usize,
}

impl Default for PanelEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelEmulator {
    /// A freshly powered panel: asleep, display off, black GRAM.
    pub fn new() -> Self {
        Self {
            gram: Framebuffer::new(),
            data_mode: false,
            selected: false,
            command: None,
            params: Vec::with_capacity(4),
            madctl: 0,
            columns: (0, PANEL_WIDTH - 1),
            pages: (0, PANEL_HEIGHT - 1),
            cursor: (0, 0),
            carry: None,
            sleeping: true,
            display_on: false,
            transactions: 0,
            pixel_words: 0,
            windows: 0,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.gram
    }

    /// Reads a pixel in native (portrait) coordinates.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        self.gram.get_pixel(x, y)
    }

    /// Last MADCTL value written.
    pub fn madctl(&self) -> u8 {
        self.madctl
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Chip-select assertions seen so far.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Pixel words written to GRAM so far.
    pub fn pixel_words(&self) -> usize {
        self.pixel_words
    }

    /// Memory write commands seen so far.
    pub fn windows(&self) -> usize {
        self.windows
    }

    /// Zeroes the counters, keeping GRAM and registers.
    pub fn reset_counters(&mut self) {
        self.transactions = 0;
        self.pixel_words = 0;
        self.windows = 0;
    }

    fn begin_command(&mut self, cmd: u8) {
        trace!("emulator: cmd 0x{:02X}", cmd);
        self.command = Some(cmd);
        self.params.clear();
        self.carry = None;

        match cmd {
            c if c == Command::SoftwareReset as u8 => {
                self.madctl = 0;
                self.columns = (0, PANEL_WIDTH - 1);
                self.pages = (0, PANEL_HEIGHT - 1);
                self.sleeping = true;
                self.display_on = false;
            }
            c if c == Command::SleepIn as u8 => self.sleeping = true,
            c if c == Command::SleepOut as u8 => self.sleeping = false,
            c if c == Command::DisplayOff as u8 => self.display_on = false,
            c if c == Command::DisplayOn as u8 => self.display_on = true,
            c if c == Command::MemoryWrite as u8 => {
                self.cursor = (self.columns.0, self.pages.0);
                self.windows += 1;
            }
            _ => {}
        }
    }

    fn accept_data(&mut self, bytes: &[u8]) {
        let Some(cmd) = self.command else {
            return;
        };

        if cmd == Command::MemoryWrite as u8 {
            self.accept_pixels(bytes);
            return;
        }

        self.params.extend_from_slice(bytes);
        match cmd {
            c if c == Command::ColumnAddressSet as u8 => {
                if let Some(range) = decode_range(&self.params) {
                    self.columns = range;
                }
            }
            c if c == Command::PageAddressSet as u8 => {
                if let Some(range) = decode_range(&self.params) {
                    self.pages = range;
                }
            }
            c if c == Command::MemoryAccessControl as u8 => {
                if let Some(&value) = self.params.first() {
                    self.madctl = value;
                }
            }
            _ => {}
        }
    }

    fn accept_pixels(&mut self, bytes: &[u8]) {
        let mut bytes = bytes.iter().copied();
        loop {
            let high = match self.carry.take() {
                Some(high) => high,
                None => match bytes.next() {
                    Some(high) => high,
                    None => return,
                },
            };
            let Some(low) = bytes.next() else {
                self.carry = Some(high);
                return;
            };
            self.write_word(u16::from_be_bytes([high, low]));
        }
    }

    fn write_word(&mut self, word: u16) {
        let (col, page) = self.cursor;
        if let Some((x, y)) = self.to_native(col, page) {
            self.gram.set_pixel(x, y, Rgb565::from_wire(word));
        }
        self.pixel_words += 1;

        // Row-major inside the window, wrapping back to its origin.
        self.cursor = if col >= self.columns.1 {
            let next_page = if page >= self.pages.1 {
                self.pages.0
            } else {
                page + 1
            };
            (self.columns.0, next_page)
        } else {
            (col + 1, page)
        };
    }

    /// Maps a column/page address to native GRAM coordinates.
    ///
    /// This panel is wired with its column order reversed, so portrait
    /// (MX set) comes out unmirrored.
    fn to_native(&self, col: u16, page: u16) -> Option<(u16, u16)> {
        let (mut x, mut y) = if self.madctl & madctl::MV != 0 {
            (page as i32, col as i32)
        } else {
            (col as i32, page as i32)
        };
        if self.madctl & madctl::MX == 0 {
            x = PANEL_WIDTH as i32 - 1 - x;
        }
        if self.madctl & madctl::MY != 0 {
            y = PANEL_HEIGHT as i32 - 1 - y;
        }
        if (0..PANEL_WIDTH as i32).contains(&x) && (0..PANEL_HEIGHT as i32).contains(&y) {
            Some((x as u16, y as u16))
        } else {
            None
        }
    }
}

fn decode_range(params: &[u8]) -> Option<(u16, u16)> {
    match params {
        [s_hi, s_lo, e_hi, e_lo] => Some((
            u16::from_be_bytes([*s_hi, *s_lo]),
            u16::from_be_bytes([*e_hi, *e_lo]),
        )),
        _ => None,
    }
}

impl Transport for PanelEmulator {
    type Error = Infallible;

    fn set_command_mode(&mut self) -> Result<(), Self::Error> {
        self.data_mode = false;
        Ok(())
    }

    fn set_data_mode(&mut self) -> Result<(), Self::Error> {
        self.data_mode = true;
        Ok(())
    }

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        self.selected = true;
        Ok(())
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        if self.selected {
            self.transactions += 1;
        }
        self.selected = false;
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if !self.selected {
            return Ok(());
        }
        if self.data_mode {
            self.accept_data(bytes);
        } else {
            for &cmd in bytes {
                self.begin_command(cmd);
            }
        }
        Ok(())
    }
}
