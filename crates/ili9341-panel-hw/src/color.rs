//! RGB565 color value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue.
///
/// The only public constructor is [`Rgb565::from_rgb888`], so the packing
/// rule lives in a single place. The controller reads color words big-endian;
/// use [`Rgb565::to_be_bytes`] whenever a color goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb565(u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565::from_rgb888(0, 0, 0);
    pub const WHITE: Rgb565 = Rgb565::from_rgb888(255, 255, 255);
    pub const RED: Rgb565 = Rgb565::from_rgb888(255, 0, 0);
    pub const GREEN: Rgb565 = Rgb565::from_rgb888(0, 255, 0);
    pub const BLUE: Rgb565 = Rgb565::from_rgb888(0, 0, 255);
    pub const YELLOW: Rgb565 = Rgb565::from_rgb888(255, 255, 0);
    pub const CYAN: Rgb565 = Rgb565::from_rgb888(0, 255, 255);
    pub const MAGENTA: Rgb565 = Rgb565::from_rgb888(255, 0, 255);
    pub const GRAY: Rgb565 = Rgb565::from_rgb888(128, 128, 128);
    pub const ORANGE: Rgb565 = Rgb565::from_rgb888(255, 165, 0);
    pub const PURPLE: Rgb565 = Rgb565::from_rgb888(128, 0, 128);
    pub const PINK: Rgb565 = Rgb565::from_rgb888(255, 192, 203);

    /// Packs three 8-bit channels, keeping the top 5/6/5 bits.
    #[inline]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r5 = (r & 0xF8) as u16;
        let g6 = (g & 0xFC) as u16;
        let b5 = (b >> 3) as u16;
        Rgb565((r5 << 8) | (g6 << 3) | b5)
    }

    /// Rebuilds a color from a word already read off the wire.
    #[inline]
    pub(crate) const fn from_wire(word: u16) -> Self {
        Rgb565(word)
    }

    /// Returns the packed 16-bit value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wire representation, high byte first.
    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Returns the raw channel values (red 0-31, green 0-63, blue 0-31).
    pub const fn channels(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        (r, g, b)
    }

    /// Expands back to 8-bit channels, replicating high bits into the low ones.
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let (r, g, b) = self.channels();
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

impl From<Rgb565> for u16 {
    fn from(color: Rgb565) -> Self {
        color.0
    }
}

impl FromStr for Rgb565 {
    type Err = Error;

    /// Parses `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Rgb565::from_rgb888(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb565 {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgb565> for String {
    fn from(color: Rgb565) -> Self {
        color.to_string()
    }
}

impl std::fmt::Display for Rgb565 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (r, g, b) = self.to_rgb888();
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}
