//! Display orientation support.
//!
//! The controller handles all four orientations in hardware through the
//! memory access control register (MADCTL). Landscape variants exchange rows
//! and columns, so the logical width and height swap with them.

use crate::{Error, Result, PANEL_HEIGHT, PANEL_WIDTH};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// MADCTL bits.
pub mod madctl {
    /// Row address order (mirror Y).
    pub const MY: u8 = 0x80;
    /// Column address order (mirror X).
    pub const MX: u8 = 0x40;
    /// Row/column exchange.
    pub const MV: u8 = 0x20;
    /// BGR subpixel order.
    pub const BGR: u8 = 0x08;
}

/// Display orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Portrait (240x320), panel native.
    #[default]
    Portrait,
    /// Landscape (320x240), rotated 90°.
    Landscape,
    /// Portrait upside-down (240x320), rotated 180°.
    PortraitInverted,
    /// Landscape upside-down (320x240), rotated 270°.
    LandscapeInverted,
}

impl Orientation {
    /// All orientations, in raw value order.
    pub const ALL: [Orientation; 4] = [
        Orientation::Portrait,
        Orientation::Landscape,
        Orientation::PortraitInverted,
        Orientation::LandscapeInverted,
    ];

    /// Maps a raw orientation value (0-3). Anything else falls back to
    /// portrait so the panel is always left in a defined state.
    pub fn from_raw(value: u8) -> Self {
        match value {
            1 => Orientation::Landscape,
            2 => Orientation::PortraitInverted,
            3 => Orientation::LandscapeInverted,
            _ => Orientation::Portrait,
        }
    }

    /// Returns the raw orientation value.
    pub fn raw(&self) -> u8 {
        match self {
            Orientation::Portrait => 0,
            Orientation::Landscape => 1,
            Orientation::PortraitInverted => 2,
            Orientation::LandscapeInverted => 3,
        }
    }

    /// Returns the MADCTL configuration byte.
    pub fn madctl(&self) -> u8 {
        use madctl::*;
        match self {
            Orientation::Portrait => MX | BGR,
            Orientation::Landscape => MV | BGR,
            Orientation::PortraitInverted => MY | BGR,
            Orientation::LandscapeInverted => MY | MX | MV | BGR,
        }
    }

    /// Returns true if rows and columns are exchanged.
    pub fn swaps_axes(&self) -> bool {
        matches!(
            self,
            Orientation::Landscape | Orientation::LandscapeInverted
        )
    }

    /// Returns the logical display dimensions for this orientation.
    pub fn dimensions(&self) -> (u16, u16) {
        if self.swaps_axes() {
            (PANEL_HEIGHT, PANEL_WIDTH)
        } else {
            (PANEL_WIDTH, PANEL_HEIGHT)
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            "portrait-inverted" | "portrait_inverted" | "portrait-upside-down" => {
                Ok(Orientation::PortraitInverted)
            }
            "landscape-inverted" | "landscape_inverted" | "landscape-upside-down" => {
                Ok(Orientation::LandscapeInverted)
            }
            _ => Err(Error::InvalidOrientation(s.to_string())),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::PortraitInverted => write!(f, "portrait-inverted"),
            Orientation::LandscapeInverted => write!(f, "landscape-inverted"),
        }
    }
}

/// Orientation and the logical dimensions derived from it.
///
/// Owned by each driver instance. Every bound check reads `width`/`height`
/// from here; only [`PanelState::apply`] changes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    orientation: Orientation,
    width: u16,
    height: u16,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

impl PanelState {
    pub fn new(orientation: Orientation) -> Self {
        let (width, height) = orientation.dimensions();
        Self {
            orientation,
            width,
            height,
        }
    }

    /// Switches orientation and returns the MADCTL byte to write.
    pub fn apply(&mut self, orientation: Orientation) -> u8 {
        let (width, height) = orientation.dimensions();
        self.orientation = orientation;
        self.width = width;
        self.height = height;
        orientation.madctl()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns true if the point lies inside the logical bounds.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_madctl_byte() {
        assert_eq!(Orientation::Portrait.madctl(), 0x48);
        assert_eq!(Orientation::Landscape.madctl(), 0x28);
        assert_eq!(Orientation::PortraitInverted.madctl(), 0x88);
        assert_eq!(Orientation::LandscapeInverted.madctl(), 0xE8);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(Orientation::Portrait.dimensions(), (240, 320));
        assert_eq!(Orientation::Landscape.dimensions(), (320, 240));
        assert_eq!(Orientation::PortraitInverted.dimensions(), (240, 320));
        assert_eq!(Orientation::LandscapeInverted.dimensions(), (320, 240));
    }

    #[test]
    fn test_from_raw_falls_back_to_portrait() {
        for orientation in Orientation::ALL {
            assert_eq!(Orientation::from_raw(orientation.raw()), orientation);
        }
        assert_eq!(Orientation::from_raw(4), Orientation::Portrait);
        assert_eq!(Orientation::from_raw(0xFF), Orientation::Portrait);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "portrait".parse::<Orientation>().unwrap(),
            Orientation::Portrait
        );
        assert_eq!(
            "Landscape".parse::<Orientation>().unwrap(),
            Orientation::Landscape
        );
        assert_eq!(
            "landscape-inverted".parse::<Orientation>().unwrap(),
            Orientation::LandscapeInverted
        );
        assert!(matches!(
            "sideways".parse::<Orientation>(),
            Err(Error::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_panel_state_apply_is_idempotent() {
        let mut state = PanelState::default();
        let first = state.apply(Orientation::Landscape);
        let after_first = state;
        let second = state.apply(Orientation::Landscape);
        assert_eq!(first, second);
        assert_eq!(state, after_first);
        assert_eq!((state.width(), state.height()), (320, 240));
    }

    #[test]
    fn test_contains_uses_logical_bounds() {
        let mut state = PanelState::default();
        assert!(!state.contains(300, 10));
        state.apply(Orientation::Landscape);
        assert!(state.contains(300, 10));
        assert!(!state.contains(-1, 0));
        assert!(!state.contains(0, 240));
    }
}
