//! Address window programming.
//!
//! Before any pixel data, the controller must be told which rectangle the
//! data fills: CASET (columns), PASET (pages/rows), then RAMWR. The data that
//! follows RAMWR is consumed row-major inside that rectangle.

use super::protocol::{Command, Protocol};
use crate::orientation::PanelState;
use crate::transport::Transport;
use crate::{Error, Result};
use tracing::trace;

/// Inclusive rectangle in logical coordinates, always inside panel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

impl Window {
    /// A 1x1 window, or `None` if the point is off-panel.
    pub fn pixel(x: i32, y: i32, state: &PanelState) -> Option<Self> {
        if !state.contains(x, y) {
            return None;
        }
        let (x, y) = (x as u16, y as u16);
        Some(Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        })
    }

    /// Clamps a `w`x`h` rectangle at (`x`, `y`) to the panel.
    ///
    /// Returns `None` when the origin is off-panel or the rectangle is empty.
    pub fn clip(x: i32, y: i32, w: u16, h: u16, state: &PanelState) -> Option<Self> {
        if w == 0 || h == 0 || !state.contains(x, y) {
            return None;
        }
        let (x, y) = (x as u16, y as u16);
        let w = w.min(state.width() - x);
        let h = h.min(state.height() - y);
        Some(Self {
            x0: x,
            y0: y,
            x1: x + w - 1,
            y1: y + h - 1,
        })
    }

    /// Like [`Window::clip`] but rejects any rectangle that does not fit.
    ///
    /// Empty rectangles are still `Ok(None)`.
    pub fn checked(x: i32, y: i32, w: u16, h: u16, state: &PanelState) -> Result<Option<Self>> {
        if w == 0 || h == 0 {
            return Ok(None);
        }
        let far_x = x.saturating_add(w as i32 - 1);
        let far_y = y.saturating_add(h as i32 - 1);
        ensure_inside(x, y, state)?;
        ensure_inside(far_x, far_y, state)?;
        Ok(Self::clip(x, y, w, h, state))
    }

    pub fn x0(&self) -> u16 {
        self.x0
    }

    pub fn y0(&self) -> u16 {
        self.y0
    }

    pub fn x1(&self) -> u16 {
        self.x1
    }

    pub fn y1(&self) -> u16 {
        self.y1
    }

    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixel words that fill the window.
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// CASET parameters: x0 and x1, big-endian.
    pub fn column_bytes(&self) -> [u8; 4] {
        encode_range(self.x0, self.x1)
    }

    /// PASET parameters: y0 and y1, big-endian.
    pub fn page_bytes(&self) -> [u8; 4] {
        encode_range(self.y0, self.y1)
    }
}

fn encode_range(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

/// Fails with [`Error::OutOfBounds`] if the point is off-panel.
pub(crate) fn ensure_inside(x: i32, y: i32, state: &PanelState) -> Result<()> {
    if state.contains(x, y) {
        Ok(())
    } else {
        Err(Error::OutOfBounds {
            x,
            y,
            width: state.width(),
            height: state.height(),
        })
    }
}

/// Programs the address window and opens memory write.
///
/// No bounds checking here: a [`Window`] is only ever built inside bounds.
pub fn set_window<T: Transport>(proto: &mut Protocol<T>, window: &Window) -> Result<()> {
    trace!(
        "window ({}, {})-({}, {})",
        window.x0,
        window.y0,
        window.x1,
        window.y1
    );
    proto.command(Command::ColumnAddressSet, &window.column_bytes())?;
    proto.command(Command::PageAddressSet, &window.page_bytes())?;
    proto.command(Command::MemoryWrite, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BusEvent, RecordingTransport};
    use crate::Orientation;

    #[test]
    fn test_set_window_sequence() {
        let mut proto = Protocol::new(RecordingTransport::new());
        let state = PanelState::default();
        let window = Window::clip(0, 0, 240, 320, &state).unwrap();
        set_window(&mut proto, &window).unwrap();

        assert_eq!(
            proto.transport().events(),
            &[
                BusEvent::Command(0x2A),
                BusEvent::Data(vec![0x00, 0x00, 0x00, 0xEF]),
                BusEvent::Command(0x2B),
                BusEvent::Data(vec![0x00, 0x00, 0x01, 0x3F]),
                BusEvent::Command(0x2C),
            ]
        );
    }

    #[test]
    fn test_clip_clamps_extent() {
        let state = PanelState::default();
        let window = Window::clip(200, 300, 100, 100, &state).unwrap();
        assert_eq!((window.x1(), window.y1()), (239, 319));
        assert_eq!((window.width(), window.height()), (40, 20));
        assert_eq!(window.area(), 800);
    }

    #[test]
    fn test_clip_rejects_bad_origin_and_empty() {
        let state = PanelState::default();
        assert!(Window::clip(240, 0, 1, 1, &state).is_none());
        assert!(Window::clip(-1, 0, 5, 5, &state).is_none());
        assert!(Window::clip(10, 10, 0, 5, &state).is_none());
    }

    #[test]
    fn test_pixel_follows_orientation() {
        let mut state = PanelState::default();
        assert!(Window::pixel(300, 10, &state).is_none());
        state.apply(Orientation::Landscape);
        let window = Window::pixel(300, 10, &state).unwrap();
        assert_eq!(window.column_bytes(), [0x01, 0x2C, 0x01, 0x2C]);
        assert_eq!(window.page_bytes(), [0x00, 0x0A, 0x00, 0x0A]);
    }

    #[test]
    fn test_checked_reports_far_corner() {
        let state = PanelState::default();
        assert_eq!(
            Window::checked(200, 0, 41, 1, &state),
            Err(Error::OutOfBounds {
                x: 240,
                y: 0,
                width: 240,
                height: 320,
            })
        );
        assert!(Window::checked(200, 0, 40, 1, &state).unwrap().is_some());
        assert_eq!(Window::checked(500, 500, 0, 0, &state), Ok(None));
    }

    #[test]
    fn test_checked_far_corner_saturates() {
        let state = PanelState::default();
        assert_eq!(
            Window::checked(i32::MAX, i32::MAX - 1, u16::MAX, u16::MAX, &state),
            Err(Error::OutOfBounds {
                x: i32::MAX,
                y: i32::MAX - 1,
                width: 240,
                height: 320,
            })
        );
        assert!(Window::clip(i32::MAX, i32::MIN, u16::MAX, 1, &state).is_none());
    }
}
