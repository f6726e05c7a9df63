//! 5x8 bitmap font.
//!
//! Each glyph is five column bytes; bit 0 is the top row. Characters advance
//! by one extra blank column, so a cell is 6x8 at size 1.

use super::device::Ili9341;
use super::window::ensure_inside;
use crate::transport::Transport;
use crate::{Result, Rgb565};

/// Glyph columns.
pub const GLYPH_WIDTH: u8 = 5;
/// Glyph rows, including the blank descender row.
pub const GLYPH_HEIGHT: u8 = 8;

const ADVANCE: i32 = GLYPH_WIDTH as i32 + 1;
const FIRST: u32 = 0x20;
const LAST: u32 = 0x7E;

/// ASCII 0x20..=0x7E, indexed by `code - 0x20`.
static FONT: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

/// Looks up the glyph for `ch`; `None` outside printable ASCII.
pub fn glyph(ch: char) -> Option<&'static [u8; 5]> {
    let code = ch as u32;
    if (FIRST..=LAST).contains(&code) {
        Some(&FONT[(code - FIRST) as usize])
    } else {
        None
    }
}

/// Text position after a [`Ili9341::draw_string`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
}

impl<T: Transport> Ili9341<T> {
    /// Draws one character with its top-left corner at (`x`, `y`).
    ///
    /// Each font bit becomes a `size`x`size` block. Background bits are
    /// painted in `bg` unless `bg == color`, which draws transparent text.
    /// Characters without a glyph and `size == 0` draw nothing.
    pub fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        color: Rgb565,
        bg: Rgb565,
        size: u8,
    ) -> Result<()> {
        let Some(columns) = glyph(ch) else {
            return Ok(());
        };
        if size == 0 {
            return Ok(());
        }
        let scale = size as i32;
        if self.is_strict() {
            ensure_inside(x, y, &self.state)?;
            ensure_inside(
                x.saturating_add(GLYPH_WIDTH as i32 * scale - 1),
                y.saturating_add(GLYPH_HEIGHT as i32 * scale - 1),
                &self.state,
            )?;
        }

        for (col, &bits) in columns.iter().enumerate() {
            let mut line = bits;
            let px = x.saturating_add(col as i32 * scale);
            for row in 0..GLYPH_HEIGHT as i32 {
                let py = y.saturating_add(row * scale);
                if line & 0x01 != 0 {
                    self.put_cell(px, py, size, color)?;
                } else if bg != color {
                    self.put_cell(px, py, size, bg)?;
                }
                line >>= 1;
            }
        }
        Ok(())
    }

    /// Draws `text` starting at (`x`, `y`) and returns where the next
    /// character would go.
    ///
    /// `\n` moves to the start of the next line, `\r` back to `x`. A
    /// character that would overrun the right edge wraps to a new line at
    /// `x`. There is no word wrapping.
    pub fn draw_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb565,
        bg: Rgb565,
        size: u8,
    ) -> Result<Cursor> {
        let advance = ADVANCE * size as i32;
        let line_height = GLYPH_HEIGHT as i32 * size as i32;
        let width = self.state.width() as i32;
        let mut cursor = Cursor { x, y };

        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor.x = x;
                    cursor.y = cursor.y.saturating_add(line_height);
                }
                '\r' => cursor.x = x,
                _ => {
                    self.draw_char(cursor.x, cursor.y, ch, color, bg, size)?;
                    cursor.x = cursor.x.saturating_add(advance);
                    if cursor.x.saturating_add(advance) > width {
                        cursor.x = x;
                        cursor.y = cursor.y.saturating_add(line_height);
                    }
                }
            }
        }
        Ok(cursor)
    }

    fn put_cell(&mut self, x: i32, y: i32, size: u8, color: Rgb565) -> Result<()> {
        if size == 1 {
            self.put_pixel(x, y, color)
        } else {
            self.put_block(x, y, size as u16, size as u16, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BusEvent, RecordingTransport};
    use crate::ClipPolicy;

    fn lcd() -> Ili9341<RecordingTransport> {
        Ili9341::new(RecordingTransport::new())
    }

    fn ram_writes(lcd: &Ili9341<RecordingTransport>) -> usize {
        lcd.transport()
            .events()
            .iter()
            .filter(|e| **e == BusEvent::Command(0x2C))
            .count()
    }

    #[test]
    fn test_glyph_range() {
        assert_eq!(glyph(' '), Some(&[0x00; 5]));
        assert_eq!(glyph('0'), Some(&[0x3E, 0x51, 0x49, 0x45, 0x3E]));
        assert_eq!(glyph('~'), Some(&[0x10, 0x08, 0x08, 0x10, 0x08]));
        assert!(glyph('\u{1F}').is_none());
        assert!(glyph('\u{7F}').is_none());
        assert!(glyph('é').is_none());
    }

    #[test]
    fn test_every_printable_glyph_fits_seven_rows() {
        for code in FIRST..=LAST {
            let ch = char::from_u32(code).unwrap();
            let columns = glyph(ch).unwrap();
            assert!(columns.iter().all(|c| c & 0x80 == 0), "{:?}", ch);
        }
    }

    #[test]
    fn test_transparent_char_writes_only_set_bits() {
        let mut lcd = lcd();
        lcd.draw_char(0, 0, '!', Rgb565::WHITE, Rgb565::WHITE, 1)
            .unwrap();
        // '!' is one column of 0x5F: six bits set
        assert_eq!(ram_writes(&lcd), 6);
    }

    #[test]
    fn test_opaque_char_writes_whole_cell() {
        let mut lcd = lcd();
        lcd.draw_char(0, 0, '!', Rgb565::WHITE, Rgb565::BLACK, 1)
            .unwrap();
        assert_eq!(ram_writes(&lcd), 40);
    }

    #[test]
    fn test_scaled_char_uses_blocks() {
        let mut lcd = lcd();
        lcd.draw_char(10, 10, '.', Rgb565::RED, Rgb565::RED, 3)
            .unwrap();
        // '.' has four set bits, each a 3x3 block
        let data: Vec<_> = lcd
            .transport()
            .events()
            .iter()
            .filter_map(|e| match e {
                BusEvent::Data(d) if d.len() == 18 => Some(d.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_unprintable_and_zero_size_are_noops() {
        let mut lcd = lcd();
        lcd.draw_char(0, 0, '\u{7}', Rgb565::WHITE, Rgb565::BLACK, 1)
            .unwrap();
        lcd.draw_char(0, 0, 'A', Rgb565::WHITE, Rgb565::BLACK, 0)
            .unwrap();
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn test_string_cursor_advances() {
        let mut lcd = lcd();
        let cursor = lcd
            .draw_string(0, 0, "AB", Rgb565::WHITE, Rgb565::BLACK, 1)
            .unwrap();
        assert_eq!(cursor, Cursor { x: 12, y: 0 });

        let cursor = lcd
            .draw_string(4, 20, "ab", Rgb565::WHITE, Rgb565::BLACK, 2)
            .unwrap();
        assert_eq!(cursor, Cursor { x: 28, y: 20 });
    }

    #[test]
    fn test_string_control_characters() {
        let mut lcd = lcd();
        let cursor = lcd
            .draw_string(5, 0, "ab\ncd", Rgb565::WHITE, Rgb565::WHITE, 1)
            .unwrap();
        assert_eq!(cursor, Cursor { x: 17, y: 8 });

        let cursor = lcd
            .draw_string(5, 0, "abc\rd", Rgb565::WHITE, Rgb565::WHITE, 1)
            .unwrap();
        assert_eq!(cursor, Cursor { x: 11, y: 0 });
    }

    #[test]
    fn test_string_wraps_at_right_edge() {
        let mut lcd = lcd();
        // 40 cells of 6 pixels fill the 240-pixel row
        let text = "x".repeat(40);
        let cursor = lcd
            .draw_string(0, 0, &text, Rgb565::WHITE, Rgb565::WHITE, 1)
            .unwrap();
        assert_eq!(cursor, Cursor { x: 0, y: 8 });
    }

    #[test]
    fn test_strict_char_checks_cell() {
        let mut lcd = lcd().with_clip_policy(ClipPolicy::Strict);
        assert!(lcd
            .draw_char(236, 0, 'A', Rgb565::WHITE, Rgb565::BLACK, 1)
            .is_err());
        assert!(lcd.transport().events().is_empty());
        assert!(lcd
            .draw_char(235, 312, 'A', Rgb565::WHITE, Rgb565::BLACK, 1)
            .is_ok());
    }

    #[test]
    fn test_text_at_coordinate_limits() {
        let mut lcd = lcd();
        lcd.draw_char(i32::MAX - 2, 0, 'A', Rgb565::WHITE, Rgb565::BLACK, 2)
            .unwrap();
        lcd.draw_char(i32::MIN, i32::MAX - 1, 'W', Rgb565::WHITE, Rgb565::BLACK, 255)
            .unwrap();
        let cursor = lcd
            .draw_string(i32::MAX - 3, i32::MAX, "AB\nC", Rgb565::WHITE, Rgb565::BLACK, 3)
            .unwrap();
        assert_eq!(
            cursor,
            Cursor {
                x: i32::MAX - 3,
                y: i32::MAX
            }
        );
        assert!(lcd.transport().events().is_empty());

        let mut strict = lcd.with_clip_policy(ClipPolicy::Strict);
        assert!(matches!(
            strict.draw_char(i32::MAX - 2, 0, 'A', Rgb565::WHITE, Rgb565::BLACK, 2),
            Err(crate::Error::OutOfBounds { .. })
        ));
        assert!(strict.transport().events().is_empty());
    }
}
