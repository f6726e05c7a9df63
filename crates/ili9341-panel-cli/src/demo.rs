//! Built-in showcase exercising every primitive.

use ili9341_panel_hw::{Ili9341, Orientation, Result, Rgb565, Transport};
use tracing::debug;

const PALETTE: [Rgb565; 6] = [
    Rgb565::RED,
    Rgb565::ORANGE,
    Rgb565::YELLOW,
    Rgb565::GREEN,
    Rgb565::BLUE,
    Rgb565::PURPLE,
];

/// Draws the showcase in the driver's current orientation, then leaves a
/// rotated caption along the bottom edge.
pub fn draw<T: Transport>(lcd: &mut Ili9341<T>, background: Rgb565) -> Result<()> {
    let start = lcd.orientation();
    let (w, h) = (lcd.width() as i32, lcd.height() as i32);
    debug!("demo on {}x{} ({})", w, h, start);

    lcd.fill_screen(background)?;

    // Color bars
    let bar = (w / PALETTE.len() as i32) as u16;
    for (i, &color) in PALETTE.iter().enumerate() {
        lcd.fill_rect(i as i32 * bar as i32, 0, bar, 24, color)?;
    }

    lcd.draw_string(8, 32, "ILI9341", Rgb565::WHITE, background, 3)?;
    let cursor = lcd.draw_string(8, 60, "240x320 RGB565", Rgb565::CYAN, background, 1)?;
    lcd.draw_string(cursor.x, cursor.y, " SPI", Rgb565::GRAY, background, 1)?;

    // Frame and diagonals
    lcd.draw_rect(4, 76, (w - 8) as u16, 100, Rgb565::WHITE)?;
    lcd.draw_line(4, 76, w - 5, 175, Rgb565::MAGENTA)?;
    lcd.draw_line(w - 5, 76, 4, 175, Rgb565::MAGENTA)?;

    // Circles
    let cy = 126;
    lcd.fill_circle(w / 4, cy, 30, Rgb565::ORANGE)?;
    lcd.draw_circle(w / 4, cy, 36, Rgb565::YELLOW)?;
    lcd.fill_circle(3 * w / 4, cy, 30, Rgb565::BLUE)?;
    lcd.draw_circle(3 * w / 4, cy, 36, Rgb565::CYAN)?;

    // Fan of lines
    let origin = (w / 2, h - 10);
    for step in 0..=12 {
        let x = step * (w - 1) / 12;
        lcd.draw_line(origin.0, origin.1, x, 190, PALETTE[step as usize % PALETTE.len()])?;
    }

    // Caption in the opposite landscape/portrait orientation
    let rotated = match start {
        Orientation::Portrait | Orientation::PortraitInverted => Orientation::Landscape,
        Orientation::Landscape | Orientation::LandscapeInverted => Orientation::Portrait,
    };
    lcd.set_orientation(rotated)?;
    lcd.draw_string(4, 2, "rotated", Rgb565::PINK, Rgb565::PINK, 1)?;
    lcd.set_orientation(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ili9341_panel_hw::{ClipPolicy, PanelEmulator};

    #[test]
    fn test_demo_fits_both_orientations_strictly() {
        for orientation in Orientation::ALL {
            let mut lcd = Ili9341::new(PanelEmulator::new())
                .with_orientation(orientation)
                .with_clip_policy(ClipPolicy::Strict);
            lcd.set_orientation(orientation).unwrap();
            draw(&mut lcd, Rgb565::BLACK).unwrap();
            assert_eq!(lcd.orientation(), orientation);

            let fb = lcd.transport().framebuffer();
            assert!(fb.count(Rgb565::PINK) > 0);
            assert!(fb.count(Rgb565::RED) > 0);
        }
    }
}
