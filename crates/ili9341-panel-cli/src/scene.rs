//! Scene files: an ordered list of drawing operations in TOML.
//!
//! ```toml
//! [[ops]]
//! kind = "fill_screen"
//! color = "#000000"
//!
//! [[ops]]
//! kind = "text"
//! x = 10
//! y = 10
//! text = "Hello"
//! color = "#FFFFFF"
//! size = 2
//! ```

use anyhow::{Context, Result};
use ili9341_panel_hw::{Ili9341, Orientation, Rgb565, Transport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub ops: Vec<Op>,
}

/// One driver call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Op {
    FillScreen {
        color: Rgb565,
    },
    Pixel {
        x: i32,
        y: i32,
        color: Rgb565,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    },
    Rect {
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        color: Rgb565,
    },
    FillRect {
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        color: Rgb565,
    },
    Circle {
        x: i32,
        y: i32,
        r: u16,
        color: Rgb565,
    },
    FillCircle {
        x: i32,
        y: i32,
        r: u16,
        color: Rgb565,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Rgb565,
        /// Defaults to `color`, which draws transparent text.
        #[serde(default)]
        bg: Option<Rgb565>,
        #[serde(default = "default_text_size")]
        size: u8,
    },
    Orientation {
        orientation: Orientation,
    },
}

fn default_text_size() -> u8 {
    1
}

impl Op {
    /// Runs the operation against a driver.
    pub fn apply<T: Transport>(&self, lcd: &mut Ili9341<T>) -> ili9341_panel_hw::Result<()> {
        match self {
            Op::FillScreen { color } => lcd.fill_screen(*color),
            Op::Pixel { x, y, color } => lcd.draw_pixel(*x, *y, *color),
            Op::Line {
                x0,
                y0,
                x1,
                y1,
                color,
            } => lcd.draw_line(*x0, *y0, *x1, *y1, *color),
            Op::Rect { x, y, w, h, color } => lcd.draw_rect(*x, *y, *w, *h, *color),
            Op::FillRect { x, y, w, h, color } => lcd.fill_rect(*x, *y, *w, *h, *color),
            Op::Circle { x, y, r, color } => lcd.draw_circle(*x, *y, *r, *color),
            Op::FillCircle { x, y, r, color } => lcd.fill_circle(*x, *y, *r, *color),
            Op::Text {
                x,
                y,
                text,
                color,
                bg,
                size,
            } => lcd
                .draw_string(*x, *y, text, *color, bg.unwrap_or(*color), *size)
                .map(|_| ()),
            Op::Orientation { orientation } => lcd.set_orientation(*orientation),
        }
    }
}

impl Scene {
    /// Loads a scene from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read scene file")?;
        let scene: Scene = toml::from_str(&content).context("Failed to parse scene")?;
        debug!(
            "Loaded {} operations from {}",
            scene.ops.len(),
            path.as_ref().display()
        );
        Ok(scene)
    }

    /// Runs every operation in order, stopping at the first failure.
    pub fn run<T: Transport>(&self, lcd: &mut Ili9341<T>) -> Result<()> {
        for (index, op) in self.ops.iter().enumerate() {
            op.apply(lcd)
                .with_context(|| format!("Operation {} ({:?}) failed", index + 1, op))?;
        }
        Ok(())
    }
}
