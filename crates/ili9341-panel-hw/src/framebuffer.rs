//! Native-orientation RGB565 pixel store for the emulated controller.

use crate::{Rgb565, PANEL_HEIGHT, PANEL_WIDTH};

/// Total pixel count for the panel.
pub const PIXEL_COUNT: usize = PANEL_WIDTH as usize * PANEL_HEIGHT as usize;

/// Graphics RAM of a 240x320 panel, row-major in native (portrait)
/// coordinates.
#[derive(Clone)]
pub struct Framebuffer {
    data: Vec<u16>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &PANEL_WIDTH)
            .field("height", &PANEL_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl Framebuffer {
    /// Creates a framebuffer initialized to black.
    pub fn new() -> Self {
        Self {
            data: vec![0; PIXEL_COUNT],
        }
    }

    pub fn width(&self) -> u16 {
        PANEL_WIDTH
    }

    pub fn height(&self) -> u16 {
        PANEL_HEIGHT
    }

    /// Raw RGB565 words, row-major.
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Fills every pixel with `color`.
    pub fn clear(&mut self, color: Rgb565) {
        self.data.fill(color.raw());
    }

    /// Sets a pixel; coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = color.raw();
        }
    }

    pub fn get_pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        self.index(x, y).map(|idx| Rgb565::from_wire(self.data[idx]))
    }

    /// Counts pixels equal to `color`.
    pub fn count(&self, color: Rgb565) -> usize {
        self.data.iter().filter(|&&px| px == color.raw()).count()
    }

    /// Converts to RGBA8 bytes for PNG encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.data.len() * 4);
        for &word in &self.data {
            let (r, g, b) = Rgb565::from_wire(word).to_rgb888();
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
        rgba
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < PANEL_WIDTH && y < PANEL_HEIGHT {
            Some(y as usize * PANEL_WIDTH as usize + x as usize)
        } else {
            None
        }
    }
}
