//! PNG export of the emulated panel.

use anyhow::{Context, Result};
use ili9341_panel_hw::Framebuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encodes the framebuffer as an 8-bit RGBA PNG.
pub fn encode_png<W: Write>(fb: &Framebuffer, out: W) -> Result<()> {
    let mut encoder = png::Encoder::new(out, fb.width() as u32, fb.height() as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .context("Failed to write PNG header")?;
    writer
        .write_image_data(&fb.to_rgba8())
        .context("Failed to write PNG data")?;
    Ok(())
}

/// Writes a screenshot to `path`.
pub fn save_png<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).with_context(|| {
        format!(
            "Failed to create screenshot file {}",
            path.as_ref().display()
        )
    })?;
    encode_png(fb, BufWriter::new(file))
}
