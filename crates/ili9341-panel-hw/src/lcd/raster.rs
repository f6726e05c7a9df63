//! Drawing primitives.
//!
//! Every primitive bottoms out in one of two bus patterns: a 1x1 window plus
//! one color word, or one window covering a rectangle plus a single streamed
//! data transaction. Geometry is clipped against the logical bounds in
//! [`PanelState`](crate::PanelState); the window layer never checks.

use super::device::Ili9341;
use super::window::{ensure_inside, set_window, Window};
use crate::transport::Transport;
use crate::{Result, Rgb565};
use tracing::debug;

/// Integer Bresenham walk from one endpoint to the other, inclusive.
///
/// When both error branches fire on the same step the walk moves
/// diagonally, so the result is 8-connected. The major axis advances on
/// every step, which lets the walk start at any step without visiting the
/// ones before it (see [`LinePoints::clipped`]).
#[derive(Debug, Clone)]
pub struct LinePoints {
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    next: i64,
    last: i64,
}

impl LinePoints {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        Self {
            x0,
            y0,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            next: 0,
            last: dx.max(dy),
        }
    }

    /// Drops the steps whose major-axis coordinate falls outside
    /// `0..width` (x-major) or `0..height` (y-major).
    ///
    /// The points that remain are exactly the ones the full walk would
    /// produce there, so clipping the result per pixel gives the same set.
    /// At most `max(width, height)` steps are left.
    pub fn clipped(mut self, width: u16, height: u16) -> Self {
        let (origin, sign, limit) = if self.x_major() {
            (self.x0, self.sx, width as i64)
        } else {
            (self.y0, self.sy, height as i64)
        };
        // origin + sign * step in 0..limit
        let (lo, hi) = if sign > 0 {
            (-origin, limit - 1 - origin)
        } else {
            (origin - (limit - 1), origin)
        };
        self.next = self.next.max(lo);
        self.last = self.last.min(hi);
        self
    }

    fn x_major(&self) -> bool {
        self.dx >= self.dy
    }

    /// The point after `step` major-axis steps.
    fn point_at(&self, step: i64) -> (i64, i64) {
        if self.x_major() {
            let minor = minor_steps(self.dx, self.dy, step);
            (self.x0 + self.sx * step, self.y0 + self.sy * minor)
        } else {
            let minor = minor_steps(self.dy, self.dx, step);
            (self.x0 + self.sx * minor, self.y0 + self.sy * step)
        }
    }
}

/// Minor-axis moves made in the first `step` steps of a walk whose deltas
/// are `major >= minor`.
///
/// The error term after `i` major and `j` minor moves is
/// `major - minor - i * minor + j * major`, and the minor axis moves on
/// step `i` exactly when `(2j + 1) * major < 2 * minor * (i + 1)`. Counting
/// the `j` that satisfy this for step `i` gives the closed form.
fn minor_steps(major: i64, minor: i64, step: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (major, minor, step) = (major as i128, minor as i128, step as i128);
    let n = 2 * minor * step - major;
    if n <= 0 {
        0
    } else {
        ((n + 2 * major - 1) / (2 * major)) as i64
    }
}

impl Iterator for LinePoints {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let (x, y) = self.point_at(self.next);
        self.next += 1;
        // every point lies between the two i32 endpoints
        Some((x as i32, y as i32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.last - self.next + 1).max(0) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for LinePoints {}

/// Midpoint circle walk over one octant, yielding `(x, y)` offsets with
/// `x >= y`. Expand each with [`circle_octants`].
#[derive(Debug, Clone)]
pub struct CircleSteps {
    x: i32,
    y: i32,
    err: i32,
}

impl CircleSteps {
    pub fn new(r: u16) -> Self {
        Self {
            x: r as i32,
            y: 0,
            err: 0,
        }
    }
}

impl Iterator for CircleSteps {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x < self.y {
            return None;
        }
        let step = (self.x, self.y);
        if self.err <= 0 {
            self.y += 1;
            self.err += 2 * self.y + 1;
        }
        if self.err > 0 {
            self.x -= 1;
            self.err -= 2 * self.x + 1;
        }
        Some(step)
    }
}

/// The eight reflections of an octant offset about (`cx`, `cy`).
///
/// Coordinates saturate at the `i32` range, which only ever happens far
/// off-panel.
pub fn circle_octants(cx: i32, cy: i32, x: i32, y: i32) -> [(i32, i32); 8] {
    let (xp, xm) = (cx.saturating_add(x), cx.saturating_sub(x));
    let (yp, ym) = (cy.saturating_add(y), cy.saturating_sub(y));
    let (xq, xn) = (cx.saturating_add(y), cx.saturating_sub(y));
    let (yq, yn) = (cy.saturating_add(x), cy.saturating_sub(x));
    [
        (xp, yp),
        (xq, yq),
        (xn, yq),
        (xm, yp),
        (xm, ym),
        (xn, yn),
        (xq, yn),
        (xp, ym),
    ]
}

impl<T: Transport> Ili9341<T> {
    /// Fills the whole logical screen.
    pub fn fill_screen(&mut self, color: Rgb565) -> Result<()> {
        let (w, h) = (self.state.width(), self.state.height());
        self.fill_rect(0, 0, w, h, color)
    }

    /// Draws a single pixel. Off-panel pixels send nothing.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<()> {
        if self.is_strict() {
            ensure_inside(x, y, &self.state)?;
        }
        self.put_pixel(x, y, color)
    }

    /// Fills a rectangle with one window and one data transaction.
    ///
    /// The extent is clamped to the panel; an off-panel origin draws nothing.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u16, h: u16, color: Rgb565) -> Result<()> {
        let window = if self.is_strict() {
            Window::checked(x, y, w, h, &self.state)?
        } else {
            Window::clip(x, y, w, h, &self.state)
        };
        match window {
            Some(window) => self.fill_window(&window, color),
            None => Ok(()),
        }
    }

    /// Draws a rectangle outline as four lines.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u16, h: u16, color: Rgb565) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let right = x.saturating_add(w as i32 - 1);
        let bottom = y.saturating_add(h as i32 - 1);
        if self.is_strict() {
            ensure_inside(x, y, &self.state)?;
            ensure_inside(right, bottom, &self.state)?;
        }

        self.trace_line(x, y, right, y, color)?;
        self.trace_line(x, y, x, bottom, color)?;
        self.trace_line(right, y, right, bottom, color)?;
        self.trace_line(x, bottom, right, bottom, color)
    }

    /// Draws a line with Bresenham's algorithm, clipping per pixel.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Result<()> {
        if self.is_strict() {
            ensure_inside(x0, y0, &self.state)?;
            ensure_inside(x1, y1, &self.state)?;
        }
        self.trace_line(x0, y0, x1, y1, color)
    }

    /// Draws a circle outline with the midpoint algorithm.
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: u16, color: Rgb565) -> Result<()> {
        self.check_circle(x0, y0, r)?;
        if r == 0 {
            return self.put_pixel(x0, y0, color);
        }

        for (x, y) in CircleSteps::new(r) {
            for (px, py) in circle_octants(x0, y0, x, y) {
                self.put_pixel(px, py, color)?;
            }
        }
        Ok(())
    }

    /// Draws a filled circle as horizontal spans between symmetric points.
    ///
    /// Rows near the octant boundaries get written more than once.
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: u16, color: Rgb565) -> Result<()> {
        self.check_circle(x0, y0, r)?;
        debug!("fill circle ({}, {}) r={}", x0, y0, r);

        for (x, y) in CircleSteps::new(r) {
            let (left, right) = (x0.saturating_sub(x), x0.saturating_add(x));
            let (inner_left, inner_right) = (x0.saturating_sub(y), x0.saturating_add(y));
            self.span(left, right, y0.saturating_add(y), color)?;
            self.span(inner_left, inner_right, y0.saturating_add(x), color)?;
            self.span(left, right, y0.saturating_sub(y), color)?;
            self.span(inner_left, inner_right, y0.saturating_sub(x), color)?;
        }
        Ok(())
    }

    /// Pixel write with silent clipping.
    pub(super) fn put_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<()> {
        match Window::pixel(x, y, &self.state) {
            Some(window) => {
                set_window(&mut self.protocol, &window)?;
                self.protocol.send_data16(color.raw())
            }
            None => Ok(()),
        }
    }

    /// Rectangle fill with silent clamping.
    pub(super) fn put_block(&mut self, x: i32, y: i32, w: u16, h: u16, color: Rgb565) -> Result<()> {
        match Window::clip(x, y, w, h, &self.state) {
            Some(window) => self.fill_window(&window, color),
            None => Ok(()),
        }
    }

    fn fill_window(&mut self, window: &Window, color: Rgb565) -> Result<()> {
        set_window(&mut self.protocol, window)?;
        self.protocol.send_repeated(color, window.area())
    }

    fn trace_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Result<()> {
        let (width, height) = (self.state.width(), self.state.height());
        for (x, y) in LinePoints::new(x0, y0, x1, y1).clipped(width, height) {
            self.put_pixel(x, y, color)?;
        }
        Ok(())
    }

    /// Horizontal span `xa..=xb` on row `y`, clipped to the panel.
    fn span(&mut self, xa: i32, xb: i32, y: i32, color: Rgb565) -> Result<()> {
        let width = self.state.width() as i32;
        if y < 0 || y >= self.state.height() as i32 {
            return Ok(());
        }
        let start = xa.max(0);
        let end = xb.min(width - 1);
        if start > end {
            return Ok(());
        }
        self.put_block(start, y, (end - start + 1) as u16, 1, color)
    }

    fn check_circle(&self, x0: i32, y0: i32, r: u16) -> Result<()> {
        if self.is_strict() {
            let r = r as i32;
            ensure_inside(x0.saturating_sub(r), y0.saturating_sub(r), &self.state)?;
            ensure_inside(x0.saturating_add(r), y0.saturating_add(r), &self.state)?;
        }
        Ok(())
    }
}
