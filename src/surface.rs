// Copyright (c) 2026 rezky_nightky

//! The fixed 96x64 virtual screen and its integer-scaled pixel buffer.

use crossterm::style::Color;
use log::{debug, info, warn};

use crate::cell::Cell;
use crate::color::parse_color_token;
use crate::frame::Frame;
use crate::runtime::{ColorMode, ScaleMode};

pub const VIRTUAL_WIDTH: u16 = 96;
pub const VIRTUAL_HEIGHT: u16 = 64;

/// Used while the host has no area yet.
pub const FALLBACK_SCALE: u16 = 3;
pub const MAX_SCALE: u16 = u16::MAX / VIRTUAL_WIDTH;

/// Drawing primitives in virtual pixels, origin top-left.
pub trait Canvas {
    fn clear(&mut self);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32);
}

/// Integer scale factor mapping the virtual screen onto a `host_w` x `host_h`
/// host.
///
/// The result is clamped to `1..=MAX_SCALE` so the physical buffer stays
/// addressable with `u16`. Below 1 the overflow is clipped; above
/// `MAX_SCALE` a cover-mode buffer no longer fills the host.
pub fn compute_scale(host_w: u32, host_h: u32, mode: ScaleMode) -> u16 {
    if host_w == 0 || host_h == 0 {
        return FALLBACK_SCALE;
    }
    let (vw, vh) = (u32::from(VIRTUAL_WIDTH), u32::from(VIRTUAL_HEIGHT));
    let scale = match mode {
        // floor(min(w/vw, h/vh)) == min(floor(w/vw), floor(h/vh))
        ScaleMode::Fit => (host_w / vw).min(host_h / vh),
        // ceil(max(w/vw, h/vh)) == max(ceil(w/vw), ceil(h/vh))
        ScaleMode::Cover => host_w.div_ceil(vw).max(host_h.div_ceil(vh)),
    };
    let max = u32::from(MAX_SCALE);
    if scale > max {
        warn!(
            "host {}x{} needs scale {}, capped at {}",
            host_w, host_h, scale, max
        );
    }
    scale.clamp(1, max) as u16
}

// Top-left of the physical buffer in host pixels; negative where it overflows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

pub struct Surface {
    mode: ScaleMode,
    color_mode: ColorMode,
    scale: u16,
    width: u16,
    height: u16,
    pixels: Vec<Option<Color>>,
    fill: Color,
    color_token: Option<String>,
}

impl Surface {
    pub fn new(mode: ScaleMode, color_mode: ColorMode) -> Self {
        let mut surface = Self {
            mode,
            color_mode,
            scale: 0,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            fill: Color::Reset,
            color_token: None,
        };
        surface.set_scale(FALLBACK_SCALE);
        surface
    }

    pub fn scale(&self) -> u16 {
        self.scale
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set_mode(&mut self, mode: ScaleMode, host_w: u32, host_h: u32) {
        self.mode = mode;
        self.resize(host_w, host_h);
    }

    pub fn resize(&mut self, host_w: u32, host_h: u32) -> bool {
        let scale = compute_scale(host_w, host_h, self.mode);
        if scale == self.scale {
            return false;
        }
        info!(
            "host {}x{} ({:?}): scale {} -> {}",
            host_w, host_h, self.mode, self.scale, scale
        );
        self.set_scale(scale);
        true
    }

    fn set_scale(&mut self, scale: u16) {
        self.scale = scale;
        self.width = VIRTUAL_WIDTH * scale;
        self.height = VIRTUAL_HEIGHT * scale;
        self.pixels = vec![None; self.width as usize * self.height as usize];
    }

    /// `auto` skips tokens already seen; a forced refresh always re-parses.
    /// A bad token keeps the current fill. Returns whether the fill changed.
    pub fn refresh_color(&mut self, token: &str, auto: bool) -> bool {
        if auto && self.color_token.as_deref() == Some(token) {
            return false;
        }
        self.color_token = Some(token.to_string());
        match parse_color_token(token, self.color_mode) {
            Ok(color) if color != self.fill => {
                debug!("fill color {:?} -> {:?} ({})", self.fill, color, token);
                self.fill = color;
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("keeping fill {:?}: {}", self.fill, e);
                false
            }
        }
    }

    // fit: centred on both axes; cover: left edge, centred vertically
    pub fn placement(&self, host_w: u32, host_h: u32) -> Placement {
        let centre = |host: u32, size: u16| (host as i32 - i32::from(size)) / 2;
        match self.mode {
            ScaleMode::Fit => Placement {
                x: centre(host_w, self.width),
                y: centre(host_h, self.height),
            },
            ScaleMode::Cover => Placement {
                x: 0,
                y: centre(host_h, self.height),
            },
        }
    }

    pub fn composite(&self, frame: &mut Frame, bg: Option<Color>) {
        let host_w = u32::from(frame.width);
        let host_h = u32::from(frame.height) * 2;
        let at = self.placement(host_w, host_h);
        let sample = |hx: i32, hy: i32| -> Option<Color> {
            let (px, py) = (hx - at.x, hy - at.y);
            if px < 0 || py < 0 {
                return None;
            }
            self.pixel(px as u16, py as u16)
        };
        for row in 0..frame.height {
            let top_y = i32::from(row) * 2;
            for col in 0..frame.width {
                let x = i32::from(col);
                let cell = Cell::from_pixels(sample(x, top_y), sample(x, top_y + 1), bg);
                frame.set(col, row, cell);
            }
        }
    }
}

impl Canvas for Surface {
    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let s = i32::from(self.scale);
        let x0 = (x * s).clamp(0, i32::from(self.width));
        let y0 = (y * s).clamp(0, i32::from(self.height));
        let x1 = ((x + w) * s).clamp(0, i32::from(self.width));
        let y1 = ((y + h) * s).clamp(0, i32::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for py in y0 as usize..y1 as usize {
            let row = py * stride;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(Some(self.fill));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_examples() {
        assert_eq!(compute_scale(192, 128, ScaleMode::Fit), 2);
        assert_eq!(compute_scale(100, 100, ScaleMode::Fit), 1);
        assert_eq!(compute_scale(192, 128, ScaleMode::Cover), 2);
        assert_eq!(compute_scale(50, 40, ScaleMode::Cover), 1);
        assert_eq!(compute_scale(0, 0, ScaleMode::Fit), 3);
    }

    #[test]
    fn zero_area_on_either_axis_falls_back() {
        assert_eq!(compute_scale(500, 0, ScaleMode::Fit), FALLBACK_SCALE);
        assert_eq!(compute_scale(0, 500, ScaleMode::Cover), FALLBACK_SCALE);
    }

    #[test]
    fn fit_uses_limiting_axis_and_cover_the_other() {
        // 4x wide, 2x tall
        assert_eq!(compute_scale(384, 128, ScaleMode::Fit), 2);
        assert_eq!(compute_scale(384, 128, ScaleMode::Cover), 4);
        assert_eq!(compute_scale(97, 64, ScaleMode::Cover), 2);
        assert_eq!(compute_scale(20, 10, ScaleMode::Fit), 1);
    }

    #[test]
    fn oversized_host_is_capped() {
        assert_eq!(compute_scale(70_000, 10, ScaleMode::Cover), MAX_SCALE);
        assert_eq!(compute_scale(u32::MAX, u32::MAX, ScaleMode::Fit), MAX_SCALE);
        assert_eq!(MAX_SCALE, 682);
        assert!(VIRTUAL_HEIGHT.checked_mul(MAX_SCALE).is_some());
    }

    #[test]
    fn resize_reports_changes_and_sizes_buffer() {
        let mut s = Surface::new(ScaleMode::Fit, ColorMode::TrueColor);
        assert_eq!(s.scale(), FALLBACK_SCALE);
        assert!(s.resize(192, 130));
        assert_eq!(s.scale(), 2);
        assert_eq!(s.size(), (192, 128));
        assert!(!s.resize(200, 140));
    }

    #[test]
    fn draw_rect_scales_and_clips() {
        let mut s = Surface::new(ScaleMode::Fit, ColorMode::TrueColor);
        s.resize(192, 128);
        s.refresh_color("red", false);
        s.draw_rect(1, 1, 1, 1);
        let red = Some(Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(s.pixel(1, 1), None);
        assert_eq!(s.pixel(2, 2), red);
        assert_eq!(s.pixel(3, 3), red);
        assert_eq!(s.pixel(4, 4), None);

        s.draw_rect(-5, -3, 6, 4);
        assert_eq!(s.pixel(0, 0), red);
        assert_eq!(s.pixel(1, 1), red);
        assert_eq!(s.pixel(2, 0), None);

        s.draw_rect(95, 63, 4, 4);
        assert_eq!(s.pixel(191, 127), red);

        s.clear();
        assert_eq!(s.pixel(2, 2), None);
        assert_eq!(s.pixel(191, 127), None);
    }

    #[test]
    fn auto_refresh_only_reacts_to_new_tokens() {
        let mut s = Surface::new(ScaleMode::Fit, ColorMode::Color16);
        assert!(s.refresh_color("red", true));
        assert!(!s.refresh_color("red", true));
        assert!(s.refresh_color("blue", true));
        assert_eq!(s.fill(), Color::Blue);

        assert!(!s.refresh_color("not-a-color", false));
        assert_eq!(s.fill(), Color::Blue);
        assert!(s.refresh_color("default", false));
        assert_eq!(s.fill(), Color::Reset);
    }

    #[test]
    fn fit_is_centred_and_cover_is_left_anchored() {
        let mut s = Surface::new(ScaleMode::Fit, ColorMode::TrueColor);
        s.resize(200, 130);
        assert_eq!(s.placement(200, 130), Placement { x: 4, y: 1 });

        s.set_mode(ScaleMode::Cover, 200, 130);
        assert_eq!(s.scale(), 3);
        assert_eq!(s.placement(200, 130), Placement { x: 0, y: -31 });
    }

    #[test]
    fn composite_packs_two_rows_per_cell() {
        let mut s = Surface::new(ScaleMode::Fit, ColorMode::Color16);
        // 96 cols x 32 rows of cells is exactly 96x64 host pixels
        s.resize(96, 64);
        s.refresh_color("white", false);
        s.draw_rect(0, 0, 1, 1);
        s.draw_rect(1, 0, 1, 2);

        let mut frame = Frame::new(96, 32, None);
        s.composite(&mut frame, None);
        assert_eq!(frame.get(0, 0).map(|c| c.ch), Some(crate::cell::UPPER_HALF));
        assert_eq!(frame.get(1, 0).map(|c| c.ch), Some(crate::cell::FULL_BLOCK));
        assert_eq!(frame.get(2, 0).map(|c| c.ch), Some(' '));
    }
}
