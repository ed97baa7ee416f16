// Copyright (c) 2026 rezky_nightky

//! Fixed pixel-art assets, in virtual pixels.

use crate::runtime::BgVersion;
use crate::surface::Canvas;

/// Side length of one background tile.
pub const TILE: i32 = 8;
pub const BG_COLS: i32 = 12;
pub const BG_ROWS: i32 = 8;
pub const BG_FRAMES: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

const fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect { x, y, w, h }
}

/// Droplet outline, anchored at its top-left corner.
pub const RAINDROP: [Rect; 8] = [
    rect(3, 0, 2, 1),
    rect(2, 1, 1, 2),
    rect(5, 1, 1, 2),
    rect(1, 3, 1, 3),
    rect(6, 3, 1, 3),
    rect(2, 6, 1, 1),
    rect(5, 6, 1, 1),
    rect(3, 7, 2, 1),
];

// Streak at column 1 of the tile, shared by both versions.
const PRIMARY: [&[Rect]; 8] = [
    &[rect(1, 0, 1, 4)],
    &[rect(1, 1, 1, 4)],
    &[rect(1, 2, 1, 4)],
    &[rect(1, 3, 1, 4)],
    &[rect(1, 4, 1, 4)],
    &[rect(1, 5, 1, 3), rect(1, 0, 1, 1)],
    &[rect(1, 6, 1, 2), rect(1, 0, 1, 2)],
    &[rect(1, 7, 1, 1), rect(1, 0, 1, 3)],
];

const SECONDARY_V1: [&[Rect]; 8] = [
    &[rect(5, 2, 1, 4)],
    &[rect(5, 3, 1, 4)],
    &[rect(5, 4, 1, 4)],
    &[rect(5, 5, 1, 3), rect(5, 0, 1, 1)],
    &[rect(5, 6, 1, 2), rect(5, 0, 1, 2)],
    &[rect(5, 7, 1, 1), rect(5, 0, 1, 3)],
    &[rect(5, 0, 1, 4)],
    &[rect(5, 1, 1, 4)],
];

const SECONDARY_V2: [&[Rect]; 8] = [
    &[rect(5, 4, 1, 4)],
    &[rect(5, 5, 1, 3), rect(5, 0, 1, 1)],
    &[rect(5, 6, 1, 2), rect(5, 0, 1, 2)],
    &[rect(5, 7, 1, 1), rect(5, 0, 1, 3)],
    &[rect(5, 0, 1, 4)],
    &[rect(5, 1, 1, 4)],
    &[rect(5, 2, 1, 4)],
    &[rect(5, 3, 1, 4)],
];

/// Tile-local rectangles of background frame `frame` (taken modulo 8), in
/// draw order.
pub fn bg_sprite(frame: u8, version: BgVersion) -> impl Iterator<Item = Rect> {
    let frame = usize::from(frame % BG_FRAMES);
    let primary: &'static [Rect] = PRIMARY[frame];
    let secondary: &'static [Rect] = match version {
        BgVersion::V1 => SECONDARY_V1[frame],
        BgVersion::V2 => SECONDARY_V2[frame],
    };
    primary.iter().chain(secondary).copied()
}

pub fn draw_bg_sprite<C: Canvas + ?Sized>(
    canvas: &mut C,
    col: i32,
    row: i32,
    frame: u8,
    version: BgVersion,
) {
    let (ox, oy) = (col * TILE, row * TILE);
    for r in bg_sprite(frame, version) {
        canvas.draw_rect(ox + r.x, oy + r.y, r.w, r.h);
    }
}

pub fn draw_raindrop<C: Canvas + ?Sized>(canvas: &mut C, x: i32, y: i32) {
    for r in RAINDROP {
        canvas.draw_rect(x + r.x, y + r.y, r.w, r.h);
    }
}
