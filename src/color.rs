// Copyright (c) 2026 rezky_nightky

use std::fs;
use std::path::PathBuf;

use crossterm::style::Color;
use thiserror::Error;

use crate::runtime::ColorMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color token")]
    Empty,
    #[error("unknown color name: {0}")]
    UnknownName(String),
    #[error("malformed color: {0}")]
    Malformed(String),
}

const NAMED: [(&str, (u8, u8, u8)); 20] = [
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("red", (255, 0, 0)),
    ("maroon", (128, 0, 0)),
    ("orange", (255, 165, 0)),
    ("yellow", (255, 255, 0)),
    ("olive", (128, 128, 0)),
    ("lime", (0, 255, 0)),
    ("green", (0, 128, 0)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("teal", (0, 128, 128)),
    ("blue", (0, 0, 255)),
    ("navy", (0, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("purple", (128, 0, 128)),
];

/// Parses a host color token into a terminal color for `mode`.
///
/// `default` / `currentcolor` map to the terminal's own default color
/// (`Color::Reset`), as does every token in mono mode once it parses.
pub fn parse_color_token(token: &str, mode: ColorMode) -> Result<Color, ColorParseError> {
    let token = token.trim().to_ascii_lowercase();
    if token.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if token == "default" || token == "currentcolor" || token == "inherit" {
        return Ok(Color::Reset);
    }
    let (r, g, b) = if let Some(hex) = token.strip_prefix('#') {
        parse_hex(hex).ok_or_else(|| ColorParseError::Malformed(token.clone()))?
    } else if let Some(args) = token
        .strip_prefix("rgba(")
        .or_else(|| token.strip_prefix("rgb("))
    {
        parse_rgb_fn(args).ok_or_else(|| ColorParseError::Malformed(token.clone()))?
    } else {
        NAMED
            .iter()
            .find(|(name, _)| *name == token)
            .map(|&(_, rgb)| rgb)
            .ok_or_else(|| ColorParseError::UnknownName(token.clone()))?
    };
    Ok(downsample(mode, r, g, b))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 | 4 => Some((nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        6 | 8 => Some((byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

// Accepts the body of `rgb(...)` / `rgba(...)` as computed styles report it;
// alpha is ignored.
fn parse_rgb_fn(args: &str) -> Option<(u8, u8, u8)> {
    let body = args.strip_suffix(')')?;
    let mut parts = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let mut channel = || -> Option<u8> {
        let v: f32 = parts.next()?.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    Some((channel()?, channel()?, channel()?))
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = i32::from(a.0) - i32::from(b.0);
    let dg = i32::from(a.1) - i32::from(b.1);
    let db = i32::from(a.2) - i32::from(b.2);
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let step = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;

    let (r6, g6, b6) = (step(r), step(g), step(b));
    let cube = (
        LEVELS[usize::from(r6)],
        LEVELS[usize::from(g6)],
        LEVELS[usize::from(b6)],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, 0),
        239..=255 => (231, 255),
        _ => {
            let idx = 232 + (avg - 8) / 10;
            (idx, 8 + 10 * (idx - 232))
        }
    };

    if dist2((r, g, b), (gray, gray, gray)) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|&(c, _)| c)
        .unwrap_or(Color::White)
}

pub fn downsample(mode: ColorMode, r: u8, g: u8, b: u8) -> Color {
    match mode {
        ColorMode::Mono => Color::Reset,
        ColorMode::TrueColor => Color::Rgb { r, g, b },
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        ColorMode::Color16 => rgb_to_color16(r, g, b),
    }
}

/// Where the fill color token comes from.
///
/// A file source stands in for host styling that changes independently of
/// the animation: it is re-read on every sample.
#[derive(Clone, Debug)]
pub enum ColorSource {
    Fixed(String),
    File { path: PathBuf, fallback: String },
}

impl ColorSource {
    pub fn sample(&self) -> String {
        match self {
            ColorSource::Fixed(token) => token.clone(),
            ColorSource::File { path, fallback } => match fs::read_to_string(path) {
                Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => fallback.clone(),
            },
        }
    }
}
