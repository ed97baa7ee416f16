// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

pub const UPPER_HALF: char = '▀';
pub const LOWER_HALF: char = '▄';
pub const FULL_BLOCK: char = '█';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
        }
    }

    /// Encodes two vertically stacked host pixels into one terminal cell.
    ///
    /// `Color::Reset` only means "default foreground" when it is used as a
    /// foreground, so it is never placed in the background slot.
    pub fn from_pixels(top: Option<Color>, bottom: Option<Color>, bg: Option<Color>) -> Self {
        match (top, bottom) {
            (None, None) => Self::blank_with_bg(bg),
            (Some(t), None) => Self {
                ch: UPPER_HALF,
                fg: Some(t),
                bg,
            },
            (None, Some(b)) => Self {
                ch: LOWER_HALF,
                fg: Some(b),
                bg,
            },
            (Some(t), Some(b)) if t == b => Self {
                ch: FULL_BLOCK,
                fg: Some(t),
                bg,
            },
            (Some(t), Some(b)) if b == Color::Reset => Self {
                ch: LOWER_HALF,
                fg: Some(b),
                bg: Some(t),
            },
            (Some(t), Some(b)) => Self {
                ch: UPPER_HALF,
                fg: Some(t),
                bg: Some(b),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_pairs_pick_matching_block_glyph() {
        let red = Some(Color::Red);
        assert_eq!(Cell::from_pixels(None, None, None).ch, ' ');
        assert_eq!(Cell::from_pixels(red, None, None).ch, UPPER_HALF);
        assert_eq!(Cell::from_pixels(None, red, None).ch, LOWER_HALF);
        assert_eq!(Cell::from_pixels(red, red, None).ch, FULL_BLOCK);
    }

    #[test]
    fn default_foreground_never_lands_in_background() {
        let c = Cell::from_pixels(Some(Color::Blue), Some(Color::Reset), None);
        assert_eq!(c.ch, LOWER_HALF);
        assert_eq!(c.fg, Some(Color::Reset));
        assert_eq!(c.bg, Some(Color::Blue));

        let c = Cell::from_pixels(Some(Color::Reset), Some(Color::Blue), None);
        assert_eq!(c.ch, UPPER_HALF);
        assert_eq!(c.fg, Some(Color::Reset));
        assert_eq!(c.bg, Some(Color::Blue));
    }
}
