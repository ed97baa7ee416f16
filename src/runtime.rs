// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// How the fixed virtual screen is fitted into the host area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleMode {
    /// Largest integer scale that fits entirely; host excess is clipped away.
    #[default]
    Fit,
    /// Smallest integer scale that fills the host; overflow is clipped.
    Cover,
}

impl ScaleMode {
    pub fn from_cover(cover: bool) -> Self {
        if cover {
            ScaleMode::Cover
        } else {
            ScaleMode::Fit
        }
    }
}

/// Background sprite set. Both versions share the primary streak and differ
/// in the phase of the secondary one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BgVersion {
    V1,
    #[default]
    V2,
}

impl BgVersion {
    /// Host-side sanitizing: anything but `1` or `2` falls back to version 2.
    pub fn sanitize(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if v == 1.0 => BgVersion::V1,
            _ => BgVersion::V2,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            BgVersion::V1 => 1,
            BgVersion::V2 => 2,
        }
    }
}
