// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::engine::DEFAULT_DROPS;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  pixelrain --bg-version 2 --color default --background default --drops 35";

pub const DEFAULT_BG_VERSION: &str = "2";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
    for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix("  pixelrain") {
            out.push_str("  \x1b[1;34mpixelrain\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        }
    }
    out
}

#[derive(Parser, Debug, Clone)]
#[command(name = "pixelrain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "bg-version",
        default_value = DEFAULT_BG_VERSION,
        help_heading = "APPEARANCE",
        help = "Background sprite set: 1 or 2 (anything else means 2)"
    )]
    pub bg_version: String,

    #[arg(
        long = "cover",
        help_heading = "APPEARANCE",
        help = "Fill the whole terminal, clipping the overflow, instead of fitting inside it"
    )]
    pub cover: bool,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "default",
        help_heading = "APPEARANCE",
        help = "Rain color: default, a color name, #rrggbb or rgb(r, g, b)"
    )]
    pub color: String,

    #[arg(
        long = "color-file",
        help_heading = "APPEARANCE",
        help = "Read the rain color from this file; re-read every 200ms (falls back to --color)"
    )]
    pub color_file: Option<PathBuf>,

    #[arg(
        long = "background",
        default_value = "default",
        help_heading = "APPEARANCE",
        help = "Background color (same syntax as --color)"
    )]
    pub background: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'd',
        long = "drops",
        default_value_t = DEFAULT_DROPS,
        help_heading = "RAIN",
        help = "Number of raindrops (min 1 max 100)"
    )]
    pub drops: usize,

    #[arg(
        long = "seed",
        help_heading = "RAIN",
        help = "Seed for drop positions (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "params",
        help_heading = "GENERAL",
        help = "Query/hash style options, e.g. \"#bg-version=1&cover\"; absent keys reset to defaults"
    )]
    pub params: Option<String>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    /// Overrides the options that the params string controls. Keys missing
    /// from the string go back to their defaults.
    pub fn apply_params(&mut self, params: &HostParams) {
        self.bg_version = params
            .bg_version
            .clone()
            .unwrap_or_else(|| DEFAULT_BG_VERSION.to_string());
        self.cover = params.cover;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostParams {
    pub bg_version: Option<String>,
    pub cover: bool,
}

impl HostParams {
    /// Parses `bg-version=1&cover` style strings, with an optional leading
    /// `?` or `#`. The first occurrence of a key wins; a bare key counts as
    /// present with an empty value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw
            .strip_prefix('#')
            .or_else(|| raw.strip_prefix('?'))
            .unwrap_or(raw);
        let mut out = HostParams::default();
        let mut seen_bg = false;
        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match percent_decode(key).as_str() {
                "bg-version" if !seen_bg => {
                    seen_bg = true;
                    out.bg_version = Some(percent_decode(value));
                }
                "cover" => out.cover = true,
                _ => {}
            }
        }
        out
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let hex = |b: u8| (b as char).to_digit(16).map(|d| d as u8);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["pixelrain"]).unwrap();
        assert_eq!(args.bg_version, "2");
        assert!(!args.cover);
        assert_eq!(args.drops, 35);
        assert_eq!(args.color, "default");
        assert!(args.params.is_none());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "pixelrain",
            "--bg-version",
            "1",
            "--cover",
            "--drops",
            "100",
            "--seed",
            "9",
            "-c",
            "#00ff00",
        ])
        .unwrap();
        assert_eq!(args.bg_version, "1");
        assert!(args.cover);
        assert_eq!(args.drops, 100);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.color, "#00ff00");
    }

    #[test]
    fn host_params_parse_hash_strings() {
        assert_eq!(
            HostParams::parse("#bg-version=1&cover"),
            HostParams {
                bg_version: Some("1".to_string()),
                cover: true
            }
        );
        assert_eq!(
            HostParams::parse("?cover=&bg-version=2&bg-version=1"),
            HostParams {
                bg_version: Some("2".to_string()),
                cover: true
            }
        );
        assert_eq!(HostParams::parse(""), HostParams::default());
        assert_eq!(
            HostParams::parse("bg%2Dversion=%31"),
            HostParams {
                bg_version: Some("1".to_string()),
                cover: false
            }
        );
    }

    #[test]
    fn apply_params_resets_missing_keys() {
        let mut args = Args::try_parse_from(["pixelrain", "--bg-version", "1", "--cover"]).unwrap();
        args.apply_params(&HostParams::parse("#other=1"));
        assert_eq!(args.bg_version, DEFAULT_BG_VERSION);
        assert!(!args.cover);
    }
}
