// Copyright (c) 2026 rezky_nightky

use std::env;
use std::fs::File;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use pixelrain::color::{parse_color_token, ColorSource};
use pixelrain::config::{color_enabled_stdout, default_params_usage_for_help, Args, HostParams};
use pixelrain::engine::{Engine, EngineConfig, MAX_DROPS};
use pixelrain::frame::Frame;
use pixelrain::runtime::{BgVersion, ColorMode, ScaleMode};
use pixelrain::surface::Surface;
use pixelrain::terminal::{restore_terminal_best_effort, Terminal};
use pixelrain::ticker::Ticker;

/// How often the fill color token is re-sampled.
const COLOR_REFRESH_PERIOD: Duration = Duration::from_millis(200);

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("PIXELRAIN_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_usize_range(name: &str, v: usize, min: usize, max: usize) -> usize {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            16 => ColorMode::Color16,
            8 | 256 => ColorMode::Color256,
            24 | 32 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
                std::process::exit(1);
            }
        };
    }

    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    if env::var("TERM").unwrap_or_default().eq_ignore_ascii_case("dumb") {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

fn init_logging(args: &Args) {
    let Some(path) = &args.log_file else {
        return;
    };
    match File::create(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => {
            eprintln!("failed to open log file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Host size in pixels: every terminal cell holds two stacked pixels.
fn host_pixels(cols: u16, rows: u16) -> (u32, u32) {
    (u32::from(cols), u32::from(rows) * 2)
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    let mut args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        let sha = env!("PIXELRAIN_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    if let Some(raw) = args.params.clone() {
        args.apply_params(&HostParams::parse(&raw));
    }

    init_logging(&args);

    let drops = require_usize_range("--drops", args.drops, 1, MAX_DROPS);
    let duration_s = args.duration.and_then(|s| {
        if !s.is_finite() || s <= 0.0 {
            return None;
        }
        Some(require_f64_range("--duration", s, 0.1, 86400.0))
    });

    let color_mode = detect_color_mode(&args);
    let bg = match parse_color_token(&args.background, color_mode) {
        Ok(Color::Reset) => None,
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("invalid --background: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = parse_color_token(&args.color, color_mode) {
        eprintln!("invalid --color: {}", e);
        std::process::exit(1);
    }
    let color_source = match &args.color_file {
        Some(path) => ColorSource::File {
            path: path.clone(),
            fallback: args.color.clone(),
        },
        None => ColorSource::Fixed(args.color.clone()),
    };

    let bg_version = BgVersion::sanitize(&args.bg_version);
    let scale_mode = ScaleMode::from_cover(args.cover);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut engine = match Engine::new(EngineConfig { drops, bg_version }, rng) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "config: {:?} mode, {:?}, bg version {}, seed {:?}",
        scale_mode,
        color_mode,
        bg_version.number(),
        args.seed
    );

    let mut term = Terminal::new()?;
    let (cols, rows) = term.size()?;
    let (host_w, host_h) = host_pixels(cols, rows);

    let mut surface = Surface::new(scale_mode, color_mode);
    surface.resize(host_w, host_h);
    surface.refresh_color(&color_source.sample(), false);
    let mut frame = Frame::new(cols, rows, bg);

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));

    let mut color_refresh = Ticker::new(COLOR_REFRESH_PERIOD);
    engine.start(start_time);
    color_refresh.start(start_time);

    let mut running = true;
    while running {
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
                        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => running = false,
                        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                            running = false
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }

            let now = Instant::now();
            if !running || pending_resize.is_some() {
                break;
            }
            if end_time.is_some_and(|end| now >= end) {
                running = false;
                break;
            }

            let wait = [
                engine.next_tick_in(now),
                color_refresh.time_until(now),
                end_time.map(|end| end.saturating_duration_since(now)),
            ]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(COLOR_REFRESH_PERIOD);
            if wait.is_zero() {
                break;
            }
            let _ = Terminal::poll_event(wait)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            let (host_w, host_h) = host_pixels(nw, nh);
            surface.resize(host_w, host_h);
            surface.refresh_color(&color_source.sample(), false);
            frame = Frame::new(nw, nh, bg);
        }

        let now = Instant::now();
        if color_refresh.fire(now) {
            surface.refresh_color(&color_source.sample(), true);
        }
        if engine.poll(now, &mut surface) {
            surface.composite(&mut frame, bg);
            if frame.has_changes() {
                term.draw(&mut frame)?;
            }
        }
    }

    engine.stop();
    Ok(())
}
