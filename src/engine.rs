// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::{rngs::StdRng, Rng};
use thiserror::Error;

use crate::runtime::BgVersion;
use crate::sprites::{draw_bg_sprite, draw_raindrop, BG_COLS, BG_FRAMES, BG_ROWS};
use crate::surface::Canvas;
use crate::ticker::Ticker;

pub const MAX_DROPS: usize = 100;
pub const DEFAULT_DROPS: usize = 35;

/// Sub-tick count at which active drops fall one row.
pub const FALL_PERIOD: u32 = 50;
pub const TICK_PERIOD: Duration = Duration::from_millis(15);

pub const DROP_X_MAX: i32 = 108;
pub const DROP_Y_MAX: i32 = 76;

// Glyph anchor relative to the drop position.
const GLYPH_DX: i32 = -5;
const GLYPH_DY: i32 = -3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("drop count {0} out of range (min 1 max 100)")]
    DropCount(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub drops: usize,
    pub bg_version: BgVersion,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drops: DEFAULT_DROPS,
            bg_version: BgVersion::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drops == 0 || self.drops > MAX_DROPS {
            return Err(ConfigError::DropCount(self.drops));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raindrop {
    pub x: i32,
    pub y: i32,
}

impl Raindrop {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.random_range(0..=DROP_X_MAX),
            y: rng.random_range(0..=DROP_Y_MAX),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    WarmingUp,
    Steady,
}

pub struct Engine<R: Rng = StdRng> {
    drops: Vec<Raindrop>,
    bg_frame: u8,
    bg_version: BgVersion,
    activated: usize,
    phase: Phase,
    sub_tick: u32,
    ticks: u64,
    ticker: Ticker,
    rng: R,
}

impl<R: Rng> Engine<R> {
    pub fn new(config: EngineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let drops = (0..config.drops)
            .map(|_| Raindrop::random(&mut rng))
            .collect();
        Ok(Self {
            drops,
            bg_frame: 0,
            bg_version: config.bg_version,
            activated: 0,
            phase: Phase::WarmingUp,
            sub_tick: 0,
            ticks: 0,
            ticker: Ticker::new(TICK_PERIOD),
            rng,
        })
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn bg_frame(&self) -> u8 {
        self.bg_frame
    }

    pub fn bg_version(&self) -> BgVersion {
        self.bg_version
    }

    pub fn set_bg_version(&mut self, version: BgVersion) {
        self.bg_version = version;
    }

    pub fn activated(&self) -> usize {
        self.activated
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sub_tick(&self) -> u32 {
        self.sub_tick
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether drop `index` draws and falls on the next tick.
    pub fn is_active(&self, index: usize) -> bool {
        index < self.drops.len() && (self.phase == Phase::Steady || index <= self.activated)
    }

    pub fn start(&mut self, now: Instant) {
        info!(
            "rain started: {} drops, bg version {}",
            self.drops.len(),
            self.bg_version.number()
        );
        self.ticker.start(now);
    }

    pub fn stop(&mut self) {
        if self.ticker.is_armed() {
            info!("rain stopped after {} ticks", self.ticks);
        }
        self.ticker.stop();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_armed()
    }

    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until(now)
    }

    /// Runs one tick if the timer is due. Returns whether a tick ran.
    pub fn poll<C: Canvas + ?Sized>(&mut self, now: Instant, canvas: &mut C) -> bool {
        if !self.ticker.fire(now) {
            return false;
        }
        self.tick(canvas);
        true
    }

    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        canvas.clear();

        for row in 0..BG_ROWS {
            for col in 0..BG_COLS {
                draw_bg_sprite(canvas, col, row, self.bg_frame, self.bg_version);
            }
        }
        self.bg_frame = (self.bg_frame + 1) % BG_FRAMES;

        let falls = self.sub_tick == FALL_PERIOD;
        let steady = self.phase == Phase::Steady;
        for (index, drop) in self.drops.iter_mut().enumerate() {
            if steady || index <= self.activated {
                draw_raindrop(canvas, drop.x + GLYPH_DX, drop.y + GLYPH_DY);
                if falls {
                    drop.y += 1;
                }
            }
            if drop.y > DROP_Y_MAX {
                *drop = Raindrop::random(&mut self.rng);
            }
        }

        self.sub_tick += 1;
        if self.sub_tick > FALL_PERIOD {
            self.activated += 1;
            self.sub_tick = 0;
        }
        // The counter keeps cycling 1..=R+1 after warm-up; it no longer gates
        // anything once the phase is steady.
        if self.activated > self.drops.len() {
            self.activated = 1;
            if self.phase == Phase::WarmingUp {
                debug!("all {} drops active after {} ticks", self.drops.len(), self.ticks + 1);
                self.phase = Phase::Steady;
            }
        }
        self.ticks += 1;
    }
}
