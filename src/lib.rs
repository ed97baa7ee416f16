// Copyright (c) 2026 rezky_nightky

//! A looping pixel-art rain scene on a fixed 96x64 virtual screen.
//!
//! [`engine::Engine`] steps the simulation and draws through the
//! [`surface::Canvas`] trait; [`surface::Surface`] scales those draw calls by
//! an integer factor into a pixel buffer that the terminal front end
//! composites into half-block cells.

pub mod cell;
pub mod color;
pub mod config;
pub mod engine;
pub mod frame;
pub mod runtime;
pub mod sprites;
pub mod surface;
pub mod terminal;
pub mod ticker;
