//! Deterministic game model
//!
//! All gameplay logic lives here. This module must stay pure:
//! - State changes only through commands and timer ticks
//! - Integer screen coordinates, y grows downward
//! - No rendering or platform dependencies

pub mod input;
pub mod player;
pub mod world;

pub use input::Command;
pub use player::{Player, Turn};
pub use world::{GameWorld, WorldConfig, WorldPhase};

/// Size of the drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Display {
    pub width: i32,
    pub height: i32,
}

impl Display {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
