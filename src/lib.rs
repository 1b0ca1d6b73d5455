//! Spoke - a single actor turning and moving along its heading
//!
//! Core modules:
//! - `sim`: Deterministic game model (player, world, commands)
//! - `app`: Application lifecycle, fixed-interval session timer, dialogs
//! - `renderer`: Immediate-mode draw list and WebGPU pipeline
//! - `platform`: Native terminal frontend
//! - `settings`: Data-driven configuration

pub mod app;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, Lifecycle, Session};
pub use error::{AppError, Dialog};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Redraw timer period in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 100;
    /// Maximum timer ticks per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the session accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0;

    /// Degrees per heading step
    pub const ANGLE_STEP_DEGREES: f64 = 15.0;
    /// Heading steps in a full turn
    pub const ANGLE_STEPS: i32 = 24;
    /// Starting heading (18 * 15 = 270 degrees, straight up on a y-down screen)
    pub const INITIAL_ANGLE_MULTIPLIER: i32 = 18;

    /// Player bounding box (width and height)
    pub const PLAYER_SIZE: i32 = 64;
    /// Distance covered by one forward/backward key press
    pub const MOVE_DISTANCE: i32 = 64;
    /// Heading line length before it is scaled by 1/radius
    pub const HEADING_LINE_LENGTH: f64 = 2000.0;
    /// The display is split into this many horizontal bands; the player spawns in the last but one
    pub const SPAWN_BANDS: i32 = 16;

    /// Stroke width for lines (pixels)
    pub const LINE_WIDTH: f32 = 2.0;
    /// Triangle fan segments for a full 360 degree arc
    pub const ARC_SEGMENTS: u32 = 48;
}

/// Angle in radians for a heading multiplier
#[inline]
pub fn heading_angle(multiplier: i32) -> f64 {
    (consts::ANGLE_STEP_DEGREES * multiplier as f64).to_radians()
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
