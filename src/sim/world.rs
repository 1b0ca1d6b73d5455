//! The game world: display bounds plus the player
//!
//! Key handlers mutate the world immediately; the timer only refreshes the
//! display size and counts ticks. Repainting is the shell's job.

use super::input::Command;
use super::player::{Player, Turn};
use super::Display;
use crate::settings::Settings;

/// Whether the world still accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldPhase {
    /// Normal play
    Running,
    /// Quit requested; the shell should end the session
    Quit,
}

/// Tunables the world needs from the settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Player bounding box size
    pub player_size: i32,
    /// Distance for one forward/backward step
    pub move_distance: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player_size: crate::consts::PLAYER_SIZE,
            move_distance: crate::consts::MOVE_DISTANCE,
        }
    }
}

impl From<&Settings> for WorldConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            player_size: settings.player_size,
            move_distance: settings.move_distance,
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameWorld {
    display: Display,
    config: WorldConfig,
    player: Player,
    phase: WorldPhase,
    /// Timer tick counter
    ticks: u64,
}

impl GameWorld {
    pub fn new(display: Display, config: WorldConfig) -> Self {
        Self {
            display,
            config,
            player: Player::new(display, config.player_size),
            phase: WorldPhase::Running,
            ticks: 0,
        }
    }

    /// Restart: replace the player with a fresh one at the spawn point
    pub fn init(&mut self) {
        self.player = Player::new(self.display, self.config.player_size);
        self.phase = WorldPhase::Running;
        log::debug!("World restarted at {:?}", self.player.center());
    }

    /// Timer tick: pick up the current display size
    pub fn tick(&mut self, display: Display) {
        if self.phase == WorldPhase::Quit {
            return;
        }
        if display != self.display {
            log::debug!(
                "Display resized {}x{} -> {}x{}",
                self.display.width,
                self.display.height,
                display.width,
                display.height
            );
            self.display = display;
        }
        self.ticks += 1;
    }

    pub fn left(&mut self) {
        self.player.turn(Turn::Left);
    }

    pub fn right(&mut self) {
        self.player.turn(Turn::Right);
    }

    pub fn up(&mut self) {
        self.player.move_by(self.config.move_distance);
    }

    pub fn down(&mut self) {
        self.player.move_by(-self.config.move_distance);
    }

    pub fn quit(&mut self) {
        log::info!("Quit requested after {} ticks", self.ticks);
        self.phase = WorldPhase::Quit;
    }

    /// Dispatch a command; ignored once the world has quit
    pub fn apply(&mut self, command: Command) {
        if self.phase == WorldPhase::Quit {
            return;
        }
        match command {
            Command::TurnLeft => self.left(),
            Command::TurnRight => self.right(),
            Command::Forward => self.up(),
            Command::Backward => self.down(),
            Command::Quit => self.quit(),
            Command::Restart => self.init(),
        }
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn phase(&self) -> WorldPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn has_quit(&self) -> bool {
        self.phase == WorldPhase::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn new_world() -> GameWorld {
        GameWorld::new(Display::new(640, 480), WorldConfig::default())
    }

    #[test]
    fn test_commands_drive_player() {
        let mut world = new_world();
        world.apply(Command::TurnRight);
        assert_eq!(world.player().angle_multiplier(), 19);
        world.apply(Command::TurnLeft);
        world.apply(Command::TurnLeft);
        assert_eq!(world.player().angle_multiplier(), 17);

        let mut world = new_world();
        let start = world.player().center();
        world.apply(Command::Forward);
        assert_eq!(world.player().center(), start - IVec2::new(0, 64));
        world.apply(Command::Backward);
        assert_eq!(world.player().center(), start);
    }

    #[test]
    fn test_restart_resets_player() {
        let mut world = new_world();
        let fresh = world.player().clone();
        world.apply(Command::TurnRight);
        world.apply(Command::Forward);
        assert_ne!(world.player(), &fresh);

        world.apply(Command::Restart);
        assert_eq!(world.player(), &fresh);
    }

    #[test]
    fn test_restart_uses_current_display() {
        let mut world = new_world();
        world.tick(Display::new(1000, 1600));
        world.init();
        assert_eq!(world.player().center(), IVec2::new(500, 1500));
    }

    #[test]
    fn test_tick_tracks_display() {
        let mut world = new_world();
        world.tick(Display::new(800, 600));
        assert_eq!(world.display(), Display::new(800, 600));
        assert_eq!(world.ticks(), 1);
    }

    #[test]
    fn test_quit_freezes_world() {
        let mut world = new_world();
        world.apply(Command::Quit);
        assert!(world.has_quit());

        let before = world.player().clone();
        world.apply(Command::Forward);
        world.tick(Display::new(10, 10));
        assert_eq!(world.player(), &before);
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.phase(), WorldPhase::Quit);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            player_size: 32,
            move_distance: 10,
            ..Settings::default()
        };
        let mut world = GameWorld::new(Display::new(640, 480), WorldConfig::from(&settings));
        assert_eq!(world.player().bounds(), IVec2::splat(32));
        let start = world.player().center();
        world.up();
        assert_eq!(world.player().center(), start - IVec2::new(0, 10));
    }
}
