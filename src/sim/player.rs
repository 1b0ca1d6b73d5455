//! The player actor
//!
//! The player is drawn inside a square bounding box whose top-left corner is
//! `position`. It turns around `center` in 15 degree steps and moves along
//! its heading by whole pixels.

use glam::{DVec2, IVec2};

use super::Display;
use crate::consts::*;
use crate::{heading_angle, polar_to_cartesian};

/// Direction of a single heading step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise on screen (multiplier - 1)
    Left,
    /// Clockwise on screen (multiplier + 1)
    Right,
}

/// The on-screen actor
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner of the drawing box
    position: IVec2,
    /// Rotation center
    center: IVec2,
    /// Bounding box width/height
    bounds: IVec2,
    /// Heading in 15 degree steps (1..=24 once turned)
    angle_multiplier: i32,
    /// Heading in radians, derived from `angle_multiplier`
    angle: f64,
}

impl Player {
    /// Spawn a player horizontally centered in the second-to-last band of the display
    pub fn new(display: Display, size: i32) -> Self {
        let center = Self::spawn_point(display);
        let bounds = IVec2::splat(size);
        let mut player = Self {
            position: center,
            center,
            bounds,
            angle_multiplier: INITIAL_ANGLE_MULTIPLIER,
            angle: 0.0,
        };
        player.position = player.translate(center);
        player.update_angle();
        player
    }

    /// Where a new player's center lands on `display`
    pub fn spawn_point(display: Display) -> IVec2 {
        IVec2::new(
            display.width / 2,
            display.height - display.height / SPAWN_BANDS,
        )
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn center(&self) -> IVec2 {
        self.center
    }

    pub fn bounds(&self) -> IVec2 {
        self.bounds
    }

    pub fn angle_multiplier(&self) -> i32 {
        self.angle_multiplier
    }

    /// Heading in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Radius of the drawn disc
    pub fn radius(&self) -> i32 {
        self.bounds.x / 2
    }

    /// Step the heading by one multiplier unit, wrapping 24 -> 1 and 1 -> 24
    pub fn turn(&mut self, turn: Turn) {
        self.angle_multiplier = match turn {
            Turn::Right if self.angle_multiplier + 1 == ANGLE_STEPS + 1 => 1,
            Turn::Right => self.angle_multiplier + 1,
            Turn::Left if self.angle_multiplier - 1 == 0 => ANGLE_STEPS,
            Turn::Left => self.angle_multiplier - 1,
        };
        self.update_angle();
    }

    fn update_angle(&mut self) {
        self.angle = heading_angle(self.angle_multiplier);
    }

    /// Move the center `distance` pixels along the heading (negative moves backward)
    pub fn move_by(&mut self, distance: i32) {
        let delta = polar_to_cartesian(distance as f64, self.angle);
        let moved = self.center.as_dvec2() + delta;
        self.center = IVec2::new(moved.x.round() as i32, moved.y.round() as i32);
        self.position = self.translate(self.center);
    }

    /// Shift a center point to the top-left of the bounding box
    fn translate(&self, p: IVec2) -> IVec2 {
        p - self.bounds / 2
    }

    /// Far end of the heading line drawn from the center
    ///
    /// The line length is divided by the disc radius, so the default
    /// 2000 unit line on a 64 pixel player reaches 62.5 pixels out.
    pub fn heading_tip(&self, line_length: f64) -> IVec2 {
        let radius = self.radius().max(1) as f64;
        let reach = DVec2::new(self.angle.cos(), self.angle.sin()) * (line_length / radius);
        let tip = self.center.as_dvec2() + reach;
        IVec2::new(tip.x as i32, tip.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn display() -> Display {
        Display::new(720, 1280)
    }

    #[test]
    fn test_spawn_in_band_fifteen() {
        let player = Player::new(display(), PLAYER_SIZE);
        assert_eq!(player.center(), IVec2::new(360, 1200));
        assert_eq!(player.position(), IVec2::new(328, 1168));
        assert_eq!(player.angle_multiplier(), INITIAL_ANGLE_MULTIPLIER);
        assert!((player.angle() - 270.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_turn_right_wraps_to_one() {
        let mut player = Player::new(display(), PLAYER_SIZE);
        for _ in 0..6 {
            player.turn(Turn::Right);
        }
        assert_eq!(player.angle_multiplier(), 24);
        player.turn(Turn::Right);
        assert_eq!(player.angle_multiplier(), 1);
        assert!((player.angle() - 15.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_turn_left_wraps_to_twenty_four() {
        let mut player = Player::new(display(), PLAYER_SIZE);
        for _ in 0..17 {
            player.turn(Turn::Left);
        }
        assert_eq!(player.angle_multiplier(), 1);
        player.turn(Turn::Left);
        assert_eq!(player.angle_multiplier(), 24);
    }

    #[test]
    fn test_move_up_keeps_column() {
        let mut player = Player::new(display(), PLAYER_SIZE);
        player.move_by(MOVE_DISTANCE);
        // cos(270) is a tiny negative number; rounding keeps x put
        assert_eq!(player.center(), IVec2::new(360, 1136));
        assert_eq!(player.position(), IVec2::new(328, 1104));
        player.move_by(-MOVE_DISTANCE);
        assert_eq!(player.center(), IVec2::new(360, 1200));
    }

    #[test]
    fn test_move_diagonal_rounds() {
        let mut player = Player::new(display(), PLAYER_SIZE);
        // 18 -> 21 is 315 degrees: up and to the right
        for _ in 0..3 {
            player.turn(Turn::Right);
        }
        player.move_by(10);
        // 10 * cos(315) = 7.07, 10 * sin(315) = -7.07
        assert_eq!(player.center(), IVec2::new(367, 1193));
    }

    #[test]
    fn test_heading_tip_scaled_by_radius() {
        let player = Player::new(display(), PLAYER_SIZE);
        let tip = player.heading_tip(HEADING_LINE_LENGTH);
        // 2000 / 32 = 62.5 pixels straight up, truncated toward zero
        assert_eq!(tip, IVec2::new(360, 1137));
    }

    proptest! {
        #[test]
        fn prop_angle_matches_multiplier(steps in 0usize..48) {
            let mut player = Player::new(display(), PLAYER_SIZE);
            for _ in 0..steps {
                player.turn(Turn::Right);
            }
            let m = player.angle_multiplier();
            prop_assert!((1..=ANGLE_STEPS).contains(&m));
            prop_assert_eq!(player.angle(), (15.0 * m as f64).to_radians());
        }

        #[test]
        fn prop_full_turn_returns_home(
            prelude in proptest::collection::vec(any::<bool>(), 0..30),
            right in any::<bool>(),
        ) {
            let mut player = Player::new(display(), PLAYER_SIZE);
            for r in prelude {
                player.turn(if r { Turn::Right } else { Turn::Left });
            }
            let start = player.angle_multiplier();
            let turn = if right { Turn::Right } else { Turn::Left };
            for _ in 0..ANGLE_STEPS {
                player.turn(turn);
            }
            prop_assert_eq!(player.angle_multiplier(), start);
        }

        #[test]
        fn prop_move_shifts_center_along_heading(
            turns in 0usize..24,
            distance in -500i32..500,
        ) {
            let mut player = Player::new(display(), PLAYER_SIZE);
            for _ in 0..turns {
                player.turn(Turn::Right);
            }
            let before = player.center();
            player.move_by(distance);
            let shift = player.center() - before;
            let expected = polar_to_cartesian(distance as f64, player.angle());
            prop_assert!((shift.x as f64 - expected.x).abs() <= 0.5 + 1e-9);
            prop_assert!((shift.y as f64 - expected.y).abs() <= 0.5 + 1e-9);
            prop_assert_eq!(player.position(), player.center() - player.bounds() / 2);
        }
    }
}
