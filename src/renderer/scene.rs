//! Paints the game world into a [`Frame`]

use super::frame::Frame;
use super::vertex::colors;
use crate::settings::Settings;
use crate::sim::GameWorld;

/// Record one full repaint: black background, yellow player disc, magenta heading line
pub fn draw_world(world: &GameWorld, settings: &Settings) -> Frame {
    let mut frame = Frame::new(world.display(), colors::BLACK);
    frame.clear();

    let player = world.player();
    let position = player.position();
    let bounds = player.bounds();

    frame.set_color(colors::YELLOW);
    frame.fill_arc(position.x, position.y, bounds.x, bounds.y, 0, 360);

    if settings.show_heading_line {
        let center = player.center();
        let tip = player.heading_tip(settings.heading_line_length);
        frame.set_color(colors::MAGENTA);
        frame.draw_line(tip.x, tip.y, center.x, center.y);
    }

    frame
}
