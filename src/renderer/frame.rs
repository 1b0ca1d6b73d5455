//! Immediate-mode draw list
//!
//! A [`Frame`] records the same calls a 2D graphics context takes (clear,
//! set color, fill arc, draw line) so the scene can be painted once and
//! replayed by any backend. Coordinates are display pixels, y down.

use glam::{DVec2, IVec2};

use super::vertex::colors;
use crate::sim::Display;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle with the background color
    ClearRect {
        origin: IVec2,
        size: IVec2,
        color: Color,
    },
    /// Filled pie slice of the ellipse inscribed in a bounding box.
    /// Angles are degrees, 0 at three o'clock, counter-clockwise on screen.
    FillArc {
        origin: IVec2,
        size: IVec2,
        start_angle: i32,
        arc_angle: i32,
        color: Color,
    },
    /// Straight line between two points
    Line { from: IVec2, to: IVec2, color: Color },
}

/// A recorded frame for one display size
#[derive(Debug, Clone)]
pub struct Frame {
    display: Display,
    background: Color,
    color: Color,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(display: Display, background: Color) -> Self {
        Self {
            display,
            background,
            color: colors::WHITE,
            commands: Vec::new(),
        }
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Color for subsequent fill and line calls
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.commands.push(DrawCommand::ClearRect {
            origin: IVec2::new(x, y),
            size: IVec2::new(width, height),
            color: self.background,
        });
    }

    /// Clear the whole display
    pub fn clear(&mut self) {
        self.clear_rect(0, 0, self.display.width, self.display.height);
    }

    pub fn fill_arc(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        start_angle: i32,
        arc_angle: i32,
    ) {
        self.commands.push(DrawCommand::FillArc {
            origin: IVec2::new(x, y),
            size: IVec2::new(width, height),
            start_angle,
            arc_angle,
            color: self.color,
        });
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.commands.push(DrawCommand::Line {
            from: IVec2::new(x1, y1),
            to: IVec2::new(x2, y2),
            color: self.color,
        });
    }
}

/// Whether `point` lies in the filled arc of the ellipse inscribed in `origin`/`size`
pub fn arc_contains(
    origin: IVec2,
    size: IVec2,
    start_angle: i32,
    arc_angle: i32,
    point: DVec2,
) -> bool {
    if size.x <= 0 || size.y <= 0 {
        return false;
    }
    let rx = size.x as f64 / 2.0;
    let ry = size.y as f64 / 2.0;
    let dx = (point.x - (origin.x as f64 + rx)) / rx;
    // Flip y so angles run counter-clockwise on screen
    let dy = -(point.y - (origin.y as f64 + ry)) / ry;
    if dx * dx + dy * dy > 1.0 {
        return false;
    }
    if arc_angle.abs() >= 360 {
        return true;
    }
    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    let (lo, span) = if arc_angle >= 0 {
        (start_angle as f64, arc_angle as f64)
    } else {
        ((start_angle + arc_angle) as f64, -arc_angle as f64)
    };
    (angle - lo).rem_euclid(360.0) <= span
}
