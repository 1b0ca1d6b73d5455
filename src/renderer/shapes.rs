//! Shape generation for 2D primitives
//!
//! Turns a recorded [`Frame`] into a triangle list in display pixels.

use glam::Vec2;

use super::frame::{Color, DrawCommand, Frame};
use super::vertex::Vertex;
use crate::consts::{ARC_SEGMENTS, LINE_WIDTH};

/// Generate vertices for every command in the frame, in paint order
pub fn tessellate(frame: &Frame) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in frame.commands() {
        match *command {
            DrawCommand::ClearRect {
                origin,
                size,
                color,
            } => vertices.extend(rect(origin.as_vec2(), size.as_vec2(), color)),
            DrawCommand::FillArc {
                origin,
                size,
                start_angle,
                arc_angle,
                color,
            } => vertices.extend(filled_arc(
                origin.as_vec2(),
                size.as_vec2(),
                start_angle as f32,
                arc_angle as f32,
                color,
            )),
            DrawCommand::Line { from, to, color } => {
                vertices.extend(line(from.as_vec2(), to.as_vec2(), LINE_WIDTH, color))
            }
        }
    }
    vertices
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(origin: Vec2, size: Vec2, color: Color) -> Vec<Vertex> {
    let a = origin;
    let b = origin + Vec2::new(size.x, 0.0);
    let c = origin + size;
    let d = origin + Vec2::new(0.0, size.y);
    vec![
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]
}

/// Generate vertices for a filled pie slice of the ellipse inscribed in a box
///
/// Angles are degrees, counter-clockwise on screen from three o'clock.
pub fn filled_arc(
    origin: Vec2,
    size: Vec2,
    start_deg: f32,
    arc_deg: f32,
    color: Color,
) -> Vec<Vertex> {
    let sweep = arc_deg.clamp(-360.0, 360.0);
    let segments = ((ARC_SEGMENTS as f32 * sweep.abs() / 360.0).ceil() as u32).max(1);
    let radii = size / 2.0;
    let center = origin + radii;
    // Screen y is down, so counter-clockwise means subtracting the sine
    let point = |deg: f32| {
        let theta = deg.to_radians();
        Vec2::new(
            center.x + radii.x * theta.cos(),
            center.y - radii.y * theta.sin(),
        )
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let p1 = point(start_deg + sweep * i as f32 / segments as f32);
        let p2 = point(start_deg + sweep * (i + 1) as f32 / segments as f32);

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(p1, color));
        vertices.push(Vertex::at(p2, color));
    }

    vertices
}

/// Generate vertices for a line as a quad of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let v1a = from + perp;
    let v1b = from - perp;
    let v2a = to + perp;
    let v2b = to - perp;

    // Two triangles
    vec![
        Vertex::at(v1a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2a, color),
        Vertex::at(v2a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2b, color),
    ]
}
