//! Vertex format shared by the tessellator and the WebGPU pipeline
//!
//! Shapes are built in display pixels (y down); [`Vertex::to_ndc`] moves them
//! into clip space right before upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::frame::Color;
use crate::sim::Display;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn at(point: Vec2, color: Color) -> Self {
        Self {
            position: point.to_array(),
            color,
        }
    }

    pub fn point(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    /// Map a display-pixel vertex into normalized device coordinates
    pub fn to_ndc(self, display: Display) -> Self {
        let size = Vec2::new(display.width.max(1) as f32, display.height.max(1) as f32);
        let unit = self.point() / size;
        Self::at(
            Vec2::new(unit.x * 2.0 - 1.0, 1.0 - unit.y * 2.0),
            self.color,
        )
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Palette
pub mod colors {
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Player disc
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    /// Heading line
    pub const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_corners_map_to_ndc() {
        let display = Display::new(200, 100);
        let ndc = |x, y| Vertex::at(Vec2::new(x, y), colors::BLACK).to_ndc(display).point();
        assert_eq!(ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(ndc(200.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(ndc(100.0, 50.0), Vec2::ZERO);
    }

    #[test]
    fn test_ndc_keeps_color() {
        let v = Vertex::at(Vec2::new(10.0, 20.0), colors::MAGENTA);
        assert_eq!(v.to_ndc(Display::new(640, 480)).color, colors::MAGENTA);
    }

    #[test]
    fn test_layout_stride_matches_struct() {
        assert_eq!(Vertex::layout().array_stride, 24);
    }
}
