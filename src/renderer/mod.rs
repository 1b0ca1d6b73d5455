//! Rendering
//!
//! The scene is recorded into an immediate-mode [`Frame`], then either
//! tessellated for the WebGPU pipeline or rasterized by the terminal.

pub mod frame;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use frame::{Color, DrawCommand, Frame};
pub use pipeline::RenderState;
pub use scene::draw_world;
