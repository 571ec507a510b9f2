//! WebGPU rendering module
//!
//! The scene is tessellated into flat-colored triangles on the CPU
//! (`shapes`) and drawn with a flat-color pipeline (`pipeline`). A custom bird
//! image goes through a second, textured pipeline (`sprite`).

pub mod pipeline;
pub mod shapes;
pub mod sprite;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{Scene, scene};
pub use vertex::{SpriteVertex, Vertex};
