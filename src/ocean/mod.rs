//! Ocean surface geometry and the CPU twin of the shader wave function.

mod mesh;
pub mod waves;

pub use mesh::{OceanGrid, Vertex, PLANE_EXTENT};
