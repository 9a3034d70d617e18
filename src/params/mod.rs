//! Parameter definitions with documented ranges and semantics.
//!
//! All tuned constants live here:
//! - Wave shading parameters with their debug-panel slider ranges
//! - Camera orbit constants
//! - Render and recording configuration

mod camera;
mod render;
mod waves;

// Re-export all types
pub use camera::CameraOrbit;
pub use render::{RecordingConfig, RenderConfig};
pub use waves::{format_hex_color, parse_hex_color, ParamId, ParamValue, SliderRange, WaveParams};
