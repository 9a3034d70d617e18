//! Wavescape library - animated procedural ocean surface

pub mod camera;
pub mod cli;
pub mod clock;
pub mod ocean;
pub mod panel;
pub mod params;
pub mod rendering;
