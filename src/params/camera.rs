//! Camera orbit constants.

/// Orbit camera parameters.
///
/// The eye traces a circle of fixed radius in the horizontal plane while the
/// look-at target sways around the origin. All values are tuned constants;
/// changing them changes the shot, not the simulation.
#[derive(Debug, Clone)]
pub struct CameraOrbit {
    /// Orbit radius (world units)
    pub orbit_radius: f32,

    /// Angular speed of the orbit (radians per second)
    pub angular_speed: f32,

    /// Eye height above the surface (world units)
    pub eye_height: f32,

    /// Look-at sway amplitude per axis (world units)
    pub target_amplitude: [f32; 3],
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            orbit_radius: 3.0,
            angular_speed: 0.17,
            eye_height: 0.23,
            target_amplitude: [1.0, 0.5, 0.4],
        }
    }
}
