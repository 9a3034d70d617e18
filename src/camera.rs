//! Orbit camera: deterministic eye and look-at paths over elapsed time.

use glam::{Mat4, Vec3};

use crate::params::{CameraOrbit, RenderConfig};

/// Camera whose pose is a pure function of elapsed time.
///
/// No persisted velocity or acceleration: every frame re-evaluates the orbit
/// from scratch, so the pose is reproducible for any time value.
pub struct OrbitCamera {
    params: CameraOrbit,
}

impl OrbitCamera {
    pub fn new(params: CameraOrbit) -> Self {
        Self { params }
    }

    /// Eye position at `time_s`: a circle of fixed radius in the horizontal
    /// plane at fixed height.
    pub fn eye(&self, time_s: f32) -> Vec3 {
        let p = &self.params;
        let angle = time_s * p.angular_speed;
        Vec3::new(
            angle.sin() * p.orbit_radius,
            p.eye_height,
            angle.cos() * p.orbit_radius,
        )
    }

    /// Look-at target at `time_s`, swaying around the origin with independent
    /// amplitude per axis.
    pub fn target(&self, time_s: f32) -> Vec3 {
        let [ax, ay, az] = self.params.target_amplitude;
        Vec3::new(time_s.cos() * ax, time_s.sin() * ay, time_s.sin() * az)
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, eye_position)
    pub fn view_proj(&self, time_s: f32, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.eye(time_s);
        let target = self.target(time_s);

        // Y stays up; the camera never rolls.
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn pose_at_t0_matches_declared_start() {
        let camera = OrbitCamera::new(CameraOrbit::default());
        let eye = camera.eye(0.0);
        assert!((eye - Vec3::new(0.0, 0.23, 3.0)).length() < EPS);

        let target = camera.target(0.0);
        assert!((target - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn eye_stays_on_orbit_circle() {
        let params = CameraOrbit::default();
        let camera = OrbitCamera::new(params.clone());
        for i in 0..500 {
            let t = i as f32 * 0.37;
            let eye = camera.eye(t);
            let radius = (eye.x * eye.x + eye.z * eye.z).sqrt();
            assert!(
                (radius - params.orbit_radius).abs() < 1e-4,
                "radius {} off circle at t={}",
                radius,
                t
            );
            assert_eq!(eye.y, params.eye_height);
        }
    }

    #[test]
    fn target_sway_respects_axis_amplitudes() {
        let params = CameraOrbit::default();
        let camera = OrbitCamera::new(params.clone());
        let [ax, ay, az] = params.target_amplitude;
        for i in 0..500 {
            let t = i as f32 * 0.11;
            let target = camera.target(t);
            assert!(target.x.abs() <= ax + EPS);
            assert!(target.y.abs() <= ay + EPS);
            assert!(target.z.abs() <= az + EPS);
        }
    }

    #[test]
    fn view_proj_is_a_valid_transform() {
        let camera = OrbitCamera::new(CameraOrbit::default());
        let (view_proj, eye) = camera.view_proj(0.0, &RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(eye.x.is_finite() && eye.y.is_finite() && eye.z.is_finite());

        // The origin sits between the near and far planes at t=0.
        let clip = view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
    }
}
