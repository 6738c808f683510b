use std::f64::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::render::data::TransformState;

/// Earth's spin in radians per simulated second.
pub const ROTATION_SPEED: f64 = TAU / 86_400.0;
/// Precession of the rotation axis in radians per simulated second.
pub const AXIS_SPEED: f64 = ROTATION_SPEED / 365.0;

pub const AXIAL_TILT_DEG: f32 = 23.5;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

/// Fixed camera looking at the globe, which spins and precesses with
/// simulated time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlobeCamera {
    distance: f32,
    // simulated seconds per real second
    time_speedup: f64,
    axial_tilt: f32,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self::new(15.0, 1000.0)
    }
}

impl GlobeCamera {
    pub fn new(distance: f32, time_speedup: f64) -> Self {
        Self {
            distance,
            time_speedup,
            axial_tilt: AXIAL_TILT_DEG.to_radians(),
            fov_y: std::f32::consts::PI / 20.0,
            near: NEAR,
            far: FAR,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn time_speedup(&self) -> f64 {
        self.time_speedup
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Spin about the polar axis after `elapsed` real seconds.
    pub fn rotation_angle(&self, elapsed: f64) -> f32 {
        (ROTATION_SPEED * self.time_speedup * elapsed).rem_euclid(TAU) as f32
    }

    /// Orientation of the polar axis after `elapsed` real seconds, including the
    /// fixed quarter turn that aligns the scene.
    pub fn precession_angle(&self, elapsed: f64) -> f32 {
        (AXIS_SPEED * self.time_speedup * elapsed + PI / 2.0).rem_euclid(TAU) as f32
    }

    // Rotations compose in the frame of the previous one: precession, tilt,
    // then daily spin.
    pub fn compute_view(&self, elapsed: f64) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_y(self.precession_angle(elapsed))
            * Mat4::from_rotation_z(self.axial_tilt)
            * Mat4::from_rotation_y(self.rotation_angle(elapsed))
    }

    pub fn compute_normal(view: &Mat4) -> Mat4 {
        let mut rotation = *view;
        rotation.w_axis = glam::Vec4::W;
        rotation.inverse().transpose()
    }

    pub fn compute_projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far)
    }

    pub fn transform_state(&self, elapsed: f64, aspect_ratio: f32) -> TransformState {
        let model_view = self.compute_view(elapsed);
        TransformState {
            model_view,
            projection: self.compute_projection(aspect_ratio),
            normal_model_view: Self::compute_normal(&model_view),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(*a, *b, epsilon = 1e-5));
    }

    #[test]
    fn initial_view_composition() {
        let camera = GlobeCamera::default();

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -15.0))
            * Mat4::from_rotation_y(FRAC_PI_2)
            * Mat4::from_rotation_z(23.5f32.to_radians())
            * Mat4::from_rotation_y(0.0);

        assert_mat4_eq(camera.compute_view(0.0), expected);
    }

    #[test]
    fn rotation_order_matters() {
        let camera = GlobeCamera::default();
        let swapped = Mat4::from_translation(Vec3::new(0.0, 0.0, -15.0))
            * Mat4::from_rotation_z(23.5f32.to_radians())
            * Mat4::from_rotation_y(FRAC_PI_2);

        let view = camera.compute_view(0.0);
        let differs = view
            .to_cols_array()
            .iter()
            .zip(swapped.to_cols_array().iter())
            .any(|(a, b)| (a - b).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn one_real_second_advances_by_speedup() {
        let camera = GlobeCamera::default();
        // 86.4 real seconds at 1000x is one simulated day
        assert_abs_diff_eq!(camera.rotation_angle(43.2), std::f32::consts::PI, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.rotation_angle(86.4 + 21.6), FRAC_PI_2, epsilon = 1e-4);

        let slow = GlobeCamera::new(15.0, 1.0);
        assert_abs_diff_eq!(
            slow.rotation_angle(3600.0),
            (ROTATION_SPEED * 3600.0) as f32,
            epsilon = 1e-6
        );
    }

    #[test]
    fn view_after_time() {
        let camera = GlobeCamera::default();
        let t = 10.0;
        let spin = (ROTATION_SPEED * 1000.0 * t) as f32;
        let precession = (AXIS_SPEED * 1000.0 * t) as f32 + FRAC_PI_2;

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -15.0))
            * Mat4::from_rotation_y(precession)
            * Mat4::from_rotation_z(23.5f32.to_radians())
            * Mat4::from_rotation_y(spin);

        assert_mat4_eq(camera.compute_view(t), expected);
    }

    #[test]
    fn normal_matrix_drops_translation() {
        let camera = GlobeCamera::default();
        let view = camera.compute_view(5.0);
        let normal = GlobeCamera::compute_normal(&view);

        // pure rotation: inverse transpose equals the rotation itself
        let mut rotation = view;
        rotation.w_axis = glam::Vec4::W;
        assert_mat4_eq(normal, rotation);
        assert_abs_diff_eq!(normal.w_axis.z, 0.0, epsilon = 1e-6);
    }

    #[rstest]
    #[case(1.0)]
    #[case(4.0 / 3.0)]
    #[case(0.5)]
    fn projection_follows_aspect(#[case] aspect: f32) {
        let camera = GlobeCamera::default();
        let projection = camera.compute_projection(aspect);
        let f = 1.0 / (camera.fov_y() / 2.0).tan();

        assert_abs_diff_eq!(projection.y_axis.y, f, epsilon = 1e-4);
        assert_abs_diff_eq!(projection.x_axis.x, f / aspect, epsilon = 1e-4);
    }

    #[test]
    fn globe_center_is_in_front_of_camera() {
        let camera = GlobeCamera::default();
        let state = camera.transform_state(0.0, 1.0);
        let center = state.projection.project_point3(state.model_view.transform_point3(Vec3::ZERO));

        assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-6);
        assert!(center.z > 0.0 && center.z < 1.0);
    }
}
