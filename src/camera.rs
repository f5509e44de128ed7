//! Orbit camera for the 3D structure view.
//!
//! Angles are stored in degrees. Azimuth wraps into `[0, 360)`, elevation is
//! clamped to `[-89, 89]` so the look-at basis never flips at the poles, and
//! distance is clamped to `[2, 50]`. The look-at target is the origin and up
//! is `+Y`.

use glam::{Mat4, Vec3, Vec4};

pub const ELEVATION_LIMIT: f32 = 89.0;
pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 50.0;

pub const DEFAULT_AZIMUTH: f32 = 0.0;
pub const DEFAULT_ELEVATION: f32 = 0.0;
pub const DEFAULT_DISTANCE: f32 = 10.0;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    azimuth: f32,
    elevation: f32,
    distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: DEFAULT_AZIMUTH,
            elevation: DEFAULT_ELEVATION,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl OrbitCamera {
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Apply angular deltas in degrees.
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = wrap_degrees(self.azimuth + d_azimuth);
        self.elevation = clamp_finite(
            self.elevation + d_elevation,
            -ELEVATION_LIMIT,
            ELEVATION_LIMIT,
            self.elevation,
        );
    }

    /// Move toward (negative) or away from (positive) the target.
    pub fn zoom(&mut self, d_distance: f32) {
        self.distance = clamp_finite(
            self.distance + d_distance,
            MIN_DISTANCE,
            MAX_DISTANCE,
            self.distance,
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Idle animation: advance azimuth by `step` degrees.
    pub fn tick(&mut self, step: f32) {
        self.azimuth = wrap_degrees(self.azimuth + step);
    }

    /// Cartesian eye position on the orbit sphere.
    pub fn eye_position(&self) -> Vec3 {
        let az = self.azimuth.to_radians();
        let el = self.elevation.to_radians();
        Vec3::new(
            self.distance * az.cos() * el.cos(),
            self.distance * el.sin(),
            self.distance * az.sin() * el.cos(),
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_proj(&self, fov_y_deg: f32, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(fov_y_deg.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR);
        proj * self.view()
    }
}

/// Project a world point through `view_proj` into normalized device
/// coordinates. Points behind the near plane yield `None`.
pub fn project_ndc(view_proj: &Mat4, point: Vec3) -> Option<Vec3> {
    let clip: Vec4 = *view_proj * point.extend(1.0);
    if clip.w <= Z_NEAR {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

fn wrap_degrees(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_eye_sits_on_positive_x() {
        let eye = OrbitCamera::default().eye_position();
        assert!((eye.x - 10.0).abs() < 1e-5);
        assert!(eye.y.abs() < 1e-5);
        assert!(eye.z.abs() < 1e-5);
    }

    #[test]
    fn eye_follows_spherical_formula() {
        let mut cam = OrbitCamera::default();
        cam.rotate(90.0, 30.0);
        let eye = cam.eye_position();
        let el = 30f32.to_radians();
        assert!(eye.x.abs() < 1e-4);
        assert!((eye.y - 10.0 * el.sin()).abs() < 1e-4);
        assert!((eye.z - 10.0 * el.cos()).abs() < 1e-4);
        assert!((eye.length() - cam.distance()).abs() < 1e-4);
    }

    #[test]
    fn elevation_and_distance_clamp() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 500.0);
        assert_eq!(cam.elevation(), ELEVATION_LIMIT);
        cam.rotate(0.0, -1000.0);
        assert_eq!(cam.elevation(), -ELEVATION_LIMIT);
        cam.zoom(-100.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);
        cam.zoom(1e9);
        assert_eq!(cam.distance(), MAX_DISTANCE);
    }

    #[test]
    fn azimuth_wraps_without_clamping() {
        let mut cam = OrbitCamera::default();
        cam.rotate(-5.0, 0.0);
        assert!((cam.azimuth() - 355.0).abs() < 1e-4);
        cam.rotate(10.0, 0.0);
        assert!((cam.azimuth() - 5.0).abs() < 1e-4);
        for _ in 0..2000 {
            cam.tick(0.2);
        }
        assert!((0.0..360.0).contains(&cam.azimuth()));
    }

    #[test]
    fn reset_restores_defaults_exactly() {
        let mut cam = OrbitCamera::default();
        cam.rotate(123.0, -45.0);
        cam.zoom(17.0);
        cam.tick(0.2);
        cam.reset();
        assert_eq!(cam.azimuth(), 0.0);
        assert_eq!(cam.elevation(), 0.0);
        assert_eq!(cam.distance(), 10.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = OrbitCamera::default();
        let ndc = project_ndc(&cam.view_proj(45.0, 1.0), Vec3::ZERO).unwrap();
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let cam = OrbitCamera::default();
        assert!(project_ndc(&cam.view_proj(45.0, 1.0), Vec3::new(20.0, 0.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn camera_stays_in_bounds(
            ops in proptest::collection::vec((any::<f32>(), any::<f32>(), any::<f32>()), 0..64)
        ) {
            let mut cam = OrbitCamera::default();
            for (d_az, d_el, d_dist) in ops {
                cam.rotate(d_az, d_el);
                cam.zoom(d_dist);
                prop_assert!(cam.elevation() >= -ELEVATION_LIMIT && cam.elevation() <= ELEVATION_LIMIT);
                prop_assert!(cam.distance() >= MIN_DISTANCE && cam.distance() <= MAX_DISTANCE);
                prop_assert!(cam.azimuth() >= 0.0 && cam.azimuth() < 360.0);
            }
        }
    }
}
