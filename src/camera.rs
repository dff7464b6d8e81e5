use glam::{Mat4, Vec3};

use crate::{flight::FlightState, settings::CameraSettings};

/// Chase camera, rebuilt from the plane pose every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraState {
    /// Sit `trail_distance` behind the plane along its heading and `height_offset` above it,
    /// looking at the plane.
    #[must_use]
    pub fn follow(flight: &FlightState, params: &CameraSettings) -> Self {
        let target = flight.position;
        let eye =
            target - flight.forward() * params.trail_distance + Vec3::Y * params.height_offset;
        Self { eye, target }
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Perspective for a window of `width` x `height` pixels
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn perspective(params: &CameraSettings, width: u32, height: u32) -> Mat4 {
    let aspect = if height == 0 {
        log::warn!("Zero height window, keeping a square aspect");
        1.0
    } else {
        width as f32 / height as f32
    };
    Mat4::perspective_rh_gl(params.fov_degrees.to_radians(), aspect, params.near, params.far)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::settings::FlightSettings;

    #[test]
    fn test_camera_trails_plane() {
        let params = CameraSettings::default();
        let flight = FlightState::new(&FlightSettings::default());
        let camera = CameraState::follow(&flight, &params);

        assert_eq!(camera.target, flight.position);
        assert_eq!(
            camera.eye,
            flight.position + Vec3::new(0.0, params.height_offset, params.trail_distance)
        );
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_camera_looks_at_plane_after_ticks() {
        let flight_params = FlightSettings::default();
        let params = CameraSettings::default();
        let mut flight = FlightState::new(&flight_params);

        for i in 0..500 {
            flight.controls.up = i % 3 == 0;
            flight.controls.forward = i % 7 == 0;
            flight.tick(((i % 11) as f32 - 5.0) / 5.0, &flight_params);

            let camera = CameraState::follow(&flight, &params);
            assert_eq!(camera.target, flight.position);
            assert_ne!(camera.eye, camera.target);

            let behind = (camera.eye - camera.target) * Vec3::new(1.0, 0.0, 1.0);
            assert!((behind.length() - params.trail_distance).abs() < 1e-3);
            assert!(behind.dot(flight.forward()) < 0.0);
        }
    }

    #[test]
    fn test_view_centres_target() {
        let flight = FlightState::new(&FlightSettings::default());
        let camera = CameraState::follow(&flight, &CameraSettings::default());
        let in_view = camera.view().transform_point3(camera.target);

        assert!(in_view.x.abs() < 1e-5);
        assert!(in_view.y.abs() < 1e-5);
        assert!(in_view.z < 0.0);
    }

    #[test]
    fn test_perspective_zero_height() {
        let params = CameraSettings::default();
        assert_eq!(perspective(&params, 640, 0), perspective(&params, 1, 1));
    }
}
