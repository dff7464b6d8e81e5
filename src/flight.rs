use std::f32::consts::PI;

use glam::Vec3;

use crate::{input::Controls, settings::FlightSettings};

/// Barrel roll progress. Angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Roll {
    pub angle: f32,
    rolling: bool,
    crazy: bool,
}

impl Roll {
    /// No effect while a roll is already under way or crazy roll is spinning the plane
    pub fn start(&mut self) {
        if !self.rolling && !self.crazy {
            self.rolling = true;
            self.angle = 0.0;
        }
    }

    pub fn toggle_crazy(&mut self) {
        self.crazy = !self.crazy;
        if !self.crazy && !self.rolling {
            self.angle = 0.0;
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.rolling || self.crazy
    }

    fn advance(&mut self, step: f32) {
        if !self.is_active() {
            return;
        }
        self.angle += step;
        if self.angle >= 360.0 {
            self.rolling = false;
            self.angle = if self.crazy { self.angle - 360.0 } else { 0.0 };
        }
    }

    /// Vertical hop over the course of a single roll, zero at both ends.
    #[must_use]
    pub fn hop(&self, height: f32) -> f32 {
        if self.rolling && !self.crazy {
            (self.angle / 360.0 * PI).sin() * height
        } else {
            0.0
        }
    }
}

/// Wrap into `[0, 360)`. `rem_euclid` alone rounds a tiny negative angle up to exactly 360.
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Plane pose and the controls steering it. Heading, tilt and propeller angle are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    pub position: Vec3,
    /// 0 flies towards -z, 90 towards +x
    pub heading: f32,
    pub speed: f32,
    pub side_tilt: f32,
    pub propeller_angle: f32,
    pub roll: Roll,
    pub controls: Controls,
}

impl FlightState {
    #[must_use]
    pub fn new(params: &FlightSettings) -> Self {
        Self {
            position: Vec3::from(params.initial_position),
            heading: 0.0,
            speed: params.initial_speed,
            side_tilt: 0.0,
            propeller_angle: 0.0,
            roll: Roll::default(),
            controls: Controls::default(),
        }
    }

    /// Unit vector along the current heading, always level.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        Vec3::new(sin, 0.0, -cos)
    }

    /// Advance one frame. `turn_ratio` is clamped to `[-1, 1]`.
    pub fn tick(&mut self, turn_ratio: f32, params: &FlightSettings) {
        let turn_ratio = turn_ratio.clamp(-1.0, 1.0);

        // opposing keys held together cancel out
        if self.controls.up {
            self.position.y += params.climb_step;
        }
        if self.controls.down {
            self.position.y -= params.climb_step;
        }
        let previous_speed = self.speed;
        if self.controls.forward {
            self.speed += params.acceleration;
        }
        if self.controls.backward {
            self.speed -= params.acceleration;
        }
        self.speed = self.speed.min(params.max_speed).max(params.min_speed);
        if self.speed != previous_speed {
            log::debug!("Speed {:.3}", self.speed);
        }

        self.heading = wrap_degrees(self.heading + params.turn_rate * turn_ratio);

        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.position.x += sin * self.speed;
        self.position.z -= cos * self.speed;

        self.side_tilt = turn_ratio * params.max_tilt;
        self.propeller_angle = wrap_degrees(
            self.propeller_angle + params.prop_base_spin + self.speed * params.prop_speed_spin,
        );
        self.roll.advance(params.roll_step);
    }
}
