use glam::{Mat4, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    camera::CameraState,
    flight::FlightState,
    input::{Action, Pointer},
    settings::{SceneSettings, Settings},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Grid,
    SeaAndSky,
}

/// A cone standing on the sea
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mountain {
    pub x: f32,
    pub z: f32,
    pub height: f32,
    pub base_radius: f32,
}

impl Mountain {
    /// Scales the unit cone from `geometry::cone` into place
    #[must_use]
    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.x, 0.0, self.z))
            * Mat4::from_scale(Vec3::new(self.base_radius, self.height, self.base_radius))
    }
}

/// Scatter `mountain_count` mountains over the sea. The same seed always gives the same range.
#[must_use]
pub fn generate_mountains(params: &SceneSettings) -> Vec<Mountain> {
    let mut rng = StdRng::seed_from_u64(params.mountain_seed);
    let spread = params.sea_radius * 0.6;
    (0..params.mountain_count)
        .map(|_| Mountain {
            x: rng.gen_range(-spread..spread),
            z: rng.gen_range(-spread..spread),
            height: rng.gen_range(20.0..80.0),
            base_radius: rng.gen_range(20.0..60.0),
        })
        .collect()
}

/// All mutable state of a running simulation, advanced once per frame by `tick`
#[derive(Debug, Clone)]
pub struct Scene {
    pub flight: FlightState,
    pub camera: CameraState,
    pub pointer: Pointer,
    pub environment: Environment,
    pub wireframe: bool,
    pub fog: bool,
    pub fullscreen: bool,
    pub mountain_texture: bool,
    pub mountains: Vec<Mountain>,
}

impl Scene {
    #[must_use]
    pub fn new(settings: &Settings, window_width: f32) -> Self {
        let flight = FlightState::new(&settings.flight);
        Self {
            camera: CameraState::follow(&flight, &settings.camera),
            flight,
            pointer: Pointer::centred(window_width),
            environment: Environment::default(),
            wireframe: true,
            fog: true,
            fullscreen: false,
            mountain_texture: false,
            mountains: generate_mountains(&settings.scene),
        }
    }

    pub fn tick(&mut self, settings: &Settings) {
        self.flight.tick(self.pointer.turn_ratio(), &settings.flight);
        self.camera = CameraState::follow(&self.flight, &settings.camera);
    }

    /// Apply a toggle. `Quit` is left to the caller, which owns the event loop.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleWireframe => {
                self.wireframe = !self.wireframe;
                log::info!("Wireframe: {}", self.wireframe);
            }
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                log::info!("Fullscreen: {}", self.fullscreen);
            }
            Action::ToggleEnvironment => {
                self.environment = match self.environment {
                    Environment::Grid => Environment::SeaAndSky,
                    Environment::SeaAndSky => Environment::Grid,
                };
                log::info!("Environment: {:?}", self.environment);
            }
            Action::ToggleFog => {
                self.fog = !self.fog;
                log::info!("Fog: {}", self.fog);
            }
            Action::ToggleMountainTexture => {
                self.mountain_texture = !self.mountain_texture;
                log::info!("Mountain texture: {}", self.mountain_texture);
            }
            Action::StartRoll => self.flight.roll.start(),
            Action::ToggleCrazyRoll => self.flight.roll.toggle_crazy(),
            Action::Quit => (),
        }
    }
}
