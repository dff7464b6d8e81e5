use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use glium::{
    program::ProgramChooserCreationError,
    texture::{SrgbTexture2d, TextureCreationError},
    uniform,
    uniforms::SamplerWrapFunction,
    Display, DrawError, DrawParameters, Frame, PolygonMode, Program, Surface,
};
use glutin::surface::WindowSurface;

use crate::{
    buffer::{self, BufferError, DisplayShape, GpuShape},
    camera,
    flight::FlightState,
    geometry::{self, ColoredVertex, TexturedVertex},
    load::Mesh,
    scene::{Environment, Scene},
    settings::{Rgba, Settings},
    shader,
    texture::TextureImage,
};

// the cessna asset points down +x, the flight model flies towards -z at heading 0
const PLANE_MODEL_YAW: f32 = FRAC_PI_2;
// propeller hubs in asset space
const PROPELLER_OFFSETS: [Vec3; 2] = [
    Vec3::new(-0.35, -0.15, 0.35),
    Vec3::new(-0.35, -0.15, -0.35),
];
const GRID_COLOR: Rgba = [0.8, 0.8, 1.0, 1.0];
const MOUNTAIN_COLOR: Rgba = [0.45, 0.4, 0.35, 1.0];
const SEA_SEGMENTS: u32 = 64;
const SEA_TEXTURE_REPEAT: f32 = 20.0;

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("failed to compile shaders: {0}")]
    Program(#[from] ProgramChooserCreationError),
    #[error("failed to upload texture: {0}")]
    Texture(#[from] TextureCreationError),
}

/// Everything read from disk before the window opens
pub struct Assets {
    pub plane: Mesh,
    pub propeller: Mesh,
    pub sea: TextureImage,
    pub sky: TextureImage,
    pub mountain: TextureImage,
}

struct Models {
    plane: GpuShape<ColoredVertex>,
    propeller: GpuShape<ColoredVertex>,
    grid: GpuShape<ColoredVertex>,
    axes: GpuShape<ColoredVertex>,
    sea: GpuShape<TexturedVertex>,
    sky: GpuShape<TexturedVertex>,
    mountain: GpuShape<TexturedVertex>,
}

struct Textures {
    sea: SrgbTexture2d,
    sky: SrgbTexture2d,
    mountain: SrgbTexture2d,
}

/// Matrices and flags shared by every draw call of a frame
struct Pass<'a> {
    persp: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    fog: bool,
    params: DrawParameters<'a>,
}

/// Owns the GPU side of the simulation and draws a `Scene` each frame
pub struct Application {
    params: DrawParameters<'static>,
    light: [f32; 3],
    fog_color: Rgba,
    fog_density: f32,
    colored: Program,
    textured: Program,
    models: Models,
    textures: Textures,
}

impl Application {
    /// Upload every model, texture and program up front.
    ///
    /// # Errors
    ///
    /// `SetupError` if a buffer, texture or shader can't be created.
    pub fn new(
        display: &Display<WindowSurface>,
        assets: &Assets,
        settings: &Settings,
    ) -> Result<Self, SetupError> {
        let scene = &settings.scene;
        let models = Models {
            plane: DisplayShape(
                &geometry::mesh_shape(&assets.plane, &settings.plane_bands),
                display,
            )
            .try_into()?,
            propeller: DisplayShape(
                &geometry::mesh_shape(&assets.propeller, &settings.propeller_bands),
                display,
            )
            .try_into()?,
            grid: DisplayShape(&geometry::grid(scene.grid_size, GRID_COLOR), display).try_into()?,
            axes: DisplayShape(&geometry::axes(2.0), display).try_into()?,
            sea: DisplayShape(
                &geometry::disk(scene.sea_radius, SEA_SEGMENTS, SEA_TEXTURE_REPEAT),
                display,
            )
            .try_into()?,
            sky: DisplayShape(
                &geometry::cylinder(scene.sea_radius, scene.sky_height, SEA_SEGMENTS),
                display,
            )
            .try_into()?,
            mountain: DisplayShape(&geometry::cone(32), display).try_into()?,
        };

        Ok(Self {
            params: DrawParameters {
                depth: glium::Depth {
                    test: glium::DepthTest::IfLess,
                    write: true,
                    ..Default::default()
                },
                blend: glium::Blend::alpha_blending(),
                polygon_mode: PolygonMode::Line,
                ..Default::default()
            },
            light: [0.0, 60.0, 0.0],
            fog_color: scene.fog_color,
            fog_density: scene.fog_density,
            colored: shader::colored(display)?,
            textured: shader::textured(display)?,
            models,
            textures: Textures {
                sea: buffer::upload_texture(&assets.sea, display)?,
                sky: buffer::upload_texture(&assets.sky, display)?,
                mountain: buffer::upload_texture(&assets.mountain, display)?,
            },
        })
    }

    /// # Errors
    ///
    /// `DrawError` from any of the draw calls.
    pub fn draw_frame(
        &self,
        target: &mut Frame,
        scene: &Scene,
        settings: &Settings,
    ) -> Result<(), DrawError> {
        let (width, height) = target.get_dimensions();
        let background = if scene.fog {
            self.fog_color
        } else {
            [0.0, 0.0, 0.0, 1.0]
        };
        target.clear_color_and_depth(
            (background[0], background[1], background[2], background[3]),
            1.0,
        );

        let pass = Pass {
            persp: camera::perspective(&settings.camera, width, height).to_cols_array_2d(),
            view: scene.camera.view().to_cols_array_2d(),
            fog: scene.fog,
            params: DrawParameters {
                polygon_mode: if scene.wireframe {
                    PolygonMode::Line
                } else {
                    PolygonMode::Fill
                },
                ..self.params.clone()
            },
        };

        match scene.environment {
            Environment::Grid => {
                self.draw_colored(target, &pass, &self.models.grid, Mat4::IDENTITY, false)?;
                let axes_pass = Pass {
                    persp: pass.persp,
                    view: pass.view,
                    fog: pass.fog,
                    params: DrawParameters {
                        line_width: Some(5.0),
                        ..pass.params.clone()
                    },
                };
                let lifted = Mat4::from_translation(Vec3::Y * 0.05);
                self.draw_colored(target, &axes_pass, &self.models.axes, lifted, false)?;
            }
            Environment::SeaAndSky => {
                let (sea, sky) = (&self.textures.sea, &self.textures.sky);
                let origin = Mat4::IDENTITY;
                self.draw_textured(target, &pass, &self.models.sea, origin, Some(sea), false)?;
                let below = Mat4::from_translation(Vec3::Y * -1.0);
                self.draw_textured(target, &pass, &self.models.sky, below, Some(sky), false)?;

                let mountain_texture = scene.mountain_texture.then_some(&self.textures.mountain);
                for mountain in &scene.mountains {
                    let model = mountain.model();
                    self.draw_textured(
                        target,
                        &pass,
                        &self.models.mountain,
                        model,
                        mountain_texture,
                        true,
                    )?;
                }
            }
        }

        self.draw_plane(target, &pass, &scene.flight, settings)
    }

    fn draw_plane(
        &self,
        target: &mut Frame,
        pass: &Pass,
        flight: &FlightState,
        settings: &Settings,
    ) -> Result<(), DrawError> {
        let hop = flight.roll.hop(settings.flight.roll_height);
        let plane = Mat4::from_translation(flight.position + Vec3::Y * hop)
            * Mat4::from_rotation_y(-flight.heading.to_radians())
            * Mat4::from_rotation_z(-(flight.side_tilt + flight.roll.angle).to_radians())
            * Mat4::from_rotation_y(PLANE_MODEL_YAW);
        self.draw_colored(target, pass, &self.models.plane, plane, true)?;

        let spin = Mat4::from_rotation_x(flight.propeller_angle.to_radians());
        for offset in PROPELLER_OFFSETS {
            let propeller = plane * Mat4::from_translation(offset) * spin;
            self.draw_colored(target, pass, &self.models.propeller, propeller, true)?;
        }
        Ok(())
    }

    fn draw_colored(
        &self,
        target: &mut Frame,
        pass: &Pass,
        shape: &GpuShape<ColoredVertex>,
        model: Mat4,
        lighting: bool,
    ) -> Result<(), DrawError> {
        let uniforms = uniform! {
            persp_matrix: pass.persp,
            view_matrix: pass.view,
            model_matrix: model.to_cols_array_2d(),
            u_light: self.light,
            u_lighting: lighting,
            u_fog: pass.fog,
            u_fog_color: self.fog_color,
            u_fog_density: self.fog_density,
        };
        target.draw(
            &shape.vertices,
            &shape.indices,
            &self.colored,
            &uniforms,
            &pass.params,
        )
    }

    /// Without a texture the shape is filled with `MOUNTAIN_COLOR`.
    fn draw_textured(
        &self,
        target: &mut Frame,
        pass: &Pass,
        shape: &GpuShape<TexturedVertex>,
        model: Mat4,
        texture: Option<&SrgbTexture2d>,
        lighting: bool,
    ) -> Result<(), DrawError> {
        // the sampler has to be bound either way
        let sampler = texture
            .unwrap_or(&self.textures.sea)
            .sampled()
            .wrap_function(SamplerWrapFunction::Repeat);
        let uniforms = uniform! {
            persp_matrix: pass.persp,
            view_matrix: pass.view,
            model_matrix: model.to_cols_array_2d(),
            u_light: self.light,
            u_lighting: lighting,
            u_textured: texture.is_some(),
            diffuse_tex: sampler,
            u_color: MOUNTAIN_COLOR,
            u_fog: pass.fog,
            u_fog_color: self.fog_color,
            u_fog_density: self.fog_density,
        };
        target.draw(
            &shape.vertices,
            &shape.indices,
            &self.textured,
            &uniforms,
            &pass.params,
        )
    }
}
