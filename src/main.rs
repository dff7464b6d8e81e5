#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
use frame::{Application, Assets};
use scene::Scene;
use settings::Settings;
use winit::window::Fullscreen;

use crate::input::Action;

mod buffer;
mod camera;
mod flight;
mod frame;
mod geometry;
mod input;
mod load;
mod scene;
mod settings;
mod shader;
mod texture;

const SETTINGS_PATH: &str = "assets/flightsim.yaml";
const WINDOW_SIZE: u32 = 640;

fn load_assets(settings: &Settings) -> Result<Assets, Box<dyn std::error::Error>> {
    let paths = &settings.assets;
    Ok(Assets {
        plane: load::load_mesh(&paths.plane)?,
        propeller: load::load_mesh(&paths.propeller)?,
        sea: texture::load_ppm(&paths.sea_texture)?,
        sky: texture::load_ppm(&paths.sky_texture)?,
        mountain: texture::load_ppm(&paths.mountain_texture)?,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load(SETTINGS_PATH)?;
    // missing assets are fatal, and found out before any window shows up
    let assets = load_assets(&settings)?;
    println!("{}", input::CONTROLS_HELP);

    let event_loop = winit::event_loop::EventLoopBuilder::new().build()?;
    let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
        .with_title("Flight Sim")
        .with_inner_size(WINDOW_SIZE, WINDOW_SIZE)
        .build(&event_loop);

    let app = Application::new(&display, &assets, &settings)?;
    #[allow(clippy::cast_precision_loss)]
    let mut scene = Scene::new(&settings, window.inner_size().width as f32);

    // rendering loop
    event_loop.run(move |event, window_target| {
        match event {
            winit::event::Event::WindowEvent { event, .. } => match event {
                winit::event::WindowEvent::CloseRequested => window_target.exit(),

                // advance the simulation one tick and draw it
                winit::event::WindowEvent::RedrawRequested => {
                    scene.tick(&settings);

                    let mut target = display.draw();
                    let drawn = app.draw_frame(&mut target, &scene, &settings);
                    let swapped = target.finish();
                    if let Err(e) = drawn {
                        log::error!("Failed to draw frame: {}", e);
                        window_target.exit();
                    } else if let Err(e) = swapped {
                        log::error!("Failed to swap buffers: {}", e);
                        window_target.exit();
                    }
                }
                winit::event::WindowEvent::Resized(window_size) => {
                    if window_size.width == 0 {
                        log::warn!("Window resized to zero width");
                    }
                    display.resize(window_size.into());
                    #[allow(clippy::cast_precision_loss)]
                    let width = window_size.width as f32;
                    scene.pointer.window_width = width;
                }
                winit::event::WindowEvent::CursorMoved { position, .. } => {
                    #[allow(clippy::cast_possible_truncation)]
                    let x = position.x as f32;
                    scene.pointer.x = x;
                }
                winit::event::WindowEvent::KeyboardInput { event, .. } => {
                    match input::process_input(&event, &mut scene.flight.controls) {
                        Some(Action::Quit) => window_target.exit(),
                        Some(Action::ToggleFullscreen) => {
                            scene.apply(Action::ToggleFullscreen);
                            if scene.fullscreen {
                                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                            } else {
                                window.set_fullscreen(None);
                                let _ = window.request_inner_size(
                                    winit::dpi::PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE),
                                );
                            }
                        }
                        Some(action) => scene.apply(action),
                        None => (),
                    }
                }
                _ => (),
            },
            // ensures continuous rendering
            winit::event::Event::AboutToWait => {
                window.request_redraw();
            }
            _ => (),
        };
    })?;

    Ok(())
}
