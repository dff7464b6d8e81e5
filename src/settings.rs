use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid material band: {0}")]
    InvalidBand(String),
}

pub type Rgba = [f32; 4];

pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
pub const LIGHT_PURPLE: Rgba = [0.87, 0.58, 0.98, 1.0];
pub const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

/// Everything tunable about a run, read from `assets/flightsim.yaml`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub assets: AssetPaths,
    pub flight: FlightSettings,
    pub camera: CameraSettings,
    pub scene: SceneSettings,
    pub plane_bands: MaterialBands,
    pub propeller_bands: MaterialBands,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            flight: FlightSettings::default(),
            camera: CameraSettings::default(),
            scene: SceneSettings::default(),
            plane_bands: MaterialBands::plane(),
            propeller_bands: MaterialBands::propeller(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to the defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Any read error other than a missing file, and everything [`Settings::from_yaml`] rejects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                log::info!("Loading settings: {}", path.display());
                Self::from_yaml(&text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// `SettingsError::Parse` for invalid YAML, `SettingsError::InvalidBand` for bad bands.
    pub fn from_yaml(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(text)?;
        settings.plane_bands.validate()?;
        settings.propeller_bands.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetPaths {
    pub plane: PathBuf,
    pub propeller: PathBuf,
    pub sea_texture: PathBuf,
    pub sky_texture: PathBuf,
    pub mountain_texture: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            plane: "assets/cessna.txt".into(),
            propeller: "assets/propeller.txt".into(),
            sea_texture: "assets/sea02.ppm".into(),
            sky_texture: "assets/sky08.ppm".into(),
            mountain_texture: "assets/mount03.ppm".into(),
        }
    }
}

/// Per-tick constants for the flight model. Angles are in degrees.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightSettings {
    pub initial_position: [f32; 3],
    pub initial_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub climb_step: f32,
    /// heading change per tick at a turn ratio of 1
    pub turn_rate: f32,
    pub max_tilt: f32,
    pub roll_step: f32,
    pub roll_height: f32,
    pub prop_base_spin: f32,
    /// extra propeller spin per tick per unit of speed
    pub prop_speed_spin: f32,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            initial_position: [0.0, 2.0, 10.0],
            initial_speed: 0.05,
            min_speed: 0.01,
            max_speed: 0.5,
            acceleration: 0.002,
            climb_step: 0.1,
            turn_rate: 2.0,
            max_tilt: 45.0,
            roll_step: 5.0,
            roll_height: 2.0,
            prop_base_spin: 10.0,
            prop_speed_spin: 200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub trail_distance: f32,
    pub height_offset: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            trail_distance: 4.0,
            height_offset: 1.5,
            fov_degrees: 45.0,
            near: 0.1,
            far: 40000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneSettings {
    pub grid_size: u32,
    pub mountain_count: usize,
    pub mountain_seed: u64,
    pub sea_radius: f32,
    pub sky_height: f32,
    pub fog_color: Rgba,
    pub fog_density: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            grid_size: 100,
            mountain_count: 50,
            mountain_seed: 0x5eed,
            sea_radius: 800.0,
            sky_height: 400.0,
            fog_color: [0.9, 0.6, 0.7, 1.0],
            fog_density: 0.005,
        }
    }
}

/// Inclusive range of mesh group ids drawn with one colour
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Band {
    pub first: usize,
    pub last: usize,
    pub color: Rgba,
}

impl Band {
    fn contains(&self, group: usize) -> bool {
        (self.first..=self.last).contains(&group)
    }
}

/// Maps the group id of a face to its material colour. The boundaries belong to a specific
/// asset, so they ship in the settings file next to it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialBands {
    pub bands: Vec<Band>,
    pub fallback: Rgba,
}

impl Default for MaterialBands {
    fn default() -> Self {
        Self::plane()
    }
}

impl MaterialBands {
    /// Colouring of the cessna asset
    #[must_use]
    pub fn plane() -> Self {
        let band = |first, last, color| Band { first, last, color };
        Self {
            bands: vec![
                band(0, 3, YELLOW),
                band(4, 5, BLACK),
                band(6, 6, LIGHT_PURPLE),
                band(7, 13, BLUE),
                band(14, 25, YELLOW),
                band(26, 32, BLUE),
            ],
            fallback: YELLOW,
        }
    }

    #[must_use]
    pub fn propeller() -> Self {
        Self {
            bands: vec![
                Band {
                    first: 0,
                    last: 1,
                    color: YELLOW,
                },
                Band {
                    first: 2,
                    last: 3,
                    color: RED,
                },
            ],
            fallback: RED,
        }
    }

    #[must_use]
    pub fn color_for(&self, group: usize) -> Rgba {
        self.bands
            .iter()
            .find(|band| band.contains(group))
            .map_or(self.fallback, |band| band.color)
    }

    /// Bands must be non-empty ranges that don't overlap each other.
    ///
    /// # Errors
    ///
    /// `SettingsError::InvalidBand` naming the first offending range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(band) = self.bands.iter().find(|b| b.first > b.last) {
            return Err(SettingsError::InvalidBand(format!(
                "range {}..={} is empty",
                band.first, band.last
            )));
        }

        let mut sorted = self.bands.clone();
        sorted.sort_by_key(|b| b.first);
        for pair in sorted.windows(2) {
            if pair[1].first <= pair[0].last {
                return Err(SettingsError::InvalidBand(format!(
                    "{}..={} overlaps {}..={}",
                    pair[0].first, pair[0].last, pair[1].first, pair[1].last
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_band_boundaries() {
        let bands = MaterialBands::plane();
        assert_eq!(bands.color_for(0), YELLOW);
        assert_eq!(bands.color_for(3), YELLOW);
        assert_eq!(bands.color_for(4), BLACK);
        assert_eq!(bands.color_for(5), BLACK);
        assert_eq!(bands.color_for(6), LIGHT_PURPLE);
        assert_eq!(bands.color_for(7), BLUE);
        assert_eq!(bands.color_for(1000), bands.fallback);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<(), SettingsError> {
        let settings = Settings::from_yaml(
            "
flight:
  max_speed: 1.0
camera:
  trail_distance: 8.0
propeller_bands:
  bands:
    - { first: 0, last: 0, color: [0.0, 1.0, 0.0, 1.0] }
  fallback: [1.0, 1.0, 1.0, 1.0]
",
        )?;

        assert_eq!(settings.flight.max_speed, 1.0);
        assert_eq!(settings.flight.min_speed, FlightSettings::default().min_speed);
        assert_eq!(settings.camera.trail_distance, 8.0);
        assert_eq!(settings.camera.far, 40000.0);
        assert_eq!(settings.plane_bands, MaterialBands::plane());
        assert_eq!(settings.propeller_bands.color_for(0), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(settings.propeller_bands.color_for(1), [1.0; 4]);
        Ok(())
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let result = Settings::from_yaml(
            "
plane_bands:
  bands:
    - { first: 4, last: 5, color: [0.0, 0.0, 0.0, 1.0] }
    - { first: 0, last: 4, color: [1.0, 1.0, 0.0, 1.0] }
",
        );
        assert!(matches!(result, Err(SettingsError::InvalidBand(_))));

        let empty = MaterialBands {
            bands: vec![Band {
                first: 3,
                last: 2,
                color: RED,
            }],
            fallback: RED,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() -> Result<(), SettingsError> {
        let dir = tempfile::tempdir()?;
        let settings = Settings::load(dir.path().join("flightsim.yaml"))?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "scene:\n  mountain_count: 3\n  fog_density: 0.1")?;

        let settings = Settings::load(file.path())?;
        assert_eq!(settings.scene.mountain_count, 3);
        assert_eq!(settings.scene.fog_density, 0.1);
        assert_eq!(settings.scene.grid_size, 100);
        Ok(())
    }

    #[test]
    fn test_bundled_settings() -> Result<(), SettingsError> {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/flightsim.yaml");
        let settings = Settings::load(path)?;
        assert_eq!(settings.flight, FlightSettings::default());
        assert_eq!(settings.plane_bands.color_for(1), BLUE);
        assert_eq!(settings.propeller_bands.color_for(0), RED);
        Ok(())
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            Settings::from_yaml("flight: [1, 2"),
            Err(SettingsError::Parse(_))
        ));
    }
}
