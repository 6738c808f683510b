use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{data::camera::GlobeCamera, render::line_set::GraticuleSteps};

pub const SETTINGS_FILE: &str = "Settings";
pub const ENV_PREFIX: &str = "GLOBE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobeSettings {
    pub coastlines_path: String,
    pub countries_path: String,
    pub time_speedup: f64,
    pub camera_distance: f32,
    pub sample_count: u32,
    pub grid_line_step: f64,
    pub grid_subdivision_step: f64,
    pub window_width: u32,
    pub window_height: u32,
}

impl GlobeSettings {
    /// Defaults, overridden by an optional `Settings` file in the working
    /// directory and then by `GLOBE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("coastlines_path", "data/coastlines.json")?
            .set_default("countries_path", "data/countries.json")?
            .set_default("time_speedup", 1000.0)?
            .set_default("camera_distance", 15.0)?
            .set_default("sample_count", 4)?
            .set_default("grid_line_step", 15.0)?
            .set_default("grid_subdivision_step", 1.0)?
            .set_default("window_width", 800)?
            .set_default("window_height", 600)
    }

    pub fn camera(&self) -> GlobeCamera {
        GlobeCamera::new(self.camera_distance, self.time_speedup)
    }

    pub fn graticule_steps(&self) -> GraticuleSteps {
        GraticuleSteps {
            line_step: self.grid_line_step,
            subdivision_step: self.grid_subdivision_step,
        }
        .floored()
    }
}
