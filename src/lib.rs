pub mod app;
pub mod common;
pub mod data;
pub mod render;
pub mod settings;

use app::Application;
use color_eyre::eyre::{Result, WrapErr};
use data::vector_dataset::VectorDataset;
use render::line_set::build_line_sets;
use settings::GlobeSettings;
use winit::event_loop::EventLoop;

pub fn run() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let settings = GlobeSettings::load().wrap_err("Failed to load settings")?;
    log::debug!("{settings:?}");

    let coastlines = VectorDataset::from_path(&settings.coastlines_path)?;
    let countries = VectorDataset::from_path(&settings.countries_path)?;
    log::info!(
        "Loaded {} coastline and {} country points",
        coastlines.point_count(),
        countries.point_count()
    );

    let line_sets = build_line_sets(coastlines, countries, settings.graticule_steps());

    let event_loop = EventLoop::new()?;
    let mut app = Application::new(settings, line_sets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
