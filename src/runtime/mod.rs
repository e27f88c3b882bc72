use std::env;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::audio::AudioPlayer;
use crate::catalog::load_catalog;
use crate::config;
use crate::controller::Controller;

mod event_loop;
mod logging;
mod settings;
mod startup;
mod terminal;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();

    let log_path = logging::init(&settings.logging);
    if let Some(e) = config_problem {
        warn!(error = %e, "config rejected, using defaults");
    }
    info!(log = ?log_path, "encore starting");

    let dir = startup::catalog_dir(env::args().nth(1), &settings.catalog);
    let config_dir = config::resolve_config_path().and_then(|p| p.parent().map(Path::to_path_buf));
    let catalog = load_catalog(&dir, &settings.catalog, config_dir.as_deref())
        .map_err(|e| format!("{}: {e}", dir.display()))?;
    info!(dir = %dir.display(), tracks = catalog.len(), "catalog ready");

    let (audio_player, engine_events) = AudioPlayer::new(&settings.audio);
    let mut controller = Controller::new(
        catalog,
        audio_player,
        startup::load_timeout(&settings.audio),
    );
    controller.mount();

    let fade_out = Duration::from_millis(settings.audio.quit_fade_out_ms);
    let run_result = terminal::guarded(
        &mut controller,
        terminal::setup,
        |tui, controller| event_loop::run(tui, &settings, controller, &engine_events),
        |controller| controller.engine().quit_softly(fade_out),
        terminal::restore,
    );

    info!("encore stopped");
    run_result
}
