use crate::config;

/// Load settings, falling back to defaults when the config can't be used.
/// The rejection is returned so it can be logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<config::ConfigError>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(e) = s.validate() {
                eprintln!("encore: invalid config, using defaults: {e}");
                (config::Settings::default(), Some(e))
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("encore: failed to load config, using defaults: {e}");
            (config::Settings::default(), Some(e))
        }
    }
}
