use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{AudioSettings, CatalogSettings};

/// Directory to scan: the CLI argument, then `catalog.dir`, then the working
/// directory.
pub fn catalog_dir(arg: Option<String>, settings: &CatalogSettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// `0` disables the timeout.
pub fn load_timeout(audio: &AudioSettings) -> Option<Duration> {
    (audio.load_timeout_ms > 0).then(|| Duration::from_millis(audio.load_timeout_ms))
}
