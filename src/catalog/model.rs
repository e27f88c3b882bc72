use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// One playable song plus the metadata the page shows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// 1-based position in the catalog, stable for the session.
    pub id: u32,
    pub title: String,
    /// Audio data handle. Only the engine opens it.
    pub source: PathBuf,
    /// Cover image handle, if one was found or configured.
    pub cover: Option<PathBuf>,
    /// Length read from tags; used when the decoder can't report one.
    pub duration_hint: Option<Duration>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no playable tracks found")]
    Empty,
}

/// The fixed, ordered, non-empty list of tracks for a session.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog, renumbering ids to follow the given order.
    pub fn new(mut tracks: Vec<Track>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, t) in tracks.iter_mut().enumerate() {
            t.id = (i + 1) as u32;
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Track at `index`, wrapped into range. Never fails: the catalog is non-empty.
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index % self.tracks.len()]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Map any signed position onto a valid index; negative values wrap from the end.
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.tracks.len() as isize) as usize
    }
}
