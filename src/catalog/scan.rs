use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{CatalogSettings, TrackEntry};

use super::model::{Catalog, CatalogError, Track};

fn normalized_exts(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read the tag title and the stream length. Unreadable files yield `(None, None)`;
/// the engine reports the real error when the track is bound.
fn read_tags(path: &Path) -> (Option<String>, Option<Duration>) {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
            let title = tagged
                .primary_tag()
                .or_else(|| tagged.first_tag())
                .and_then(|tag| tag.title().map(|t| t.trim().to_string()))
                .filter(|t| !t.is_empty());
            (title, duration)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            (None, None)
        }
    }
}

/// Find a cover for `audio`: a sibling image with the same stem, else a
/// `cover.*` or `folder.*` image in the same directory.
fn find_cover(audio: &Path, cover_exts: &[String]) -> Option<PathBuf> {
    let dir = audio.parent()?;
    let stem = audio.file_stem()?;

    for base in [stem, OsStr::new("cover"), OsStr::new("folder")] {
        for ext in cover_exts {
            let mut name = base.to_os_string();
            name.push(".");
            name.push(ext);
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn file_stem_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Scan `dir` for audio files, sorted case-insensitively by title.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Vec<Track> {
    let audio_exts = normalized_exts(&settings.extensions);
    let cover_exts = normalized_exts(&settings.cover_extensions);
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !has_extension(path, &audio_exts) {
            continue;
        }

        let (tag_title, duration_hint) = read_tags(path);
        tracks.push(Track {
            id: 0,
            title: tag_title.unwrap_or_else(|| file_stem_title(path)),
            source: path.to_path_buf(),
            cover: find_cover(path, &cover_exts),
            duration_hint,
        });
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracks
}

/// Turn configured entries into tracks, keeping their order.
pub fn from_entries(entries: &[TrackEntry], base_dir: Option<&Path>) -> Vec<Track> {
    let resolve = |p: &Path| match base_dir {
        Some(base) if p.is_relative() => base.join(p),
        _ => p.to_path_buf(),
    };

    entries
        .iter()
        .map(|entry| {
            let source = resolve(&entry.source);
            let (_, duration_hint) = read_tags(&source);
            let title = if entry.title.trim().is_empty() {
                file_stem_title(&source)
            } else {
                entry.title.trim().to_string()
            };
            Track {
                id: 0,
                title,
                cover: entry.cover.as_deref().map(resolve),
                source,
                duration_hint,
            }
        })
        .collect()
}

/// Build the session catalog: configured entries win, otherwise `dir` is scanned.
pub fn load_catalog(
    dir: &Path,
    settings: &CatalogSettings,
    config_dir: Option<&Path>,
) -> Result<Catalog, CatalogError> {
    let tracks = if settings.tracks.is_empty() {
        scan(dir, settings)
    } else {
        from_entries(&settings.tracks, config_dir)
    };
    let catalog = Catalog::new(tracks)?;
    for t in catalog.tracks() {
        debug!(id = t.id, title = %t.title, source = %t.source.display(), "catalog track");
    }
    Ok(catalog)
}
