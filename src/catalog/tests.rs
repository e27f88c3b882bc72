use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::scan::{from_entries, load_catalog, scan};
use super::*;
use crate::config::{CatalogSettings, TrackEntry};

fn t(title: &str) -> Track {
    Track {
        id: 0,
        title: title.into(),
        source: PathBuf::from(format!("/music/{title}.mp3")),
        cover: None,
        duration_hint: None,
    }
}

fn titles(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.title.as_str()).collect()
}

#[test]
fn catalog_rejects_empty_track_list() {
    assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
}

#[test]
fn catalog_numbers_ids_in_order() {
    let catalog = Catalog::new(vec![t("A"), t("B"), t("C")]).unwrap();
    let ids: Vec<u32> = catalog.tracks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(catalog.track(1).title, "B");
    assert_eq!(catalog.track(3).title, "A");
}

#[test]
fn wrap_handles_both_boundaries() {
    let catalog = Catalog::new(vec![t("A"), t("B"), t("C")]).unwrap();
    assert_eq!(catalog.wrap(0), 0);
    assert_eq!(catalog.wrap(3), 0);
    assert_eq!(catalog.wrap(4), 1);
    assert_eq!(catalog.wrap(-1), 2);
    assert_eq!(catalog.wrap(-4), 2);

    let single = Catalog::new(vec![t("Only")]).unwrap();
    assert_eq!(single.wrap(-1), 0);
    assert_eq!(single.wrap(7), 0);
}

#[test]
fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &CatalogSettings::default());
    assert_eq!(titles(&tracks), vec!["A", "b"]);
    assert!(tracks.iter().all(|t| t.duration_hint.is_none()));
}

#[test]
fn scan_skips_hidden_files_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let tracks = scan(dir.path(), &CatalogSettings::default());
    assert_eq!(titles(&tracks), vec!["visible"]);

    let settings = CatalogSettings {
        include_hidden: true,
        ..CatalogSettings::default()
    };
    assert_eq!(scan(dir.path(), &settings).len(), 2);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = CatalogSettings {
        recursive: false,
        ..CatalogSettings::default()
    };
    assert_eq!(titles(&scan(dir.path(), &settings)), vec!["root"]);
}

#[test]
fn scan_pairs_covers_by_stem_then_folder_image() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ashiyan.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("ashiyan.JPG"), b"").unwrap();
    fs::write(dir.path().join("ashiyan.jpg"), b"").unwrap();

    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("song.flac"), b"not real").unwrap();
    fs::write(album.join("cover.png"), b"").unwrap();

    let lonely = dir.path().join("lonely");
    fs::create_dir_all(&lonely).unwrap();
    fs::write(lonely.join("solo.wav"), b"not real").unwrap();

    let tracks = scan(dir.path(), &CatalogSettings::default());
    let cover_of = |title: &str| {
        tracks
            .iter()
            .find(|t| t.title == title)
            .and_then(|t| t.cover.clone())
    };

    assert_eq!(cover_of("ashiyan"), Some(dir.path().join("ashiyan.jpg")));
    assert_eq!(cover_of("song"), Some(album.join("cover.png")));
    assert_eq!(cover_of("solo"), None);
}

#[test]
fn from_entries_keeps_order_and_resolves_relative_paths() {
    let entries = vec![
        TrackEntry {
            title: "Pal Pal Har Pal".into(),
            source: PathBuf::from("music/music3.mp3"),
            cover: Some(PathBuf::from("images/par har pal.jpg")),
        },
        TrackEntry {
            title: "  ".into(),
            source: PathBuf::from("/abs/music1.mp3"),
            cover: None,
        },
    ];

    let tracks = from_entries(&entries, Some(Path::new("/cfg")));
    assert_eq!(titles(&tracks), vec!["Pal Pal Har Pal", "music1"]);
    assert_eq!(tracks[0].source, PathBuf::from("/cfg/music/music3.mp3"));
    assert_eq!(
        tracks[0].cover.as_deref(),
        Some(Path::new("/cfg/images/par har pal.jpg"))
    );
    assert_eq!(tracks[1].source, PathBuf::from("/abs/music1.mp3"));
}

#[test]
fn load_catalog_prefers_configured_entries_over_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("scanned.mp3"), b"not real").unwrap();

    let settings = CatalogSettings {
        tracks: vec![TrackEntry {
            title: "Listed".into(),
            source: PathBuf::from("listed.mp3"),
            cover: None,
        }],
        ..CatalogSettings::default()
    };
    let catalog = load_catalog(dir.path(), &settings, None).unwrap();
    assert_eq!(titles(catalog.tracks()), vec!["Listed"]);
    assert_eq!(catalog.tracks()[0].id, 1);
}

#[test]
fn load_catalog_reports_empty_directory() {
    let dir = tempdir().unwrap();
    let err = load_catalog(dir.path(), &CatalogSettings::default(), None).unwrap_err();
    assert_eq!(err, CatalogError::Empty);
}
