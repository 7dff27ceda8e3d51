//! Sanitization Integration Tests
//!
//! Hostile names from real manifests must always produce valid paths.

use std::io::Cursor;
use std::path::Path;

use strmgen::config::{CategoryDirs, NamingConfig};
use strmgen::core::sanitizer::{BRACKET_CHARS, FORBIDDEN_CHARS};
use strmgen::core::{Engine, EntryError, GroupClassifier, NameSanitizer, PathResolver};
use strmgen::domain::Category;
use strmgen::ExclusionSet;
use tempfile::TempDir;

const HOSTILE_NAMES: &[&str] = &[
    "FR - Mission: Impossible... Fallout",
    "Who? What? Where?",
    "AC/DC \\ Live <2024>",
    "Le \"Grand\" Film *",
    "Planet Earth [4K] | Remastered",
    "UK - Wait\u{2026} What 4k",
    "Tab\tand\nnewline",
    "  spaced    out  ",
];

fn assert_clean(component: &str, allow_brackets: bool) {
    assert!(!component.is_empty());
    assert_eq!(component, component.trim());
    assert!(!component.contains("  "), "double space in {:?}", component);
    for c in component.chars() {
        assert!(!FORBIDDEN_CHARS.contains(&c), "{:?} in {:?}", c, component);
        assert!(!c.is_control(), "control char in {:?}", component);
        if !allow_brackets {
            assert!(!BRACKET_CHARS.contains(&c), "{:?} in {:?}", c, component);
        }
    }
    assert!(!component.contains("..."));
    assert!(!component.to_lowercase().contains("4k"));
}

#[test]
fn test_hostile_names_produce_clean_components() {
    let sanitizer = NameSanitizer::from_config(&NamingConfig::default());

    for name in HOSTILE_NAMES {
        assert_clean(&sanitizer.directory(name), true);
        assert_clean(&sanitizer.file(name), false);
    }
}

#[test]
fn test_known_outputs() {
    let sanitizer = NameSanitizer::from_config(&NamingConfig::default());

    assert_eq!(
        sanitizer.file("FR - Mission: Impossible... Fallout"),
        "Mission Impossible Fallout"
    );
    assert_eq!(
        sanitizer.directory("Planet Earth [4K] | Remastered"),
        "Planet Earth [UHD] Remastered"
    );
    assert_eq!(
        sanitizer.file("Planet Earth [4K] | Remastered"),
        "Planet Earth UHD Remastered"
    );
    assert_eq!(sanitizer.file("UK - Wait\u{2026} What 4k"), "Wait What UHD");
}

fn walk(dir: &Path, out: &mut Vec<std::path::PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            walk(&path, out);
        } else {
            out.push(path);
        }
    }
}

#[test]
fn test_written_tree_is_clean() {
    let temp = TempDir::new().unwrap();
    let mut manifest = String::from("#EXTM3U\n");
    for (i, name) in HOSTILE_NAMES.iter().enumerate() {
        // Names inside the attribute cannot carry quotes or newlines
        let name = name.replace('"', "'").replace('\n', " ");
        for group in ["VOD|Films: 2024", "SRS|Séries <FR>", "TV|Sport?"] {
            manifest.push_str(&format!(
                "#EXTINF:-1 group-title=\"{}\" tvg-name=\"{} S01 E0{}\",x\nhttp://x/{}\n",
                group, name, i, i
            ));
        }
    }

    let exclusions = ExclusionSet::default();
    let dirs = CategoryDirs::default();
    let sanitizer = NameSanitizer::from_config(&NamingConfig::default());
    let engine = Engine::new(
        GroupClassifier::new(&exclusions),
        PathResolver::new(temp.path(), &dirs, &sanitizer),
    );
    let result = engine.run(Cursor::new(manifest)).unwrap();

    assert_eq!(result.failures().count(), 0);
    assert_eq!(result.category(Category::Movie).created_count(), HOSTILE_NAMES.len());

    let mut files = Vec::new();
    walk(temp.path(), &mut files);
    assert_eq!(files.len(), HOSTILE_NAMES.len() * 3);

    for file in files {
        let relative = file.strip_prefix(temp.path()).unwrap();
        let components: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let (file_name, dirs) = components.split_last().unwrap();
        for dir in dirs {
            assert_clean(dir, true);
        }
        let stem = file_name.strip_suffix(".strm").unwrap();
        assert_clean(stem, false);
    }
}

#[test]
fn test_dot_names_stay_inside_output_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("library");
    let manifest = "#EXTM3U
#EXTINF:-1 group-title=\"..\" tvg-name=\"..\",x
http://x/outer
#EXTINF:-1 group-title=\"|..\" tvg-name=\"Chan\",Chan
http://x/chan
#EXTINF:-1 group-title=\"SRS|Drama\" tvg-name=\". S01 E01\",x
http://x/dot
#EXTINF:-1 group-title=\"VOD|Action\" tvg-name=\"Movie One\",Movie One
http://x/1.ts
";

    let exclusions = ExclusionSet::default();
    let dirs = CategoryDirs::default();
    let sanitizer = NameSanitizer::from_config(&NamingConfig::default());
    let engine = Engine::new(
        GroupClassifier::new(&exclusions),
        PathResolver::new(&root, &dirs, &sanitizer),
    );
    let result = engine.run(Cursor::new(manifest)).unwrap();

    assert_eq!(result.total_created(), 1);
    let failures: Vec<_> = result.failures().collect();
    assert_eq!(failures.len(), 3);
    assert!(failures
        .iter()
        .all(|f| matches!(f.error, EntryError::DegenerateName { .. })));

    let mut files = Vec::new();
    walk(temp.path(), &mut files);
    assert_eq!(files, vec![root.join("FILMS/VOD Action/Movie One.strm")]);
    for file in &files {
        let relative = file.strip_prefix(&root).unwrap();
        assert!(relative
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_))));
    }
}
