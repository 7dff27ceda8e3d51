//! Classification Integration Tests
//!
//! Group labels decide the category; the exclusion registry decides whether
//! an entry is materialized at all.

use std::io::Cursor;
use std::path::Path;

use strmgen::config::CategoryDirs;
use strmgen::core::{
    classify, other_group_guard, Engine, GroupClassifier, NameSanitizer, OtherGroupGuard,
    PathResolver, RunResult,
};
use strmgen::domain::{Category, Classification, NO_GROUP_SENTINEL};
use strmgen::ExclusionSet;
use tempfile::TempDir;

fn run(root: &Path, exclusions: &ExclusionSet, manifest: &str) -> RunResult {
    let dirs = CategoryDirs::default();
    let sanitizer = NameSanitizer::new(Vec::<String>::new());
    let engine = Engine::new(
        GroupClassifier::new(exclusions),
        PathResolver::new(root, &dirs, &sanitizer),
    );
    engine.run(Cursor::new(manifest.to_string())).unwrap()
}

#[test]
fn test_rule_priority() {
    let none = ExclusionSet::default();

    // VOD wins over the channel separator
    assert_eq!(
        classify("VOD|Action", &none),
        Classification::Classified(Category::Movie)
    );
    // SRS wins over the channel separator
    assert_eq!(
        classify("SRS|Drama", &none),
        Classification::Classified(Category::Series)
    );
    // VOD wins over SRS
    assert_eq!(
        classify("VOD SRS mix", &none),
        Classification::Classified(Category::Movie)
    );
    assert_eq!(
        classify("FR| Sports", &none),
        Classification::Classified(Category::Channel)
    );
    assert_eq!(
        classify("Documentaries", &none),
        Classification::Classified(Category::Other)
    );
    // Case sensitive
    assert_eq!(
        classify("vod action", &none),
        Classification::Classified(Category::Other)
    );
}

#[test]
fn test_exclusion_is_exact_match() {
    let exclusions = ExclusionSet::parse("  VOD|Action  \n\n# comment\nKids\n");

    assert_eq!(classify("VOD|Action", &exclusions), Classification::Excluded);
    assert_eq!(classify("Kids", &exclusions), Classification::Excluded);
    assert_eq!(
        classify("VOD|Action ", &exclusions),
        Classification::Classified(Category::Movie)
    );
    assert_eq!(
        classify("# comment", &exclusions),
        Classification::Classified(Category::Other)
    );
}

#[test]
fn test_empty_group_guard() {
    let with_sentinel = ExclusionSet::from_labels([NO_GROUP_SENTINEL]);
    let without = ExclusionSet::default();

    // The raw title is empty, so only the guard can exclude it
    assert_eq!(
        classify("", &with_sentinel),
        Classification::Classified(Category::Other)
    );
    assert_eq!(other_group_guard("", &with_sentinel), OtherGroupGuard::Excluded);
    assert_eq!(other_group_guard("", &without), OtherGroupGuard::Pass);
    assert_eq!(other_group_guard("Kids", &with_sentinel), OtherGroupGuard::Pass);
}

#[test]
fn test_empty_group_lands_under_sentinel() {
    let temp = TempDir::new().unwrap();
    let manifest = "#EXTINF:-1 tvg-name=\"Lost S02 E03\",Lost\nhttp://x/lost\n";

    let result = run(temp.path(), &ExclusionSet::default(), manifest);

    let path = temp
        .path()
        .join("OTHERS/.NOGROUP-ASSIGNED/Lost/Lost S02 E03.strm");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "http://x/lost");
    assert_eq!(
        result.category(Category::Other).created[NO_GROUP_SENTINEL],
        vec!["Lost S02 E03".to_string()]
    );
}

#[test]
fn test_excluded_entries_leave_no_trace() {
    let temp = TempDir::new().unwrap();
    let exclusions = ExclusionSet::from_labels(["VOD|Action", NO_GROUP_SENTINEL]);
    let manifest = "#EXTINF:-1 group-title=\"VOD|Action\" tvg-name=\"Movie One\",Movie One
http://x/1.ts
#EXTINF:-1 group-title=\"\" tvg-name=\"Nameless\",Nameless
http://x/2.ts
#EXTINF:-1 group-title=\"VOD|Drama\" tvg-name=\"Movie Two\",Movie Two
http://x/3.ts
";

    let result = run(temp.path(), &exclusions, manifest);

    assert_eq!(result.excluded, 2);
    assert_eq!(result.total_created(), 1);
    assert!(!result
        .category(Category::Movie)
        .created
        .contains_key("VOD|Action"));
    assert!(!temp.path().join("FILMS/VOD Action").exists());
    assert!(!temp.path().join("OTHERS").exists());
    assert!(temp.path().join("FILMS/VOD Drama/Movie Two.strm").exists());
}
