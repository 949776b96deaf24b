// proxyforge-core/tests/discovery_tests.rs

mod common;

use common::create_footage;
use proxyforge_core::discovery::find_source_items;
use proxyforge_core::error::CoreError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_source_items_mirrors_groups() -> Result<(), Box<dyn std::error::Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;

    create_footage(footage.path(), "day2", "B002.MOV");
    create_footage(footage.path(), "day1", "A002.mp4");
    create_footage(&footage.path().join("day1"), "CARD_A", "A001.MXF");
    create_footage(footage.path(), "day1", "._A002.mp4");
    create_footage(footage.path(), "day1", "notes.txt");
    // Loose files at the root belong to no group.
    fs::write(footage.path().join("stray.mov"), b"x")?;

    let items = find_source_items(footage.path(), proxies.path(), "mov")?;

    let names: Vec<(String, String)> = items
        .iter()
        .map(|i| (i.group().to_string(), i.file_name()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("day1".to_string(), "A002.mp4".to_string()),
            ("day1".to_string(), "A001.MXF".to_string()),
            ("day2".to_string(), "B002.MOV".to_string()),
        ]
    );

    // Nested files land directly under their group in the proxy tree.
    assert_eq!(items[1].output_path(), proxies.path().join("day1").join("A001.mov"));
    assert_eq!(items[2].output_path(), proxies.path().join("day2").join("B002.mov"));
    Ok(())
}

#[test]
fn test_find_source_items_rejects_colliding_proxy_paths() -> Result<(), Box<dyn std::error::Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;
    let day1 = footage.path().join("day1");
    create_footage(&day1, "CARD_A", "C0001.MP4");
    create_footage(&day1, "CARD_B", "C0001.MP4");

    match find_source_items(footage.path(), proxies.path(), "mov") {
        Err(CoreError::PathError(msg)) => {
            assert!(msg.contains("CARD_A"), "{msg}");
            assert!(msg.contains("CARD_B"), "{msg}");
            assert!(msg.contains("C0001.mov"), "{msg}");
        }
        other => panic!("Unexpected result: {:?}", other),
    }

    // The same stem in different groups maps to different proxies.
    let footage = tempdir()?;
    create_footage(footage.path(), "day1", "C0001.MP4");
    create_footage(footage.path(), "day2", "C0001.MP4");
    let items = find_source_items(footage.path(), proxies.path(), "mov")?;
    assert_eq!(items.len(), 2);
    assert_ne!(items[0].output_path(), items[1].output_path());
    Ok(())
}

#[test]
fn test_find_source_items_empty() -> Result<(), Box<dyn std::error::Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;
    create_footage(footage.path(), "day1", "readme.txt");

    let result = find_source_items(footage.path(), proxies.path(), "mov");
    match result {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_find_source_items_nonexistent_dir() {
    let missing = PathBuf::from("surely_this_footage_root_does_not_exist_42");
    let result = find_source_items(&missing, &PathBuf::from("/tmp/proxies"), "mov");
    assert!(matches!(result, Err(CoreError::Io(_))));
}
