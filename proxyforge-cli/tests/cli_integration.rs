use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn proxyforge_cmd() -> Command {
    Command::cargo_bin("proxyforge").expect("Failed to find proxyforge binary")
}

#[test]
fn test_help_lists_subcommands() {
    proxyforge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("transcode"))
        .stdout(contains("probe"));
}

#[test]
fn test_transcode_missing_footage_root() -> Result<(), Box<dyn Error>> {
    let scratch = tempdir()?;
    let proxies = scratch.path().join("proxies");

    proxyforge_cmd()
        .arg("transcode")
        .arg(scratch.path().join("surely_not_here"))
        .arg(&proxies)
        .assert()
        .failure()
        .stderr(contains("is not a directory"));

    assert!(!proxies.exists());
    Ok(())
}

#[test]
fn test_transcode_empty_footage_tree_succeeds() -> Result<(), Box<dyn Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;
    fs::create_dir_all(footage.path().join("day1"))?;
    fs::write(footage.path().join("day1").join("notes.txt"), "not footage")?;

    proxyforge_cmd()
        .arg("transcode")
        .arg(footage.path())
        .arg(proxies.path())
        .assert()
        .success()
        .stdout(contains("No footage files found"));

    // The run log is opened even when there is nothing to do.
    let logs: Vec<_> = fs::read_dir(proxies.path().join("logs"))?.collect();
    assert_eq!(logs.len(), 1);
    Ok(())
}

#[test]
fn test_json_progress_keeps_stdout_clean_on_empty_tree() -> Result<(), Box<dyn Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;
    fs::create_dir_all(footage.path().join("day1"))?;

    proxyforge_cmd()
        .arg("transcode")
        .arg(footage.path())
        .arg(proxies.path())
        .arg("--json-progress")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicates::str::is_empty())
        .stderr(contains("No footage files found"));
    Ok(())
}

#[test]
fn test_transcode_rejects_proxy_root_inside_footage() -> Result<(), Box<dyn Error>> {
    let footage = tempdir()?;
    fs::create_dir_all(footage.path().join("day1"))?;

    proxyforge_cmd()
        .arg("transcode")
        .arg(footage.path())
        .arg(footage.path().join("proxies"))
        .assert()
        .failure()
        .stderr(contains("must not be inside footage root"));
    Ok(())
}

#[test]
fn test_transcode_rejects_unknown_codec() -> Result<(), Box<dyn Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;

    proxyforge_cmd()
        .arg("transcode")
        .arg(footage.path())
        .arg(proxies.path())
        .arg("--codec")
        .arg("av1")
        .assert()
        .failure()
        .stderr(contains("unknown codec"));
    Ok(())
}

#[test]
fn test_transcode_rejects_odd_width() -> Result<(), Box<dyn Error>> {
    let footage = tempdir()?;
    let proxies = tempdir()?;
    fs::create_dir_all(footage.path().join("day1"))?;

    proxyforge_cmd()
        .arg("transcode")
        .arg(footage.path())
        .arg(proxies.path())
        .arg("--max-width")
        .arg("1279")
        .assert()
        .failure()
        .stderr(contains("max_width must be even"));
    Ok(())
}

#[test]
fn test_probe_missing_file() {
    proxyforge_cmd()
        .arg("probe")
        .arg("surely/this/does/not/exist/A001.mov")
        .assert()
        .failure()
        .stderr(contains("is not a file"));
}
