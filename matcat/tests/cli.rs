use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<Materials xmlns="http://schemas.matcat.org/catalog/1.0" version="1.0" created="2024-05-01">
  <Company id="7" country="AT">
    <Name lang="en">Muster Brickworks</Name>
  </Company>
  <SignatureValue version="2">c2ln</SignatureValue>
  <PublicKey version="2">a2V5</PublicKey>
  <Material id="1">
    <Code>ZW-115</Code>
    <Information category="masonry">
      <Name lang="en">Brick</Name>
      <Name lang="de">Ziegel</Name>
    </Information>
    <Layer number="1">
      <Geometry country="AT" thickness="115"/>
    </Layer>
  </Material>
</Materials>
"#;

const CONFIG: &str = "catalog:\n  language: en\n  country: AT\n  validate: false\n";

fn write_fixtures(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let catalog = dir.path().join("catalog.xml");
    let config = dir.path().join("config.yaml");
    fs::write(&catalog, CATALOG).expect("writing catalog fixture failed");
    fs::write(&config, CONFIG).expect("writing config fixture failed");
    (catalog, config)
}

#[test]
fn help_lists_the_subcommands() {
    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("sync")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("export")),
        );
}

#[test]
fn show_prints_a_material_summary() {
    let dir = tempdir().unwrap();
    let (catalog, config) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("show").arg(&catalog).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Muster Brickworks")
                .and(predicate::str::contains("Brick"))
                .and(predicate::str::contains("signed: true")),
        );
}

#[test]
fn show_warns_about_a_missing_trust_element() {
    let dir = tempdir().unwrap();
    let (catalog, config) = write_fixtures(&dir);
    let unsigned = CATALOG.replace("  <SignatureValue version=\"2\">c2ln</SignatureValue>\n", "");
    fs::write(&catalog, unsigned).unwrap();

    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("show").arg(&catalog).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("signed: false"))
        .stderr(predicate::str::contains("SignatureValue"));
}

#[test]
fn export_round_trips_a_catalog() {
    let dir = tempdir().unwrap();
    let (catalog, config) = write_fixtures(&dir);
    let output = dir.path().join("roundtrip.xml");

    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("export")
        .arg(&catalog)
        .arg(&output)
        .arg("--config")
        .arg(&config);
    cmd.assert().success();

    let emitted = fs::read_to_string(&output).expect("export must write the output file");
    assert!(emitted.contains("<Materials"));
    assert!(emitted.contains("ZW-115"));
    assert!(emitted.contains("xmlns=\"http://schemas.matcat.org/catalog/1.0\""));
}

#[test]
fn missing_config_file_fails_with_a_clear_error() {
    let dir = tempdir().unwrap();
    let (catalog, _) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("show")
        .arg(&catalog)
        .arg("--config")
        .arg(dir.path().join("nope.yaml"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn sync_without_a_sync_section_is_rejected() {
    let dir = tempdir().unwrap();
    let (_, config) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("matcat").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no 'sync' section"));
}
