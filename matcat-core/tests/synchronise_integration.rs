//! Cache-refresh protocol tests against a mocked fetcher: bootstrap,
//! idempotence, version/date-triggered refresh, out-of-band self-heal,
//! pruning of vanished entries and fail-the-run semantics.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::{tempdir, TempDir};

use matcat_core::config::SyncConfig;
use matcat_core::contract::MockProducerFetcher;
use matcat_core::synchronise::synchronise;

const INDEX_V1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ProducerIndex xmlns="http://schemas.matcat.org/catalog/1.0" created="2024-05-01">
  <Company id="acme" href="https://catalog.example.com/payloads/acme.xml" name="ACME Building Products" LastKnownDate="2024-04-28" KnownVersion="1"/>
  <Company id="brix" href="https://catalog.example.com/payloads/brix.xml" name="Brix" LastKnownDate="2024-04-30" KnownVersion="4"/>
</ProducerIndex>
"#;

// acme bumped to version 2 under a renamed payload; brix untouched.
const INDEX_V2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ProducerIndex xmlns="http://schemas.matcat.org/catalog/1.0" created="2024-06-01">
  <Company id="acme" href="https://catalog.example.com/payloads/acme-v2.xml" name="ACME Building Products" LastKnownDate="2024-05-28" KnownVersion="2"/>
  <Company id="brix" href="https://catalog.example.com/payloads/brix.xml" name="Brix" LastKnownDate="2024-04-30" KnownVersion="4"/>
</ProducerIndex>
"#;

// Same versions/hrefs as V1 but acme's LastKnownDate moved forward.
const INDEX_LATER_DATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ProducerIndex xmlns="http://schemas.matcat.org/catalog/1.0" created="2024-06-01">
  <Company id="acme" href="https://catalog.example.com/payloads/acme.xml" name="ACME Building Products" LastKnownDate="2024-05-15" KnownVersion="1"/>
  <Company id="brix" href="https://catalog.example.com/payloads/brix.xml" name="Brix" LastKnownDate="2024-04-30" KnownVersion="4"/>
</ProducerIndex>
"#;

// brix is gone entirely; acme unchanged.
const INDEX_WITHOUT_BRIX: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ProducerIndex xmlns="http://schemas.matcat.org/catalog/1.0" created="2024-06-01">
  <Company id="acme" href="https://catalog.example.com/payloads/acme.xml" name="ACME Building Products" LastKnownDate="2024-04-28" KnownVersion="1"/>
</ProducerIndex>
"#;

fn cache_config(dir: &TempDir) -> SyncConfig {
    SyncConfig::new(
        "https://catalog.example.com/ProducerIndex.xml",
        dir.path().join("cache"),
    )
}

fn fetcher_serving(index: &'static str) -> MockProducerFetcher {
    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(move || Ok(index.to_string()));
    fetcher
        .expect_fetch_payload()
        .returning(|href| Ok(format!("payload from {href}").into_bytes()));
    fetcher
}

async fn bootstrap(config: &SyncConfig) {
    let fetcher = fetcher_serving(INDEX_V1);
    let report = synchronise(config, &fetcher)
        .await
        .expect("bootstrap run should succeed");
    assert_eq!(report.refreshed.len(), 2);
}

fn payload_path(config: &SyncConfig, name: &str) -> PathBuf {
    config.producers_dir().join(name)
}

#[tokio::test]
#[serial]
async fn bootstrap_from_empty_cache_downloads_everything() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);

    let fetcher = fetcher_serving(INDEX_V1);
    let report = synchronise(&config, &fetcher)
        .await
        .expect("bootstrap run should succeed");

    assert_eq!(report.refreshed, vec!["acme.xml", "brix.xml"]);
    assert!(report.unchanged.is_empty());
    assert!(report.removed.is_empty());
    assert!(payload_path(&config, "acme.xml").exists());
    assert!(payload_path(&config, "brix.xml").exists());
    assert_eq!(
        fs::read_to_string(config.index_path()).unwrap(),
        INDEX_V1,
        "the fetched index must be persisted in full"
    );
}

#[tokio::test]
#[serial]
async fn unchanged_remote_leaves_the_cache_untouched() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mtime_before = fs::metadata(config.index_path()).unwrap().modified().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(50));

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_V1.to_string()));
    // No fetch_payload expectation: any download attempt fails the test.
    let report = synchronise(&config, &fetcher)
        .await
        .expect("second run should succeed");

    assert!(report.refreshed.is_empty());
    assert!(report.removed.is_empty());
    assert_eq!(report.unchanged, vec!["acme.xml", "brix.xml"]);
    let mtime_after = fs::metadata(config.index_path()).unwrap().modified().unwrap();
    assert_eq!(
        mtime_before, mtime_after,
        "an unchanged run must not rewrite the persisted index"
    );
}

#[tokio::test]
#[serial]
async fn version_bump_replaces_the_payload_and_rewrites_the_index() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_V2.to_string()));
    fetcher
        .expect_fetch_payload()
        .withf(|href| href.ends_with("acme-v2.xml"))
        .times(1)
        .returning(|href| Ok(format!("payload from {href}").into_bytes()));

    let report = synchronise(&config, &fetcher).await.unwrap();

    assert_eq!(report.refreshed, vec!["acme-v2.xml"]);
    assert_eq!(report.unchanged, vec!["brix.xml"]);
    assert!(
        !payload_path(&config, "acme.xml").exists(),
        "the old payload file must be deleted under its old href name"
    );
    assert!(payload_path(&config, "acme-v2.xml").exists());
    assert_eq!(fs::read_to_string(config.index_path()).unwrap(), INDEX_V2);
}

#[tokio::test]
#[serial]
async fn strictly_newer_date_triggers_a_refresh() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_LATER_DATE.to_string()));
    fetcher
        .expect_fetch_payload()
        .withf(|href| href.ends_with("acme.xml"))
        .times(1)
        .returning(|href| Ok(format!("fresher payload from {href}").into_bytes()));

    let report = synchronise(&config, &fetcher).await.unwrap();
    assert_eq!(report.refreshed, vec!["acme.xml"]);
    assert_eq!(report.unchanged, vec!["brix.xml"]);
}

#[tokio::test]
#[serial]
async fn missing_payload_file_self_heals() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    fs::remove_file(payload_path(&config, "acme.xml")).unwrap();

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_V1.to_string()));
    fetcher
        .expect_fetch_payload()
        .withf(|href| href.ends_with("acme.xml"))
        .times(1)
        .returning(|href| Ok(format!("payload from {href}").into_bytes()));

    let report = synchronise(&config, &fetcher).await.unwrap();
    assert_eq!(
        report.refreshed,
        vec!["acme.xml"],
        "only the vanished payload is re-downloaded"
    );
    assert_eq!(report.unchanged, vec!["brix.xml"]);
    assert!(payload_path(&config, "acme.xml").exists());
}

#[tokio::test]
#[serial]
async fn entries_dropped_from_the_index_are_pruned() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_WITHOUT_BRIX.to_string()));

    let report = synchronise(&config, &fetcher).await.unwrap();
    assert_eq!(report.removed, vec!["brix.xml"]);
    assert_eq!(report.unchanged, vec!["acme.xml"]);
    assert!(report.refreshed.is_empty());
    assert!(!payload_path(&config, "brix.xml").exists());
    assert_eq!(
        fs::read_to_string(config.index_path()).unwrap(),
        INDEX_WITHOUT_BRIX,
        "a removal counts as a change and persists the new index"
    );
}

#[tokio::test]
#[serial]
async fn index_fetch_failure_aborts_without_touching_the_cache() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Err("connection refused".into()));

    let err = synchronise(&config, &fetcher).await.unwrap_err();
    assert!(err.to_string().contains("producer index"));
    assert_eq!(fs::read_to_string(config.index_path()).unwrap(), INDEX_V1);
    assert!(payload_path(&config, "acme.xml").exists());
    assert!(payload_path(&config, "brix.xml").exists());
}

#[tokio::test]
#[serial]
async fn payload_failure_fails_the_run_and_keeps_the_old_index() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);
    bootstrap(&config).await;

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok(INDEX_V2.to_string()));
    fetcher
        .expect_fetch_payload()
        .returning(|_| Err("payload unreachable".into()));

    let err = synchronise(&config, &fetcher).await.unwrap_err();
    assert!(err.to_string().contains("acme"));
    assert_eq!(
        fs::read_to_string(config.index_path()).unwrap(),
        INDEX_V1,
        "a failed run must never persist the new index"
    );
}

#[tokio::test]
#[serial]
async fn malformed_remote_index_is_fatal() {
    let dir = tempdir().unwrap();
    let config = cache_config(&dir);

    let mut fetcher = MockProducerFetcher::new();
    fetcher
        .expect_fetch_index()
        .return_once(|| Ok("<ProducerIndex".to_string()));

    let err = synchronise(&config, &fetcher).await.unwrap_err();
    assert!(err.to_string().contains("did not parse"));
    assert!(
        !config.index_path().exists(),
        "nothing may be persisted on a failed bootstrap"
    );
}
