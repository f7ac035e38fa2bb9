//! High-level pipeline: one full refresh of the local producer catalog cache.
//!
//! A synchronisation run loads the cached index, fetches the remote one,
//! diffs the two per company entry, prunes payloads for entries that
//! vanished, re-downloads payloads for entries that changed (or whose local
//! file went missing out-of-band), and persists the fetched index only when
//! something actually changed. Any fetch or filesystem failure aborts the
//! run before the index is persisted, so the cache is at worst stale, never
//! half-committed.

use std::fs;
use std::path::Path;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::config::{MapperOptions, SyncConfig};
use crate::contract::ProducerFetcher;
use crate::de;
use crate::error::SyncError;
use crate::model::{IndexEntry, ProducerIndex};

/// Outcome of one synchronisation run, as payload file names.
#[derive(Debug, Default, serde::Serialize)]
pub struct SyncReport {
    pub unchanged: Vec<String>,
    pub refreshed: Vec<String>,
    pub removed: Vec<String>,
}

/// Run the cache-refresh protocol once.
pub async fn synchronise<F>(config: &SyncConfig, fetcher: &F) -> Result<SyncReport, SyncError>
where
    F: ProducerFetcher,
{
    info!(index_url = %config.index_url, "[SYNC] starting synchronisation run");
    fs::create_dir_all(config.producers_dir())?;

    // Step 1: cached index, or empty on first run.
    let cached_entries = match load_cached_index(config)? {
        Some(index) => index.entries,
        None => {
            info!("[SYNC] no cached index, bootstrapping from empty");
            Vec::new()
        }
    };

    // Step 2: remote index. Fetch or parse failure is fatal for the run.
    let fetched_text = fetcher.fetch_index().await.map_err(SyncError::IndexFetch)?;
    let fetched = de::from_xml_str::<ProducerIndex>(
        &fetched_text,
        &config.index_url,
        &MapperOptions::default(),
    )?
    .value;
    info!(
        fetched = fetched.entries.len(),
        cached = cached_entries.len(),
        "[SYNC] fetched remote producer index"
    );

    let producers = config.producers_dir();

    // Entries that vanished from the index lose their payload file.
    let mut removed = Vec::new();
    for old in &cached_entries {
        if fetched.entries.iter().any(|e| e.id == old.id) {
            continue;
        }
        let name = payload_file_name(&old.href);
        let path = producers.join(&name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        info!(id = %old.id, payload = %name, "[SYNC] removed payload for entry no longer in index");
        removed.push(name);
    }

    // Step 3: per-entry diff.
    let mut unchanged = Vec::new();
    let mut to_refresh: Vec<(Option<&IndexEntry>, &IndexEntry)> = Vec::new();
    for entry in &fetched.entries {
        let old = cached_entries.iter().find(|o| o.id == entry.id);
        if needs_refresh(old, entry, &producers) {
            to_refresh.push((old, entry));
        } else {
            unchanged.push(payload_file_name(&entry.href));
        }
    }

    // Step 4: apply. Stale payloads go first (a changed href may rename the
    // file), then all downloads run concurrently and fail-fast: one
    // unreachable payload aborts the run before the index is persisted.
    for (old, entry) in &to_refresh {
        let Some(old) = old else { continue };
        let stale = producers.join(payload_file_name(&old.href));
        if stale.exists() {
            fs::remove_file(&stale)?;
            debug!(id = %entry.id, path = %stale.display(), "[SYNC] deleted stale payload");
        }
    }
    let downloads = to_refresh
        .iter()
        .map(|(_, entry)| refresh_payload(fetcher, &producers, entry));
    let refreshed = try_join_all(downloads).await?;

    // Step 5: persist the fetched index in full, but only if this run
    // changed anything on disk.
    if refreshed.is_empty() && removed.is_empty() {
        info!("[SYNC] nothing changed, keeping persisted index untouched");
    } else {
        fs::write(config.index_path(), fetched_text.as_bytes())?;
        info!(
            path = %config.index_path().display(),
            "[SYNC] persisted refreshed producer index"
        );
    }

    let report = SyncReport {
        unchanged,
        refreshed,
        removed,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(report = %json, "[SYNC] run report"),
        Err(e) => warn!(error = ?e, "[SYNC] failed to serialise run report"),
    }
    Ok(report)
}

/// Whether a fetched entry's payload must be (re-)downloaded.
fn needs_refresh(old: Option<&IndexEntry>, new: &IndexEntry, producers: &Path) -> bool {
    let Some(old) = old else {
        return true;
    };
    if new.last_known_date > old.last_known_date {
        return true;
    }
    if new.known_version > old.known_version {
        return true;
    }
    // Metadata unchanged, but the file may have been deleted out-of-band.
    !producers.join(payload_file_name(&new.href)).exists()
}

async fn refresh_payload<F>(
    fetcher: &F,
    producers: &Path,
    entry: &IndexEntry,
) -> Result<String, SyncError>
where
    F: ProducerFetcher,
{
    let bytes = fetcher
        .fetch_payload(&entry.href)
        .await
        .map_err(|source| SyncError::PayloadFetch {
            id: entry.id.clone(),
            source,
        })?;
    let name = payload_file_name(&entry.href);
    fs::write(producers.join(&name), &bytes)?;
    info!(id = %entry.id, payload = %name, bytes = bytes.len(), "[SYNC] refreshed payload");
    Ok(name)
}

fn load_cached_index(config: &SyncConfig) -> Result<Option<ProducerIndex>, SyncError> {
    let path = config.index_path();
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    let parsed = de::from_xml_str::<ProducerIndex>(
        &text,
        &path.display().to_string(),
        &MapperOptions::default(),
    )?;
    Ok(Some(parsed.value))
}

/// Local file name of a payload: the basename of its `href`.
fn payload_file_name(href: &str) -> String {
    let base = href.split(['?', '#']).next().unwrap_or(href);
    base.rsplit('/').next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(id: &str, href: &str, date: Option<&str>, version: Option<i64>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            href: href.to_string(),
            name: None,
            last_known_date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            known_version: version,
        }
    }

    #[test]
    fn payload_file_name_takes_href_basename() {
        assert_eq!(
            payload_file_name("https://example.com/payloads/acme.xml"),
            "acme.xml"
        );
        assert_eq!(
            payload_file_name("https://example.com/payloads/acme.xml?v=3"),
            "acme.xml"
        );
        assert_eq!(payload_file_name("acme.xml"), "acme.xml");
    }

    #[test]
    fn refresh_triggers_on_version_date_or_missing_counterpart() {
        let dir = tempfile::tempdir().unwrap();
        let producers = dir.path();
        let old = entry("a", "https://x/a.xml", Some("2024-01-01"), Some(1));
        std::fs::write(producers.join("a.xml"), b"payload").unwrap();

        // No cached counterpart.
        assert!(needs_refresh(None, &old, producers));
        // Strictly greater version.
        let newer = entry("a", "https://x/a.xml", Some("2024-01-01"), Some(2));
        assert!(needs_refresh(Some(&old), &newer, producers));
        // Strictly greater date.
        let later = entry("a", "https://x/a.xml", Some("2024-02-01"), Some(1));
        assert!(needs_refresh(Some(&old), &later, producers));
        // Identical metadata and file present: no refresh.
        let same = entry("a", "https://x/a.xml", Some("2024-01-01"), Some(1));
        assert!(!needs_refresh(Some(&old), &same, producers));
    }

    #[test]
    fn refresh_triggers_when_payload_file_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let old = entry("a", "https://x/a.xml", Some("2024-01-01"), Some(1));
        let same = entry("a", "https://x/a.xml", Some("2024-01-01"), Some(1));
        assert!(needs_refresh(Some(&old), &same, dir.path()));
    }
}
